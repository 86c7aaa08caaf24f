use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::ingest::LoadReport;
use crate::storage::{DatasetKind, DatasetSizes, DatasetUpdate};

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub dataset: DatasetKind,
    pub report: LoadReport,
    pub datasets: DatasetSizes,
}

/// Replace one dataset with the CSV in the request body.
///
/// Parsing happens on a blocking thread before the write lock is taken, so
/// readers see either the old or the new records, never a mix.
pub async fn replace_dataset(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    body: String,
) -> Result<Json<ReplaceResponse>, ApiError> {
    let kind: DatasetKind = kind.parse()?;
    if body.trim().is_empty() {
        return Err(ApiError::BadRequest("request body is empty".to_string()));
    }

    let update = tokio::task::spawn_blocking(move || DatasetUpdate::parse(kind, &body))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut dataset = state.dataset.write().await;
    let report = dataset.apply(update);
    info!("Replaced {} dataset: {} records", kind, report.records);

    Ok(Json(ReplaceResponse {
        dataset: kind,
        report,
        datasets: dataset.sizes(),
    }))
}
