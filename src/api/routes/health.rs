use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::ingest::LoadReport;
use crate::storage::{DatasetKind, DatasetSizes};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub assistant: &'static str,
    pub datasets: DatasetSizes,
    pub reports: BTreeMap<DatasetKind, LoadReport>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let dataset = state.dataset.read().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        assistant: state.assistant.name(),
        datasets: dataset.sizes(),
        reports: dataset.reports.clone(),
    })
}
