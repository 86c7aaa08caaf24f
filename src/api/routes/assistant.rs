use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::assistant::{self, AssistantAnswer, AssistantContext, AssistantRequest};

/// Answer a question about the current data. The dataset lock is released
/// before the backend is called.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantAnswer>, ApiError> {
    let context = {
        let dataset = state.dataset.read().await;
        AssistantContext::build(&dataset, &request.filter)
    };

    let answer = assistant::ask(state.assistant.as_ref(), &request.question, &context).await?;
    Ok(Json(answer))
}
