use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::calculate::game_summaries;
use crate::models::{GameData, GameSummary};

use super::GameQuery;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<GameSummary>,
    pub pagination: PaginationMeta,
}

/// Filtered game table, oldest first.
pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<GamesResponse>, ApiError> {
    let filter = query.to_filter()?;
    let pagination = Pagination::new(page.page, page.page_size);

    let rows = {
        let dataset = state.dataset.read().await;
        game_summaries(&dataset.games, &filter)
    };

    let meta = PaginationMeta::new(&pagination, rows.len() as u32);
    Ok(Json(GamesResponse {
        games: pagination.slice(&rows).to_vec(),
        pagination: meta,
    }))
}

/// Full record for one game, including the sales breakdown.
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameData>, ApiError> {
    let dataset = state.dataset.read().await;
    dataset
        .games
        .iter()
        .find(|g| g.id.as_str() == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("game '{}'", id)))
}
