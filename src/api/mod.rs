//! REST API endpoints.
//!
//! Axum-based HTTP API over the loaded datasets: health, the game list,
//! the analytics views, dataset upload and the assistant.

pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::assistant::AssistantError;
use crate::storage::StorageError;
use state::AppState;

/// Upper bound for CSV upload bodies.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Create the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    let analytics = Router::new()
        .route("/arena", get(routes::analytics::arena))
        .route("/channels", get(routes::analytics::channels))
        .route("/comps", get(routes::analytics::comps))
        .route("/pnl", get(routes::analytics::pnl))
        .route("/crm", get(routes::analytics::crm))
        .route("/sponsors", get(routes::analytics::sponsors));

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/games", get(routes::games::list_games))
        .route("/api/games/:id", get(routes::games::get_game))
        .nest("/api/analytics", analytics)
        .route("/api/datasets/:kind", put(routes::datasets::replace_dataset))
        .route("/api/assistant", post(routes::assistant::ask))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin.trim() == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin.trim()) {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            layer
        }
    }
}

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::UnknownDataset(name) => {
                ApiError::NotFound(format!("dataset '{}'", name))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(e: AssistantError) -> Self {
        match e {
            AssistantError::EmptyQuestion => {
                ApiError::BadRequest(AssistantError::EmptyQuestion.to_string())
            }
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    /// Items before the current page, saturating for out-of-range pages.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// The current page of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.offset() as usize).min(items.len());
        let end = (start + self.page_size as usize).min(items.len());
        &items[start..end]
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_new() {
        let p = Pagination::new(Some(3), Some(25));
        assert_eq!(p.page, 3);
        assert_eq!(p.page_size, 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_pagination_bounds() {
        // Page can't be 0
        let p = Pagination::new(Some(0), Some(50));
        assert_eq!(p.page, 1);

        // Page size max is 100
        let p = Pagination::new(Some(1), Some(200));
        assert_eq!(p.page_size, 100);
    }

    #[test]
    fn test_pagination_slice() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(Pagination::new(Some(3), Some(10)).slice(&items), &[20, 21, 22, 23, 24]);
        assert!(Pagination::new(Some(4), Some(10)).slice(&items).is_empty());
    }

    #[test]
    fn test_pagination_huge_page() {
        let p = Pagination::new(Some(u32::MAX), Some(100));
        assert_eq!(p.offset(), u32::MAX);
        assert!(p.slice(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_api_error_from_storage() {
        let err: ApiError = StorageError::UnknownDataset("merch".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_api_error_from_assistant() {
        let err: ApiError = AssistantError::EmptyQuestion.into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = AssistantError::Status {
            status: 429,
            body: "quota".to_string(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_pagination_meta() {
        let p = Pagination::new(Some(2), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_items, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_pagination_meta_first_page() {
        let p = Pagination::new(Some(1), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_pagination_meta_last_page() {
        let p = Pagination::new(Some(3), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert!(meta.has_prev);
        assert!(!meta.has_next);
    }
}
