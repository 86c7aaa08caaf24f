//! Question answering over the current aggregates.
//!
//! Two backends sit behind [`AssistantBackend`]:
//! - Gemini, when `GEMINI_API_KEY` is configured
//! - an offline keyword heuristic otherwise
//!
//! Both receive the same [`AssistantContext`]. The context carries aggregates
//! only; individual customer records never leave the process.

pub mod gemini;
pub mod heuristic;

pub use gemini::GeminiBackend;
pub use heuristic::HeuristicBackend;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::calculate::{
    channel_stats, comp_summary, monthly_pnl, overview, segment_customers, sponsor_report,
    zone_stats,
};
use crate::config::AssistantConfig;
use crate::models::{
    ChannelStat, CompSummary, CrmFilter, GameFilter, PnlMonth, RevenueOverview, SegmentSummary,
    SponsorFilter, SponsorReport, ZoneStat,
};
use crate::storage::Dataset;

/// Errors returned by assistant backends.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Assistant backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Assistant backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Assistant response unparseable: {0}")]
    ResponseParseError(String),
}

/// `POST /api/assistant` body.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantRequest {
    pub question: String,
    /// Restricts the game aggregates the answer is based on
    #[serde(default)]
    pub filter: GameFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantAnswer {
    pub answer: String,
    pub backend: &'static str,
}

/// Aggregates handed to a backend alongside the question.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssistantContext {
    pub filter: GameFilter,
    pub overview: RevenueOverview,
    pub zones: Vec<ZoneStat>,
    pub channels: Vec<ChannelStat>,
    pub comps: CompSummary,
    pub pnl: Vec<PnlMonth>,
    pub segments: Vec<SegmentSummary>,
    pub sponsors: SponsorReport,
}

impl AssistantContext {
    pub fn build(dataset: &Dataset, filter: &GameFilter) -> Self {
        let games = &dataset.games;
        let sponsor_filter = SponsorFilter {
            season: filter.season.clone(),
            category: None,
        };

        Self {
            filter: filter.clone(),
            overview: overview(games, filter),
            zones: zone_stats(games, filter),
            channels: channel_stats(games, filter),
            comps: comp_summary(games, filter),
            pnl: monthly_pnl(games, filter),
            segments: segment_customers(&dataset.customers, &CrmFilter::default()).segments,
            sponsors: sponsor_report(&dataset.sponsors, &sponsor_filter),
        }
    }
}

/// Trait for assistant backends.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Backend name for logging and responses.
    fn name(&self) -> &'static str;

    /// Answer a question from the given aggregates.
    async fn answer(
        &self,
        question: &str,
        context: &AssistantContext,
    ) -> Result<String, AssistantError>;
}

/// Gemini when an API key is configured, the offline heuristic otherwise.
pub fn select_backend(config: &AssistantConfig) -> Result<Arc<dyn AssistantBackend>, AssistantError> {
    match config.api_key() {
        Some(key) => {
            info!("Assistant backend: gemini ({})", config.model);
            Ok(Arc::new(GeminiBackend::new(
                config.base_url.clone(),
                config.model.clone(),
                key.to_string(),
                config.timeout_seconds,
            )?))
        }
        None => {
            info!("Assistant backend: offline heuristic (no API key)");
            Ok(Arc::new(HeuristicBackend))
        }
    }
}

/// Validate the question, then ask the backend.
pub async fn ask(
    backend: &dyn AssistantBackend,
    question: &str,
    context: &AssistantContext,
) -> Result<AssistantAnswer, AssistantError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AssistantError::EmptyQuestion);
    }

    let answer = backend.answer(question, context).await?;
    Ok(AssistantAnswer {
        answer,
        backend: backend.name(),
    })
}
