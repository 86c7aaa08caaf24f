//! Route handlers, one module per resource.

pub mod analytics;
pub mod assistant;
pub mod datasets;
pub mod games;
pub mod health;

use serde::Deserialize;

use crate::api::ApiError;
use crate::ingest::parse_date;
use crate::models::{GameFilter, SalesChannel};

/// Game filter as query parameters. `channels` is a comma-separated list of
/// channel keys; empty values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct GameQuery {
    pub season: Option<String>,
    pub league: Option<String>,
    pub tier: Option<String>,
    pub opponent: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub channels: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn date_param(name: &str, value: &Option<String>) -> Result<Option<chrono::NaiveDate>, ApiError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid {}: {}", name, raw))),
    }
}

impl GameQuery {
    pub fn to_filter(&self) -> Result<GameFilter, ApiError> {
        let channels = match non_empty(&self.channels) {
            None => Vec::new(),
            Some(raw) => raw
                .split(',')
                .filter(|c| !c.trim().is_empty())
                .map(|c| {
                    SalesChannel::from_name(c)
                        .ok_or_else(|| ApiError::BadRequest(format!("unknown channel: {}", c.trim())))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(GameFilter {
            season: non_empty(&self.season),
            league: non_empty(&self.league),
            tier: non_empty(&self.tier),
            opponent: non_empty(&self.opponent),
            date_from: date_param("date_from", &self.date_from)?,
            date_to: date_param("date_to", &self.date_to)?,
            channels,
        })
    }
}
