//! Explicit filter state for the aggregators.
//!
//! Each dashboard view owns one filter value and passes it by reference into
//! the pure folds in [`crate::calculate`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CustomerSegment, GameData, SalesChannel, SponsorDeal};
use crate::ingest::normalize_season;

/// Filter over the game list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameFilter {
    pub season: Option<String>,
    pub league: Option<String>,
    pub tier: Option<String>,
    /// Case-insensitive substring of the opponent name
    pub opponent: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Channels to include; empty means all
    #[serde(default)]
    pub channels: Vec<SalesChannel>,
}

impl GameFilter {
    pub fn for_season(season: &str) -> Self {
        Self {
            season: Some(season.to_string()),
            ..Default::default()
        }
    }

    /// Whether a game passes the game-level predicates.
    pub fn matches(&self, game: &GameData) -> bool {
        if let Some(season) = &self.season {
            if normalize_season(season) != game.season {
                return false;
            }
        }
        if let Some(league) = &self.league {
            if !game.league.eq_ignore_ascii_case(league.trim()) {
                return false;
            }
        }
        if let Some(tier) = &self.tier {
            if !game.tier.eq_ignore_ascii_case(tier.trim()) {
                return false;
            }
        }
        if let Some(opponent) = &self.opponent {
            let needle = opponent.trim().to_lowercase();
            if !game.opponent.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = game.parsed_date() else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }
        true
    }

    /// Whether a sales channel passes the channel subset.
    pub fn includes_channel(&self, channel: SalesChannel) -> bool {
        self.channels.is_empty() || self.channels.contains(&channel)
    }

    /// Apply the game-level predicates to a slice.
    pub fn apply<'a>(&'a self, games: &'a [GameData]) -> impl Iterator<Item = &'a GameData> {
        games.iter().filter(move |g| self.matches(g))
    }
}

/// Filter for the CRM segmentation view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrmFilter {
    /// Date recency is measured from; defaults to the latest purchase
    pub reference_date: Option<NaiveDate>,
    pub segment: Option<CustomerSegment>,
}

/// Filter for the sponsorship view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SponsorFilter {
    pub season: Option<String>,
    pub category: Option<String>,
}

impl SponsorFilter {
    pub fn matches(&self, deal: &SponsorDeal) -> bool {
        if let Some(season) = &self.season {
            if normalize_season(season) != normalize_season(&deal.season) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !deal.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        true
    }
}
