//! Venue zones and sales channels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A seating section of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Courtside,
    TribunaGold,
    TribunaSilver,
    Parterre,
    Curva,
    Galleria,
    Skybox,
}

impl Zone {
    pub const ALL: [Zone; 7] = [
        Zone::Courtside,
        Zone::TribunaGold,
        Zone::TribunaSilver,
        Zone::Parterre,
        Zone::Curva,
        Zone::Galleria,
        Zone::Skybox,
    ];

    /// Column prefix used in the ticketing export (e.g. "Tribuna Gold Abb Num").
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Zone::Courtside => "Courtside",
            Zone::TribunaGold => "Tribuna Gold",
            Zone::TribunaSilver => "Tribuna Silver",
            Zone::Parterre => "Parterre",
            Zone::Curva => "Curva",
            Zone::Galleria => "Galleria",
            Zone::Skybox => "Skybox",
        }
    }

    /// Parse a zone from its display name or snake_case key.
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim().to_lowercase().replace(['_', '-'], " ");
        Zone::ALL
            .into_iter()
            .find(|z| z.column_prefix().to_lowercase() == needle)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_prefix())
    }
}

/// How a ticket was sold (or given away).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesChannel {
    SeasonTicket,
    MiniPlan,
    SingleGame,
    Youth,
    Corporate,
    Protocol,
    Giveaway,
}

impl SalesChannel {
    pub const ALL: [SalesChannel; 7] = [
        SalesChannel::SeasonTicket,
        SalesChannel::MiniPlan,
        SalesChannel::SingleGame,
        SalesChannel::Youth,
        SalesChannel::Corporate,
        SalesChannel::Protocol,
        SalesChannel::Giveaway,
    ];

    /// Column suffix used in the ticketing export.
    pub fn column_suffix(&self) -> &'static str {
        match self {
            SalesChannel::SeasonTicket => "Abb",
            SalesChannel::MiniPlan => "Mini",
            SalesChannel::SingleGame => "Libera",
            SalesChannel::Youth => "Under",
            SalesChannel::Corporate => "Corp",
            SalesChannel::Protocol => "Prot",
            SalesChannel::Giveaway => "Omaggi",
        }
    }

    /// Whether tickets on this channel are issued at no charge.
    pub fn is_complimentary(&self) -> bool {
        matches!(self, SalesChannel::Protocol | SalesChannel::Giveaway)
    }

    /// Parse a channel from its snake_case key or export suffix.
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim().to_lowercase().replace('-', "_");
        SalesChannel::ALL.into_iter().find(|c| {
            c.to_string() == needle || c.column_suffix().to_lowercase() == needle
        })
    }
}

impl fmt::Display for SalesChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            SalesChannel::SeasonTicket => "season_ticket",
            SalesChannel::MiniPlan => "mini_plan",
            SalesChannel::SingleGame => "single_game",
            SalesChannel::Youth => "youth",
            SalesChannel::Corporate => "corporate",
            SalesChannel::Protocol => "protocol",
            SalesChannel::Giveaway => "giveaway",
        };
        write!(f, "{}", key)
    }
}
