//! Game (venue event) model.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{GameId, SalesChannel, Zone};
use crate::ingest::parse_date;

/// Tickets sold for one zone on one channel.
///
/// Points are only materialised when quantity or revenue is non-zero; a
/// missing (zone, channel) cell means zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesDataPoint {
    pub zone: Zone,
    pub channel: SalesChannel,
    pub quantity: u32,
    pub revenue: f64,
}

/// Split of issued tickets by pricing type.
///
/// `full_price + discounted + giveaway` is not reconciled against attendance;
/// some channels are not captured here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketTypeBreakdown {
    pub full_price: u32,
    pub discounted: u32,
    pub discount_reasons: BTreeMap<String, u32>,
    pub giveaway: u32,
    pub giveaway_reasons: BTreeMap<String, u32>,
}

impl TicketTypeBreakdown {
    pub fn total(&self) -> u32 {
        self.full_price + self.discounted + self.giveaway
    }
}

/// One home game, built once per spreadsheet row and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub id: GameId,
    pub opponent: String,
    /// Date as it appears in the export (DD/MM/YYYY)
    pub date: String,
    pub time: String,
    pub league: String,
    pub season: String,
    /// 1-based game number within the season
    pub game_number: u32,
    pub tier: String,
    pub home_rank: u32,
    pub opponent_rank: u32,
    pub attendance: u32,
    /// Total seats for the season's capacity table
    pub capacity: u32,
    pub zone_capacities: BTreeMap<Zone, u32>,
    pub total_revenue: f64,
    pub sales_breakdown: Vec<SalesDataPoint>,
    /// Month (1-12) to revenue amount
    pub pnl_breakdown: BTreeMap<u8, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_type_breakdown: Option<TicketTypeBreakdown>,
}

impl GameData {
    /// Calendar date of the game, if the export date parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Month of the game (1-12).
    pub fn month(&self) -> Option<u8> {
        self.parsed_date().map(|d| d.month() as u8)
    }

    /// Seats available in a zone for this game.
    pub fn zone_capacity(&self, zone: Zone) -> u32 {
        self.zone_capacities.get(&zone).copied().unwrap_or(0)
    }

    /// Tickets issued on complimentary channels (protocol + giveaway).
    pub fn complimentary_quantity(&self) -> u32 {
        self.sales_breakdown
            .iter()
            .filter(|p| p.channel.is_complimentary())
            .fold(0u32, |acc, p| acc.saturating_add(p.quantity))
    }

    /// Tickets issued across the whole sales breakdown.
    pub fn sold_quantity(&self) -> u32 {
        self.sales_breakdown
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.quantity))
    }

    /// Sales breakdown restricted to one zone.
    pub fn points_for_zone(&self, zone: Zone) -> impl Iterator<Item = &SalesDataPoint> {
        self.sales_breakdown.iter().filter(move |p| p.zone == zone)
    }
}
