//! Builders shared by the aggregator tests.

use std::collections::BTreeMap;

use crate::ingest::capacity::{latest_table, zone_capacities};
use crate::models::{GameData, GameId, SalesChannel, SalesDataPoint, TicketTypeBreakdown, Zone};

pub fn point(zone: Zone, channel: SalesChannel, quantity: u32, revenue: f64) -> SalesDataPoint {
    SalesDataPoint {
        zone,
        channel,
        quantity,
        revenue,
    }
}

/// A 25-26 game whose attendance and revenue are the sums of its points.
pub fn game(opponent: &str, date: &str, points: Vec<SalesDataPoint>) -> GameData {
    let table = latest_table();
    let attendance = points
        .iter()
        .fold(0u32, |acc, p| acc.saturating_add(p.quantity));
    let total_revenue: f64 = points.iter().map(|p| p.revenue).sum();
    let mut game = GameData {
        id: GameId::derive(date, "20:30", opponent),
        opponent: opponent.to_string(),
        date: date.to_string(),
        time: "20:30".to_string(),
        league: "Serie A".to_string(),
        season: table.season.to_string(),
        game_number: 1,
        tier: "B".to_string(),
        home_rank: 0,
        opponent_rank: 0,
        attendance,
        capacity: table.total(),
        zone_capacities: zone_capacities(table, 1),
        total_revenue,
        sales_breakdown: points,
        pnl_breakdown: BTreeMap::new(),
        ticket_type_breakdown: None,
    };
    if let Some(month) = game.month() {
        game.pnl_breakdown.insert(month, total_revenue);
    }
    game
}

pub fn with_giveaway_reasons(mut game: GameData, reasons: &[(&str, u32)]) -> GameData {
    let giveaway_reasons: BTreeMap<String, u32> = reasons
        .iter()
        .map(|(label, count)| (label.to_string(), *count))
        .collect();
    game.ticket_type_breakdown = Some(TicketTypeBreakdown {
        giveaway: giveaway_reasons
            .values()
            .fold(0u32, |acc, n| acc.saturating_add(*n)),
        giveaway_reasons,
        ..Default::default()
    });
    game
}
