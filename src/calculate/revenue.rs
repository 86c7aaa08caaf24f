//! Headline totals, per-game rows and monthly P&L.

use std::collections::BTreeMap;

use crate::models::{GameData, GameFilter, GameSummary, PnlMonth, RevenueOverview};

use super::{calculate_occupancy, calculate_yield};

pub fn overview(games: &[GameData], filter: &GameFilter) -> RevenueOverview {
    let mut out = RevenueOverview::default();

    for game in filter.apply(games) {
        out.games += 1;
        out.attendance = out.attendance.saturating_add(game.attendance);
        out.capacity = out.capacity.saturating_add(game.capacity);
        out.total_revenue += game.total_revenue;
        out.complimentary = out
            .complimentary
            .saturating_add(game.complimentary_quantity());
    }

    out.occupancy = calculate_occupancy(out.attendance, out.capacity);
    out.yield_per_ticket = calculate_yield(out.total_revenue, out.attendance);
    out
}

/// One row per game, oldest first. Games with an unparseable date keep their
/// file order after the dated ones.
pub fn game_summaries(games: &[GameData], filter: &GameFilter) -> Vec<GameSummary> {
    let mut rows: Vec<(Option<chrono::NaiveDate>, GameSummary)> = filter
        .apply(games)
        .map(|game| (game.parsed_date(), summarize(game)))
        .collect();

    rows.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    rows.into_iter().map(|(_, row)| row).collect()
}

fn summarize(game: &GameData) -> GameSummary {
    GameSummary {
        id: game.id.clone(),
        opponent: game.opponent.clone(),
        date: game.date.clone(),
        season: game.season.clone(),
        tier: game.tier.clone(),
        attendance: game.attendance,
        capacity: game.capacity,
        occupancy: calculate_occupancy(game.attendance, game.capacity),
        total_revenue: game.total_revenue,
        yield_per_ticket: calculate_yield(game.total_revenue, game.attendance),
    }
}

/// Revenue summed by calendar month (1-12), months without revenue omitted.
pub fn monthly_pnl(games: &[GameData], filter: &GameFilter) -> Vec<PnlMonth> {
    let mut months: BTreeMap<u8, f64> = BTreeMap::new();

    for game in filter.apply(games) {
        for (month, amount) in &game.pnl_breakdown {
            *months.entry(*month).or_default() += amount;
        }
    }

    months
        .into_iter()
        .map(|(month, revenue)| PnlMonth { month, revenue })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::testutil::{game, point};
    use crate::models::{SalesChannel, Zone};

    fn sample() -> Vec<GameData> {
        vec![
            game(
                "Milano",
                "19/10/2025",
                vec![
                    point(Zone::Curva, SalesChannel::SingleGame, 1_000, 20_000.0),
                    point(Zone::Curva, SalesChannel::Giveaway, 50, 0.0),
                ],
            ),
            game(
                "Trento",
                "05/10/2025",
                vec![point(Zone::Curva, SalesChannel::SingleGame, 500, 7_500.0)],
            ),
            game(
                "Venezia",
                "14/12/2025",
                vec![point(Zone::Galleria, SalesChannel::Youth, 200, 1_000.0)],
            ),
        ]
    }

    #[test]
    fn test_overview_totals() {
        let games = sample();
        let out = overview(&games, &GameFilter::default());

        assert_eq!(out.games, 3);
        assert_eq!(out.attendance, 1_750);
        assert_eq!(out.capacity, games[0].capacity * 3);
        assert_eq!(out.complimentary, 50);
        assert!((out.total_revenue - 28_500.0).abs() < 1e-9);
        assert!((out.yield_per_ticket - 28_500.0 / 1_750.0).abs() < 1e-9);
    }

    #[test]
    fn test_overview_empty_is_zero() {
        let out = overview(&[], &GameFilter::default());
        assert_eq!(out, RevenueOverview::default());
    }

    #[test]
    fn test_game_summaries_sorted_by_date() {
        let mut games = sample();
        games.push(game("Senza Data", "da definire", vec![]));

        let rows = game_summaries(&games, &GameFilter::default());
        let order: Vec<&str> = rows.iter().map(|r| r.opponent.as_str()).collect();
        assert_eq!(order, vec!["Trento", "Milano", "Venezia", "Senza Data"]);

        let trento = &rows[0];
        assert!((trento.yield_per_ticket - 15.0).abs() < 1e-9);
        assert!(trento.occupancy > 0.0);
        assert_eq!(rows[3].occupancy, 0.0);
    }

    #[test]
    fn test_monthly_pnl() {
        let months = monthly_pnl(&sample(), &GameFilter::default());
        assert_eq!(
            months,
            vec![
                PnlMonth {
                    month: 10,
                    revenue: 27_500.0
                },
                PnlMonth {
                    month: 12,
                    revenue: 1_000.0
                },
            ]
        );
    }

    #[test]
    fn test_monthly_pnl_filtered() {
        let filter = GameFilter {
            opponent: Some("venezia".to_string()),
            ..Default::default()
        };
        let months = monthly_pnl(&sample(), &filter);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].month, 12);
    }
}
