//! Complimentary ticket leakage.

use std::collections::BTreeMap;

use crate::models::{CompStat, CompSummary, GameData, GameFilter, Zone};

use super::{calculate_comp_rate, calculate_yield};

#[derive(Default)]
struct ZoneTally {
    giveaway: u32,
    paid: u32,
    paid_revenue: f64,
}

/// Giveaway versus paid tickets per zone.
///
/// Protocol and giveaway channels are complimentary; every other channel is
/// paid. Leakage values each giveaway at the zone's paid yield. The channel
/// subset of the filter is ignored here since the comparison needs both sides.
pub fn comp_summary(games: &[GameData], filter: &GameFilter) -> CompSummary {
    let mut tallies: BTreeMap<Zone, ZoneTally> = BTreeMap::new();
    let mut giveaway_reasons: BTreeMap<String, u32> = BTreeMap::new();

    for game in filter.apply(games) {
        for point in &game.sales_breakdown {
            let tally = tallies.entry(point.zone).or_default();
            if point.channel.is_complimentary() {
                tally.giveaway = tally.giveaway.saturating_add(point.quantity);
            } else {
                tally.paid = tally.paid.saturating_add(point.quantity);
                tally.paid_revenue += point.revenue;
            }
        }

        if let Some(breakdown) = &game.ticket_type_breakdown {
            for (reason, count) in &breakdown.giveaway_reasons {
                let total = giveaway_reasons.entry(reason.clone()).or_default();
                *total = total.saturating_add(*count);
            }
        }
    }

    let zones: Vec<CompStat> = tallies
        .into_iter()
        .filter(|(_, t)| t.giveaway > 0 || t.paid > 0)
        .map(|(zone, t)| CompStat {
            zone,
            giveaway: t.giveaway,
            paid: t.paid,
            comp_rate: calculate_comp_rate(t.giveaway, t.paid),
            leakage_value: t.giveaway as f64 * calculate_yield(t.paid_revenue, t.paid),
        })
        .collect();

    let total_giveaway = zones.iter().fold(0, |acc: u32, z| acc.saturating_add(z.giveaway));
    let total_paid = zones.iter().fold(0, |acc: u32, z| acc.saturating_add(z.paid));
    let leakage_value = zones.iter().map(|z| z.leakage_value).sum();

    CompSummary {
        comp_rate: calculate_comp_rate(total_giveaway, total_paid),
        zones,
        total_giveaway,
        total_paid,
        leakage_value,
        giveaway_reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::testutil::{game, point, with_giveaway_reasons};
    use crate::models::SalesChannel;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comp_summary_leakage() {
        let games = vec![game(
            "Trento",
            "05/10/2025",
            vec![
                point(Zone::Curva, SalesChannel::SingleGame, 300, 4_500.0),
                point(Zone::Curva, SalesChannel::Giveaway, 100, 0.0),
                point(Zone::Parterre, SalesChannel::Protocol, 20, 0.0),
            ],
        )];

        let summary = comp_summary(&games, &GameFilter::default());
        assert_eq!(summary.zones.len(), 2);

        let curva = summary.zones.iter().find(|z| z.zone == Zone::Curva).unwrap();
        assert_eq!(curva.giveaway, 100);
        assert_eq!(curva.paid, 300);
        assert!((curva.comp_rate - 0.25).abs() < 1e-9);
        assert!((curva.leakage_value - 1_500.0).abs() < 1e-9);

        // No paid sales means no yield to value the giveaways at
        let parterre = summary
            .zones
            .iter()
            .find(|z| z.zone == Zone::Parterre)
            .unwrap();
        assert_eq!(parterre.comp_rate, 1.0);
        assert_eq!(parterre.leakage_value, 0.0);

        assert_eq!(summary.total_giveaway, 120);
        assert_eq!(summary.total_paid, 300);
        assert!((summary.leakage_value - 1_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_comp_summary_merges_giveaway_reasons() {
        let games = vec![
            with_giveaway_reasons(
                game("A", "05/10/2025", vec![]),
                &[("Sponsor", 40), ("Scuole", 10)],
            ),
            with_giveaway_reasons(game("B", "12/10/2025", vec![]), &[("Sponsor", 5)]),
        ];

        let summary = comp_summary(&games, &GameFilter::default());
        let expected = BTreeMap::from([("Scuole".to_string(), 10), ("Sponsor".to_string(), 45)]);
        assert_eq!(summary.giveaway_reasons, expected);
        assert!(summary.zones.is_empty());
        assert_eq!(summary.comp_rate, 0.0);
    }

    #[test]
    fn test_comp_summary_saturates_totals() {
        let big = 4_000_000_000;
        let games = vec![
            with_giveaway_reasons(
                game(
                    "A",
                    "05/10/2025",
                    vec![
                        point(Zone::Curva, SalesChannel::Giveaway, big, 0.0),
                        point(Zone::Galleria, SalesChannel::Giveaway, big, 0.0),
                    ],
                ),
                &[("Sponsor", big)],
            ),
            with_giveaway_reasons(game("B", "12/10/2025", vec![]), &[("Sponsor", big)]),
        ];

        let summary = comp_summary(&games, &GameFilter::default());
        assert_eq!(summary.total_giveaway, u32::MAX);
        assert_eq!(summary.giveaway_reasons["Sponsor"], u32::MAX);
    }

    #[test]
    fn test_comp_summary_empty() {
        assert_eq!(
            comp_summary(&[], &GameFilter::default()),
            CompSummary::default()
        );
    }
}
