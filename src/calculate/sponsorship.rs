//! Sponsor tiering.

use std::collections::BTreeMap;

use crate::models::{SponsorDeal, SponsorFilter, SponsorReport, SponsorStat, SponsorTier};

use super::calculate_share;

/// Group deals by company (case-insensitive) and tier each sponsor by its
/// summed contract value. Sponsors are ordered by contract value, largest first.
pub fn sponsor_report(deals: &[SponsorDeal], filter: &SponsorFilter) -> SponsorReport {
    let mut by_company: BTreeMap<String, SponsorStat> = BTreeMap::new();

    for deal in deals.iter().filter(|d| filter.matches(d)) {
        let stat = by_company
            .entry(deal.company.trim().to_lowercase())
            .or_insert_with(|| SponsorStat {
                company: deal.company.trim().to_string(),
                category: String::new(),
                deals: 0,
                contract_value: 0.0,
                commercial_value: 0.0,
                value_ratio: 0.0,
                tier: SponsorTier::Bronze,
            });

        stat.deals += 1;
        stat.contract_value += deal.contract_value;
        stat.commercial_value += deal.commercial_value;
        if stat.category.is_empty() {
            stat.category = deal.category.clone();
        }
    }

    let mut report = SponsorReport::default();
    for mut stat in by_company.into_values() {
        stat.value_ratio = calculate_share(stat.commercial_value, stat.contract_value);
        stat.tier = SponsorTier::from_contract_value(stat.contract_value);

        report.total_contract_value += stat.contract_value;
        report.total_commercial_value += stat.commercial_value;
        *report.tier_counts.entry(stat.tier).or_default() += 1;
        report.sponsors.push(stat);
    }

    report.sponsors.sort_by(|a, b| {
        b.contract_value
            .total_cmp(&a.contract_value)
            .then_with(|| a.company.cmp(&b.company))
    });
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::load_sponsors;

    const FIXTURE: &str = include_str!("../../tests/fixtures/sponsorship_sample.csv");

    #[test]
    fn test_sponsor_report_fixture() {
        let load = load_sponsors(FIXTURE);
        let report = sponsor_report(&load.deals, &SponsorFilter::default());

        let names: Vec<&str> = report.sponsors.iter().map(|s| s.company.as_str()).collect();
        assert_eq!(
            names,
            vec!["Banca Alpina", "Energia Nord", "Auto Rapida", "Pasticceria Dolce"]
        );

        let banca = &report.sponsors[0];
        assert_eq!(banca.deals, 2);
        assert_eq!(banca.contract_value, 270_000.0);
        assert_eq!(banca.tier, SponsorTier::Platinum);
        assert!((banca.value_ratio - 1.0).abs() < 1e-9);

        assert_eq!(report.sponsors[1].tier, SponsorTier::Gold);
        assert_eq!(report.sponsors[2].tier, SponsorTier::Silver);
        assert_eq!(report.sponsors[3].tier, SponsorTier::Bronze);
        assert!((report.sponsors[3].value_ratio - 1.5).abs() < 1e-9);

        assert_eq!(report.total_contract_value, 460_000.0);
        assert_eq!(report.tier_counts.get(&SponsorTier::Gold), Some(&1));
    }

    #[test]
    fn test_sponsor_report_season_filter() {
        let load = load_sponsors(FIXTURE);
        let filter = SponsorFilter {
            season: Some("2023-24".to_string()),
            category: None,
        };
        let report = sponsor_report(&load.deals, &filter);

        assert_eq!(report.sponsors.len(), 1);
        assert_eq!(report.sponsors[0].company, "Auto Rapida");
    }

    #[test]
    fn test_sponsor_grouping_ignores_case() {
        let deal = |company: &str, value: f64| SponsorDeal {
            company: company.to_string(),
            category: "Retail".to_string(),
            season: "24-25".to_string(),
            contract_value: value,
            commercial_value: 0.0,
        };
        let deals = vec![deal("Acme", 30_000.0), deal("ACME ", 20_000.0)];
        let report = sponsor_report(&deals, &SponsorFilter::default());

        assert_eq!(report.sponsors.len(), 1);
        assert_eq!(report.sponsors[0].company, "Acme");
        assert_eq!(report.sponsors[0].tier, SponsorTier::Silver);
        assert_eq!(report.sponsors[0].value_ratio, 0.0);
    }

    #[test]
    fn test_zero_contract_ratio() {
        let deals = vec![SponsorDeal {
            company: "Barter".to_string(),
            category: String::new(),
            season: "24-25".to_string(),
            contract_value: 0.0,
            commercial_value: 5_000.0,
        }];
        let report = sponsor_report(&deals, &SponsorFilter::default());
        assert_eq!(report.sponsors[0].value_ratio, 0.0);
        assert_eq!(report.sponsors[0].tier, SponsorTier::Bronze);
    }
}
