//! RFM customer segmentation.
//!
//! Purchases are grouped by email. Each customer gets three scores from 1 to 5:
//!
//! | score | recency (days) | frequency (purchases) | monetary (euro) |
//! |-------|----------------|-----------------------|-----------------|
//! | 5     | ≤ 30           | ≥ 10                  | ≥ 1000          |
//! | 4     | ≤ 90           | ≥ 6                   | ≥ 500           |
//! | 3     | ≤ 180          | ≥ 3                   | ≥ 200           |
//! | 2     | ≤ 365          | 2                     | ≥ 50            |
//! | 1     | older / none   | 1                     | below           |
//!
//! The segment is decided by recency and frequency alone; see
//! [`CustomerSegment::from_scores`].

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    CrmFilter, CrmReport, CustomerProfile, CustomerPurchase, CustomerSegment, RfmScore,
    SegmentSummary,
};

pub fn recency_score(days: Option<i64>) -> u8 {
    match days {
        Some(d) if d <= 30 => 5,
        Some(d) if d <= 90 => 4,
        Some(d) if d <= 180 => 3,
        Some(d) if d <= 365 => 2,
        _ => 1,
    }
}

pub fn frequency_score(purchases: u32) -> u8 {
    match purchases {
        n if n >= 10 => 5,
        n if n >= 6 => 4,
        n if n >= 3 => 3,
        2 => 2,
        _ => 1,
    }
}

pub fn monetary_score(amount: f64) -> u8 {
    if amount >= 1_000.0 {
        5
    } else if amount >= 500.0 {
        4
    } else if amount >= 200.0 {
        3
    } else if amount >= 50.0 {
        2
    } else {
        1
    }
}

#[derive(Default)]
struct CustomerTally<'a> {
    name: &'a str,
    last_purchase: Option<NaiveDate>,
    frequency: u32,
    monetary: f64,
    tickets: u32,
}

/// Score and segment every customer.
///
/// Recency is measured from the filter's reference date, or from the latest
/// purchase date in the data. Purchases dated after an explicit reference date
/// are ignored. Segment totals always cover every customer; the segment filter
/// only narrows the customer list.
pub fn segment_customers(purchases: &[CustomerPurchase], filter: &CrmFilter) -> CrmReport {
    let reference_date = filter
        .reference_date
        .or_else(|| purchases.iter().filter_map(|p| p.date).max());

    let mut tallies: BTreeMap<&str, CustomerTally> = BTreeMap::new();
    for purchase in purchases {
        if let (Some(reference), Some(date)) = (filter.reference_date, purchase.date) {
            if date > reference {
                continue;
            }
        }

        let tally = tallies.entry(purchase.email.as_str()).or_default();
        tally.frequency += 1;
        tally.monetary += purchase.amount;
        tally.tickets = tally.tickets.saturating_add(purchase.tickets);

        if purchase.date >= tally.last_purchase {
            tally.last_purchase = purchase.date.or(tally.last_purchase);
            if !purchase.name.is_empty() {
                tally.name = &purchase.name;
            }
        } else if tally.name.is_empty() {
            tally.name = &purchase.name;
        }
    }

    let mut profiles: Vec<CustomerProfile> = tallies
        .into_iter()
        .map(|(email, t)| {
            let recency_days = match (reference_date, t.last_purchase) {
                (Some(reference), Some(last)) => Some((reference - last).num_days()),
                _ => None,
            };
            let score = RfmScore {
                recency: recency_score(recency_days),
                frequency: frequency_score(t.frequency),
                monetary: monetary_score(t.monetary),
            };
            CustomerProfile {
                email: email.to_string(),
                name: t.name.to_string(),
                last_purchase: t.last_purchase,
                recency_days,
                frequency: t.frequency,
                monetary: t.monetary,
                tickets: t.tickets,
                segment: CustomerSegment::from_scores(score.recency, score.frequency),
                score,
            }
        })
        .collect();

    let mut by_segment: BTreeMap<CustomerSegment, SegmentSummary> = BTreeMap::new();
    for profile in &profiles {
        let summary = by_segment
            .entry(profile.segment)
            .or_insert_with(|| SegmentSummary {
                segment: profile.segment,
                customers: 0,
                revenue: 0.0,
            });
        summary.customers += 1;
        summary.revenue += profile.monetary;
    }

    if let Some(segment) = filter.segment {
        profiles.retain(|p| p.segment == segment);
    }
    profiles.sort_by(|a, b| {
        b.monetary
            .total_cmp(&a.monetary)
            .then_with(|| a.email.cmp(&b.email))
    });

    CrmReport {
        reference_date,
        customers: profiles,
        segments: by_segment.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::load_customers;

    const FIXTURE: &str = include_str!("../../tests/fixtures/crm_sample.csv");

    fn purchase(email: &str, date: &str, amount: f64) -> CustomerPurchase {
        CustomerPurchase {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or_default().to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            amount,
            tickets: 1,
            channel: String::new(),
        }
    }

    #[test]
    fn test_score_thresholds() {
        assert_eq!(recency_score(Some(0)), 5);
        assert_eq!(recency_score(Some(30)), 5);
        assert_eq!(recency_score(Some(31)), 4);
        assert_eq!(recency_score(Some(180)), 3);
        assert_eq!(recency_score(Some(365)), 2);
        assert_eq!(recency_score(Some(366)), 1);
        assert_eq!(recency_score(None), 1);

        assert_eq!(frequency_score(12), 5);
        assert_eq!(frequency_score(6), 4);
        assert_eq!(frequency_score(3), 3);
        assert_eq!(frequency_score(2), 2);
        assert_eq!(frequency_score(1), 1);

        assert_eq!(monetary_score(1_000.0), 5);
        assert_eq!(monetary_score(499.99), 3);
        assert_eq!(monetary_score(50.0), 2);
        assert_eq!(monetary_score(0.0), 1);
    }

    #[test]
    fn test_segment_fixture() {
        let load = load_customers(FIXTURE);
        let report = segment_customers(&load.purchases, &CrmFilter::default());

        assert_eq!(report.reference_date, NaiveDate::from_ymd_opt(2024, 11, 3));
        assert_eq!(report.customers.len(), 4);

        // Highest spender first
        let giulia = &report.customers[0];
        assert_eq!(giulia.email, "giulia.rossi@example.com");
        assert_eq!(giulia.frequency, 2);
        assert!((giulia.monetary - 1_340.0).abs() < 1e-9);
        assert_eq!(giulia.recency_days, Some(21));
        assert_eq!(
            giulia.score,
            RfmScore {
                recency: 5,
                frequency: 2,
                monetary: 5
            }
        );
        assert_eq!(giulia.segment, CustomerSegment::NewCustomers);

        let sara = report
            .customers
            .iter()
            .find(|c| c.email == "sara.neri@example.com")
            .unwrap();
        assert_eq!(sara.segment, CustomerSegment::Hibernating);

        let total: u32 = report.segments.iter().map(|s| s.customers).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_champions_and_at_risk() {
        let mut purchases = Vec::new();
        for day in 1..=6 {
            purchases.push(purchase("fan@x.it", &format!("2025-03-{day:02}"), 100.0));
            purchases.push(purchase("old@x.it", &format!("2024-01-{day:02}"), 80.0));
        }
        let filter = CrmFilter {
            reference_date: NaiveDate::from_ymd_opt(2025, 3, 10),
            segment: None,
        };
        let report = segment_customers(&purchases, &filter);

        let fan = report.customers.iter().find(|c| c.email == "fan@x.it").unwrap();
        assert_eq!(fan.segment, CustomerSegment::Champions);
        assert_eq!(fan.recency_days, Some(4));

        let old = report.customers.iter().find(|c| c.email == "old@x.it").unwrap();
        assert_eq!(old.segment, CustomerSegment::AtRisk);
    }

    #[test]
    fn test_reference_date_excludes_later_purchases() {
        let purchases = vec![
            purchase("a@x.it", "2025-01-10", 100.0),
            purchase("a@x.it", "2025-06-10", 900.0),
        ];
        let filter = CrmFilter {
            reference_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            segment: None,
        };
        let report = segment_customers(&purchases, &filter);

        assert_eq!(report.customers[0].frequency, 1);
        assert!((report.customers[0].monetary - 100.0).abs() < 1e-9);
        assert_eq!(report.customers[0].recency_days, Some(22));
    }

    #[test]
    fn test_segment_filter_keeps_totals() {
        let load = load_customers(FIXTURE);
        let filter = CrmFilter {
            reference_date: None,
            segment: Some(CustomerSegment::Hibernating),
        };
        let report = segment_customers(&load.purchases, &filter);

        assert!(report
            .customers
            .iter()
            .all(|c| c.segment == CustomerSegment::Hibernating));
        let total: u32 = report.segments.iter().map(|s| s.customers).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_no_purchases() {
        let report = segment_customers(&[], &CrmFilter::default());
        assert_eq!(report.reference_date, None);
        assert!(report.customers.is_empty());
        assert!(report.segments.is_empty());
    }
}
