//! Derived statistics models.
//!
//! Everything here is recomputed from the base record arrays on every request
//! and carries no identity of its own.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{GameId, SalesChannel, Zone};

/// Per-zone heat-map cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStat {
    pub zone: Zone,

    /// Tickets issued in the zone
    pub sold: u32,

    /// Revenue in euro
    pub revenue: f64,

    /// Seats summed over the games considered
    pub capacity: u32,

    /// sold / capacity
    pub occupancy: f64,

    /// Average ticket price: revenue / sold
    pub yield_per_ticket: f64,
}

/// Per-channel sales mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStat {
    pub channel: SalesChannel,
    pub quantity: u32,
    pub revenue: f64,
    pub yield_per_ticket: f64,
    /// Share of total revenue (0.0 to 1.0)
    pub revenue_share: f64,
}

/// Complimentary ticket leakage for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompStat {
    pub zone: Zone,
    pub giveaway: u32,
    pub paid: u32,
    /// giveaway / (giveaway + paid)
    pub comp_rate: f64,
    /// Giveaways valued at the zone's paid yield
    pub leakage_value: f64,
}

/// Comp/giveaway widget payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompSummary {
    pub zones: Vec<CompStat>,
    pub total_giveaway: u32,
    pub total_paid: u32,
    pub comp_rate: f64,
    pub leakage_value: f64,
    /// Canonical giveaway reason to ticket count
    pub giveaway_reasons: BTreeMap<String, u32>,
}

/// One row of the game table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub opponent: String,
    pub date: String,
    pub season: String,
    pub tier: String,
    pub attendance: u32,
    pub capacity: u32,
    pub occupancy: f64,
    pub total_revenue: f64,
    pub yield_per_ticket: f64,
}

/// Headline totals over a filtered game list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueOverview {
    pub games: u32,
    pub attendance: u32,
    pub capacity: u32,
    pub occupancy: f64,
    pub total_revenue: f64,
    pub yield_per_ticket: f64,
    /// Tickets issued on protocol and giveaway channels
    pub complimentary: u32,
}

/// Revenue booked in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlMonth {
    pub month: u8,
    pub revenue: f64,
}

/// RFM customer segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSegment {
    Champions,
    Loyal,
    NewCustomers,
    NeedsAttention,
    AtRisk,
    Hibernating,
}

impl CustomerSegment {
    /// Classify from recency and frequency scores (1-5).
    pub fn from_scores(recency: u8, frequency: u8) -> Self {
        if recency >= 4 && frequency >= 4 {
            CustomerSegment::Champions
        } else if recency >= 3 && frequency >= 4 {
            CustomerSegment::Loyal
        } else if recency >= 4 && frequency <= 2 {
            CustomerSegment::NewCustomers
        } else if recency <= 2 && frequency >= 3 {
            CustomerSegment::AtRisk
        } else if recency <= 2 {
            CustomerSegment::Hibernating
        } else {
            CustomerSegment::NeedsAttention
        }
    }
}

impl std::fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerSegment::Champions => write!(f, "Champions"),
            CustomerSegment::Loyal => write!(f, "Loyal"),
            CustomerSegment::NewCustomers => write!(f, "New Customers"),
            CustomerSegment::NeedsAttention => write!(f, "Needs Attention"),
            CustomerSegment::AtRisk => write!(f, "At Risk"),
            CustomerSegment::Hibernating => write!(f, "Hibernating"),
        }
    }
}

/// Recency, frequency and monetary scores, each 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfmScore {
    pub recency: u8,
    pub frequency: u8,
    pub monetary: u8,
}

/// One customer after RFM scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub email: String,
    pub name: String,
    pub last_purchase: Option<NaiveDate>,
    /// Days between the last purchase and the reference date
    pub recency_days: Option<i64>,
    pub frequency: u32,
    pub monetary: f64,
    pub tickets: u32,
    pub score: RfmScore,
    pub segment: CustomerSegment,
}

/// Customers and revenue per segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: CustomerSegment,
    pub customers: u32,
    pub revenue: f64,
}

/// CRM segmentation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmReport {
    pub reference_date: Option<NaiveDate>,
    pub customers: Vec<CustomerProfile>,
    pub segments: Vec<SegmentSummary>,
}

/// Sponsorship tier by total contract value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SponsorTier {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl SponsorTier {
    /// Tier a sponsor by its summed contract value in euro.
    pub fn from_contract_value(value: f64) -> Self {
        if value >= 250_000.0 {
            SponsorTier::Platinum
        } else if value >= 100_000.0 {
            SponsorTier::Gold
        } else if value >= 40_000.0 {
            SponsorTier::Silver
        } else {
            SponsorTier::Bronze
        }
    }
}

impl std::fmt::Display for SponsorTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SponsorTier::Platinum => write!(f, "Platinum"),
            SponsorTier::Gold => write!(f, "Gold"),
            SponsorTier::Silver => write!(f, "Silver"),
            SponsorTier::Bronze => write!(f, "Bronze"),
        }
    }
}

/// Per-company sponsorship totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorStat {
    pub company: String,
    pub category: String,
    pub deals: u32,
    pub contract_value: f64,
    pub commercial_value: f64,
    /// commercial_value / contract_value
    pub value_ratio: f64,
    pub tier: SponsorTier,
}

/// Sponsorship view payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SponsorReport {
    pub sponsors: Vec<SponsorStat>,
    pub total_contract_value: f64,
    pub total_commercial_value: f64,
    pub tier_counts: BTreeMap<SponsorTier, u32>,
}

impl SponsorReport {
    /// Sponsors in a specific tier.
    pub fn in_tier(&self, tier: SponsorTier) -> Vec<&SponsorStat> {
        self.sponsors.iter().filter(|s| s.tier == tier).collect()
    }
}
