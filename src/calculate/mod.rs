//! Metric aggregation.
//!
//! Pure folds from (filter, base records) to chart-ready summaries. Nothing is
//! cached; every view recomputes from the immutable arrays on each request.
//!
//! - **arena**: zone heat-map and channel mix
//! - **comps**: complimentary ticket leakage
//! - **revenue**: headline totals, game table, monthly P&L
//! - **crm**: RFM customer segmentation
//! - **sponsorship**: sponsor tiering

pub mod arena;
pub mod comps;
pub mod crm;
pub mod revenue;
pub mod sponsorship;

#[cfg(test)]
pub(crate) mod testutil;

pub use arena::{channel_stats, zone_stats};
pub use comps::comp_summary;
pub use crm::segment_customers;
pub use revenue::{game_summaries, monthly_pnl, overview};
pub use sponsorship::sponsor_report;

/// Share of seats filled: sold / capacity.
pub fn calculate_occupancy(sold: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        0.0
    } else {
        sold as f64 / capacity as f64
    }
}

/// Average ticket price: revenue / tickets.
pub fn calculate_yield(revenue: f64, sold: u32) -> f64 {
    if sold == 0 {
        0.0
    } else {
        revenue / sold as f64
    }
}

/// Complimentary share of issued tickets: giveaway / (giveaway + paid).
pub fn calculate_comp_rate(giveaway: u32, paid: u32) -> f64 {
    let total = giveaway as u64 + paid as u64;
    if total == 0 {
        0.0
    } else {
        giveaway as f64 / total as f64
    }
}

/// `part / total`, zero when the total is not positive.
pub fn calculate_share(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        part / total
    }
}
