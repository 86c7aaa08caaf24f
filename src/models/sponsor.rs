//! Sponsorship deal records.

use serde::{Deserialize, Serialize};

/// One sponsorship contract line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorDeal {
    pub company: String,
    pub category: String,
    pub season: String,
    /// Cash value of the contract
    pub contract_value: f64,
    /// Estimated value of the assets delivered (LED minutes, hospitality, ...)
    pub commercial_value: f64,
}
