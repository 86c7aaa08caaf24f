//! CRM purchase records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One ticket purchase from the CRM export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPurchase {
    /// Lower-cased email, the customer key
    pub email: String,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub amount: f64,
    pub tickets: u32,
    pub channel: String,
}
