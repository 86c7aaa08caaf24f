//! Spreadsheet ingestion.
//!
//! Raw CSV text goes through the tokenizer, the header resolver and a
//! per-dataset row mapper:
//!
//! - **games**: ticketing export, one [`GameData`](crate::models::GameData) per row
//! - **crm**: customer purchases
//! - **sponsors**: sponsorship contract lines
//!
//! Loading never fails. Malformed cells become zeros and are only counted in
//! the [`LoadReport`].

pub mod capacity;
pub mod crm;
pub mod csv;
pub mod games;
pub mod header;
pub mod scalar;
pub mod sponsors;

pub use capacity::normalize_season;
pub use crm::{load_customers, CustomerLoad};
pub use csv::{tokenize, Grid};
pub use games::{load_games, GameLoad, GameRowMapper};
pub use header::{ColumnMap, HeaderDetector, Table};
pub use scalar::{currency_or_zero, integer_or_zero, parse_currency, parse_date, parse_integer, Parsed};
pub use sponsors::{load_sponsors, SponsorLoad};

use serde::Serialize;

/// What happened while loading one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Index of the detected header row
    pub header_row: usize,
    /// Data rows after the header
    pub rows_read: usize,
    /// Records produced
    pub records: usize,
    /// Blank rows skipped
    pub skipped_blank: usize,
    /// Rows skipped because their key column (email, company) was empty
    pub skipped_unkeyed: usize,
    /// Non-empty cells that failed to parse and were read as zero
    pub malformed_cells: usize,
    /// Season labels without a capacity table
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_seasons: Vec<String>,
}

/// Reads numeric cells and counts the ones that defaulted despite having text.
#[derive(Debug, Default)]
pub(crate) struct CellTally {
    pub malformed: usize,
}

impl CellTally {
    fn cell<'a>(row: &'a [String], index: Option<usize>) -> Option<&'a str> {
        index.and_then(|i| row.get(i)).map(String::as_str)
    }

    fn note<T>(&mut self, cell: Option<&str>, parsed: &Parsed<T>) {
        if parsed.is_defaulted() && cell.is_some_and(|c| !c.trim().is_empty()) {
            self.malformed += 1;
        }
    }

    pub fn integer(&mut self, row: &[String], index: Option<usize>) -> Parsed<i64> {
        let cell = Self::cell(row, index);
        let parsed = parse_integer(cell);
        self.note(cell, &parsed);
        parsed
    }

    /// Non-negative count.
    pub fn count(&mut self, row: &[String], index: Option<usize>) -> Parsed<u32> {
        scalar::count(self.integer(row, index))
    }

    pub fn currency(&mut self, row: &[String], index: Option<usize>) -> Parsed<f64> {
        let cell = Self::cell(row, index);
        let parsed = parse_currency(cell);
        self.note(cell, &parsed);
        parsed
    }
}
