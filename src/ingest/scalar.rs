//! Locale-tolerant scalar parsers.
//!
//! The exports use Italian formatting (`1.234,56 €`). Parsers are total: a
//! malformed cell becomes [`Parsed::Defaulted`], which collapses to zero at
//! the boundary. Keeping the two cases apart lets the loaders count how many
//! cells were defaulted without changing what the dashboard shows.

use chrono::{Datelike, NaiveDate};

/// Result of parsing a spreadsheet cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    Defaulted,
}

impl<T: Default> Parsed<T> {
    /// The parsed value, or the type's zero.
    pub fn or_zero(self) -> T {
        match self {
            Parsed::Value(v) => v,
            Parsed::Defaulted => T::default(),
        }
    }
}

impl<T> Parsed<T> {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Parsed::Defaulted)
    }

    pub fn value(self) -> Option<T> {
        match self {
            Parsed::Value(v) => Some(v),
            Parsed::Defaulted => None,
        }
    }
}

/// Parse an integer cell such as `1.234` or `-5`.
///
/// `.` is a thousands separator. Every other non-digit is dropped, except a
/// minus sign in leading position.
pub fn parse_integer(cell: Option<&str>) -> Parsed<i64> {
    let Some(raw) = cell else {
        return Parsed::Defaulted;
    };

    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.trim().chars().filter(|c| *c != '.') {
        if c.is_ascii_digit() || (c == '-' && cleaned.is_empty()) {
            cleaned.push(c);
        }
    }

    match cleaned.parse::<i64>() {
        Ok(v) => Parsed::Value(v),
        Err(_) => Parsed::Defaulted,
    }
}

/// Parse a euro amount such as `€ 1.234,56`.
pub fn parse_currency(cell: Option<&str>) -> Parsed<f64> {
    let Some(raw) = cell else {
        return Parsed::Defaulted;
    };

    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '€' && *c != '.' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Parsed::Value(v),
        _ => Parsed::Defaulted,
    }
}

/// Integer cell, zero on failure.
pub fn integer_or_zero(cell: Option<&str>) -> i64 {
    parse_integer(cell).or_zero()
}

/// Euro cell, zero on failure.
pub fn currency_or_zero(cell: Option<&str>) -> f64 {
    parse_currency(cell).or_zero()
}

/// Non-negative count, clamped into `u32`.
pub fn count(parsed: Parsed<i64>) -> Parsed<u32> {
    match parsed {
        Parsed::Value(v) => Parsed::Value(v.clamp(0, u32::MAX as i64) as u32),
        Parsed::Defaulted => Parsed::Defaulted,
    }
}

const FULL_YEAR_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

/// Parse a calendar date in `DD/MM/YYYY`, `DD-MM-YYYY`, `DD.MM.YYYY` or ISO
/// `YYYY-MM-DD` form. Two-digit years (`06/10/24`) are read as 20xx/19xx.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    // Timestamps from the CRM export carry a time part
    let date_part = cell.split([' ', 'T']).next().unwrap_or(cell);

    // chrono's %Y also accepts a two-digit year, which would land in year 24
    FULL_YEAR_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .find(|date| date.year() >= 1000)
        .or_else(|| {
            SHORT_YEAR_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        })
}
