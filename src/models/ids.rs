//! Stable game identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A game identifier derived from date, tip-off time and opponent.
///
/// The same spreadsheet row always yields the same id, so ids survive a
/// re-upload of the ticketing export.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    /// Derive the id from raw spreadsheet cells.
    pub fn derive(date: &str, time: &str, opponent: &str) -> Self {
        let opponent: String = opponent.chars().filter(|c| !c.is_whitespace()).collect();
        Self(format!(
            "{}_{}_{}",
            normalize_date(date),
            normalize_time(time),
            opponent
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reorder a `DD/MM/YYYY` style date into `YYYY-MM-DD`.
///
/// Already-ISO dates are kept; anything that does not split into three parts
/// is returned trimmed.
pub fn normalize_date(date: &str) -> String {
    let date = date.trim();
    let parts: Vec<&str> = date
        .split(['/', '-', '.'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [y, m, d] if y.len() == 4 => format!("{}-{:0>2}-{:0>2}", y, m, d),
        [d, m, y] => format!("{}-{:0>2}-{:0>2}", y, m, d),
        _ => date.to_string(),
    }
}

/// Normalise tip-off time punctuation (`20.30` and `20,30` become `20:30`).
pub fn normalize_time(time: &str) -> String {
    time.trim().replace(['.', ','], ":")
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_derive() {
        let id = GameId::derive("06/10/2024", "20.30", "Olimpia Milano");
        assert_eq!(id.as_str(), "2024-10-06_20:30_OlimpiaMilano");
    }

    #[test]
    fn test_game_id_deterministic() {
        let a = GameId::derive("6/10/2024", "20:30", "Virtus Bologna");
        let b = GameId::derive("06/10/2024", "20,30", " Virtus  Bologna ");
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_date_iso_passthrough() {
        assert_eq!(normalize_date("2024-10-06"), "2024-10-06");
    }

    #[test]
    fn test_normalize_date_garbage() {
        assert_eq!(normalize_date(" tbd "), "tbd");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_game_id_missing_fields() {
        let id = GameId::derive("", "", "Unknown");
        assert_eq!(id.as_str(), "__Unknown");
    }

    #[test]
    fn test_game_id_serialization() {
        let id = GameId::derive("01/02/2025", "18:00", "Trento");
        let json = serde_json::to_string(&id).unwrap();
        let back: GameId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
