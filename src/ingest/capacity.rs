//! Per-season arena capacity tables.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::Zone;

/// Zone seat counts for one season.
#[derive(Debug, Clone, Copy)]
pub struct CapacityTable {
    pub season: &'static str,
    seats: &'static [(Zone, u32)],
}

impl CapacityTable {
    pub fn seats(&self, zone: Zone) -> u32 {
        self.seats
            .iter()
            .find(|(z, _)| *z == zone)
            .map(|(_, s)| *s)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.seats.iter().map(|(_, s)| s).sum()
    }

    pub fn to_map(&self) -> BTreeMap<Zone, u32> {
        self.seats.iter().copied().collect()
    }
}

/// Known seasons, oldest first. The last entry is the fallback.
pub const CAPACITY_TABLES: &[CapacityTable] = &[
    CapacityTable {
        season: "23-24",
        seats: &[
            (Zone::Courtside, 120),
            (Zone::TribunaGold, 900),
            (Zone::TribunaSilver, 1400),
            (Zone::Parterre, 1100),
            (Zone::Curva, 1800),
            (Zone::Galleria, 1500),
            (Zone::Skybox, 96),
        ],
    },
    CapacityTable {
        season: "24-25",
        seats: &[
            (Zone::Courtside, 140),
            (Zone::TribunaGold, 950),
            (Zone::TribunaSilver, 1400),
            (Zone::Parterre, 1100),
            (Zone::Curva, 1800),
            (Zone::Galleria, 1450),
            (Zone::Skybox, 120),
        ],
    },
    CapacityTable {
        season: "25-26",
        seats: &[
            (Zone::Courtside, 160),
            (Zone::TribunaGold, 1000),
            (Zone::TribunaSilver, 1350),
            (Zone::Parterre, 1150),
            (Zone::Curva, 1800),
            (Zone::Galleria, 1400),
            (Zone::Skybox, 144),
        ],
    },
];

/// Season whose skyboxes opened mid-season.
pub const SKYBOX_LATE_OPENING_SEASON: &str = "23-24";

/// First game of [`SKYBOX_LATE_OPENING_SEASON`] with skyboxes on sale.
pub const SKYBOX_OPENING_GAME: u32 = 6;

fn season_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d{2,4})\s*[-/]\s*(\d{2,4})").expect("season pattern is valid")
    })
}

/// Normalise a season label to `YY-YY`.
///
/// `2023/2024`, `2023-24`, `23/24` and `Stagione 2023-2024` all become
/// `23-24`. Labels without a year pair are returned trimmed.
pub fn normalize_season(label: &str) -> String {
    let label = label.trim();
    match season_pattern().captures(label) {
        Some(caps) => {
            let tail = |s: &str| s[s.len() - 2..].to_string();
            format!("{}-{}", tail(&caps[1]), tail(&caps[2]))
        }
        None => label.to_string(),
    }
}

/// Table for a normalised season label.
pub fn table_for_season(season: &str) -> Option<&'static CapacityTable> {
    CAPACITY_TABLES.iter().find(|t| t.season == season)
}

/// The most recent known table.
pub fn latest_table() -> &'static CapacityTable {
    &CAPACITY_TABLES[CAPACITY_TABLES.len() - 1]
}

/// Zone capacities for a game, with the skybox opening override applied.
pub fn zone_capacities(table: &CapacityTable, game_number: u32) -> BTreeMap<Zone, u32> {
    let mut capacities = table.to_map();
    if table.season == SKYBOX_LATE_OPENING_SEASON && game_number < SKYBOX_OPENING_GAME {
        capacities.insert(Zone::Skybox, 0);
    }
    capacities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_season() {
        assert_eq!(normalize_season("2023/2024"), "23-24");
        assert_eq!(normalize_season("2023-24"), "23-24");
        assert_eq!(normalize_season("23/24"), "23-24");
        assert_eq!(normalize_season("23-24"), "23-24");
        assert_eq!(normalize_season("Stagione 2024 - 2025"), "24-25");
        assert_eq!(normalize_season(" Playoff "), "Playoff");
        assert_eq!(normalize_season(""), "");
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(table_for_season("24-25").unwrap().season, "24-25");
        assert!(table_for_season("19-20").is_none());
        assert_eq!(latest_table().season, "25-26");
    }

    #[test]
    fn test_table_totals() {
        let table = table_for_season("23-24").unwrap();
        assert_eq!(table.seats(Zone::Curva), 1800);
        assert_eq!(table.total(), 120 + 900 + 1400 + 1100 + 1800 + 1500 + 96);
        assert_eq!(table.to_map().len(), Zone::ALL.len());
    }

    #[test]
    fn test_skybox_closed_before_game_six() {
        let table = table_for_season("23-24").unwrap();
        for game in 1..=5 {
            assert_eq!(zone_capacities(table, game)[&Zone::Skybox], 0);
        }
        assert_eq!(zone_capacities(table, 6)[&Zone::Skybox], 96);
        assert_eq!(zone_capacities(table, 20)[&Zone::Skybox], 96);
    }

    #[test]
    fn test_skybox_override_only_for_late_season() {
        let table = table_for_season("24-25").unwrap();
        assert_eq!(zone_capacities(table, 1)[&Zone::Skybox], 120);
    }
}
