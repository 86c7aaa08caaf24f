//! Header row detection and synonym-based column lookup.
//!
//! Exports often carry a few title or note rows before the real header, and
//! the column names vary between English and Italian. The detector finds the
//! header by keyword count; the column map then answers "which column holds
//! this field?" for any of several spellings.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

/// Rows scanned when looking for the header.
pub const HEADER_SCAN_LIMIT: usize = 20;

/// Keyword matches needed for a row to count as the header.
pub const HEADER_MIN_MATCHES: usize = 3;

/// Keywords that identify the ticketing export's header row.
pub const GAME_HEADER_KEYWORDS: &[&str] = &[
    "season",
    "opponent",
    "date",
    "league",
    "stagione",
    "avversario",
    "contro",
    "data",
    "campionato",
];

/// Keyword heuristic for locating a header row.
#[derive(Debug, Clone)]
pub struct HeaderDetector {
    keywords: &'static [&'static str],
    min_matches: usize,
    scan_limit: usize,
}

impl HeaderDetector {
    pub fn new(keywords: &'static [&'static str]) -> Self {
        Self {
            keywords,
            min_matches: HEADER_MIN_MATCHES,
            scan_limit: HEADER_SCAN_LIMIT,
        }
    }

    /// Detector for the ticketing export.
    pub fn games() -> Self {
        Self::new(GAME_HEADER_KEYWORDS)
    }

    pub fn with_min_matches(mut self, min_matches: usize) -> Self {
        self.min_matches = min_matches;
        self
    }

    /// Number of keywords found in a row.
    pub fn score(&self, row: &[String]) -> usize {
        let joined = row.join(" ").to_lowercase();
        self.keywords.iter().filter(|k| joined.contains(*k)).count()
    }

    /// Index of the header row, or 0 when no row qualifies.
    pub fn detect(&self, grid: &[Vec<String>]) -> usize {
        let found = grid
            .iter()
            .take(self.scan_limit)
            .position(|row| self.score(row) >= self.min_matches);

        match found {
            Some(index) => {
                debug!("Detected header at row {}", index);
                index
            }
            None => {
                debug!("No header row matched, defaulting to row 0");
                0
            }
        }
    }
}

/// Strip BOM, quotes and whitespace and lower-case a header or synonym.
pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .replace('"', "")
        .trim()
        .to_lowercase()
}

/// Case-insensitive column-name to index map for one header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    pub fn from_header(header: &[String]) -> Self {
        let mut indices = HashMap::new();
        for (i, name) in header.iter().enumerate() {
            let key = normalize_header(name);
            if !key.is_empty() {
                // First occurrence wins on duplicate names
                indices.entry(key).or_insert(i);
            }
        }
        Self { indices }
    }

    /// Index of the first synonym present in the header.
    pub fn find(&self, synonyms: &[&str]) -> Option<usize> {
        synonyms
            .iter()
            .find_map(|s| self.indices.get(&normalize_header(s)).copied())
    }

    /// Index of an exact (normalised) column name.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(&normalize_header(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Declarative `field → [synonym...]` table.
pub type FieldTable<F> = &'static [(F, &'static [&'static str])];

/// Field-to-column map produced once per load from a [`FieldTable`].
#[derive(Debug, Clone)]
pub struct ResolvedFields<F> {
    indices: HashMap<F, usize>,
}

impl<F: Copy + Eq + Hash> ResolvedFields<F> {
    pub fn resolve(table: FieldTable<F>, columns: &ColumnMap) -> Self {
        let indices = table
            .iter()
            .filter_map(|(field, synonyms)| columns.find(synonyms).map(|i| (*field, i)))
            .collect();
        Self { indices }
    }

    pub fn index(&self, field: F) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn contains(&self, field: F) -> bool {
        self.indices.contains_key(&field)
    }

    /// Cell for a field, if the column exists and the row is long enough.
    pub fn cell<'a>(&self, row: &'a [String], field: F) -> Option<&'a str> {
        self.index(field)
            .and_then(|i| row.get(i))
            .map(String::as_str)
    }

    /// Trimmed cell text, empty when missing.
    pub fn text(&self, row: &[String], field: F) -> String {
        self.cell(row, field)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }
}

/// A tokenized table with its header located and columns indexed.
#[derive(Debug, Clone)]
pub struct Table<'g> {
    pub header_row: usize,
    pub columns: ColumnMap,
    pub rows: &'g [Vec<String>],
}

impl<'g> Table<'g> {
    /// Locate the header with `detector` and index its columns. `rows` are the
    /// rows after the header.
    pub fn locate(grid: &'g [Vec<String>], detector: &HeaderDetector) -> Self {
        if grid.is_empty() {
            return Self {
                header_row: 0,
                columns: ColumnMap::default(),
                rows: &[],
            };
        }

        let header_row = detector.detect(grid);
        Self {
            header_row,
            columns: ColumnMap::from_header(&grid[header_row]),
            rows: &grid[header_row + 1..],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::csv::tokenize;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_detect_header_after_title_rows() {
        let grid = vec![
            row(&["Report biglietteria", "", ""]),
            row(&["Generated 2024-10-01", "season", ""]),
            row(&["Stagione", "Data", "Contro", "Campionato"]),
            row(&["24-25", "06/10/2024", "Trento", "Serie A"]),
        ];
        assert_eq!(HeaderDetector::games().detect(&grid), 2);
    }

    #[test]
    fn test_detect_header_defaults_to_zero() {
        let grid = vec![row(&["a", "b"]), row(&["1", "2"])];
        assert_eq!(HeaderDetector::games().detect(&grid), 0);
    }

    #[test]
    fn test_detect_header_scan_limit() {
        let mut grid: Vec<Vec<String>> = (0..25).map(|_| row(&["x"])).collect();
        grid[22] = row(&["Season", "Opponent", "Date"]);
        assert_eq!(HeaderDetector::games().detect(&grid), 0);
    }

    #[test]
    fn test_detect_header_custom_threshold() {
        let grid = vec![row(&["note"]), row(&["Season", "Opponent"])];
        assert_eq!(HeaderDetector::games().detect(&grid), 0);
        assert_eq!(
            HeaderDetector::games().with_min_matches(2).detect(&grid),
            1
        );
    }

    #[test]
    fn test_column_map_strips_bom_and_quotes() {
        let header = row(&["\u{feff}Season", "\"Opponent\"", "  DATE "]);
        let map = ColumnMap::from_header(&header);

        assert_eq!(map.get("season"), Some(0));
        assert_eq!(map.get("opponent"), Some(1));
        assert_eq!(map.get("Date"), Some(2));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_column_map_synonyms_first_match() {
        let map = ColumnMap::from_header(&row(&["Contro", "Data", "Opponent"]));
        // Synonym order decides, not column order
        assert_eq!(map.find(&["Opponent", "Contro"]), Some(2));
        assert_eq!(map.find(&["Avversario", "Contro"]), Some(0));
        assert_eq!(map.find(&["Rival"]), None);
    }

    #[test]
    fn test_column_map_duplicate_first_wins() {
        let map = ColumnMap::from_header(&row(&["Date", "date"]));
        assert_eq!(map.get("date"), Some(0));
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Field {
        Opponent,
        Date,
        Tier,
    }

    const FIELDS: FieldTable<Field> = &[
        (Field::Opponent, &["Opponent", "Contro", "Avversario"]),
        (Field::Date, &["Date", "Data"]),
        (Field::Tier, &["Tier", "Fascia"]),
    ];

    #[test]
    fn test_resolved_fields() {
        let map = ColumnMap::from_header(&row(&["Data", "Avversario"]));
        let fields = ResolvedFields::resolve(FIELDS, &map);

        assert_eq!(fields.index(Field::Date), Some(0));
        assert_eq!(fields.index(Field::Opponent), Some(1));
        assert!(!fields.contains(Field::Tier));

        let data = row(&[" 06/10/2024 ", "Trento"]);
        assert_eq!(fields.text(&data, Field::Date), "06/10/2024");
        assert_eq!(fields.cell(&data, Field::Tier), None);
        // Short rows yield no cell
        assert_eq!(fields.cell(&row(&["x"]), Field::Opponent), None);
    }

    #[test]
    fn test_table_locate() {
        let grid = tokenize("Title\nSeason,Opponent,Date\n24-25,Trento,06/10/2024\n");
        let table = Table::locate(&grid, &HeaderDetector::games());

        assert_eq!(table.header_row, 1);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.columns.get("opponent"), Some(1));
    }

    #[test]
    fn test_table_locate_empty() {
        let grid = tokenize("");
        let table = Table::locate(&grid, &HeaderDetector::games());
        assert!(table.rows.is_empty());
        assert!(table.columns.is_empty());
    }
}
