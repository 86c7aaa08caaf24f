//! Ticketing export → [`GameData`] records.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, warn};

use super::capacity::{latest_table, normalize_season, table_for_season, zone_capacities};
use super::csv::{is_blank_row, tokenize};
use super::header::{ColumnMap, FieldTable, HeaderDetector, ResolvedFields, Table};
use super::scalar::Parsed;
use super::{CellTally, LoadReport};
use crate::models::{GameData, GameId, SalesChannel, SalesDataPoint, TicketTypeBreakdown, Zone};

/// Scalar fields of the ticketing export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameField {
    League,
    Season,
    Date,
    Time,
    Opponent,
    Tier,
    HomeRank,
    OpponentRank,
    GameNumber,
    Attendance,
    TotalRevenue,
    FullPrice,
}

pub const GAME_FIELDS: FieldTable<GameField> = &[
    (GameField::League, &["League", "Campionato", "Competizione", "Competition"]),
    (GameField::Season, &["Season", "Stagione"]),
    (GameField::Date, &["Date", "Data", "Data Gara"]),
    (GameField::Time, &["Time", "Ora", "Orario"]),
    (GameField::Opponent, &["Opponent", "Contro", "Avversario"]),
    (GameField::Tier, &["Tier", "Fascia", "Fascia Prezzo"]),
    (GameField::HomeRank, &["Rank", "Our Rank", "Posizione", "Classifica"]),
    (
        GameField::OpponentRank,
        &["Opponent Rank", "Posizione Avversario", "Classifica Avversario"],
    ),
    (GameField::GameNumber, &["Game", "Game #", "Giornata", "Gara", "N. Gara"]),
    (GameField::Attendance, &["Attendance", "Presenze", "Spettatori", "Totale Presenze"]),
    (
        GameField::TotalRevenue,
        &["Total Revenue", "Incasso Totale", "Incasso", "Totale Eur"],
    ),
    (GameField::FullPrice, &["Interi", "Intero", "Full Price"]),
];

/// Paid discount reasons: canonical label and accepted column names.
pub const DISCOUNT_REASONS: &[(&str, &[&str])] = &[
    ("Under 14", &["Ridotto Under 14", "Ridotti Under 14"]),
    ("Over 65", &["Ridotto Over 65", "Ridotti Over 65"]),
    ("Studenti", &["Ridotto Studenti", "Ridotti Studenti"]),
    ("Disabili", &["Ridotto Disabili", "Ridotti Disabili"]),
    ("Convenzioni", &["Ridotto Convenzioni", "Convenzioni"]),
    ("Gruppi", &["Ridotto Gruppi", "Gruppi"]),
];

/// Giveaway reasons. Several spellings of the same reason are summed.
pub const GIVEAWAY_REASONS: &[(&str, &[&str])] = &[
    ("Sponsor", &["Omaggi Sponsor", "Omaggio Sponsor", "Sponsor Omaggi"]),
    ("Squadra", &["Omaggi Squadra", "Omaggi Giocatori", "Omaggi Team"]),
    ("Stampa", &["Accrediti Stampa", "Omaggi Stampa"]),
    ("Società", &["Omaggi Società", "Omaggi Societa", "Omaggi Club"]),
    ("Promozioni", &["Omaggi Promo", "Promozioni"]),
    ("Scuole", &["Omaggi Scuole", "Scuole"]),
];

/// Opponent used when the cell is missing.
pub const UNKNOWN_OPPONENT: &str = "Unknown";

/// Column indices for one (zone, channel) cell.
#[derive(Debug, Clone)]
struct SalesColumns {
    zone: Zone,
    channel: SalesChannel,
    quantity: Option<usize>,
    revenue: Option<usize>,
}

/// Columns summed into one canonical reason.
#[derive(Debug, Clone)]
struct ReasonColumns {
    label: &'static str,
    indices: Vec<usize>,
}

fn resolve_reasons(columns: &ColumnMap, catalog: &[(&'static str, &[&str])]) -> Vec<ReasonColumns> {
    catalog
        .iter()
        .filter_map(|(label, spellings)| {
            let mut indices: Vec<usize> = spellings.iter().filter_map(|s| columns.get(s)).collect();
            indices.sort_unstable();
            indices.dedup();
            (!indices.is_empty()).then_some(ReasonColumns {
                label: *label,
                indices,
            })
        })
        .collect()
}

fn resolve_sales(columns: &ColumnMap) -> Vec<SalesColumns> {
    let mut resolved = Vec::new();
    for zone in Zone::ALL {
        for channel in SalesChannel::ALL {
            let prefix = format!("{} {}", zone.column_prefix(), channel.column_suffix());
            let quantity = columns.get(&format!("{} Num", prefix));
            // Protocol and giveaway seats carry no revenue column
            let revenue = if channel.is_complimentary() {
                None
            } else {
                columns.get(&format!("{} Eur", prefix))
            };
            if quantity.is_some() || revenue.is_some() {
                resolved.push(SalesColumns {
                    zone,
                    channel,
                    quantity,
                    revenue,
                });
            }
        }
    }
    resolved
}

fn resolve_pnl(columns: &ColumnMap) -> Vec<(u8, usize)> {
    (1..=12u8)
        .filter_map(|month| {
            let spellings = [
                format!("P&L {}", month),
                format!("P&L {:02}", month),
                format!("PnL {}", month),
                format!("PnL {:02}", month),
            ];
            spellings
                .iter()
                .find_map(|s| columns.get(s))
                .map(|i| (month, i))
        })
        .collect()
}

/// Maps ticketing rows to games. Column lookups are resolved once in
/// [`GameRowMapper::new`]; mapping a row never fails.
#[derive(Debug)]
pub struct GameRowMapper {
    fields: ResolvedFields<GameField>,
    sales: Vec<SalesColumns>,
    discounts: Vec<ReasonColumns>,
    giveaways: Vec<ReasonColumns>,
    pnl: Vec<(u8, usize)>,
    season_counters: HashMap<String, u32>,
    unknown_seasons: BTreeSet<String>,
    tally: CellTally,
}

impl GameRowMapper {
    pub fn new(columns: &ColumnMap) -> Self {
        let mapper = Self {
            fields: ResolvedFields::resolve(GAME_FIELDS, columns),
            sales: resolve_sales(columns),
            discounts: resolve_reasons(columns, DISCOUNT_REASONS),
            giveaways: resolve_reasons(columns, GIVEAWAY_REASONS),
            pnl: resolve_pnl(columns),
            season_counters: HashMap::new(),
            unknown_seasons: BTreeSet::new(),
            tally: CellTally::default(),
        };
        debug!(
            "Resolved {} sales cells, {} discount and {} giveaway reasons, {} P&L months",
            mapper.sales.len(),
            mapper.discounts.len(),
            mapper.giveaways.len(),
            mapper.pnl.len()
        );
        mapper
    }

    /// Map one data row to a game.
    pub fn map_row(&mut self, row: &[String]) -> GameData {
        let league = self.fields.text(row, GameField::League);
        let season = normalize_season(&self.fields.text(row, GameField::Season));
        let date = self.fields.text(row, GameField::Date);
        let time = self.fields.text(row, GameField::Time);
        let tier = self.fields.text(row, GameField::Tier);
        let opponent = match self.fields.text(row, GameField::Opponent) {
            o if o.is_empty() => UNKNOWN_OPPONENT.to_string(),
            o => o,
        };

        let home_rank = self
            .tally
            .count(row, self.fields.index(GameField::HomeRank))
            .or_zero();
        let opponent_rank = self
            .tally
            .count(row, self.fields.index(GameField::OpponentRank))
            .or_zero();

        let counter = self.season_counters.entry(season.clone()).or_insert(0);
        *counter += 1;
        let running = *counter;
        let game_number = match self
            .tally
            .count(row, self.fields.index(GameField::GameNumber))
        {
            Parsed::Value(n) if n > 0 => n,
            _ => running,
        };

        let table = match table_for_season(&season) {
            Some(table) => table,
            None => {
                if self.unknown_seasons.insert(season.clone()) {
                    warn!(
                        "No capacity table for season '{}', using {}",
                        season,
                        latest_table().season
                    );
                }
                latest_table()
            }
        };
        let zone_capacities = zone_capacities(table, game_number);
        let capacity = zone_capacities.values().sum();

        let sales_breakdown = self.sales_breakdown(row);
        let ticket_type_breakdown = self.ticket_type_breakdown(row);

        let attendance = match self
            .tally
            .count(row, self.fields.index(GameField::Attendance))
        {
            Parsed::Value(v) => v,
            Parsed::Defaulted => sales_breakdown
                .iter()
                .fold(0, |acc: u32, p| acc.saturating_add(p.quantity)),
        };
        let total_revenue = match self
            .tally
            .currency(row, self.fields.index(GameField::TotalRevenue))
        {
            Parsed::Value(v) => v,
            Parsed::Defaulted => sales_breakdown.iter().map(|p| p.revenue).sum(),
        };

        let id = GameId::derive(&date, &time, &opponent);
        let mut game = GameData {
            id,
            opponent,
            date,
            time,
            league,
            season,
            game_number,
            tier,
            home_rank,
            opponent_rank,
            attendance,
            capacity,
            zone_capacities,
            total_revenue,
            sales_breakdown,
            pnl_breakdown: BTreeMap::new(),
            ticket_type_breakdown,
        };
        game.pnl_breakdown = self.pnl_breakdown(row, &game);
        game
    }

    fn sales_breakdown(&mut self, row: &[String]) -> Vec<SalesDataPoint> {
        let mut points = Vec::new();
        for cols in &self.sales {
            let quantity = self.tally.count(row, cols.quantity).or_zero();
            let revenue = match cols.revenue {
                Some(_) => self.tally.currency(row, cols.revenue).or_zero().max(0.0),
                None => 0.0,
            };
            if quantity > 0 || revenue > 0.0 {
                points.push(SalesDataPoint {
                    zone: cols.zone,
                    channel: cols.channel,
                    quantity,
                    revenue,
                });
            }
        }
        points
    }

    fn ticket_type_breakdown(&mut self, row: &[String]) -> Option<TicketTypeBreakdown> {
        let full_index = self.fields.index(GameField::FullPrice);
        if full_index.is_none() && self.discounts.is_empty() && self.giveaways.is_empty() {
            return None;
        }

        let mut breakdown = TicketTypeBreakdown {
            full_price: self.tally.count(row, full_index).or_zero(),
            ..Default::default()
        };

        for reason in &self.discounts {
            let n: u32 = reason
                .indices
                .iter()
                .map(|i| self.tally.count(row, Some(*i)).or_zero())
                .fold(0, u32::saturating_add);
            if n > 0 {
                breakdown.discounted = breakdown.discounted.saturating_add(n);
                breakdown.discount_reasons.insert(reason.label.to_string(), n);
            }
        }

        for reason in &self.giveaways {
            let n: u32 = reason
                .indices
                .iter()
                .map(|i| self.tally.count(row, Some(*i)).or_zero())
                .fold(0, u32::saturating_add);
            if n > 0 {
                breakdown.giveaway = breakdown.giveaway.saturating_add(n);
                breakdown.giveaway_reasons.insert(reason.label.to_string(), n);
            }
        }

        Some(breakdown)
    }

    /// Explicit monthly columns when the export has them, otherwise the whole
    /// game revenue is booked in the month the game is played.
    fn pnl_breakdown(&mut self, row: &[String], game: &GameData) -> BTreeMap<u8, f64> {
        let mut pnl = BTreeMap::new();
        if !self.pnl.is_empty() {
            for (month, index) in &self.pnl {
                let amount = self.tally.currency(row, Some(*index)).or_zero();
                if amount != 0.0 {
                    pnl.insert(*month, amount);
                }
            }
        } else if game.total_revenue != 0.0 {
            if let Some(month) = game.month() {
                pnl.insert(month, game.total_revenue);
            }
        }
        pnl
    }

    fn finish(self, report: &mut LoadReport) {
        report.malformed_cells = self.tally.malformed;
        report.unknown_seasons = self.unknown_seasons.into_iter().collect();
    }
}

/// Games parsed from one export.
#[derive(Debug, Clone, Default)]
pub struct GameLoad {
    pub games: Vec<GameData>,
    pub report: LoadReport,
}

/// Parse a ticketing export.
pub fn load_games(text: &str) -> GameLoad {
    let grid = tokenize(text);
    let table = Table::locate(&grid, &HeaderDetector::games());
    let mut mapper = GameRowMapper::new(&table.columns);

    let mut report = LoadReport {
        header_row: table.header_row,
        rows_read: table.rows.len(),
        ..Default::default()
    };

    let mut games = Vec::with_capacity(table.rows.len());
    for row in table.rows {
        if is_blank_row(row) {
            report.skipped_blank += 1;
            continue;
        }
        games.push(mapper.map_row(row));
    }

    mapper.finish(&mut report);
    report.records = games.len();

    info!(
        "Loaded {} games (header at row {}, {} malformed cells)",
        report.records, report.header_row, report.malformed_cells
    );

    GameLoad { games, report }
}
