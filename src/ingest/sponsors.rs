//! Sponsorship export → [`SponsorDeal`] records.

use tracing::info;

use super::capacity::normalize_season;
use super::csv::{is_blank_row, tokenize};
use super::header::{FieldTable, HeaderDetector, ResolvedFields, Table};
use super::{CellTally, LoadReport};
use crate::models::SponsorDeal;

pub const SPONSOR_HEADER_KEYWORDS: &[&str] = &[
    "sponsor", "azienda", "company", "contratto", "contract", "valore", "value", "categoria",
    "category", "stagione", "season",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SponsorField {
    Company,
    Category,
    Season,
    ContractValue,
    CommercialValue,
}

pub const SPONSOR_FIELDS: FieldTable<SponsorField> = &[
    (SponsorField::Company, &["Sponsor", "Company", "Azienda", "Ragione Sociale"]),
    (SponsorField::Category, &["Category", "Categoria", "Settore"]),
    (SponsorField::Season, &["Season", "Stagione"]),
    (
        SponsorField::ContractValue,
        &["Contract Value", "Valore Contratto", "Contratto", "Importo"],
    ),
    (
        SponsorField::CommercialValue,
        &["Commercial Value", "Valore Commerciale", "Valore Asset"],
    ),
];

/// Deals parsed from one sponsorship export.
#[derive(Debug, Clone, Default)]
pub struct SponsorLoad {
    pub deals: Vec<SponsorDeal>,
    pub report: LoadReport,
}

/// Parse a sponsorship export. Rows without a company are skipped.
pub fn load_sponsors(text: &str) -> SponsorLoad {
    let grid = tokenize(text);
    let table = Table::locate(&grid, &HeaderDetector::new(SPONSOR_HEADER_KEYWORDS));
    let fields = ResolvedFields::resolve(SPONSOR_FIELDS, &table.columns);
    let mut tally = CellTally::default();

    let mut report = LoadReport {
        header_row: table.header_row,
        rows_read: table.rows.len(),
        ..Default::default()
    };

    let mut deals = Vec::new();
    for row in table.rows {
        if is_blank_row(row) {
            report.skipped_blank += 1;
            continue;
        }

        let company = fields.text(row, SponsorField::Company);
        if company.is_empty() {
            report.skipped_unkeyed += 1;
            continue;
        }

        deals.push(SponsorDeal {
            company,
            category: fields.text(row, SponsorField::Category),
            season: normalize_season(&fields.text(row, SponsorField::Season)),
            contract_value: tally
                .currency(row, fields.index(SponsorField::ContractValue))
                .or_zero()
                .max(0.0),
            commercial_value: tally
                .currency(row, fields.index(SponsorField::CommercialValue))
                .or_zero()
                .max(0.0),
        });
    }

    report.records = deals.len();
    report.malformed_cells = tally.malformed;
    info!("Loaded {} sponsorship deals", report.records);

    SponsorLoad { deals, report }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../tests/fixtures/sponsorship_sample.csv");

    #[test]
    fn test_load_sponsors_fixture() {
        let load = load_sponsors(FIXTURE);

        assert_eq!(load.deals.len(), 5);
        assert_eq!(load.report.skipped_unkeyed, 1);
        assert_eq!(load.report.malformed_cells, 0);

        let first = &load.deals[0];
        assert_eq!(first.company, "Banca Alpina");
        assert_eq!(first.category, "Finance");
        assert_eq!(first.season, "24-25");
        assert_eq!(first.contract_value, 180_000.0);
        assert_eq!(first.commercial_value, 210_000.0);
    }

    #[test]
    fn test_load_sponsors_english_headers() {
        let csv = "Company,Category,Season,Contract Value,Commercial Value\nAcme,Tech,2025-26,\"10.000\",\"12.500,50\"\n";
        let load = load_sponsors(csv);

        assert_eq!(load.deals.len(), 1);
        assert_eq!(load.deals[0].season, "25-26");
        assert_eq!(load.deals[0].contract_value, 10_000.0);
        assert_eq!(load.deals[0].commercial_value, 12_500.5);
    }
}
