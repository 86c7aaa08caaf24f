//! CRM export → [`CustomerPurchase`] records.

use tracing::info;

use super::csv::{is_blank_row, tokenize};
use super::header::{FieldTable, HeaderDetector, ResolvedFields, Table};
use super::scalar::parse_date;
use super::{CellTally, LoadReport};
use crate::models::CustomerPurchase;

pub const CRM_HEADER_KEYWORDS: &[&str] = &[
    "email", "cliente", "customer", "nome", "name", "importo", "amount", "data", "date",
    "biglietti", "tickets",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrmField {
    Email,
    Name,
    Date,
    Amount,
    Tickets,
    Channel,
}

pub const CRM_FIELDS: FieldTable<CrmField> = &[
    (CrmField::Email, &["Email", "E-mail", "Mail", "Indirizzo Email"]),
    (CrmField::Name, &["Name", "Nome", "Nome Cliente", "Cliente", "Customer"]),
    (CrmField::Date, &["Date", "Data", "Data Acquisto", "Purchase Date"]),
    (CrmField::Amount, &["Amount", "Importo", "Totale", "Spesa"]),
    (CrmField::Tickets, &["Tickets", "Biglietti", "Quantità", "Qty"]),
    (CrmField::Channel, &["Channel", "Canale"]),
];

/// Purchases parsed from one CRM export.
#[derive(Debug, Clone, Default)]
pub struct CustomerLoad {
    pub purchases: Vec<CustomerPurchase>,
    pub report: LoadReport,
}

/// Parse a CRM export. Rows without an email are skipped.
pub fn load_customers(text: &str) -> CustomerLoad {
    let grid = tokenize(text);
    let table = Table::locate(&grid, &HeaderDetector::new(CRM_HEADER_KEYWORDS));
    let fields = ResolvedFields::resolve(CRM_FIELDS, &table.columns);
    let mut tally = CellTally::default();

    let mut report = LoadReport {
        header_row: table.header_row,
        rows_read: table.rows.len(),
        ..Default::default()
    };

    let mut purchases = Vec::new();
    for row in table.rows {
        if is_blank_row(row) {
            report.skipped_blank += 1;
            continue;
        }

        let email = fields.text(row, CrmField::Email).to_lowercase();
        if email.is_empty() {
            report.skipped_unkeyed += 1;
            continue;
        }

        purchases.push(CustomerPurchase {
            email,
            name: fields.text(row, CrmField::Name),
            date: parse_date(&fields.text(row, CrmField::Date)),
            amount: tally
                .currency(row, fields.index(CrmField::Amount))
                .or_zero()
                .max(0.0),
            tickets: tally.count(row, fields.index(CrmField::Tickets)).or_zero(),
            channel: fields.text(row, CrmField::Channel),
        });
    }

    report.records = purchases.len();
    report.malformed_cells = tally.malformed;
    info!(
        "Loaded {} CRM purchases ({} rows without email)",
        report.records, report.skipped_unkeyed
    );

    CustomerLoad { purchases, report }
}
