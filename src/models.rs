//! Record shapes produced by the scrapers.
//!
//! - [`BonusRecord`]: one transfer bonus promotion, flattened with its bank
//! - [`PartnerTable`]: one transfer partner table, kept as text
//!
//! Records are built once during extraction and never mutated afterwards.

use chrono::NaiveDate;
use serde::Serialize;

/// A single transfer bonus promotion.
///
/// Field names are renamed to the column headers written to `bonuses.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusRecord {
    /// Issuer running the promotion, repeated across every item of its section.
    #[serde(rename = "Bank")]
    pub bank: String,
    /// Loyalty program receiving the transfer.
    #[serde(rename = "Airline")]
    pub airline: String,
    /// Transfer multiplier, `1.0` for no bonus.
    #[serde(rename = "Transfer Bonus")]
    pub transfer_bonus: f64,
    /// Last day of the promotion, `None` when the page text was not a date.
    #[serde(rename = "Expiration")]
    pub expiration: Option<NaiveDate>,
}

/// A transfer partner table paired with the heading above it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerTable {
    /// Heading text, e.g. "Hotel Partners".
    pub name: String,
    /// Column names in source order.
    pub columns: Vec<String>,
    /// One entry per data row, each exactly `columns.len()` cells wide.
    pub rows: Vec<Vec<String>>,
}

#[cfg(test)]
impl PartnerTable {
    /// Look up a cell by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }
}
