//! CSV output for bonus records and partner tables.
//!
//! Records are serialized into an in-memory buffer with the `csv` crate and
//! the buffer is written to disk in one call, overwriting any existing file.

use crate::error::ScrapeError;
use crate::models::{BonusRecord, PartnerTable};
use crate::utils::sanitize_table_name;
use ::csv::{Writer, WriterBuilder};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// File receiving every bonus record.
pub const BONUSES_FILE: &str = "bonuses.csv";

/// Prefix of each partner table file.
pub const PARTNERS_PREFIX: &str = "partners_";

/// Column order of `bonuses.csv`.
pub const BONUS_COLUMNS: [&str; 4] = ["Bank", "Airline", "Transfer Bonus", "Expiration"];

/// File name for a partner table, e.g. `partners_hotel_partners.csv`.
pub fn partner_file_name(table: &PartnerTable) -> String {
    format!("{PARTNERS_PREFIX}{}.csv", sanitize_table_name(&table.name))
}

/// File name for the `n`th table sharing a sanitized name, e.g.
/// `partners_hotel_partners_2.csv`.
fn numbered_file_name(table: &PartnerTable, n: usize) -> String {
    format!("{PARTNERS_PREFIX}{}_{n}.csv", sanitize_table_name(&table.name))
}

/// Serialize bonus records to CSV bytes.
///
/// An empty slice produces a header-only document.
pub fn bonuses_to_csv(records: &[BonusRecord]) -> Result<Vec<u8>, ScrapeError> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    if records.is_empty() {
        wtr.write_record(BONUS_COLUMNS)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    finish(wtr)
}

/// Serialize one partner table to CSV bytes, header row first.
pub fn partner_table_to_csv(table: &PartnerTable) -> Result<Vec<u8>, ScrapeError> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    finish(wtr)
}

fn finish(wtr: Writer<Vec<u8>>) -> Result<Vec<u8>, ScrapeError> {
    wtr.into_inner()
        .map_err(|e| ScrapeError::Io(e.into_error()))
}

/// Write `bonuses.csv` into `output_dir`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), count = records.len()))]
pub async fn write_bonuses(
    records: &[BonusRecord],
    output_dir: &Path,
) -> Result<PathBuf, ScrapeError> {
    let path = output_dir.join(BONUSES_FILE);
    let bytes = bonuses_to_csv(records)?;
    fs::write(&path, bytes).await?;
    info!(path = %path.display(), "Wrote bonuses CSV");
    Ok(path)
}

/// Write one `partners_<name>.csv` file per table into `output_dir`.
///
/// Tables whose names sanitize to the same file get a numeric suffix
/// (`_2`, `_3`, ...) in page order, so every table lands in its own file.
/// Stops at the first failed write; files already written are left in place.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), count = tables.len()))]
pub async fn write_partner_tables(
    tables: &[PartnerTable],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, ScrapeError> {
    let mut written = Vec::with_capacity(tables.len());
    let mut claimed: HashMap<String, &str> = HashMap::new();
    for table in tables {
        let base = partner_file_name(table);
        let mut file_name = base.clone();
        let mut n = 2;
        while claimed.contains_key(&file_name) {
            file_name = numbered_file_name(table, n);
            n += 1;
        }
        if file_name != base {
            let earlier = claimed.get(&base).copied().unwrap_or_default();
            warn!(
                heading = %table.name,
                earlier,
                file = %file_name,
                "Partner table name collides with an earlier table; using a numbered file"
            );
        }
        claimed.insert(file_name.clone(), &table.name);

        let path = output_dir.join(file_name);
        let bytes = partner_table_to_csv(table)?;
        fs::write(&path, bytes).await?;
        info!(path = %path.display(), rows = table.rows.len(), "Wrote partner table CSV");
        written.push(path);
    }
    Ok(written)
}
