//! Per-source fetch, extract and write sequences.
//!
//! Each source runs independently and reports its own `Result`. [`run`]
//! drives both: partners first, then bonuses. In lenient mode a failed
//! source is logged and counted and the other still runs; in strict mode
//! the first failure is returned.

use crate::cli::Cli;
use crate::error::ScrapeError;
use crate::fetch::fetch_html;
use crate::outputs::csv::{write_bonuses, write_partner_tables};
use crate::scrapers::ExtractMode;
use crate::scrapers::bonuses::extract_bonuses;
use crate::scrapers::partners::extract_partner_tables;
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Run every source named in `args`, returning how many failed.
///
/// # Errors
///
/// In strict mode, the first source error; the remaining source is not run.
#[instrument(level = "info", skip_all, fields(strict = args.strict))]
pub async fn run(args: &Cli, client: &Client) -> Result<usize, ScrapeError> {
    let mode = if args.strict {
        ExtractMode::Strict
    } else {
        ExtractMode::Lenient
    };
    let mut failures = 0usize;

    // ---- Partners ----
    if let Some(url) = &args.url_partners {
        match run_partners(client, url, &args.output_dir, mode).await {
            Ok(files) => info!(files = files.len(), "Partner tables written"),
            Err(e) if mode == ExtractMode::Strict => {
                error!(stage = "partners", error = %e, "Source failed; aborting");
                return Err(e);
            }
            Err(e) => {
                failures += 1;
                error!(stage = "partners", error = %e, "Source failed; continuing");
            }
        }
    }

    // ---- Bonuses ----
    if let Some(url) = &args.url_bonuses {
        match run_bonuses(client, url, &args.output_dir, mode).await {
            Ok(Some(path)) => info!(path = %path.display(), "Bonuses written"),
            Ok(None) => info!("No bonuses to write"),
            Err(e) if mode == ExtractMode::Strict => {
                error!(stage = "bonuses", error = %e, "Source failed; aborting");
                return Err(e);
            }
            Err(e) => {
                failures += 1;
                error!(stage = "bonuses", error = %e, "Source failed; continuing");
            }
        }
    }

    Ok(failures)
}

/// Fetch the partners page and write one CSV per table.
#[instrument(level = "info", skip_all, fields(%url, ?mode))]
pub async fn run_partners(
    client: &Client,
    url: &Url,
    output_dir: &Path,
    mode: ExtractMode,
) -> Result<Vec<PathBuf>, ScrapeError> {
    let html = fetch_html(client, url).await?;
    process_partners(&html, output_dir, mode).await
}

/// Fetch the bonuses page and write `bonuses.csv`.
#[instrument(level = "info", skip_all, fields(%url, ?mode))]
pub async fn run_bonuses(
    client: &Client,
    url: &Url,
    output_dir: &Path,
    mode: ExtractMode,
) -> Result<Option<PathBuf>, ScrapeError> {
    let html = fetch_html(client, url).await?;
    process_bonuses(&html, output_dir, mode).await
}

/// Extract partner tables from `html` and write them out.
pub async fn process_partners(
    html: &str,
    output_dir: &Path,
    mode: ExtractMode,
) -> Result<Vec<PathBuf>, ScrapeError> {
    let tables = extract_partner_tables(html, mode)?;
    if tables.is_empty() {
        warn!("No partner tables extracted; nothing written");
        debug!(preview = %truncate_for_log(html, 300), "Partners page preview");
    }
    write_partner_tables(&tables, output_dir).await
}

/// Extract bonus records from `html` and write `bonuses.csv`.
///
/// Returns `None` when no records were found, in which case no file is
/// written. Strict mode never gets here with zero records.
pub async fn process_bonuses(
    html: &str,
    output_dir: &Path,
    mode: ExtractMode,
) -> Result<Option<PathBuf>, ScrapeError> {
    let records = extract_bonuses(html, mode)?;
    if records.is_empty() {
        warn!("No bonus records extracted; bonuses.csv not written");
        debug!(preview = %truncate_for_log(html, 300), "Bonuses page preview");
        return Ok(None);
    }
    write_bonuses(&records, output_dir).await.map(Some)
}
