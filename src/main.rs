//! # Transfer Bonuses
//!
//! Scrapes credit-card travel rewards pages and writes what it finds to CSV:
//! current transfer bonus promotions to `bonuses.csv`, and each transfer
//! partner table to its own `partners_<name>.csv`.
//!
//! ## Usage
//!
//! ```sh
//! transfer_bonuses --url-partners https://example.com/partners --url-bonuses https://example.com/bonuses
//! ```
//!
//! ## Architecture
//!
//! Each source runs the same linear pipeline once:
//! 1. **Fetch**: GET the page with a desktop User-Agent
//! 2. **Locate**: parse the HTML and find containers by tag and attribute markers
//! 3. **Build**: pull text fields out of each container into records
//! 4. **Coerce**: turn percentages into multipliers and expirations into dates
//! 5. **Write**: serialize the records to CSV in the output directory
//!
//! Partners run first, then bonuses. By default a failing source is logged
//! and the other still runs, and the process exits successfully; `--strict`
//! aborts with an error on the first failure.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod coerce;
mod error;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("transfer_bonuses starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = fetch::build_client()?;
    let failures = pipeline::run(&args, &client).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        failures,
        "Execution complete"
    );

    Ok(())
}
