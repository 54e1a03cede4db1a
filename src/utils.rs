//! Helpers for file naming, log previews and output directory checks.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Scratch file created and removed by [`ensure_writable_dir`].
const WRITE_CHECK_FILE: &str = ".transfer_bonuses_write_check";

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes on a character boundary, with
/// an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Turn a partner table heading into a file name component.
///
/// Lowercases the text and replaces spaces and slashes with underscores;
/// nothing else is touched.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_table_name("Hotel Partners"), "hotel_partners");
/// assert_eq!(sanitize_table_name("Airline/Hotel"), "airline_hotel");
/// ```
pub fn sanitize_table_name(name: &str) -> String {
    name.to_lowercase().replace([' ', '/'], "_")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
/// A scratch file that cannot be removed is logged and left behind.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let check_path = path.join(WRITE_CHECK_FILE);
    fs::File::create(&check_path).await?;
    if let Err(e) = fs::remove_file(&check_path).await {
        warn!(path = %check_path.display(), error = %e, "Could not remove write-check file");
    }
    info!("Output directory is writable");
    Ok(())
}
