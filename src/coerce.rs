//! Coercion of scraped text into typed values.
//!
//! - Bonus percentages ("25%") become transfer multipliers (`1.25`)
//! - Free-text expirations ("Dec 31st, 2025", "12/31/25") become calendar dates
//!
//! Percentages have a strict form that reports malformed input and a lenient
//! form that falls back to a 0% bonus. Dates never fail: anything that is not
//! a recognizable US-style date becomes `None`.

use crate::error::ScrapeError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Multiplier used when a bonus percentage cannot be read.
pub const NO_BONUS: f64 = 1.0;

static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("percent pattern is valid"));

static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[/.-](\d{1,2})[/.-](\d{4}|\d{2})$").expect("numeric date pattern is valid")
});

static ORDINAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("ordinal pattern is valid"));

static LEADING_WORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(expires?|expiration|ends?|until|through|thru)\s*:?\s*(on\s+)?")
        .expect("leading words pattern is valid")
});

static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(monday|tuesday|wednesday|thursday|friday|saturday|sunday|tues|thurs|thur|mon|tue|wed|thu|fri|sat|sun)\.?,?\s+",
    )
    .expect("weekday pattern is valid")
});

/// Time of day with optional zone at the end, e.g. "11:59 PM ET", "at 5pm".
static TIME_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i),?\s+(at\s+)?\d{1,2}(:\d{2}(:\d{2})?\s*([ap]\.?m\.?)?|\s*[ap]\.?m\.?)(\s+[a-z]{2,5})?$",
    )
    .expect("time tail pattern is valid")
});

const TEXT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%B-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

/// Parse a bonus percentage into a transfer multiplier.
///
/// Accepts a non-negative integer or decimal with an optional trailing `%`.
/// The result is `(100 + N) / 100`, so `"30%"` gives exactly `1.3`.
///
/// # Errors
///
/// Returns [`ScrapeError::Coercion`] when the text is not a plain number.
pub fn parse_percentage(raw: &str) -> Result<f64, ScrapeError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    if !PERCENT_RE.is_match(number) {
        return Err(ScrapeError::Coercion(format!(
            "bonus percentage {raw:?} is not a number"
        )));
    }

    let pct: f64 = number
        .parse()
        .map_err(|e| ScrapeError::Coercion(format!("bonus percentage {raw:?}: {e}")))?;
    Ok((100.0 + pct) / 100.0)
}

/// Lenient form of [`parse_percentage`]: malformed text counts as a 0% bonus.
pub fn percent_to_multiplier(raw: &str) -> f64 {
    match parse_percentage(raw) {
        Ok(multiplier) => multiplier,
        Err(e) => {
            debug!(error = %e, "Using default transfer multiplier");
            NO_BONUS
        }
    }
}

/// Parse a free-text expiration into a calendar date.
///
/// Understands month/day/year with `/`, `-` or `.` separators (2 or 4 digit
/// year), year-first dates, `31-Dec-2025`, and written-out month names with
/// optional ordinals. A leading "Expires"/"Ends" or weekday and a trailing
/// time of day ("11:59 PM ET") are ignored. Anything else, including
/// placeholders such as "N/A" or "Unknown Expiration", yields `None`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_expiration("12/31/2025"), NaiveDate::from_ymd_opt(2025, 12, 31));
/// assert_eq!(parse_expiration("N/A"), None);
/// ```
pub fn parse_expiration(raw: &str) -> Option<NaiveDate> {
    let text = normalize_date_text(raw);
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = NUMERIC_DATE_RE.captures(&text) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = expand_year(&caps[3])?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let parsed = TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok());
    if parsed.is_none() {
        debug!(raw, "Expiration is not a recognizable date");
    }
    parsed
}

fn normalize_date_text(raw: &str) -> String {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = LEADING_WORDS_RE.replace(&text, "");
    let text = WEEKDAY_RE.replace(&text, "");
    let text = TIME_TAIL_RE.replace(&text, "");
    let text = ORDINAL_RE.replace_all(&text, "$1");
    text.replace(". ", " ").trim_end_matches('.').trim().to_string()
}

/// Two-digit years follow the usual pivot: 00-69 are 2000s, 70-99 are 1900s.
fn expand_year(digits: &str) -> Option<i32> {
    let year: i32 = digits.parse().ok()?;
    Some(match digits.len() {
        2 if year < 70 => 2000 + year,
        2 => 1900 + year,
        _ => year,
    })
}
