//! Transfer bonus promotions.
//!
//! The bonuses page groups promotions into one container per bank:
//!
//! ```text
//! div.w-layout-blockcontainer.container-51.w-container   (section)
//! ├── div.text-block-18                                  bank name
//! └── div[role=listitem]                                 one per promotion
//!     ├── div.text-block-22                              airline
//!     ├── div.text-block-23                              bonus, e.g. "30%"
//!     └── div.text-block-24                              expiration text
//! ```
//!
//! One [`BonusRecord`] is produced per list item, in document order.

use crate::coerce::{parse_expiration, parse_percentage, percent_to_multiplier};
use crate::error::ScrapeError;
use crate::models::BonusRecord;
use crate::scrapers::ExtractMode;
use crate::scrapers::markup::{Locator, find_by_selector, find_first, find_within, text_of};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

pub const SECTION_CLASS: &str = "w-layout-blockcontainer container-51 w-container";

pub const UNKNOWN_BANK: &str = "Unknown Bank";
pub const UNKNOWN_AIRLINE: &str = "Unknown Airline";
pub const UNKNOWN_BONUS: &str = "0%";
pub const UNKNOWN_EXPIRATION: &str = "Unknown Expiration";

fn compile(locator: Locator) -> Selector {
    locator
        .selector()
        .expect("bonus page selectors are constant and valid")
}

static SECTION: Lazy<Selector> = Lazy::new(|| compile(Locator::new("div").class_is(SECTION_CLASS)));
static BANK: Lazy<Selector> = Lazy::new(|| compile(Locator::new("div").has_class("text-block-18")));
static ITEM: Lazy<Selector> =
    Lazy::new(|| compile(Locator::new("div").attr_equals("role", "listitem")));
static AIRLINE: Lazy<Selector> =
    Lazy::new(|| compile(Locator::new("div").has_class("text-block-22")));
static BONUS: Lazy<Selector> = Lazy::new(|| compile(Locator::new("div").has_class("text-block-23")));
static EXPIRATION: Lazy<Selector> =
    Lazy::new(|| compile(Locator::new("div").has_class("text-block-24")));

/// Extract every bonus promotion on the page.
///
/// In lenient mode a page with no matching sections yields an empty vector,
/// and missing fields take the `UNKNOWN_*` placeholders. In strict mode both
/// are errors, as is a bonus percentage that is not a number.
///
/// # Errors
///
/// - [`ScrapeError::Parse`] (strict) when no section matches or an element is missing
/// - [`ScrapeError::Coercion`] (strict) when a bonus percentage is malformed
#[instrument(level = "info", skip_all, fields(?mode, bytes = html.len()))]
pub fn extract_bonuses(html: &str, mode: ExtractMode) -> Result<Vec<BonusRecord>, ScrapeError> {
    let document = Html::parse_document(html);
    let sections = find_by_selector(&document, &SECTION);

    if sections.is_empty() {
        if mode == ExtractMode::Strict {
            return Err(ScrapeError::Parse(format!(
                "no bonus sections matching div[class=\"{SECTION_CLASS}\"]"
            )));
        }
        warn!("No bonus sections found; page structure may have changed");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for section in sections {
        let bank = field(section, &BANK, UNKNOWN_BANK, "bank", mode)?;
        let items = find_within(section, &ITEM);
        debug!(%bank, items = items.len(), "Parsing bonus section");

        for item in items {
            records.push(build_record(&bank, item, mode)?);
        }
    }

    info!(count = records.len(), "Extracted bonus records");
    Ok(records)
}

fn build_record(
    bank: &str,
    item: ElementRef<'_>,
    mode: ExtractMode,
) -> Result<BonusRecord, ScrapeError> {
    let airline = field(item, &AIRLINE, UNKNOWN_AIRLINE, "airline", mode)?;
    let bonus = field(item, &BONUS, UNKNOWN_BONUS, "transfer bonus", mode)?;
    let expiration = field(item, &EXPIRATION, UNKNOWN_EXPIRATION, "expiration", mode)?;

    let transfer_bonus = match mode {
        ExtractMode::Strict => parse_percentage(&bonus)?,
        ExtractMode::Lenient => percent_to_multiplier(&bonus),
    };

    Ok(BonusRecord {
        bank: bank.to_string(),
        airline,
        transfer_bonus,
        expiration: parse_expiration(&expiration),
    })
}

/// Text of the first `selector` match under `scope`, or the placeholder.
fn field(
    scope: ElementRef<'_>,
    selector: &Selector,
    placeholder: &str,
    name: &str,
    mode: ExtractMode,
) -> Result<String, ScrapeError> {
    match text_of(find_first(scope, selector)) {
        Some(text) => Ok(text),
        None if mode == ExtractMode::Strict => {
            Err(ScrapeError::Parse(format!("{name} element missing")))
        }
        None => {
            debug!(field = name, placeholder, "Element missing; using placeholder");
            Ok(placeholder.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(airline: &str, bonus: &str, expiration: &str) -> String {
        format!(
            r#"<div role="listitem">
                 <div class="text-block-22">{airline}</div>
                 <div class="text-block-23">{bonus}</div>
                 <div class="text-block-24">{expiration}</div>
               </div>"#
        )
    }

    fn section(bank: &str, items: &[String]) -> String {
        format!(
            r#"<div class="w-layout-blockcontainer container-51 w-container">
                 <div class="text-block-18">{bank}</div>
                 <div class="w-dyn-list"><div role="list">{}</div></div>
               </div>"#,
            items.join("\n")
        )
    }

    fn page(sections: &[String]) -> String {
        format!("<html><body>{}</body></html>", sections.join("\n"))
    }

    #[test]
    fn test_chase_section_yields_two_records() {
        let html = page(&[section(
            "Chase",
            &[item("United", "30%", "12/31/2025"), item("Delta", "0%", "N/A")],
        )]);

        let records = extract_bonuses(&html, ExtractMode::Lenient).unwrap();

        assert_eq!(
            records,
            vec![
                BonusRecord {
                    bank: "Chase".to_string(),
                    airline: "United".to_string(),
                    transfer_bonus: 1.3,
                    expiration: NaiveDate::from_ymd_opt(2025, 12, 31),
                },
                BonusRecord {
                    bank: "Chase".to_string(),
                    airline: "Delta".to_string(),
                    transfer_bonus: 1.0,
                    expiration: None,
                },
            ]
        );
    }

    #[test]
    fn test_sections_keep_document_order() {
        let html = page(&[
            section("Amex", &[item("ANA", "25%", "Dec 1, 2025")]),
            section("Citi", &[item("Avianca", "20%", "11/15/2025"), item("Qatar", "10%", "")]),
        ]);

        let records = extract_bonuses(&html, ExtractMode::Lenient).unwrap();
        let pairs: Vec<_> = records
            .iter()
            .map(|r| (r.bank.as_str(), r.airline.as_str()))
            .collect();

        assert_eq!(pairs, vec![("Amex", "ANA"), ("Citi", "Avianca"), ("Citi", "Qatar")]);
        assert_eq!(records[0].transfer_bonus, 1.25);
        assert_eq!(records[2].expiration, None);
    }

    #[test]
    fn test_missing_elements_use_placeholders() {
        let html = page(&[r#"
            <div class="w-layout-blockcontainer container-51 w-container">
              <div role="listitem"><div class="text-block-23">15%</div></div>
              <div role="listitem"><div class="text-block-22">JetBlue</div></div>
            </div>"#
            .to_string()]);

        let records = extract_bonuses(&html, ExtractMode::Lenient).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].bank, UNKNOWN_BANK);
        assert_eq!(records[0].airline, UNKNOWN_AIRLINE);
        assert_eq!(records[0].transfer_bonus, 1.15);
        assert_eq!(records[0].expiration, None);
        assert_eq!(records[1].airline, "JetBlue");
        assert_eq!(records[1].transfer_bonus, 1.0);
    }

    #[test]
    fn test_malformed_bonus_defaults_to_one() {
        let html = page(&[section("Bilt", &[item("Air France", "up to 50%", "TBA")])]);
        let records = extract_bonuses(&html, ExtractMode::Lenient).unwrap();
        assert_eq!(records[0].transfer_bonus, 1.0);
    }

    #[test]
    fn test_class_signature_must_match_exactly() {
        let html = r#"<div class="container-51 w-container"><div class="text-block-18">Chase</div>
                      <div role="listitem"><div class="text-block-22">United</div></div></div>"#;
        assert!(extract_bonuses(html, ExtractMode::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_no_sections_is_empty_when_lenient() {
        let records = extract_bonuses("<html><body><p>moved</p></body></html>", ExtractMode::Lenient);
        assert!(records.unwrap().is_empty());
    }

    #[test]
    fn test_strict_mode_rejects_bad_input() {
        let empty = extract_bonuses("<html></html>", ExtractMode::Strict);
        assert!(matches!(empty, Err(ScrapeError::Parse(_))));

        let bad_bonus = page(&[section("Chase", &[item("United", "lots", "12/31/2025")])]);
        assert!(matches!(
            extract_bonuses(&bad_bonus, ExtractMode::Strict),
            Err(ScrapeError::Coercion(_))
        ));

        let no_bank = page(&[r#"<div class="w-layout-blockcontainer container-51 w-container"></div>"#
            .to_string()]);
        assert!(matches!(
            extract_bonuses(&no_bank, ExtractMode::Strict),
            Err(ScrapeError::Parse(_))
        ));
    }
}
