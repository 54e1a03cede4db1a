//! Transfer partner tables.
//!
//! The partners page has one heading per partner category, each followed by
//! a table. Headings are recognized by an `id` ending in `-partners`; tables
//! are every `<table>` on the page. The two lists are paired by position, so
//! an unrelated extra table shifts every later pairing. When the counts
//! differ only the first `min(headings, tables)` pairs are kept (lenient) or
//! the page is rejected (strict).

use crate::error::ScrapeError;
use crate::models::PartnerTable;
use crate::scrapers::ExtractMode;
use crate::scrapers::markup::{
    Locator, any_of, find_by_selector, find_first, find_within, text_of,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

pub const HEADING_ID_SUFFIX: &str = "-partners";

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

fn compile(locator: Locator) -> Selector {
    locator
        .selector()
        .expect("partner page selectors are constant and valid")
}

static HEADING: Lazy<Selector> = Lazy::new(|| {
    let locators: Vec<Locator> = HEADING_TAGS
        .iter()
        .map(|tag| {
            Locator::new(tag)
                .attr_present("id")
                .attr_ends_with("id", HEADING_ID_SUFFIX)
        })
        .collect();
    any_of(&locators).expect("heading selector is constant and valid")
});
static TABLE: Lazy<Selector> = Lazy::new(|| compile(Locator::new("table")));
static ROW: Lazy<Selector> = Lazy::new(|| compile(Locator::new("tr")));
static HEAD_ROW: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("thead tr").expect("thead selector is constant and valid")
});
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| compile(Locator::new("th")));
static DATA_CELL: Lazy<Selector> = Lazy::new(|| compile(Locator::new("td")));
static CELL: Lazy<Selector> = Lazy::new(|| {
    any_of(&[Locator::new("th"), Locator::new("td")]).expect("cell selector is constant and valid")
});

/// Extract every heading/table pair on the partners page.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] in strict mode when no tables are found or
/// the heading and table counts differ.
#[instrument(level = "info", skip_all, fields(?mode, bytes = html.len()))]
pub fn extract_partner_tables(
    html: &str,
    mode: ExtractMode,
) -> Result<Vec<PartnerTable>, ScrapeError> {
    let document = Html::parse_document(html);
    let headings = find_by_selector(&document, &HEADING);
    let tables = find_by_selector(&document, &TABLE);
    debug!(headings = headings.len(), tables = tables.len(), "Located partner markup");

    if mode == ExtractMode::Strict {
        if tables.is_empty() {
            return Err(ScrapeError::Parse("no partner tables found".to_string()));
        }
        if headings.len() != tables.len() {
            return Err(ScrapeError::Parse(format!(
                "{} partner headings but {} tables",
                headings.len(),
                tables.len()
            )));
        }
    } else if headings.len() != tables.len() {
        warn!(
            headings = headings.len(),
            tables = tables.len(),
            "Heading and table counts differ; pairing up to the shorter list"
        );
    }

    let partner_tables: Vec<PartnerTable> = headings
        .into_iter()
        .zip(tables)
        .map(|(heading, table)| {
            let name = text_of(Some(heading)).unwrap_or_default();
            parse_table(name, table)
        })
        .collect();

    info!(count = partner_tables.len(), "Extracted partner tables");
    Ok(partner_tables)
}

/// Convert one `<table>` into a [`PartnerTable`].
///
/// The header is the first `thead` row, otherwise a leading row made only of
/// `th` cells. Without either, columns are numbered from `0`. Data rows are
/// padded or cut to the header width.
pub fn parse_table(name: String, table: ElementRef<'_>) -> PartnerTable {
    let rows = find_within(table, &ROW);
    let thead_ids: Vec<_> = find_within(table, &HEAD_ROW).iter().map(|r| r.id()).collect();

    let header_row = find_first(table, &HEAD_ROW)
        .or_else(|| rows.first().copied().filter(|row| is_header_row(*row)));
    let header_id = header_row.map(|row| row.id());

    let body: Vec<Vec<String>> = rows
        .iter()
        .filter(|row| Some(row.id()) != header_id && !thead_ids.contains(&row.id()))
        .map(|row| cell_texts(*row))
        .filter(|cells| !cells.is_empty())
        .collect();

    let columns = match header_row {
        Some(row) => cell_texts(row),
        None => {
            let width = body.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| i.to_string()).collect()
        }
    };

    let rows = body
        .into_iter()
        .map(|mut cells| {
            cells.resize(columns.len(), String::new());
            cells
        })
        .collect();

    PartnerTable {
        name,
        columns,
        rows,
    }
}

fn is_header_row(row: ElementRef<'_>) -> bool {
    find_first(row, &HEADER_CELL).is_some() && find_first(row, &DATA_CELL).is_none()
}

fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
    find_within(row, &CELL)
        .into_iter()
        .map(|cell| text_of(Some(cell)).unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOTEL_PAGE: &str = r#"
        <html><body>
          <h2 id="hotel-partners">Hotel Partners</h2>
          <table>
            <thead><tr><th>Program</th><th>Transfer Ratio</th></tr></thead>
            <tbody>
              <tr><td>World of Hyatt</td><td>1:1</td></tr>
              <tr><td>Marriott Bonvoy</td><td>1:1</td></tr>
            </tbody>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_hotel_partners_table() {
        let tables = extract_partner_tables(HOTEL_PAGE, ExtractMode::Lenient).unwrap();

        assert_eq!(tables.len(), 1);
        let hotel = &tables[0];
        assert_eq!(hotel.name, "Hotel Partners");
        assert_eq!(hotel.columns, vec!["Program", "Transfer Ratio"]);
        assert_eq!(hotel.rows.len(), 2);
        assert_eq!(hotel.cell(0, "Program"), Some("World of Hyatt"));
        assert_eq!(hotel.cell(1, "Transfer Ratio"), Some("1:1"));
    }

    #[test]
    fn test_pairs_truncate_to_shorter_list() {
        let html = r#"
            <h2 id="airline-partners">Airline Partners</h2>
            <table><tr><th>Program</th></tr><tr><td>United</td></tr></table>
            <h2 id="hotel-partners">Hotel Partners</h2>
            <table><tr><th>Program</th></tr><tr><td>Hyatt</td></tr></table>
            <h3 id="retail-partners">Retail Partners</h3>
        "#;

        let tables = extract_partner_tables(html, ExtractMode::Lenient).unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Airline Partners", "Hotel Partners"]);

        let extra_table = format!("{html}<table><tr><td>x</td></tr></table><table></table>");
        let tables = extract_partner_tables(&extra_table, ExtractMode::Lenient).unwrap();
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[2].name, "Retail Partners");
    }

    #[test]
    fn test_headings_need_the_id_suffix() {
        let html = r#"
            <h2 id="partners-overview">Overview</h2>
            <h2>No id</h2>
            <table><tr><td>a</td></tr></table>
        "#;
        assert!(extract_partner_tables(html, ExtractMode::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_strict_mode_rejects_count_mismatch() {
        let html = r#"<h2 id="a-partners">A</h2>"#;
        assert!(matches!(
            extract_partner_tables(html, ExtractMode::Strict),
            Err(ScrapeError::Parse(_))
        ));
        assert!(extract_partner_tables(html, ExtractMode::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_header_row_without_thead() {
        let doc = Html::parse_fragment(
            "<table><tr><th>Card</th><th>Ratio</th></tr><tr><td>Sapphire</td></tr>\
             <tr><td>Freedom</td><td>1:1</td><td>extra</td></tr></table>",
        );
        let table = find_by_selector(&doc, &TABLE)[0];
        let parsed = parse_table("Cards".to_string(), table);

        assert_eq!(parsed.columns, vec!["Card", "Ratio"]);
        assert_eq!(
            parsed.rows,
            vec![
                vec!["Sapphire".to_string(), String::new()],
                vec!["Freedom".to_string(), "1:1".to_string()],
            ]
        );
    }

    #[test]
    fn test_numbered_columns_without_header() {
        let doc = Html::parse_fragment(
            "<table><tr><td>Avianca</td><td>1:1</td></tr><tr><td>Qatar</td><td>1:1</td></tr></table>",
        );
        let table = find_by_selector(&doc, &TABLE)[0];
        let parsed = parse_table("Misc".to_string(), table);

        assert_eq!(parsed.columns, vec!["0", "1"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.cell(1, "0"), Some("Qatar"));
    }
}
