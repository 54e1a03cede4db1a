//! Extraction of records from fetched pages.
//!
//! Both sources follow the same shape: parse the page with `scraper`, locate
//! containers by tag and attribute markers, then pull text out of them.
//!
//! | Source | Module | Output |
//! |--------|--------|--------|
//! | Transfer bonuses | [`bonuses`] | `Vec<BonusRecord>` |
//! | Transfer partners | [`partners`] | `Vec<PartnerTable>` |
//!
//! [`markup`] holds the element lookup helpers shared by both.
//!
//! Extraction runs in one of two [`ExtractMode`]s. Lenient mode fills missing
//! fields with placeholders and degrades structural mismatches to fewer
//! records; strict mode reports them as errors.

pub mod bonuses;
pub mod markup;
pub mod partners;

/// How extraction treats missing or malformed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Substitute placeholders and keep going.
    #[default]
    Lenient,
    /// Fail on the first missing element or malformed value.
    Strict,
}
