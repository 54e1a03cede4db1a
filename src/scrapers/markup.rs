//! Locating elements in a parsed page.
//!
//! A [`Locator`] describes a tag plus attribute predicates and compiles to a
//! CSS selector. [`text_of`] turns an optional element into its cleaned text
//! so call sites can pick their own default for a missing node.

use crate::error::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use std::fmt;

/// A predicate on one attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    /// The whole `class` attribute equals this string, classes in order.
    ClassIs(String),
    /// The element carries this class among others.
    HasClass(String),
    /// The attribute equals this value.
    AttrEquals(String, String),
    /// The attribute is present with any value.
    AttrPresent(String),
    /// The attribute value ends with this suffix.
    AttrEndsWith(String, String),
}

/// Tag name plus attribute predicates, all of which must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    tag: String,
    matchers: Vec<AttrMatch>,
}

impl Locator {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            matchers: Vec::new(),
        }
    }

    pub fn matching(mut self, matcher: AttrMatch) -> Self {
        self.matchers.push(matcher);
        self
    }

    pub fn class_is(self, class: &str) -> Self {
        self.matching(AttrMatch::ClassIs(class.to_string()))
    }

    pub fn has_class(self, class: &str) -> Self {
        self.matching(AttrMatch::HasClass(class.to_string()))
    }

    pub fn attr_equals(self, name: &str, value: &str) -> Self {
        self.matching(AttrMatch::AttrEquals(name.to_string(), value.to_string()))
    }

    pub fn attr_present(self, name: &str) -> Self {
        self.matching(AttrMatch::AttrPresent(name.to_string()))
    }

    pub fn attr_ends_with(self, name: &str, suffix: &str) -> Self {
        self.matching(AttrMatch::AttrEndsWith(name.to_string(), suffix.to_string()))
    }

    /// Compile into a `scraper` selector.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Parse`] if the tag or an attribute value cannot
    /// form a valid selector.
    pub fn selector(&self) -> Result<Selector, ScrapeError> {
        let css = self.to_string();
        Selector::parse(&css)
            .map_err(|e| ScrapeError::Parse(format!("invalid selector `{css}`: {e}")))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        for m in &self.matchers {
            match m {
                AttrMatch::ClassIs(class) => write!(f, "[class=\"{}\"]", escape(class))?,
                AttrMatch::HasClass(class) => write!(f, "[class~=\"{}\"]", escape(class))?,
                AttrMatch::AttrEquals(name, value) => {
                    write!(f, "[{}=\"{}\"]", name, escape(value))?
                }
                AttrMatch::AttrPresent(name) => write!(f, "[{}]", name)?,
                AttrMatch::AttrEndsWith(name, suffix) => {
                    write!(f, "[{}$=\"{}\"]", name, escape(suffix))?
                }
            }
        }
        Ok(())
    }
}

/// Compile several locators into one selector that matches any of them.
///
/// Matches come back in document order, not locator order.
pub fn any_of(locators: &[Locator]) -> Result<Selector, ScrapeError> {
    let css = locators
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Selector::parse(&css).map_err(|e| ScrapeError::Parse(format!("invalid selector `{css}`: {e}")))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// All elements of the document matching `selector`, in document order.
pub fn find_by_selector<'a>(document: &'a Html, selector: &Selector) -> Vec<ElementRef<'a>> {
    document.select(selector).collect()
}

/// All descendants of `element` matching `selector`, in document order.
pub fn find_within<'a>(element: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    element.select(selector).collect()
}

/// First descendant of `element` matching `selector`.
pub fn find_first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Text content of an element with whitespace runs collapsed and trimmed.
///
/// Returns `None` when there is no element, so every call site names its own
/// fallback. An element with no text yields `Some("")`.
pub fn text_of(element: Option<ElementRef<'_>>) -> Option<String> {
    let element = element?;
    let joined: String = element.text().collect();
    Some(joined.split_whitespace().collect::<Vec<_>>().join(" "))
}
