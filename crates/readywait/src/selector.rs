//! CSS selector queries over an HTML file on disk.
//!
//! The file is re-read and re-parsed on every probe, so a page that is being
//! rewritten by another process is seen in its latest state.

use crate::result::{WaitError, WaitResult};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Owned snapshot of a matched element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMatch {
    /// Tag name, lowercase
    pub tag: String,
    /// Concatenated text content
    pub text: String,
    /// Attributes by name
    pub attributes: BTreeMap<String, String>,
}

impl ElementMatch {
    fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            tag: element.value().name().to_owned(),
            text: element.text().collect(),
            attributes: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
                .collect(),
        }
    }

    /// Attribute value, if present
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content with surrounding whitespace removed
    #[must_use]
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Finds the first element matching a selector in an HTML file
#[derive(Debug, Clone)]
pub struct SelectorQuery {
    path: PathBuf,
    css: String,
    selector: Selector,
}

impl SelectorQuery {
    /// Build a query for `css` against the document at `path`
    pub fn new(path: impl Into<PathBuf>, css: &str) -> WaitResult<Self> {
        let selector =
            Selector::parse(css).map_err(|e| WaitError::invalid_selector(css, e.to_string()))?;
        Ok(Self {
            path: path.into(),
            css: css.to_owned(),
            selector,
        })
    }

    /// Document this query reads
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Selector as given
    #[must_use]
    pub fn css(&self) -> &str {
        &self.css
    }

    /// Look for the element once.
    ///
    /// A document that does not exist yet counts as "not found"; other read
    /// failures are errors. Bytes that are not valid UTF-8 (a legacy encoding,
    /// or a write caught halfway through a character) decode as U+FFFD.
    pub fn probe(&self) -> WaitResult<Option<ElementMatch>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(self.find_in(&String::from_utf8_lossy(&bytes)))
    }

    /// Look for the element in an HTML string
    #[must_use]
    pub fn find_in(&self, html: &str) -> Option<ElementMatch> {
        let document = Html::parse_document(html);
        document
            .select(&self.selector)
            .next()
            .map(ElementMatch::from_element)
    }
}
