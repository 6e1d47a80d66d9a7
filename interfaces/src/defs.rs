use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical form of a search query: trimmed and lowercased, never empty.
///
/// Two raw queries that normalize to the same text are the same search, so this
/// is the key for both the history list and the result cache.
///
/// Deserialization accepts only text already in canonical form, so a term read
/// back from storage cannot be blank or differ from what `normalize` produces.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SearchTerm(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSearchTerm {
    #[error("search term is blank")]
    Blank,

    #[error("search term '{0}' is not normalized")]
    NotNormalized(String),
}

impl SearchTerm {
    /// Normalize user input. Returns `None` when nothing is left after trimming.
    pub fn normalize(raw: &str) -> Option<Self> {
        let folded = raw.trim().to_lowercase();
        if folded.is_empty() {
            None
        } else {
            Some(Self(folded))
        }
    }

    /// Wrap text that was previously produced by [`SearchTerm::normalize`] and
    /// handed back by a caller. No normalization is applied.
    pub fn from_stored(stored: &str) -> Option<Self> {
        if stored.is_empty() {
            None
        } else {
            Some(Self(stored.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SearchTerm {
    type Error = InvalidSearchTerm;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        match Self::normalize(&text) {
            None => Err(InvalidSearchTerm::Blank),
            Some(term) if term.0 == text => Ok(term),
            Some(_) => Err(InvalidSearchTerm::NotNormalized(text)),
        }
    }
}

impl From<SearchTerm> for String {
    fn from(term: SearchTerm) -> Self {
        term.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SearchTerm {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One search hit. The coordinator passes these through untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl ResultItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            width,
            height,
        }
    }
}

// Object style note:
// Nothing in this crate performs I/O. Fetching, caching and history live in
// the gif-search crate; these types are what crosses the boundary between the
// coordinator, its fetchers and whatever front end renders the results.
