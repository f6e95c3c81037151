//! Intent catalog - the closed set of candidate labels and their command keywords
//!
//! The descriptions are what the zero-shot model scores against; the
//! keywords are what the consuming shell dispatches on.

use crate::core::error::{NluError, Result};

/// Outcome of looking a predicted label up in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordLookup<'a> {
    Found(&'a str),
    NotFound,
}

impl<'a> KeywordLookup<'a> {
    /// Resolve to the keyword, or `fallback` when the label is unknown
    pub fn or(self, fallback: &'a str) -> &'a str {
        match self {
            Self::Found(keyword) => keyword,
            Self::NotFound => fallback,
        }
    }
}

/// One candidate intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentEntry {
    /// Natural language description passed to the classifier
    pub description: String,
    /// Canonical command keyword (e.g. "ls", "help")
    pub keyword: String,
}

/// Ordered, immutable list of candidate intents
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    entries: Vec<IntentEntry>,
}

impl IntentCatalog {
    /// Build a catalog from (description, keyword) pairs
    ///
    /// Fails if a description repeats or either field is blank.
    pub fn new<D, K>(pairs: impl IntoIterator<Item = (D, K)>) -> Result<Self>
    where
        D: Into<String>,
        K: Into<String>,
    {
        let mut entries: Vec<IntentEntry> = Vec::new();
        for (description, keyword) in pairs {
            let description = description.into();
            let keyword = keyword.into();

            if description.trim().is_empty() || keyword.trim().is_empty() {
                return Err(NluError::Catalog(format!(
                    "blank entry: description={:?} keyword={:?}",
                    description, keyword
                )));
            }
            if entries.iter().any(|e| e.description == description) {
                return Err(NluError::Catalog(format!(
                    "duplicate description: {}",
                    description
                )));
            }

            entries.push(IntentEntry {
                description,
                keyword,
            });
        }

        if entries.is_empty() {
            return Err(NluError::Catalog("catalog has no intents".into()));
        }

        Ok(Self { entries })
    }

    /// Candidate labels in catalog order
    pub fn descriptions(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.description.as_str()).collect()
    }

    /// Canonical keywords in catalog order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.keyword.as_str())
    }

    pub fn entries(&self) -> &[IntentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map a predicted label to its keyword
    pub fn keyword_for(&self, label: &str) -> KeywordLookup<'_> {
        self.entries
            .iter()
            .find(|e| e.description == label)
            .map_or(KeywordLookup::NotFound, |e| {
                KeywordLookup::Found(e.keyword.as_str())
            })
    }
}

/// Shell commands understood by the OmniMind client
const DEFAULT_INTENTS: [(&str, &str); 8] = [
    ("display directory contents", "ls"),
    ("generate a new text note", "create_note"),
    ("repeat user input", "echo"),
    ("show ipfs peer identity", "ipfs_id"),
    ("upload file to ipfs", "ipfs_add"),
    ("download file from ipfs", "ipfs_cat"),
    ("show command instructions", "help"),
    ("terminate application", "quit"),
];

impl Default for IntentCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_INTENTS
                .iter()
                .map(|(description, keyword)| IntentEntry {
                    description: (*description).into(),
                    keyword: (*keyword).into(),
                })
                .collect(),
        }
    }
}
