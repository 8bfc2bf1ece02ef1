// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-language value tables used by every localized text and audio field.
//!
//! A [`LanguageTable`] holds one [`LanguageEntry`] per supported
//! [`LanguageTag`]. Tables built through [`LanguageTable::complete`] or
//! reconciled with [`LanguageTable::ensure_complete`] answer every lookup for
//! the tags they were completed against.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported locale, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum LanguageTag {
    /// English
    #[default]
    English,
    /// German
    German,
    /// Danish
    Danish,
    /// Japanese
    Japanese,
}

impl LanguageTag {
    /// Every known tag in declaration order
    pub const ALL: [LanguageTag; 4] = [
        LanguageTag::English,
        LanguageTag::German,
        LanguageTag::Danish,
        LanguageTag::Japanese,
    ];

    /// Name used in persisted files and CSV headers
    pub fn name(&self) -> &'static str {
        match self {
            LanguageTag::English => "English",
            LanguageTag::German => "German",
            LanguageTag::Danish => "Danish",
            LanguageTag::Japanese => "Japanese",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LanguageTag {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| LanguageError::UnknownTag(s.to_string()))
    }
}

// Tags persist as plain names so files written by builds with a different
// language set still parse.
impl Serialize for LanguageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for LanguageTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors raised by language table lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageError {
    /// The table has no entry for the requested tag
    #[error("Missing language entry: {0}")]
    MissingLanguageEntry(LanguageTag),

    /// A tag name that this build does not know
    #[error("Unknown language tag: {0}")]
    UnknownTag(String),
}

/// A single language/value pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageEntry<T> {
    /// Locale of this entry
    pub language: LanguageTag,
    /// Localized value
    pub value: T,
}

/// Ordered per-language values with at most one entry per tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LanguageTable<T> {
    entries: Vec<LanguageEntry<T>>,
}

impl<T> LanguageTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Look up the value for a tag
    pub fn get(&self, tag: LanguageTag) -> Result<&T, LanguageError> {
        self.entries
            .iter()
            .find(|entry| entry.language == tag)
            .map(|entry| &entry.value)
            .ok_or(LanguageError::MissingLanguageEntry(tag))
    }

    /// Look up a mutable value for a tag
    pub fn get_mut(&mut self, tag: LanguageTag) -> Result<&mut T, LanguageError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.language == tag)
            .map(|entry| &mut entry.value)
            .ok_or(LanguageError::MissingLanguageEntry(tag))
    }

    /// Set the value for a tag, appending an entry if the tag is absent
    pub fn set(&mut self, tag: LanguageTag, value: T) {
        match self.entries.iter_mut().find(|entry| entry.language == tag) {
            Some(entry) => entry.value = value,
            None => self.entries.push(LanguageEntry { language: tag, value }),
        }
    }

    /// Whether every tag in `tags` has an entry
    pub fn is_complete(&self, tags: &[LanguageTag]) -> bool {
        tags.iter().all(|tag| self.contains(*tag))
    }

    /// Whether the table has an entry for a tag
    pub fn contains(&self, tag: LanguageTag) -> bool {
        self.entries.iter().any(|entry| entry.language == tag)
    }

    /// Iterate over entries in stored order
    pub fn iter(&self) -> impl Iterator<Item = &LanguageEntry<T>> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Default> LanguageTable<T> {
    /// Create a table holding a default value for each tag
    pub fn complete(tags: &[LanguageTag]) -> Self {
        let mut table = Self::new();
        table.ensure_complete(tags);
        table
    }

    /// Reconcile the table against a set of known tags.
    ///
    /// Missing tags get a default value, tags outside `tags` are dropped and
    /// surviving values are kept. Entries end up in the order of `tags`.
    /// Repeated calls with the same `tags` leave the table unchanged.
    pub fn ensure_complete(&mut self, tags: &[LanguageTag]) {
        let mut previous = std::mem::take(&mut self.entries);
        for tag in tags {
            if self.contains(*tag) {
                continue;
            }
            let value = previous
                .iter()
                .position(|entry| entry.language == *tag)
                .map(|index| previous.swap_remove(index).value)
                .unwrap_or_default();
            self.entries.push(LanguageEntry { language: *tag, value });
        }
    }
}

impl<T: Clone> LanguageTable<T> {
    /// Create a table holding the same value for each tag
    pub fn filled(tags: &[LanguageTag], value: T) -> Self {
        let mut table = Self::new();
        for tag in tags {
            table.set(*tag, value.clone());
        }
        table
    }
}

impl<T> Default for LanguageTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct StoredEntry<T> {
    language: String,
    value: T,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for LanguageTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = Vec::<StoredEntry<T>>::deserialize(deserializer)?;
        let mut table = LanguageTable::new();
        for entry in stored {
            match entry.language.parse::<LanguageTag>() {
                Ok(tag) if table.contains(tag) => {
                    tracing::warn!("Dropping duplicate language entry for {tag}");
                }
                Ok(tag) => table.entries.push(LanguageEntry {
                    language: tag,
                    value: entry.value,
                }),
                Err(_) => {
                    tracing::warn!("Dropping entry for unknown language '{}'", entry.language);
                }
            }
        }
        Ok(table)
    }
}
