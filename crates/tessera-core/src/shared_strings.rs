//! Shared string table
//!
//! Text referenced by index from cells. Indices are dense and assigned in
//! declaration order. The reverse index (text to index) is only kept when the
//! workbook may later need to look up new content; decoding only needs the
//! forward direction.

use ahash::AHashMap;

use crate::cell::SharedString;
use crate::error::{Error, Result};

/// Bidirectional `index <-> text` table
#[derive(Debug, Clone, Default)]
pub struct SharedStringTable {
    strings: Vec<SharedString>,
    reverse: Option<AHashMap<SharedString, u32>>,
    declared_count: Option<u32>,
    declared_unique_count: Option<u32>,
}

impl SharedStringTable {
    /// Create a table that maintains the reverse index
    pub fn new() -> Self {
        Self {
            reverse: Some(AHashMap::new()),
            ..Default::default()
        }
    }

    /// Create a forward-only table (no reverse index)
    pub fn forward_only() -> Self {
        Self::default()
    }

    /// Create a table, pre-sizing for the expected number of strings
    pub fn with_capacity(capacity: usize, reverse_lookup: bool) -> Self {
        Self {
            strings: Vec::with_capacity(capacity),
            reverse: reverse_lookup.then(|| AHashMap::with_capacity(capacity)),
            ..Default::default()
        }
    }

    /// Record a known `(index, text)` pair during bulk load
    ///
    /// Pairs must arrive in order: `index` has to equal the number of strings
    /// already loaded. For duplicate texts the reverse index keeps the first
    /// index seen.
    pub fn intern_existing<S: Into<SharedString>>(&mut self, index: u32, text: S) -> Result<()> {
        let expected = self.strings.len() as u32;
        if index != expected {
            return Err(Error::NonContiguousSharedString {
                expected,
                found: index,
            });
        }

        let text = text.into();
        if let Some(reverse) = &mut self.reverse {
            reverse.entry(text.clone()).or_insert(index);
        }
        self.strings.push(text);
        Ok(())
    }

    /// Append the next string, returning its index
    pub fn push<S: Into<SharedString>>(&mut self, text: S) -> u32 {
        let index = self.strings.len() as u32;
        let text = text.into();
        if let Some(reverse) = &mut self.reverse {
            reverse.entry(text.clone()).or_insert(index);
        }
        self.strings.push(text);
        index
    }

    /// Look up a string by index
    pub fn lookup_by_index(&self, index: u32) -> Option<&SharedString> {
        self.strings.get(index as usize)
    }

    /// Look up the first index holding `text`
    ///
    /// Always `None` when the table was built without a reverse index.
    pub fn reverse_lookup(&self, text: &str) -> Option<u32> {
        self.reverse.as_ref()?.get(text).copied()
    }

    /// Whether the reverse index is maintained
    pub fn has_reverse_lookup(&self) -> bool {
        self.reverse.is_some()
    }

    /// Record the `count` and `uniqueCount` declared by the source
    ///
    /// These are kept for write-back only and are not checked against the
    /// loaded strings.
    pub fn set_declared_counts(&mut self, count: Option<u32>, unique_count: Option<u32>) {
        self.declared_count = count;
        self.declared_unique_count = unique_count;
    }

    /// Declared total number of string references
    pub fn declared_count(&self) -> Option<u32> {
        self.declared_count
    }

    /// Declared number of unique strings
    pub fn declared_unique_count(&self) -> Option<u32> {
        self.declared_unique_count
    }

    /// Number of loaded strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if no strings are loaded
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over strings in index order
    pub fn iter(&self) -> impl Iterator<Item = &SharedString> {
        self.strings.iter()
    }
}
