use crate::dom::{RowHandle, RowText};
use crate::matcher::pattern::compile_patterns;
use serde::{Deserialize, Serialize};

/// One match: a row and the case number that selected it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    /// Matched row
    pub row: RowHandle,

    /// Position of the matching case number in the searched list
    pub case_index: usize,
}

/// Ordered matches of the most recent search
///
/// Entries are grouped by case number in search order, rows in document
/// order within a group. A row matching several case numbers appears once
/// per case number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSet {
    entries: Vec<MatchEntry>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: MatchEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MatchEntry> {
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchEntry> {
        self.entries.iter()
    }

    /// Matched rows in match order, duplicates included
    pub fn rows(&self) -> impl Iterator<Item = RowHandle> + '_ {
        self.entries.iter().map(|entry| entry.row)
    }
}

/// Match every row against every case number
///
/// Pure: it only reads the scanned texts, so it can run without a page.
pub fn compute_matches(rows: &[RowText], case_numbers: &[String]) -> MatchSet {
    let mut matches = MatchSet::new();

    for (case_index, pattern) in compile_patterns(case_numbers) {
        for row in rows {
            if pattern.is_match(&row.text) {
                matches.push(MatchEntry {
                    row: row.handle,
                    case_index,
                });
            }
        }
    }

    matches
}
