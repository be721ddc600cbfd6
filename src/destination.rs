//! Destination keyword table
//!
//! Maps lower-case keywords to canonical `"City, Country"` names. Lookup is a
//! substring scan and the first entry **in table order** whose keyword occurs
//! in the input wins, regardless of where in the input it occurs. Reordering
//! the table therefore changes results for inputs naming several places.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{trace, warn};

/// A single keyword → canonical destination mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationEntry {
    pub keyword: String,
    pub canonical: String,
}

/// Ordered destination lookup table
#[derive(Debug, Clone)]
pub struct DestinationTable {
    entries: Vec<DestinationEntry>,
    automaton: Option<AhoCorasick>,
}

const BUILTIN_DESTINATIONS: &[(&str, &str)] = &[
    ("phuket", "Phuket, Thailand"),
    ("bangkok", "Bangkok, Thailand"),
    ("chiang mai", "Chiang Mai, Thailand"),
    ("bali", "Bali, Indonesia"),
    ("singapore", "Singapore, Singapore"),
    ("tokyo", "Tokyo, Japan"),
    ("kyoto", "Kyoto, Japan"),
    ("seoul", "Seoul, South Korea"),
    ("hong kong", "Hong Kong, China"),
    ("paris", "Paris, France"),
    ("london", "London, United Kingdom"),
    ("rome", "Rome, Italy"),
    ("venice", "Venice, Italy"),
    ("barcelona", "Barcelona, Spain"),
    ("amsterdam", "Amsterdam, Netherlands"),
    ("lisbon", "Lisbon, Portugal"),
    ("santorini", "Santorini, Greece"),
    ("dubai", "Dubai, United Arab Emirates"),
    ("maldives", "Male, Maldives"),
    ("new york", "New York, United States"),
    ("cancun", "Cancun, Mexico"),
    ("sydney", "Sydney, Australia"),
    ("queenstown", "Queenstown, New Zealand"),
    ("cape town", "Cape Town, South Africa"),
    ("marrakech", "Marrakech, Morocco"),
    ("reykjavik", "Reykjavik, Iceland"),
];

static BUILTIN: LazyLock<DestinationTable> =
    LazyLock::new(|| DestinationTable::new(BUILTIN_DESTINATIONS.iter().copied()));

impl DestinationTable {
    /// Build a table from `(keyword, canonical)` pairs, keeping their order.
    pub fn new<K, C>(entries: impl IntoIterator<Item = (K, C)>) -> Self
    where
        K: Into<String>,
        C: Into<String>,
    {
        let entries: Vec<DestinationEntry> = entries
            .into_iter()
            .map(|(k, c)| DestinationEntry {
                keyword: k.into().to_lowercase(),
                canonical: c.into(),
            })
            .collect();

        // Standard match kind is required for overlapping search: every
        // occurring keyword must be seen so the lowest table index can win.
        let automaton = if entries.is_empty() {
            None
        } else {
            match AhoCorasickBuilder::new()
                .ascii_case_insensitive(true)
                .match_kind(MatchKind::Standard)
                .build(entries.iter().map(|e| e.keyword.as_str()))
            {
                Ok(ac) => Some(ac),
                Err(e) => {
                    warn!(error = %e, "Destination automaton build failed, using linear scan");
                    None
                }
            }
        };

        Self { entries, automaton }
    }

    /// The table shipped with the crate
    pub fn builtin() -> &'static DestinationTable {
        &BUILTIN
    }

    pub fn entries(&self) -> &[DestinationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return a copy with entries `a` and `b` exchanged, or `None` if
    /// either index is out of range.
    pub fn swapped(&self, a: usize, b: usize) -> Option<Self> {
        if a >= self.entries.len() || b >= self.entries.len() {
            return None;
        }
        let mut entries = self.entries.clone();
        entries.swap(a, b);
        Some(Self::new(entries.into_iter().map(|e| (e.keyword, e.canonical))))
    }

    /// Find the canonical destination mentioned in `input`.
    pub fn lookup(&self, input: &str) -> Option<&str> {
        let index = match &self.automaton {
            Some(ac) => ac
                .find_overlapping_iter(input)
                .map(|m| m.pattern().as_usize())
                .min(),
            None => {
                let lower = input.to_lowercase();
                self.entries
                    .iter()
                    .position(|e| lower.contains(e.keyword.as_str()))
            }
        }?;

        let entry = &self.entries[index];
        trace!(keyword = %entry.keyword, canonical = %entry.canonical, "Destination matched");
        Some(entry.canonical.as_str())
    }

    /// Canonical name for an exact keyword
    pub fn canonical_for(&self, keyword: &str) -> Option<&str> {
        let keyword = keyword.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| e.canonical.as_str())
    }
}

impl Default for DestinationTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
