//! # Favorite Ranking Module
//!
//! Turns restaurant visit records into the per-district "top favorites"
//! reply: filter by address substring, count visits per store name, rank by
//! visit count and format the first few entries with a search deep link.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SEARCH_QUERY_PLACEHOLDER;
use crate::messages;

/// Number of stores listed per district
pub const TOP_N: usize = 5;

/// Bytes left unescaped in the search query: alphanumerics plus `_ . - ~ /`
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// A single restaurant visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub store: String,
    pub address: String,
}

impl Record {
    pub fn new(store: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            address: address.into(),
        }
    }
}

/// One line of a ranking result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub store: String,
    pub visits: usize,
}

/// Count visits per store among records whose address contains `district`.
///
/// Entries come back sorted by visit count, highest first. Equal counts keep
/// the order in which the store names were first seen. Nothing is truncated.
pub fn tally(district: &str, records: &[Record]) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.address.contains(district)) {
        match positions.get(record.store.as_str()) {
            Some(&idx) => entries[idx].visits += 1,
            None => {
                positions.insert(record.store.as_str(), entries.len());
                entries.push(RankingEntry {
                    store: record.store.clone(),
                    visits: 1,
                });
            }
        }
    }

    // sort_by is stable, which keeps first-seen order for ties
    entries.sort_by(|a, b| b.visits.cmp(&a.visits));
    entries
}

/// Top [`TOP_N`] stores for a district
pub fn rank(district: &str, records: &[Record]) -> Vec<RankingEntry> {
    let mut entries = tally(district, records);
    entries.truncate(TOP_N);
    entries
}

/// Percent-encode a store name the way browsers expect in a query string
pub fn encode_query(store: &str) -> String {
    utf8_percent_encode(store, QUERY_ENCODE_SET).to_string()
}

/// Search deep link for a store name
pub fn deep_link(template: &str, store: &str) -> String {
    template.replace(SEARCH_QUERY_PLACEHOLDER, &encode_query(store))
}

/// Build the reply text for a district ranking
pub fn format_ranking(district: &str, entries: &[RankingEntry], template: &str) -> String {
    if entries.is_empty() {
        return messages::no_favorites(district);
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            messages::ranking_entry(&entry.store, entry.visits, &deep_link(template, &entry.store))
        })
        .collect();

    format!("{}\n{}\n", messages::ranking_header(district), lines.join("\n"))
}
