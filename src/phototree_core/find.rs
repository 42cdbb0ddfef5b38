use crate::phototree_core::folder_map::{FolderMap, FolderMapBuilder};
use crate::phototree_core::record::Record;
use std::collections::BTreeSet;
use std::path::Path;

/// Which place field to match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceQuery {
    Country(String),
    City(String),
}

impl PlaceQuery {
    pub fn name(&self) -> &str {
        match self {
            PlaceQuery::Country(name) | PlaceQuery::City(name) => name,
        }
    }

    fn field<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            PlaceQuery::Country(_) => &record.country,
            PlaceQuery::City(_) => &record.city,
        }
    }

    /// Case-insensitive exact match. Sentinels never match.
    pub fn matches(&self, record: &Record) -> bool {
        let known = match self {
            PlaceQuery::Country(_) => record.has_country(),
            PlaceQuery::City(_) => record.has_city(),
        };
        known && self.field(record).eq_ignore_ascii_case(self.name().trim())
    }
}

/// Plan copying every matching record flat into `output`.
pub fn plan_place_search(records: &[Record], query: &PlaceQuery, output: &Path) -> FolderMap {
    let files = records
        .iter()
        .filter(|r| query.matches(r))
        .map(|r| r.path.clone())
        .collect();
    let mut builder = FolderMapBuilder::new();
    builder.claim(output, files);
    builder.build()
}

/// Jaro similarity a known name needs to be offered as a hint.
const SUGGESTION_CONFIDENCE: f64 = 0.7;

/// Known place names that look like the query, for "did you mean" hints.
pub fn similar_places(records: &[Record], query: &PlaceQuery) -> Vec<String> {
    let wanted = query.name().to_lowercase();
    let known: BTreeSet<&str> = records
        .iter()
        .filter(|r| match query {
            PlaceQuery::Country(_) => r.has_country(),
            PlaceQuery::City(_) => r.has_city(),
        })
        .map(|r| query.field(r))
        .collect();

    known
        .into_iter()
        .filter(|name| strsim::jaro(wanted.trim(), &name.to_lowercase()) > SUGGESTION_CONFIDENCE)
        .map(String::from)
        .collect()
}
