use codex_common::store::Snapshot;
use codex_common::text::SearchTerm;

use crate::index::{flatten, CategoryFilter, SearchableRecord};
use crate::model::CommandCatalog;

/// Result of a search against the store: not loaded yet, failed, or the matches
/// (possibly none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Loading,
    Failed(String),
    Matches(Vec<SearchableRecord>),
}

/// Keep records admitted by the category filter whose blob contains the term.
/// Relative order is preserved.
pub fn filter_records(
    records: Vec<SearchableRecord>,
    filter: CategoryFilter,
    term: &SearchTerm,
) -> Vec<SearchableRecord> {
    records
        .into_iter()
        .filter(|record| filter.admits(record.category) && term.matches(&record.search_blob))
        .collect()
}

pub fn search(
    snapshot: &Snapshot<CommandCatalog>,
    filter: CategoryFilter,
    term: &SearchTerm,
) -> SearchOutcome {
    match snapshot {
        Snapshot::Loading => SearchOutcome::Loading,
        Snapshot::Failed(message) => SearchOutcome::Failed(message.clone()),
        Snapshot::Ready(catalog) => {
            SearchOutcome::Matches(filter_records(flatten(catalog, filter), filter, term))
        }
    }
}
