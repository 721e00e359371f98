//! Lookup/Search — the pure search and selection protocol.
//!
//! Terminal I/O lives in [`terminal`]; nothing here reads or prints.

pub mod terminal;

use clap::ValueEnum;

use crate::errors::AppError;
use crate::models::PromptRecord;
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SearchMode {
    /// Topic must equal the term exactly.
    Exact,
    /// Case-insensitive substring match on the topic.
    #[default]
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    NotFound,
    /// Exactly one match; selected without asking.
    Single(&'a PromptRecord),
    /// Several matches; the caller must pick one with [`select`].
    Multiple(Vec<&'a PromptRecord>),
}

pub fn search<'a>(store: &'a RecordStore, term: &str, mode: SearchMode) -> SearchOutcome<'a> {
    let mut found = match mode {
        SearchMode::Exact => store.find_exact(term),
        SearchMode::Substring => store.find(term),
    };

    match found.len() {
        0 => SearchOutcome::NotFound,
        1 => SearchOutcome::Single(found.remove(0)),
        _ => SearchOutcome::Multiple(found),
    }
}

/// Picks a candidate by 1-based `choice`. Out-of-range choices are rejected, never clamped.
pub fn select<'a>(
    candidates: &[&'a PromptRecord],
    choice: usize,
) -> Result<&'a PromptRecord, AppError> {
    choice
        .checked_sub(1)
        .and_then(|i| candidates.get(i).copied())
        .ok_or(AppError::InvalidSelection {
            choice,
            max: candidates.len(),
        })
}

/// `N. <topic>: <prompt>` lines, numbered from 1.
pub fn format_choices(candidates: &[&PromptRecord]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}: {}\n", i + 1, r.topic, r.prompt))
        .collect()
}

pub fn not_found_message(term: &str) -> String {
    format!("No prompt found for '{term}'.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        RecordStore::from_records(vec![
            PromptRecord::new("Linux Terminal", "act as a terminal"),
            PromptRecord::new("JavaScript Console", "act as a js console"),
            PromptRecord::new("SQL terminal", "act as a sql terminal"),
            PromptRecord::new("Excel Sheet", "act as a spreadsheet"),
            PromptRecord::new("Terminal Wizard", "act as a wizard"),
        ])
    }

    #[test]
    fn test_search_case_insensitive_same_results() {
        let store = store();
        let lower = search(&store, "linux", SearchMode::Substring);
        let upper = search(&store, "LINUX", SearchMode::Substring);
        assert_eq!(lower, upper);
        assert_eq!(lower, SearchOutcome::Single(&store.records()[0]));
    }

    #[test]
    fn test_single_match_auto_selects() {
        let store = store();
        match search(&store, "excel", SearchMode::Substring) {
            SearchOutcome::Single(record) => assert_eq!(record.prompt, "act as a spreadsheet"),
            other => panic!("expected single match, got {other:?}"),
        }
    }

    #[test]
    fn test_no_match_is_not_found() {
        let store = store();
        assert_eq!(search(&store, "chef", SearchMode::Substring), SearchOutcome::NotFound);
        assert_eq!(not_found_message("chef"), "No prompt found for 'chef'.");
    }

    #[test]
    fn test_exact_mode_ignores_partial_matches() {
        let store = store();
        assert_eq!(search(&store, "Linux", SearchMode::Exact), SearchOutcome::NotFound);
        assert_eq!(
            search(&store, "Linux Terminal", SearchMode::Exact),
            SearchOutcome::Single(&store.records()[0])
        );
    }

    #[test]
    fn test_selection_bounds() {
        let store = store();
        let SearchOutcome::Multiple(candidates) = search(&store, "terminal", SearchMode::Substring)
        else {
            panic!("expected several matches");
        };
        assert_eq!(candidates.len(), 3);

        assert_eq!(select(&candidates, 1).unwrap().topic, "Linux Terminal");
        assert!(matches!(
            select(&candidates, 4),
            Err(AppError::InvalidSelection { choice: 4, max: 3 })
        ));
        assert!(matches!(
            select(&candidates, 0),
            Err(AppError::InvalidSelection { choice: 0, max: 3 })
        ));
    }

    #[test]
    fn test_format_choices_numbers_from_one() {
        let store = store();
        let candidates: Vec<_> = store.records().iter().take(2).collect();
        assert_eq!(
            format_choices(&candidates),
            "1. Linux Terminal: act as a terminal\n2. JavaScript Console: act as a js console\n"
        );
    }
}
