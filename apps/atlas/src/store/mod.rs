//! Record Store: an ordered, read-only table of prompt records.
//!
//! Built from an explicit source on every run and handed to consumers by reference.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::PromptRecord;

/// Locations tried when no CSV path is given, in order.
const DEFAULT_SOURCES: &[&str] = &["../prompts.csv", "./prompts.csv"];

const CSV_HEADER: [&str; 4] = ["topic", "prompt", "contributor", "link"];

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<PromptRecord>,
}

impl RecordStore {
    pub fn from_records(records: Vec<PromptRecord>) -> Self {
        Self { records }
    }

    /// Loads a comma-delimited table with a header row.
    /// The topic column may be called `topic` or `act`; other columns are optional.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::SourceNotFound(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let mut records = Vec::new();
        for row in reader.deserialize::<PromptRecord>() {
            records.push(row?.normalized());
        }

        let store = Self { records };
        info!("Loaded {} prompt records from {}", store.len(), path.display());
        Ok(store)
    }

    /// First existing default location, if any.
    pub fn default_source() -> Option<PathBuf> {
        DEFAULT_SOURCES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }

    /// Writes the store as `topic,prompt,contributor,link` CSV, header included.
    pub fn write_csv(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(CSV_HEADER)?;
        for record in self.records() {
            writer.serialize(record)?;
        }
        writer.flush()?;

        debug!("Wrote {} records to {}", self.len(), path.display());
        Ok(())
    }

    pub fn records(&self) -> &[PromptRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by<P>(&self, predicate: P) -> Vec<&PromptRecord>
    where
        P: Fn(&PromptRecord) -> bool,
    {
        self.records().iter().filter(|r| predicate(r)).collect()
    }

    /// Case-insensitive substring match on the topic field, in source order.
    pub fn find(&self, term: &str) -> Vec<&PromptRecord> {
        let needle = term.to_lowercase();
        self.find_by(|r| r.topic_contains(&needle))
    }

    /// Exact equality on the topic field.
    pub fn find_exact(&self, term: &str) -> Vec<&PromptRecord> {
        self.find_by(|r| r.topic == term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![
            PromptRecord::new("Linux Terminal", "I want you to act as a linux terminal."),
            PromptRecord::new("English Translator", "I want you to act as a translator."),
            PromptRecord::new("Linux Terminal", "Duplicate rows are allowed."),
        ])
    }

    #[test]
    fn test_load_missing_source_is_source_not_found() {
        let dir = TempDir::new().unwrap();
        let err = RecordStore::load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, AppError::SourceNotFound(_)));
    }

    #[test]
    fn test_load_act_column_with_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "prompts.csv",
            "act,prompt,for_devs,type,contributor\n\
             \"Linux Terminal\",\"I want you to act as a terminal, reply only with output.\",TRUE,TEXT,f\n\
             Storyteller,Tell stories,FALSE,TEXT,\n",
        );

        let store = RecordStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].topic, "Linux Terminal");
        assert_eq!(
            store.records()[0].prompt,
            "I want you to act as a terminal, reply only with output."
        );
        assert_eq!(store.records()[0].contributor.as_deref(), Some("f"));
        assert_eq!(store.records()[1].contributor, None);
        assert_eq!(store.records()[1].link, None);
    }

    #[test]
    fn test_load_topic_column_without_optionals() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.csv", "topic,prompt\nChef,Cook something\n");
        let store = RecordStore::load(&path).unwrap();
        assert_eq!(store.records(), &[PromptRecord::new("Chef", "Cook something")]);
    }

    #[test]
    fn test_write_then_load_preserves_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("prompts.csv");
        let store = RecordStore::from_records(vec![
            PromptRecord::new("Poet", "Write a poem,\nwith a line break")
                .with_contributor("octocat")
                .with_link("https://github.com/octocat"),
            PromptRecord::new("Chef", "Cook"),
        ]);

        store.write_csv(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("topic,prompt,contributor,link\n"));

        let reloaded = RecordStore::load(&path).unwrap();
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn test_write_empty_store_still_has_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        RecordStore::default().write_csv(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "topic,prompt,contributor,link\n"
        );
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let store = sample_store();
        let lower = store.find("linux");
        let upper = store.find("LINUX");
        assert_eq!(lower.len(), 2);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_find_exact_requires_equality() {
        let store = sample_store();
        assert!(store.find_exact("linux terminal").is_empty());
        assert_eq!(store.find_exact("English Translator").len(), 1);
    }

    #[test]
    fn test_find_preserves_source_order() {
        let store = sample_store();
        let found = store.find("terminal");
        assert_eq!(found[0].prompt, "I want you to act as a linux terminal.");
        assert_eq!(found[1].prompt, "Duplicate rows are allowed.");
    }
}
