use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::AppError;
use crate::models::Topic;

/// Parses a newline-delimited topic list. Quotes and commas are stripped, blank lines dropped.
pub fn parse_topic_list(text: &str) -> Vec<Topic> {
    text.lines()
        .map(|line| line.replace(['"', ','], ""))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .map(Topic::new)
        .collect()
}

pub fn load_topic_list(path: &Path) -> Result<Vec<Topic>, AppError> {
    if !path.exists() {
        return Err(AppError::SourceNotFound(path.to_path_buf()));
    }
    let topics = parse_topic_list(&fs::read_to_string(path)?);
    debug!("Read {} topics from {}", topics.len(), path.display());
    Ok(topics)
}

/// Topics implied by an existing output tree: every `*.md` stem, sorted by file name.
pub fn topics_from_dir(dir: &Path) -> Result<Vec<Topic>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::SourceNotFound(dir.to_path_buf()));
    }

    let mut stems = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();

    Ok(stems.iter().map(|s| Topic::from_file_stem(s)).collect())
}
