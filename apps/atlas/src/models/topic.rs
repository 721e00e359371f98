use std::fmt;
use std::path::{Path, PathBuf};

/// A category label. Used as a CSV column value and as an output file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Recovers a topic from an output file name (`Linux_Terminal.md` -> `Linux Terminal`).
    pub fn from_file_stem(stem: &str) -> Self {
        Self(stem.trim_end_matches(".md").replace('_', " "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.md", slugify(&self.0))
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a topic to a filesystem-safe stem: every character outside `[A-Za-z0-9_.]`
/// (spaces included) becomes one underscore. Idempotent.
pub fn slugify(topic: &str) -> String {
    topic
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
