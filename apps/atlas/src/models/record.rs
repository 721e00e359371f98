use serde::{Deserialize, Serialize};

/// One prompt row, sourced from CSV or extracted from markdown.
/// Duplicate (topic, prompt) pairs are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// The "act" column in the published dataset.
    #[serde(alias = "act")]
    pub topic: String,
    pub prompt: String,
    #[serde(default)]
    pub contributor: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl PromptRecord {
    pub fn new(topic: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            prompt: prompt.into(),
            contributor: None,
            link: None,
        }
    }

    pub fn with_contributor(mut self, contributor: impl Into<String>) -> Self {
        self.contributor = Some(contributor.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Blank optional cells are treated as missing.
    pub(crate) fn normalized(mut self) -> Self {
        self.contributor = self.contributor.filter(|c| !c.trim().is_empty());
        self.link = self.link.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn topic_contains(&self, needle_lower: &str) -> bool {
        self.topic.to_lowercase().contains(needle_lower)
    }
}
