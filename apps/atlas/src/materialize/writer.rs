use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::models::{PromptRecord, Topic};
use crate::store::RecordStore;

const HEADER_RULE_WIDTH: usize = 20;
const PROFILE_BASE_URL: &str = "https://www.github.com";

/// How a topic already present in its output file is detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateGuard {
    /// A `<!-- prompt-atlas: <topic> -->` line is written after a topic's blocks.
    /// Files without a marker count as written when a line is exactly `## <topic>`.
    #[default]
    Marker,
    /// Skip when `## <topic>` appears anywhere in the file. Coarse: unrelated text can
    /// trigger a skip.
    Containment,
}

impl DuplicateGuard {
    fn already_written(self, topic: &Topic, contents: &str) -> bool {
        match self {
            DuplicateGuard::Marker => {
                let marker = marker_line(topic);
                let heading = format!("## {topic}");
                contents
                    .lines()
                    .map(str::trim_end)
                    .any(|line| line == marker || line == heading)
            }
            DuplicateGuard::Containment => contents.contains(&format!("## {topic}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopicStatus {
    Appended { count: usize },
    DuplicateTopic,
    NoMatches,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicOutcome {
    pub topic: String,
    pub file: PathBuf,
    /// The file did not exist before this run.
    pub created: bool,
    pub status: TopicStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterializeReport {
    pub outcomes: Vec<TopicOutcome>,
}

impl MaterializeReport {
    pub fn appended_blocks(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                TopicStatus::Appended { count } => count,
                _ => 0,
            })
            .sum()
    }

    pub fn duplicates(&self) -> usize {
        self.count_where(|s| matches!(s, TopicStatus::DuplicateTopic))
    }

    pub fn failures(&self) -> usize {
        self.count_where(|s| matches!(s, TopicStatus::Failed { .. }))
    }

    pub fn unmatched(&self) -> usize {
        self.count_where(|s| matches!(s, TopicStatus::NoMatches))
    }

    fn count_where(&self, f: impl Fn(&TopicStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| f(&o.status)).count()
    }
}

/// Writes every topic's matching records into `<output_dir>/<slug>.md`, in topic order.
/// A failure on one topic is recorded in the report and does not stop the others.
pub fn materialize(
    topics: &[Topic],
    store: &RecordStore,
    output_dir: &Path,
    guard: DuplicateGuard,
) -> Result<MaterializeReport, AppError> {
    fs::create_dir_all(output_dir)?;

    let mut report = MaterializeReport::default();
    for topic in topics {
        let file = topic.path_in(output_dir);
        let created = !file.exists();

        let status = match materialize_topic(topic, store, &file, guard) {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to populate {}: {e}", file.display());
                TopicStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        report.outcomes.push(TopicOutcome {
            topic: topic.to_string(),
            file,
            created,
            status,
        });
    }

    info!(
        "Materialized {} topics: {} blocks appended, {} duplicates, {} unmatched, {} failed",
        report.outcomes.len(),
        report.appended_blocks(),
        report.duplicates(),
        report.unmatched(),
        report.failures()
    );
    Ok(report)
}

fn materialize_topic(
    topic: &Topic,
    store: &RecordStore,
    file: &Path,
    guard: DuplicateGuard,
) -> Result<TopicStatus, AppError> {
    if !file.exists() {
        debug!("Creating {}", file.display());
        fs::write(file, render_header(topic))?;
    }

    let contents = fs::read_to_string(file)?;
    if guard.already_written(topic, &contents) {
        info!("Topic '{topic}' already in {}", file.display());
        return Ok(TopicStatus::DuplicateTopic);
    }

    let matches = store.find(topic.as_str());
    if matches.is_empty() {
        debug!("No records match topic '{topic}'");
        return Ok(TopicStatus::NoMatches);
    }

    let mut text = String::new();
    if !contents.is_empty() && !contents.ends_with('\n') {
        text.push('\n');
    }
    for record in &matches {
        text.push_str(&render_block(topic, record));
    }
    if guard == DuplicateGuard::Marker {
        text.push_str(&marker_line(topic));
        text.push_str("\n\n");
    }

    let mut out = OpenOptions::new().append(true).open(file)?;
    out.write_all(text.as_bytes())?;

    Ok(TopicStatus::Appended {
        count: matches.len(),
    })
}

pub(crate) fn render_header(topic: &Topic) -> String {
    format!(
        "# Prompts related to: {topic}\n\n{}\n\n",
        "-".repeat(HEADER_RULE_WIDTH)
    )
}

/// One appended block: heading, contributor line, quoted prompt, blank line.
pub(crate) fn render_block(topic: &Topic, record: &PromptRecord) -> String {
    let contributor = match record.contributor.as_deref() {
        Some(name) => format!("Contributed by: [{name}]({PROFILE_BASE_URL}/{name})"),
        None => "Contributed by: None".to_string(),
    };

    let quoted: Vec<String> = record
        .prompt
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect();

    format!("## {topic}\n{contributor}\n{}\n\n", quoted.join("\n"))
}

fn marker_line(topic: &Topic) -> String {
    format!("<!-- prompt-atlas: {topic} -->")
}
