//! Markdown Section Extractor — turns a `## `-sectioned prompt document into records.
//!
//! Each section is expected to look like:
//!
//! ```text
//! ## Linux Terminal
//! Contributed by: [@f](https://github.com/f)
//!
//! > I want you to act as a linux terminal.
//! ```
//!
//! The `@` before the handle is optional, so files written by the materializer
//! (`Contributed by: [f](https://www.github.com/f)`) extract with their contributor intact.
//!
//! A section becomes a record only when its title, contributor and prompt counts agree.
//! Everything else is reported back in [`Extraction::skipped`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::models::PromptRecord;

static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## ").unwrap());

static CONTRIBUTOR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Contributed by: \[@?([^\]]+)\]\(([^)]*)\)").unwrap());

/// Why a section was not turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSection {
    /// Zero-based position among the document's sections (preamble excluded).
    pub index: usize,
    pub title: Option<String>,
    pub titles: usize,
    pub contributors: usize,
    pub prompts: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub records: Vec<PromptRecord>,
    pub skipped: Vec<SkippedSection>,
}

/// Splits `markdown` on level-2 headings and extracts one record per well-formed section.
pub fn extract_sections(markdown: &str) -> Extraction {
    let mut extraction = Extraction::default();

    // The first piece is the preamble before any heading.
    for (index, section) in SECTION_HEADING.split(markdown).skip(1).enumerate() {
        let title = section_title(section);
        let contributors = section_contributors(section);
        let prompts = quoted_blocks(section);

        let titles = usize::from(title.is_some());
        if titles == contributors.len() && contributors.len() == prompts.len() {
            let (contributor, link) = contributors.into_iter().next().unwrap_or((None, None));
            let (title, prompt) = match (title, prompts.into_iter().next()) {
                (Some(title), Some(prompt)) => (title, prompt),
                // Titles are at most one, so agreeing counts always match above.
                _ => continue,
            };
            let mut record = PromptRecord::new(title, prompt);
            if let Some(contributor) = contributor {
                record = record.with_contributor(contributor);
            }
            if let Some(link) = link {
                record = record.with_link(link);
            }
            extraction.records.push(record);
        } else {
            debug!(
                "Skipping malformed section {index} ({:?}): titles={titles}, contributors={}, prompts={}",
                title,
                contributors.len(),
                prompts.len()
            );
            extraction.skipped.push(SkippedSection {
                index,
                title,
                titles,
                contributors: contributors.len(),
                prompts: prompts.len(),
            });
        }
    }

    extraction
}

/// First line of the section. A section without a line break has no title.
fn section_title(section: &str) -> Option<String> {
    let (first, _) = section.split_once('\n')?;
    let title = first.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Every contributor line as `(handle, url)`. No contributor line counts as one absent contributor.
fn section_contributors(section: &str) -> Vec<(Option<String>, Option<String>)> {
    let found: Vec<_> = CONTRIBUTOR_LINE
        .captures_iter(section)
        .map(|caps| {
            let handle = caps[1].trim().to_string();
            let url = caps[2].trim();
            (Some(handle), (!url.is_empty()).then(|| url.to_string()))
        })
        .collect();

    if found.is_empty() {
        vec![(None, None)]
    } else {
        found
    }
}

/// Runs of consecutive `>` lines, each run joined into one prompt body.
fn quoted_blocks(section: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in section.lines() {
        match line.strip_prefix('>') {
            Some(rest) => {
                let text = rest.strip_prefix(' ').unwrap_or(rest).trim_end();
                current.get_or_insert_with(Vec::new).push(text);
            }
            None => {
                if let Some(lines) = current.take() {
                    blocks.push(lines.join("\n"));
                }
            }
        }
    }
    if let Some(lines) = current {
        blocks.push(lines.join("\n"));
    }

    blocks
}
