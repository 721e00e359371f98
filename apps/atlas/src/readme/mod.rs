//! README assembly: a static head, a badge per topic file, and a static tail.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::AppError;

const HEAD_SECTION: &str = "section_1.md";
const TAIL_SECTION: &str = "section_3.md";

/// shields.io named colors, cycled by badge position so output is stable across runs.
const BADGE_COLORS: &[&str] = &[
    "brightgreen",
    "green",
    "yellowgreen",
    "darkred",
    "lightblue",
    "darkgreen",
    "purple",
    "yellow",
    "orange",
    "red",
    "blue",
    "lightgrey",
    "success",
    "important",
    "critical",
    "informational",
    "inactive",
    "blueviolet",
    "ff69b4",
    "9cf",
];

#[derive(Debug, Clone)]
pub struct ReadmeSources {
    pub docs_dir: PathBuf,
    pub topic_dirs: Vec<PathBuf>,
}

/// One badge per `*.md` file across `dirs`, deduplicated by badge text.
/// Links are relative to `base`, the directory the README lives in.
pub fn collect_badges(dirs: &[PathBuf], base: &Path) -> Result<Vec<String>, AppError> {
    let mut seen = HashSet::new();
    let mut badges = Vec::new();

    for dir in dirs {
        if !dir.is_dir() {
            return Err(AppError::SourceNotFound(dir.clone()));
        }

        let mut names: Vec<String> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".md"))
            .collect();
        names.sort();
        let link = link_dir(dir, base);

        for name in names {
            let text = name.trim_end_matches(".md").replace(' ', "_");
            if !seen.insert(text.clone()) {
                continue;
            }
            let color = BADGE_COLORS[badges.len() % BADGE_COLORS.len()];
            badges.push(render_badge(&text, color, &link));
        }
    }

    debug!("Collected {} badges", badges.len());
    Ok(badges)
}

fn render_badge(text: &str, color: &str, link_dir: &str) -> String {
    // shields.io reads a single dash as the label/color separator.
    let label = text.replace('-', "--");
    format!("[![{text}](https://img.shields.io/badge/{label}-{color})]({link_dir}/{text}.md)")
}

/// `dir` as a `/`-separated link from `base`. Falls back to the absolute path when
/// the two share no root.
fn link_dir(dir: &Path, base: &Path) -> String {
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    let base = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());

    let rel = match pathdiff::diff_paths(&dir, &base) {
        Some(rel) if !rel.is_absolute() => rel,
        _ => return dir.display().to_string(),
    };
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    match parts.first().map(String::as_str) {
        None => ".".to_string(),
        Some("..") => parts.join("/"),
        Some(_) => format!("./{}", parts.join("/")),
    }
}

pub fn render_readme(head: &str, badges: &[String], tail: &str) -> String {
    format!("{head}\n\n{}{tail}\n", badges.join("\n "))
}

/// Rebuilds `out` from the docs sections and the topic tree. The file is replaced atomically.
pub fn generate_readme(sources: &ReadmeSources, out: &Path) -> Result<usize, AppError> {
    let head = read_section(&sources.docs_dir.join(HEAD_SECTION))?;
    let tail = read_section(&sources.docs_dir.join(TAIL_SECTION))?;
    let parent = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let badges = collect_badges(&sources.topic_dirs, parent)?;

    let readme = render_readme(&head, &badges, &tail);

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(readme.as_bytes())?;
    tmp.persist(out).map_err(|e| AppError::Io(e.error))?;

    info!("Wrote {} with {} badges", out.display(), badges.len());
    Ok(badges.len())
}

fn read_section(path: &Path) -> Result<String, AppError> {
    if !path.exists() {
        return Err(AppError::SourceNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}
