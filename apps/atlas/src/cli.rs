use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::materialize::DuplicateGuard;
use crate::search::SearchMode;

#[derive(Parser)]
#[command(name = "prompt-atlas")]
#[command(about = "Search a prompt collection and keep its per-topic markdown tree in sync", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a prompt by its act/topic (term read from stdin)
    Find(FindArgs),

    /// Extract prompt records from a `## `-sectioned markdown document
    Extract(ExtractArgs),

    /// Append matching prompts to one markdown file per topic
    Materialize(MaterializeArgs),

    /// Rebuild the README from docs sections and the topic tree
    Readme(ReadmeArgs),

    /// Send a prompt from the collection to the chat API and print the reply
    Ask(AskArgs),
}

#[derive(Args)]
pub struct FindArgs {
    /// Prompt table (defaults to PROMPT_ATLAS_CSV, ../prompts.csv, ./prompts.csv)
    pub csv: Option<PathBuf>,

    /// How the term is matched against topics
    #[arg(long, value_enum, default_value_t = SearchMode::Substring)]
    pub mode: SearchMode,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Markdown document to read
    pub markdown: PathBuf,

    /// Write the extracted records to this CSV file
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print skipped sections as JSON
    #[arg(long)]
    pub report: bool,
}

#[derive(Args)]
pub struct MaterializeArgs {
    /// Prompt source: a CSV table, or a markdown document (`.md`) to extract first
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Newline-delimited topic list
    #[arg(long, conflicts_with = "from_dir", required_unless_present = "from_dir")]
    pub topics: Option<PathBuf>,

    /// Take the topics from the `*.md` files already in the output directory
    #[arg(long)]
    pub from_dir: bool,

    /// Output directory (defaults to PROMPT_ATLAS_TOPICS_DIR)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Duplicate detection strategy
    #[arg(long, value_enum, default_value_t = DuplicateGuard::Marker)]
    pub guard: DuplicateGuard,
}

#[derive(Args)]
pub struct ReadmeArgs {
    /// Directory holding section_1.md and section_3.md (defaults to PROMPT_ATLAS_DOCS_DIR)
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Topic directories to badge, in order (defaults to PROMPT_ATLAS_TOPICS_DIR)
    #[arg(long = "topics-dir")]
    pub topics_dirs: Vec<PathBuf>,

    /// README path to write
    #[arg(long, default_value = "README.md")]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct AskArgs {
    /// Act/topic of the prompt to send; must resolve to a single prompt
    pub term: String,

    /// Follow-up message appended after the prompt
    pub message: Option<String>,

    /// Prompt table (defaults to PROMPT_ATLAS_CSV, ../prompts.csv, ./prompts.csv)
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
