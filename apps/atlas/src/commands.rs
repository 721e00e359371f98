use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use tracing::{info, warn};

use crate::cli::{AskArgs, Commands, ExtractArgs, FindArgs, MaterializeArgs, ReadmeArgs};
use crate::config::Config;
use crate::errors::AppError;
use crate::extract::{extract_sections, Extraction};
use crate::llm_client::prompts::{build_user_message, ROLE_PLAY_SYSTEM};
use crate::llm_client::{ChatBackend, LlmClient};
use crate::materialize::{load_topic_list, materialize, topics_from_dir, TopicStatus};
use crate::models::PromptRecord;
use crate::readme::{generate_readme, ReadmeSources};
use crate::search::terminal::Session;
use crate::search::{search, SearchMode, SearchOutcome};
use crate::store::RecordStore;

pub async fn run(command: Commands, config: &Config) -> Result<(), AppError> {
    match command {
        Commands::Find(args) => find(args, config).await,
        Commands::Extract(args) => blocking(move || extract(args)).await,
        Commands::Materialize(args) => {
            let config = config.clone();
            blocking(move || materialize_topics(args, &config)).await
        }
        Commands::Readme(args) => {
            let config = config.clone();
            blocking(move || readme(args, &config)).await
        }
        Commands::Ask(args) => ask(args, config).await,
    }
}

/// Runs synchronous file work on the blocking pool so the runtime keeps polling Ctrl-C.
async fn blocking<F>(work: F) -> Result<(), AppError>
where
    F: FnOnce() -> Result<(), AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

async fn find(args: FindArgs, config: &Config) -> Result<(), AppError> {
    let store = load_store(resolve_csv(args.csv, config))?;
    let mode = args.mode;

    // Blocking stdin runs off the runtime thread so Ctrl-C stays observable.
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        let mut session = Session::new(stdin.lock(), io::stdout().lock(), interactive);
        session.run(&store, mode).map(|_| ())
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
}

fn extract(args: ExtractArgs) -> Result<(), AppError> {
    let Extraction { records, skipped } = extract_file(&args.markdown)?;
    let store = RecordStore::from_records(records);

    println!(
        "Extracted {} records ({} sections skipped)",
        store.len(),
        skipped.len()
    );
    if args.report {
        let json =
            serde_json::to_string_pretty(&skipped).map_err(|e| AppError::Internal(e.into()))?;
        println!("{json}");
    }

    if let Some(out) = args.out {
        store.write_csv(&out)?;
        println!("Wrote {}", out.display());
    }
    Ok(())
}

fn materialize_topics(args: MaterializeArgs, config: &Config) -> Result<(), AppError> {
    let out_dir = args.out.unwrap_or_else(|| config.topics_dir.clone());
    let store = load_store(resolve_csv(args.source, config))?;
    if store.is_empty() {
        warn!("No prompt records loaded; every topic will report no prompts");
    }

    let topics = match args.topics {
        Some(list) => load_topic_list(&list)?,
        None => topics_from_dir(&out_dir)?,
    };

    let report = materialize(&topics, &store, &out_dir, args.guard)?;
    for outcome in &report.outcomes {
        if let TopicStatus::Failed { reason } = &outcome.status {
            println!("failed: {} ({reason})", outcome.topic);
        }
    }
    println!(
        "{} topics: {} blocks appended, {} already present, {} without prompts, {} failed",
        report.outcomes.len(),
        report.appended_blocks(),
        report.duplicates(),
        report.unmatched(),
        report.failures()
    );
    Ok(())
}

fn readme(args: ReadmeArgs, config: &Config) -> Result<(), AppError> {
    let topic_dirs = if args.topics_dirs.is_empty() {
        vec![config.topics_dir.clone()]
    } else {
        args.topics_dirs
    };
    let sources = ReadmeSources {
        docs_dir: args.docs.unwrap_or_else(|| config.docs_dir.clone()),
        topic_dirs,
    };

    let badges = generate_readme(&sources, &args.out)?;
    println!("Wrote {} ({badges} topic badges)", args.out.display());
    Ok(())
}

async fn ask(args: AskArgs, config: &Config) -> Result<(), AppError> {
    let store = load_store(resolve_csv(args.csv, config))?;
    let api_key = config.require_api_key()?.to_string();
    let client = LlmClient::new(api_key, config.openai_model.clone())
        .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {e}")))?;
    info!("Asking {} with prompt for '{}'", client.model(), args.term);

    let reply = ask_with(&client, &store, &args.term, args.message.as_deref()).await?;
    println!("{reply}");
    Ok(())
}

/// Resolves `term` to one prompt and sends it, with `message`, to `backend`.
pub async fn ask_with(
    backend: &dyn ChatBackend,
    store: &RecordStore,
    term: &str,
    message: Option<&str>,
) -> Result<String, AppError> {
    let record = resolve_single(store, term)?;
    let user = build_user_message(&record.prompt, message);
    backend
        .complete(ROLE_PLAY_SYSTEM, &user)
        .await
        .map_err(|e| AppError::Llm(format!("Chat completion failed: {e}")))
}

/// Exact topic match first, then a unique substring match.
fn resolve_single<'a>(store: &'a RecordStore, term: &str) -> Result<&'a PromptRecord, AppError> {
    for mode in [SearchMode::Exact, SearchMode::Substring] {
        match search(store, term, mode) {
            SearchOutcome::Single(record) => return Ok(record),
            SearchOutcome::Multiple(candidates) if mode == SearchMode::Substring => {
                return Err(AppError::Internal(anyhow!(
                    "'{term}' matches {} prompts; use a more specific term",
                    candidates.len()
                )));
            }
            _ => {}
        }
    }
    Err(AppError::Internal(anyhow!(
        "{}",
        crate::search::not_found_message(term)
    )))
}

/// A `.md` source is extracted on the fly; anything else is read as CSV.
fn load_store(path: PathBuf) -> Result<RecordStore, AppError> {
    if path.extension().and_then(|e| e.to_str()) == Some("md") {
        return Ok(RecordStore::from_records(extract_file(&path)?.records));
    }
    RecordStore::load(&path)
}

fn extract_file(path: &Path) -> Result<Extraction, AppError> {
    if !path.exists() {
        return Err(AppError::SourceNotFound(path.to_path_buf()));
    }
    let extraction = extract_sections(&fs::read_to_string(path)?);
    if !extraction.skipped.is_empty() {
        warn!(
            "{}: skipped {} malformed sections",
            path.display(),
            extraction.skipped.len()
        );
    }
    Ok(extraction)
}

fn resolve_csv(explicit: Option<PathBuf>, config: &Config) -> PathBuf {
    explicit
        .or_else(|| config.prompts_csv.clone())
        .or_else(RecordStore::default_source)
        .unwrap_or_else(|| PathBuf::from("prompts.csv"))
}
