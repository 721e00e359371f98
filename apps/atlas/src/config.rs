use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_TOPICS_DIR: &str = "./data/prompts/specific_topics";
const DEFAULT_DOCS_DIR: &str = "./docs";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Application configuration loaded from environment variables.
/// Everything has a default except the API key, which is only demanded by `ask`.
#[derive(Debug, Clone)]
pub struct Config {
    pub prompts_csv: Option<PathBuf>,
    pub topics_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            prompts_csv: optional_env("PROMPT_ATLAS_CSV").map(PathBuf::from),
            topics_dir: optional_env("PROMPT_ATLAS_TOPICS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOPICS_DIR)),
            docs_dir: optional_env("PROMPT_ATLAS_DOCS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR)),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: optional_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("Required environment variable 'OPENAI_API_KEY' is not set")
    }
}

/// Treats set-but-blank variables the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
