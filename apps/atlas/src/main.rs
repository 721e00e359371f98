mod cli;
mod commands;
mod config;
mod errors;
mod extract;
mod llm_client;
mod materialize;
mod models;
mod readme;
mod search;
mod store;

use std::future::Future;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::errors::AppError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // stdout carries prompts and reports; logs go to stderr.
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        config.rust_log.as_str()
    };
    let directive = format!("{}={}", env!("CARGO_CRATE_NAME"), level);
    let filter = if cli.verbose || cli.quiet {
        EnvFilter::new(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("prompt-atlas v{}", env!("CARGO_PKG_VERSION"));

    let interrupt = async {
        // Without a signal handler, never resolve and let the command finish.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    match drive(commands::run(cli.command, &config), interrupt).await? {
        Exit::Completed => Ok(()),
        Exit::Cancelled => {
            println!("\n{}.", AppError::UserInterrupt);
            Ok(())
        }
        Exit::Interrupted => {
            info!("Interrupted");
            println!("\nScript interrupted by the user.");
            // A blocking stdin read may still be parked; exit instead of waiting on it.
            std::process::exit(0);
        }
    }
}

/// How a command run ended when it did not fail.
#[derive(Debug, PartialEq, Eq)]
enum Exit {
    Completed,
    /// The command itself saw end of input at a prompt.
    Cancelled,
    /// Ctrl-C arrived before the command finished.
    Interrupted,
}

/// Races a command against the interrupt signal. The interrupt is polled first so
/// its handler is registered before the command does any work.
async fn drive<W, I>(work: W, interrupt: I) -> Result<Exit, AppError>
where
    W: Future<Output = Result<(), AppError>>,
    I: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = interrupt => Ok(Exit::Interrupted),
        result = work => match result {
            Ok(()) => Ok(Exit::Completed),
            Err(e) if e.is_interrupt() => Ok(Exit::Cancelled),
            Err(e) => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::future::{pending, ready};
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_finished_command_completes() {
        let exit = drive(ready(Ok(())), pending()).await.unwrap();
        assert_eq!(exit, Exit::Completed);
    }

    #[tokio::test]
    async fn test_end_of_input_is_a_clean_cancel() {
        let exit = drive(ready(Err(AppError::UserInterrupt)), pending())
            .await
            .unwrap();
        assert_eq!(exit, Exit::Cancelled);
    }

    #[tokio::test]
    async fn test_signal_interrupts_running_command() {
        let exit = drive(pending(), ready(())).await.unwrap();
        assert_eq!(exit, Exit::Interrupted);
    }

    #[tokio::test]
    async fn test_signal_interrupts_blocking_file_work() {
        let work = async {
            tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_millis(200)))
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
            Ok(())
        };
        let interrupt = tokio::time::sleep(Duration::from_millis(10));
        let exit = drive(work, interrupt).await.unwrap();
        assert_eq!(exit, Exit::Interrupted);
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let err = drive(
            ready(Err(AppError::SourceNotFound(PathBuf::from("missing.csv")))),
            pending(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::SourceNotFound(_)));
    }
}
