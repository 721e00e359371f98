use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type.
/// Only source-level failures abort a run; per-section and per-topic problems are
/// reported as data by the extractor and the materializer instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Invalid selection {choice}: expected a number between 1 and {max}")]
    InvalidSelection { choice: usize, max: usize },

    #[error("Operation cancelled by the user")]
    UserInterrupt,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Interrupts end the process cleanly rather than as a failure.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, AppError::UserInterrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selection_message_names_range() {
        let err = AppError::InvalidSelection { choice: 4, max: 3 };
        assert_eq!(
            err.to_string(),
            "Invalid selection 4: expected a number between 1 and 3"
        );
    }

    #[test]
    fn test_only_user_interrupt_is_interrupt() {
        assert!(AppError::UserInterrupt.is_interrupt());
        assert!(!AppError::SourceNotFound(PathBuf::from("x.csv")).is_interrupt());
    }
}
