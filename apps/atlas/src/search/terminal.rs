use std::io::{BufRead, Write};

use tracing::debug;

use super::{format_choices, not_found_message, search, select, SearchMode, SearchOutcome};
use crate::errors::AppError;
use crate::store::RecordStore;

const TERM_PROMPT: &str = "Enter the ACT to search for: ";
const CHOICE_PROMPT: &str = "Select a prompt number: ";

/// Line-oriented adapter between a terminal (or pipe) and the search protocol.
pub struct Session<R, W> {
    input: R,
    output: W,
    /// Print prompts before reading. Off when stdin is piped.
    interactive: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    /// Reads a term, resolves it and prints the selected prompt.
    /// Returns `None` when nothing matched.
    pub fn run(&mut self, store: &RecordStore, mode: SearchMode) -> Result<Option<String>, AppError> {
        let term = self.ask(TERM_PROMPT)?;
        debug!("Searching for '{term}' ({mode:?})");

        let prompt = match search(store, &term, mode) {
            SearchOutcome::NotFound => {
                writeln!(self.output, "{}", not_found_message(&term))?;
                return Ok(None);
            }
            SearchOutcome::Single(record) => record.prompt.clone(),
            SearchOutcome::Multiple(candidates) => {
                write!(self.output, "{}", format_choices(&candidates))?;
                loop {
                    let answer = self.ask(CHOICE_PROMPT)?;
                    let choice = match answer.parse::<usize>() {
                        Ok(n) => n,
                        Err(_) => {
                            writeln!(
                                self.output,
                                "Please enter a number between 1 and {}.",
                                candidates.len()
                            )?;
                            continue;
                        }
                    };
                    match select(&candidates, choice) {
                        Ok(record) => break record.prompt.clone(),
                        Err(e @ AppError::InvalidSelection { .. }) => {
                            writeln!(self.output, "{e}")?;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        };

        writeln!(self.output, "Selected Prompt: {prompt}")?;
        Ok(Some(prompt))
    }

    /// One trimmed line. End of input means the user walked away.
    fn ask(&mut self, prompt: &str) -> Result<String, AppError> {
        // The choice prompt is shown for piped input too, since the list was printed.
        if self.interactive || prompt == CHOICE_PROMPT {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
        }

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::UserInterrupt);
        }
        Ok(line.trim().to_string())
    }
}
