//! Presentation seam for import runs
//!
//! The driver never prints. It asks a [`Reporter`] for the pre-flight
//! confirmation and hands it a [`RunOutcome`] at the end; the CLI plugs in a
//! [`ConsoleReporter`], non-interactive callers use [`AutoConfirm`].

use crate::error::IndexerError;
use crate::types::RunSummary;
use std::io::{BufRead, Stdin, Stdout, Write};

/// Question asked before an import starts
pub const SANITATION_PROMPT: &str =
    "Have you removed line breaks for message node and SAVED the file?";

/// Structured result of an import run
#[derive(Debug)]
pub enum RunOutcome {
    /// At least one record was exported
    Imported(RunSummary),
    /// The run finished cleanly but nothing was exported
    NothingImported(RunSummary),
    /// The user declined the pre-flight confirmation
    Cancelled,
    Failed(IndexerError),
}

impl RunOutcome {
    pub fn from_result(result: Result<RunSummary, IndexerError>) -> Self {
        match result {
            Ok(summary) if summary.cancelled => RunOutcome::Cancelled,
            Ok(summary) if summary.exported == 0 => RunOutcome::NothingImported(summary),
            Ok(summary) => RunOutcome::Imported(summary),
            Err(err) => RunOutcome::Failed(err),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failed(_))
    }

    /// Human-readable one-paragraph description
    pub fn message(&self) -> String {
        match self {
            RunOutcome::Imported(summary) => {
                let mut message = format!(
                    "Imported {} commit information successfully!",
                    summary.exported
                );
                if summary.suppressed_merges > 0 {
                    message.push_str(&format!(
                        " ({} merge commits skipped)",
                        summary.suppressed_merges
                    ));
                }
                message
            }
            RunOutcome::NothingImported(_) => {
                "No identifiable commit information present. Please use valid log file!"
                    .to_string()
            }
            RunOutcome::Cancelled => "Import cancelled, nothing was written.".to_string(),
            RunOutcome::Failed(err) => err.to_report_string(),
        }
    }
}

/// Receives confirmation requests and final outcomes from the driver
pub trait Reporter {
    /// Ask a yes/no question; `true` means proceed
    fn confirm(&mut self, question: &str) -> bool;

    fn report(&mut self, outcome: &RunOutcome);
}

/// Reporter that answers every question with yes and logs the outcome
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl Reporter for AutoConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        tracing::debug!("Auto-confirming: {}", question);
        true
    }

    fn report(&mut self, outcome: &RunOutcome) {
        if outcome.is_failure() {
            tracing::error!("{}", outcome.message());
        } else {
            tracing::info!("{}", outcome.message());
        }
    }
}

/// Reporter that prompts on a reader and prints to a writer
pub struct ConsoleReporter<R, W> {
    input: R,
    output: W,
}

impl ConsoleReporter<std::io::StdinLock<'static>, Stdout> {
    /// Prompt on stdin, print to stdout
    pub fn stdio() -> Self {
        let stdin: Stdin = std::io::stdin();
        Self::new(stdin.lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleReporter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Reporter for ConsoleReporter<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        if write!(self.output, "{} [y/N]: ", question).is_err() || self.output.flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }

    fn report(&mut self, outcome: &RunOutcome) {
        if let Err(e) = writeln!(self.output, "{}", outcome.message()) {
            tracing::warn!("Failed to write run outcome: {}", e);
        }
    }
}
