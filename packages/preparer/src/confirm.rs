//! Handling of records whose selection matched no aligned segments.
//!
//! An empty extraction desynchronizes every later join on unit index, so the
//! extractor never moves past one on its own: it asks an
//! [`EmptyExtractionHandler`] whether to continue. The default handler for the
//! command line asks the operator.

use std::fmt;
use std::io;
use std::path::Path;

use console::{style, Term};
use tracing::warn;

use crate::error::PreparerError;

/// A record whose selection query matched nothing.
#[derive(Debug, Clone, Copy)]
pub struct EmptyExtraction<'a> {
    /// Document being extracted.
    pub document: &'a Path,
    /// Language code of the record.
    pub lang: &'a str,
    /// Variant code of the record.
    pub code: &'a str,
}

impl EmptyExtraction<'_> {
    /// Error reported when the batch stops on this warning.
    pub fn into_error(self) -> PreparerError {
        PreparerError::EmptyExtraction {
            document: self.document.display().to_string(),
            lang: self.lang.to_string(),
            code: self.code.to_string(),
        }
    }
}

impl fmt::Display for EmptyExtraction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no segments found for text {} in the file {} (language: {})",
            self.code,
            self.document.display(),
            self.lang
        )
    }
}

/// What to do after an empty extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep going. The record gets no file and a segment count of zero.
    Continue,
    /// Stop the batch.
    Abort,
}

/// Decides whether a batch may continue past an empty extraction.
pub trait EmptyExtractionHandler {
    /// Called before anything is written for the record.
    fn on_empty(&mut self, warning: &EmptyExtraction<'_>) -> Decision;
}

/// Stops the batch on the first empty extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnEmpty;

impl EmptyExtractionHandler for AbortOnEmpty {
    fn on_empty(&mut self, warning: &EmptyExtraction<'_>) -> Decision {
        warn!("Empty extraction, aborting: {warning}");
        Decision::Abort
    }
}

/// Logs the warning and continues.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinueOnEmpty;

impl EmptyExtractionHandler for ContinueOnEmpty {
    fn on_empty(&mut self, warning: &EmptyExtraction<'_>) -> Decision {
        warn!("Empty extraction, continuing: {warning}");
        Decision::Continue
    }
}

/// Asks the operator on the terminal.
///
/// Only an explicit `y` or `yes` continues. Anything else, including a closed
/// or missing terminal, aborts.
#[derive(Debug, Clone)]
pub struct PromptOnEmpty {
    term: Term,
}

impl PromptOnEmpty {
    /// Prompt on standard error.
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn ask(&self, warning: &EmptyExtraction<'_>) -> io::Result<String> {
        self.term.write_line(&format!(
            "{} {warning}",
            style("Warning!").yellow().bold()
        ))?;
        self.term
            .write_str("The prepared texts will not be aligned. Continue anyway? [y/N] ")?;
        self.term.read_line()
    }
}

impl Default for PromptOnEmpty {
    fn default() -> Self {
        Self::new()
    }
}

impl EmptyExtractionHandler for PromptOnEmpty {
    fn on_empty(&mut self, warning: &EmptyExtraction<'_>) -> Decision {
        match self.ask(warning) {
            Ok(answer) => parse_answer(&answer),
            Err(e) => {
                warn!(error = %e, "Cannot prompt for confirmation, aborting");
                Decision::Abort
            }
        }
    }
}

/// Interpret an operator answer.
fn parse_answer(answer: &str) -> Decision {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Decision::Continue,
        _ => Decision::Abort,
    }
}
