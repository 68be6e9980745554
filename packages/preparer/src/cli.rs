//! Command-line interface for the preparer.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::DEFAULT_METADATA_FILE;
use crate::confirm::{
    AbortOnEmpty, ContinueOnEmpty, Decision, EmptyExtraction, EmptyExtractionHandler,
    PromptOnEmpty,
};
use crate::error::Result;
use crate::pipeline::{run_batch, BatchOptions, BatchProgress};
use crate::types::BatchReport;

/// TMX Preparer - Extract per-language texts from TMX translation memories.
#[derive(Parser)]
#[command(name = "tmx-preparer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TMX file, or directory whose `*tmx` files are processed
    pub source: PathBuf,

    /// Directory the annotated texts will be written to (used for the filename column)
    pub destination: PathBuf,

    /// Path of the metadata table
    #[arg(short, long, default_value = DEFAULT_METADATA_FILE)]
    pub metadata: PathBuf,

    /// What to do when a text yields no segments
    #[arg(long, value_enum, default_value_t = OnEmpty::Prompt)]
    pub on_empty: OnEmpty,

    /// Drop translation units with a variant longer than N characters
    #[arg(long, value_name = "N")]
    pub max_segment_chars: Option<usize>,
}

/// Policy for texts that yield no segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnEmpty {
    /// Ask on the terminal
    Prompt,
    /// Stop the batch
    Abort,
    /// Warn and continue
    Continue,
}

impl OnEmpty {
    fn handler(self) -> Box<dyn EmptyExtractionHandler> {
        match self {
            OnEmpty::Prompt => Box::new(PromptOnEmpty::new()),
            OnEmpty::Abort => Box::new(AbortOnEmpty),
            OnEmpty::Continue => Box::new(ContinueOnEmpty),
        }
    }
}

/// Hides the progress bar while a handler talks to the terminal.
struct Suspended<'a> {
    inner: Box<dyn EmptyExtractionHandler>,
    progress: &'a ProgressBar,
}

impl EmptyExtractionHandler for Suspended<'_> {
    fn on_empty(&mut self, warning: &EmptyExtraction<'_>) -> Decision {
        let Self { inner, progress } = self;
        progress.suspend(|| inner.on_empty(warning))
    }
}

impl BatchProgress for ProgressBar {
    fn discovering(&mut self, index: usize, total: usize, path: &Path) {
        self.set_length(total as u64);
        self.set_position(index as u64);
        self.set_message(format!("Reading metadata of {}", file_label(path)));
    }

    fn extracting(&mut self, index: usize, total: usize, path: &Path) {
        self.set_length(total as u64);
        self.set_position(index as u64);
        self.set_message(format!("Extracting {}", file_label(path)));
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    prepare_command(&cli)
}

/// Execute a batch as configured on the command line.
fn prepare_command(cli: &Cli) -> Result<()> {
    let options = BatchOptions::new(&cli.destination)
        .with_metadata_path(&cli.metadata)
        .with_max_segment_chars(cli.max_segment_chars);

    println!(
        "{} {} into {}",
        style("Preparing").bold(),
        style(cli.source.display()).cyan(),
        style(cli.destination.display()).green()
    );
    println!();

    let mut pb = ProgressBar::new(0);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{pos}/{len}] {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let prompt_bar = pb.clone();
    let mut handler = Suspended {
        inner: cli.on_empty.handler(),
        progress: &prompt_bar,
    };

    let report = match run_batch(&cli.source, &options, &mut handler, &mut pb) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();
    print_summary(&report);

    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!("  Documents: {}", report.documents);
    println!("  Texts: {}", report.records.len());
    println!("  Prepared files: {}", report.files_written);
    let skipped = report.records.len() - report.files_written;
    if skipped > 0 {
        println!("  Empty texts: {}", style(skipped).yellow().bold());
    }

    println!();
    println!(
        "{} {}",
        style("Metadata saved to:").green().bold(),
        report.metadata_path.display()
    );
}
