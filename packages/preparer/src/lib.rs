//! TMX Preparer - Extract per-language texts from TMX translation memories.
//!
//! This crate turns TMX documents into one `.prepared` text per language
//! variant, ready for a linguistic annotation pipeline, plus a metadata table
//! describing every text.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use tmx_preparer::config;
//!
//! assert!(config::is_document_name("novel.tmx"));
//! assert_eq!(
//!     config::prepared_path(Path::new("corpus/novel.tmx"), "gb", "en"),
//!     Path::new("corpus/novel.tmx_gb_en.prepared")
//! );
//! ```
//!
//! # Architecture
//!
//! A batch runs in two passes over its documents: the first collects every
//! descriptor attribute name, the second reads and extracts each document
//! against that set.
//!
//! - [`config`]: Constants and path helpers
//! - [`error`]: Error types and Result alias
//! - [`types`]: Records, attribute sets and reports
//! - [`loader`]: Decoding, normalization and parsing
//! - [`filter`]: Length filters applied before parsing
//! - [`xml`]: XML navigation helpers
//! - [`metadata`]: Attribute discovery, record reading, retranslation detection
//! - [`text`]: Quote normalization and `.prepared` text assembly
//! - [`extract`]: Segment extraction and alignment validation
//! - [`confirm`]: Policies for empty extractions
//! - [`writer`]: Output files and the metadata table
//! - [`pipeline`]: The batch driver
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod extract;
pub mod filter;
pub mod loader;
pub mod metadata;
pub mod pipeline;
pub mod text;
pub mod types;
pub mod writer;
pub mod xml;

// Re-export main functions
pub use pipeline::{run_batch, BatchOptions};

// Re-export commonly used items
pub use confirm::{AbortOnEmpty, ContinueOnEmpty, Decision, EmptyExtractionHandler, PromptOnEmpty};
pub use error::{PreparerError, Result};
pub use types::{AttributeSet, BatchReport, DocumentReport, MetadataRecord, SegmentCounts};
