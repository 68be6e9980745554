//! Error types for the preparer.
//!
//! Every variant except `Io` and `Csv` maps to one failure class of the
//! pipeline. All of them are fatal for the batch: the driver never skips a
//! document, so a batch either completes or leaves no metadata table behind.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the preparer library.
#[derive(Debug, Error)]
pub enum PreparerError {
    /// Source document could not be decoded as text.
    #[error("Encoding problem in {}: could not decode as text (convert it to UTF-8)", .path.display())]
    Encoding { path: PathBuf },

    /// Normalized document text is not well-formed XML.
    #[error("XML parsing failed for {label}: {source}")]
    Parse {
        label: String,
        #[source]
        source: roxmltree::Error,
    },

    /// A record matched no aligned segments and the operator chose to stop.
    #[error("Empty extraction for text {code} in {document} (language: {lang})")]
    EmptyExtraction {
        document: String,
        lang: String,
        code: String,
    },

    /// Records of one document yielded different segment counts.
    #[error("ABORTING: different number of segments in the texts of {document} ({counts})")]
    Alignment { document: String, counts: String },

    /// Source path does not exist.
    #[error("Source path does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Source directory contains no TMX documents.
    #[error("No TMX documents found in {}", .0.display())]
    NoDocuments(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata table serialization error.
    #[error("CSV writing failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for preparer operations.
pub type Result<T> = std::result::Result<T, PreparerError>;
