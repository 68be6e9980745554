//! Batch driver: runs discovery over all documents, then extraction per
//! document, then writes the metadata table.
//!
//! Every failure is fatal. Documents are processed in file-name order and the
//! first error stops the batch; `.prepared` files already written stay on
//! disk, but the metadata table is only written once all documents succeed.

use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::config::{is_document_name, validate_source, DEFAULT_METADATA_FILE};
use crate::confirm::EmptyExtractionHandler;
use crate::error::{PreparerError, Result};
use crate::extract::extract_document;
use crate::filter::{LengthFilter, MaxSegmentChars, PassThrough};
use crate::loader::load_document;
use crate::metadata::{discover_attributes, read_metadata};
use crate::types::{AttributeSet, BatchReport, DocumentReport};
use crate::writer::write_metadata;

/// Settings of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Directory the annotation step writes to; used for the `filename` column.
    pub destination: PathBuf,
    /// Where the metadata table is written.
    pub metadata_path: PathBuf,
    /// Drop translation units with a variant longer than this many characters.
    pub max_segment_chars: Option<usize>,
}

impl BatchOptions {
    /// Options with the default metadata file and no length limit.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            metadata_path: PathBuf::from(DEFAULT_METADATA_FILE),
            max_segment_chars: None,
        }
    }

    /// Set the metadata table path.
    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }

    /// Set the segment length limit.
    pub fn with_max_segment_chars(mut self, limit: Option<usize>) -> Self {
        self.max_segment_chars = limit;
        self
    }

    /// Length filter applied to every loaded document.
    pub fn filter(&self) -> Box<dyn LengthFilter> {
        match self.max_segment_chars {
            Some(limit) => Box::new(MaxSegmentChars::new(limit)),
            None => Box::new(PassThrough),
        }
    }
}

/// Progress notifications of a batch. All methods default to doing nothing.
pub trait BatchProgress {
    /// A document is about to be scanned for descriptor attributes.
    fn discovering(&mut self, _index: usize, _total: usize, _path: &Path) {}

    /// A document is about to be extracted.
    fn extracting(&mut self, _index: usize, _total: usize, _path: &Path) {}
}

impl BatchProgress for () {}

/// List the documents of a source.
///
/// A file is its own batch. For a directory, every regular, non-hidden file
/// directly in it whose name ends in `tmx` is returned, sorted by name.
///
/// # Errors
/// * `PreparerError::SourceNotFound` if `source` does not exist
/// * `PreparerError::NoDocuments` if a directory holds no documents
pub fn find_documents(source: &Path) -> Result<Vec<PathBuf>> {
    validate_source(source)?;
    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let name = entry.file_name().to_string_lossy();
        // Hidden files are never part of a batch
        let selected =
            entry.file_type().is_file() && !name.starts_with('.') && is_document_name(&name);
        if selected {
            documents.push(entry.into_path());
        }
    }

    if documents.is_empty() {
        return Err(PreparerError::NoDocuments(source.to_path_buf()));
    }
    Ok(documents)
}

/// Discover the attribute set of all documents.
pub fn discover_batch(
    documents: &[PathBuf],
    filter: &dyn LengthFilter,
    progress: &mut dyn BatchProgress,
) -> Result<AttributeSet> {
    let mut attributes = AttributeSet::new();
    for (index, path) in documents.iter().enumerate() {
        progress.discovering(index, documents.len(), path);
        let loaded = load_document(path, filter)?;
        discover_attributes(&loaded.parse()?, &mut attributes);
    }
    info!(attributes = attributes.len(), "Discovered descriptor attributes");
    Ok(attributes)
}

/// Read the records of one document and extract its texts.
pub fn prepare_document(
    path: &Path,
    attributes: &AttributeSet,
    options: &BatchOptions,
    filter: &dyn LengthFilter,
    handler: &mut dyn EmptyExtractionHandler,
) -> Result<DocumentReport> {
    let loaded = load_document(path, filter)?;
    let doc = loaded.parse()?;
    let records = read_metadata(&doc, attributes);
    extract_document(&doc, path, records, &options.destination, handler)
}

/// Prepare every document of `source` and write the metadata table.
///
/// # Arguments
/// * `source` - A TMX file or a directory of TMX files
/// * `options` - Destination, metadata path and length limit
/// * `handler` - Decides whether to continue past empty extractions
/// * `progress` - Receives a notification per document and pass
pub fn run_batch(
    source: &Path,
    options: &BatchOptions,
    handler: &mut dyn EmptyExtractionHandler,
    progress: &mut dyn BatchProgress,
) -> Result<BatchReport> {
    let documents = find_documents(source)?;
    info!(source = %source.display(), documents = documents.len(), "Starting batch");

    let filter = options.filter();
    let attributes = discover_batch(&documents, filter.as_ref(), progress)?;

    let mut records = Vec::new();
    let mut files_written = 0;
    for (index, path) in documents.iter().enumerate() {
        progress.extracting(index, documents.len(), path);
        let report = prepare_document(path, &attributes, options, filter.as_ref(), handler)?;
        files_written += report.files_written;
        records.extend(report.records);
    }

    write_metadata(&records, &attributes, &options.metadata_path)?;
    info!(
        path = %options.metadata_path.display(),
        records = records.len(),
        "Wrote metadata table"
    );

    Ok(BatchReport {
        documents: documents.len(),
        attributes,
        records,
        files_written,
        metadata_path: options.metadata_path.clone(),
    })
}
