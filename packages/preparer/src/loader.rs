//! Document loading: decoding, normalization and parsing of TMX files.
//!
//! Loading happens in stages, each a pure function over the text so the
//! individual steps can be tested without touching the filesystem:
//!
//! 1. decode the raw bytes ([`decode_document`])
//! 2. strip encoding declarations and separate translation units ([`normalize_document`])
//! 3. hand the text to a [`LengthFilter`]
//! 4. parse the result ([`parse_document`])

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use roxmltree::{Document, ParsingOptions};
use tracing::{debug, info};

use crate::config::ENCODING_DECLARATIONS;
use crate::error::{PreparerError, Result};
use crate::filter::LengthFilter;

/// Opening tag of a translation unit, with or without attributes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static UNIT_OPEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<tu[\s>]").expect("valid regex"));

/// A decoded, normalized and filtered document ready to be parsed.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Document text after normalization and filtering.
    pub text: String,
}

impl LoadedDocument {
    /// Label used for this document in diagnostics and errors.
    pub fn label(&self) -> String {
        self.path.display().to_string()
    }

    /// Parse the text into a tree borrowing from this document.
    pub fn parse(&self) -> Result<Document<'_>> {
        parse_document(&self.text, &self.label())
    }
}

/// Read, decode, normalize and filter one document.
///
/// # Errors
/// * `PreparerError::Io` if the file cannot be read
/// * `PreparerError::Encoding` if its bytes are not valid text
/// * whatever the filter reports
pub fn load_document(path: &Path, filter: &dyn LengthFilter) -> Result<LoadedDocument> {
    let bytes = fs::read(path)?;
    let decoded = decode_document(&bytes, path)?;
    info!(path = %path.display(), "Processing");

    let normalized = normalize_document(&decoded);
    let label = path.display().to_string();
    let filtered = filter.filter(&normalized, &label)?;

    Ok(LoadedDocument {
        path: path.to_path_buf(),
        text: filtered.trim().to_string(),
    })
}

/// Decode raw document bytes.
///
/// A byte order mark selects UTF-8 or UTF-16 and is removed; without one the
/// bytes must be UTF-8. Malformed sequences are never replaced.
///
/// # Errors
/// `PreparerError::Encoding` naming `path` if the bytes do not decode.
pub fn decode_document(bytes: &[u8], path: &Path) -> Result<String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    debug!(path = %path.display(), encoding = encoding.name(), bom = bom_len > 0, "Decoding");

    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(|text| text.into_owned())
        .ok_or_else(|| PreparerError::Encoding {
            path: path.to_path_buf(),
        })
}

/// Remove encoding declarations that would contradict the decoded text.
///
/// Only the exact lowercase spellings in [`ENCODING_DECLARATIONS`] are removed.
pub fn strip_encoding_declarations(text: &str) -> String {
    ENCODING_DECLARATIONS
        .iter()
        .fold(text.to_string(), |acc, decl| acc.replace(decl, ""))
}

/// Surround translation units with blank lines.
///
/// A blank line goes before every line opening a unit and after every line
/// closing one, so unit boundaries stay separable even in minified documents.
/// Every output line ends with a newline.
pub fn separate_units(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + text.len() / 8);
    for line in text.lines() {
        if UNIT_OPEN_PATTERN.is_match(line) {
            output.push('\n');
        }
        output.push_str(line);
        output.push('\n');
        if line.contains("</tu>") {
            output.push('\n');
        }
    }
    output
}

/// Strip encoding declarations, trim and separate translation units.
pub fn normalize_document(text: &str) -> String {
    let stripped = strip_encoding_declarations(text);
    separate_units(stripped.trim())
}

/// Parse document text into a tree.
///
/// DOCTYPE declarations are accepted since TMX files routinely reference the
/// TMX DTD.
///
/// # Errors
/// `PreparerError::Parse` carrying `label` if the text is not well-formed.
pub fn parse_document<'input>(text: &'input str, label: &str) -> Result<Document<'input>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options).map_err(|source| PreparerError::Parse {
        label: label.to_string(),
        source,
    })
}
