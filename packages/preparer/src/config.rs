//! Configuration constants and path helpers for the preparer.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{PreparerError, Result};

/// Header element describing one language/variant of a document.
pub const DESCRIPTOR_TAG: &str = "textdef";

/// Translation unit element.
pub const UNIT_TAG: &str = "tu";

/// Language-specific variant of a translation unit.
pub const VARIANT_TAG: &str = "tuv";

/// Segment element inside a variant.
pub const SEGMENT_TAG: &str = "seg";

/// Attribute name used for the language of a descriptor.
pub const LANG_ATTRIBUTE: &str = "lang";

/// Alternative spelling of [`LANG_ATTRIBUTE`] found in some documents.
pub const LANGUAGE_ATTRIBUTE: &str = "language";

/// Attribute name of the variant identifier.
pub const CODE_ATTRIBUTE: &str = "code";

/// Column holding the pairing identifier in the metadata table.
pub const PAIR_ID_COLUMN: &str = "pair_id";

/// Column holding the planned annotated file in the metadata table.
pub const FILENAME_COLUMN: &str = "filename";

/// Line written before every aligned unit in a `.prepared` file.
pub const SEGMENT_DELIMITER: &str = "!!!!!!!!!!!!!!!";

/// Suffix of the files written by the extractor.
pub const PREPARED_SUFFIX: &str = ".prepared";

/// Suffix appended by the downstream annotation step.
pub const ANNOTATED_SUFFIX: &str = ".conll";

/// File name suffix selecting documents in a directory batch.
pub const DOCUMENT_SUFFIX: &str = "tmx";

/// Default location of the consolidated metadata table.
pub const DEFAULT_METADATA_FILE: &str = "parsedmetadata.csv";

/// Encoding declarations removed before parsing. Matched literally.
pub const ENCODING_DECLARATIONS: [&str; 2] = [r#"encoding="utf-8""#, r#"encoding = "utf-8""#];

/// Check whether a file name selects a document for a directory batch.
///
/// # Examples
/// ```
/// use tmx_preparer::config::is_document_name;
///
/// assert!(is_document_name("novel_en_fi.tmx"));
/// assert!(!is_document_name("legacy.TMX"));
/// assert!(!is_document_name("notes.txt"));
/// ```
pub fn is_document_name(name: &str) -> bool {
    name.ends_with(DOCUMENT_SUFFIX)
}

/// Path of the `.prepared` file for one record.
///
/// The file lands next to the source document: `{source}_{code}_{lang}.prepared`.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use tmx_preparer::config::prepared_path;
///
/// assert_eq!(
///     prepared_path(Path::new("corpus/novel.tmx"), "gb", "en"),
///     PathBuf::from("corpus/novel.tmx_gb_en.prepared")
/// );
/// ```
pub fn prepared_path(source: &Path, code: &str, lang: &str) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(format!("_{code}_{lang}{PREPARED_SUFFIX}"));
    PathBuf::from(name)
}

/// Path the annotation step is expected to produce for one record.
///
/// Layout: `{destination}/{lang}/{file}_{code}_{lang}.prepared.conll`, where
/// `file` is the bare file name of the source document. Nothing in this
/// crate writes that file; it is recorded so later tooling can find it.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use tmx_preparer::config::annotated_path;
///
/// assert_eq!(
///     annotated_path(Path::new("parsed/"), Path::new("corpus/novel.tmx"), "gb", "en"),
///     PathBuf::from("parsed/en/novel.tmx_gb_en.prepared.conll")
/// );
/// ```
pub fn annotated_path(destination: &Path, source: &Path, code: &str, lang: &str) -> PathBuf {
    let file = source
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination
        .join(lang)
        .join(format!("{file}_{code}_{lang}{PREPARED_SUFFIX}{ANNOTATED_SUFFIX}"))
}

/// Validate that a source path exists.
///
/// # Returns
/// * `Ok(())` if the path is an existing file or directory
/// * `Err(PreparerError::SourceNotFound)` otherwise
pub fn validate_source(source: &Path) -> Result<()> {
    if source.exists() {
        Ok(())
    } else {
        Err(PreparerError::SourceNotFound(source.to_path_buf()))
    }
}
