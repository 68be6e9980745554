//! Segment extraction and alignment validation for one document.

use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{debug, info};

use crate::config::{annotated_path, prepared_path, CODE_ATTRIBUTE};
use crate::confirm::{Decision, EmptyExtraction, EmptyExtractionHandler};
use crate::error::{PreparerError, Result};
use crate::metadata::{detect_retranslations, normalize_value, TranslationsPerLanguage};
use crate::text::assemble_units;
use crate::types::{DocumentReport, MetadataRecord, SegmentCounts};
use crate::writer::write_atomic;
use crate::xml::{variant_lang, variants};

/// Select the variants belonging to one record.
///
/// A variant matches when its language equals the record's, ignoring case.
/// When the language has more than one record in this document, the
/// variant's `code` must also equal the record's. Spaces are removed from the
/// variant's `code` before comparing, as they are from the descriptor's, so
/// `code="fi 2"` on a variant matches the record code `fi2`.
pub fn select_variants<'a, 'input>(
    doc: &'a Document<'input>,
    record: &MetadataRecord,
    per_language: &TranslationsPerLanguage,
) -> Vec<Node<'a, 'input>> {
    let lang = record.lang();
    let by_code = per_language.needs_code(lang);

    variants(doc)
        .filter(|variant| variant_lang(*variant).is_some_and(|l| l.eq_ignore_ascii_case(lang)))
        .filter(|variant| {
            !by_code
                || variant
                    .attribute(CODE_ATTRIBUTE)
                    .is_some_and(|code| normalize_value(CODE_ATTRIBUTE, code) == record.code())
        })
        .collect()
}

/// Check that every record of a document yielded the same number of segments.
///
/// # Errors
/// `PreparerError::Alignment` listing every count if any two differ.
pub fn validate_alignment(document: &Path, counts: &SegmentCounts) -> Result<()> {
    if counts.is_aligned() {
        return Ok(());
    }
    Err(PreparerError::Alignment {
        document: document.display().to_string(),
        counts: counts.to_string(),
    })
}

/// Extract every record of a document into its `.prepared` file.
///
/// Records are annotated with the path the annotation step will produce
/// under `destination`. Files written before a failure stay on disk.
///
/// # Errors
/// * `PreparerError::EmptyExtraction` if `handler` aborts on an empty selection
/// * `PreparerError::Alignment` if segment counts differ
/// * `PreparerError::Io` if a file cannot be written
pub fn extract_document(
    doc: &Document<'_>,
    source: &Path,
    mut records: Vec<MetadataRecord>,
    destination: &Path,
    handler: &mut dyn EmptyExtractionHandler,
) -> Result<DocumentReport> {
    let per_language = detect_retranslations(&records);
    let mut counts = SegmentCounts::new();
    let mut files_written = 0;

    for record in &mut records {
        let selected = select_variants(doc, record, &per_language);
        let (lang, code) = (record.lang().to_string(), record.code().to_string());
        info!(lang = %lang, code = %code, segments = selected.len(), "Extracted");
        counts.push(record, selected.len());

        if selected.is_empty() {
            let warning = EmptyExtraction {
                document: source,
                lang: &lang,
                code: &code,
            };
            match handler.on_empty(&warning) {
                Decision::Continue => continue,
                Decision::Abort => return Err(warning.into_error()),
            }
        }

        let prepared = prepared_path(source, &code, &lang);
        write_atomic(&prepared, assemble_units(selected).as_bytes())?;
        files_written += 1;
        debug!(path = %prepared.display(), "Wrote prepared text");

        record.filename = Some(annotated_path(destination, source, &code, &lang));
    }

    validate_alignment(source, &counts)?;

    Ok(DocumentReport {
        path: source.to_path_buf(),
        records,
        counts,
        files_written,
    })
}
