//! Descriptor metadata: attribute discovery, record reading and
//! retranslation detection.
//!
//! Discovery and reading are separate passes. A batch first runs
//! [`discover_attributes`] over every document, then reads each document
//! against the finished [`AttributeSet`], so records of early documents
//! already carry attributes first seen in later ones.

use std::collections::HashMap;

use roxmltree::Document;
use tracing::debug;
use uuid::Uuid;

use crate::config::{CODE_ATTRIBUTE, DESCRIPTOR_TAG, LANG_ATTRIBUTE};
use crate::types::{canonical_attribute, AttributeSet, MetadataRecord};
use crate::xml::find_descendants;

/// Add every descriptor attribute name of a document to `attributes`.
///
/// `language` is folded into `lang`.
pub fn discover_attributes(doc: &Document<'_>, attributes: &mut AttributeSet) {
    for descriptor in find_descendants(doc, DESCRIPTOR_TAG) {
        for attr in descriptor.attributes() {
            if attributes.insert(attr.name()) {
                debug!(attribute = canonical_attribute(attr.name()), "Discovered attribute");
            }
        }
    }
}

/// Build the attribute set of a sequence of documents.
pub fn discover<'a, 'input: 'a>(
    docs: impl IntoIterator<Item = &'a Document<'input>>,
) -> AttributeSet {
    let mut attributes = AttributeSet::new();
    for doc in docs {
        discover_attributes(doc, &mut attributes);
    }
    attributes
}

/// Normalize one descriptor attribute value.
///
/// Spaces are removed from `code` (it becomes part of file names) and `lang`
/// is lower-cased. Other values pass through.
///
/// # Examples
/// ```
/// use tmx_preparer::metadata::normalize_value;
///
/// assert_eq!(normalize_value("code", "gb uk"), "gbuk");
/// assert_eq!(normalize_value("lang", "EN"), "en");
/// assert_eq!(normalize_value("translator", "A. B."), "A. B.");
/// ```
pub fn normalize_value(name: &str, value: &str) -> String {
    match name {
        CODE_ATTRIBUTE => value.replace(' ', ""),
        LANG_ATTRIBUTE => value.to_lowercase(),
        _ => value.to_string(),
    }
}

/// Read one record per descriptor of a document, in document order.
///
/// All records share a fresh pairing identifier. Attributes of `attributes`
/// missing on a descriptor are set to the empty string.
pub fn read_metadata(doc: &Document<'_>, attributes: &AttributeSet) -> Vec<MetadataRecord> {
    let pair_id = Uuid::new_v4();

    find_descendants(doc, DESCRIPTOR_TAG)
        .map(|descriptor| {
            let mut record = MetadataRecord::new(pair_id);
            for attr in descriptor.attributes() {
                let name = canonical_attribute(attr.name());
                record.set(name, normalize_value(name, attr.value()));
            }
            for name in attributes.iter() {
                if record.get(name).is_none() {
                    record.set(name, "");
                }
            }
            record
        })
        .collect()
}

/// Number of records per language code in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationsPerLanguage {
    counts: HashMap<String, usize>,
}

impl TranslationsPerLanguage {
    /// Count the records of each language.
    pub fn from_records(records: &[MetadataRecord]) -> Self {
        let mut counts = HashMap::new();
        for record in records {
            *counts.entry(record.lang().to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Number of records with the given language code.
    pub fn count(&self, lang: &str) -> usize {
        self.counts.get(lang).copied().unwrap_or(0)
    }

    /// Whether segments of `lang` must additionally be told apart by variant code.
    ///
    /// Only a language with exactly one record can be matched on language alone.
    pub fn needs_code(&self, lang: &str) -> bool {
        self.count(lang) != 1
    }
}

/// Count records per language code.
pub fn detect_retranslations(records: &[MetadataRecord]) -> TranslationsPerLanguage {
    TranslationsPerLanguage::from_records(records)
}
