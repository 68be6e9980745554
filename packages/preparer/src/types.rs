//! Core data types for the preparer.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use crate::config::{
    CODE_ATTRIBUTE, FILENAME_COLUMN, LANGUAGE_ATTRIBUTE, LANG_ATTRIBUTE, PAIR_ID_COLUMN,
};

/// Fold alternative attribute spellings onto their canonical name.
///
/// `language` becomes `lang`; every other name is returned unchanged.
#[must_use]
pub fn canonical_attribute(name: &str) -> &str {
    if name == LANGUAGE_ATTRIBUTE {
        LANG_ATTRIBUTE
    } else {
        name
    }
}

/// Ordered set of descriptor attribute names seen across a batch.
///
/// Names keep the order of their first appearance. The set only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    names: Vec<String>,
}

impl AttributeSet {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute name, folding `language` into `lang`.
    ///
    /// Returns `true` if the name was not present before.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = canonical_attribute(name);
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Check whether a name is part of the set.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterate over names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of attribute names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no attribute has been seen.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Columns of the metadata table: the attributes, then `pair_id` and `filename`.
    pub fn columns(&self) -> Vec<&str> {
        self.iter()
            .chain([PAIR_ID_COLUMN, FILENAME_COLUMN])
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}

/// Normalized metadata of one language/variant descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Attribute values keyed by canonical name.
    pub attributes: BTreeMap<String, String>,
    /// Identifier shared by all records read from the same document.
    pub pair_id: Uuid,
    /// Planned path of the annotated file, set once segments were extracted.
    pub filename: Option<PathBuf>,
}

impl MetadataRecord {
    /// Create a record without attributes.
    pub fn new(pair_id: Uuid) -> Self {
        Self {
            attributes: BTreeMap::new(),
            pair_id,
            filename: None,
        }
    }

    /// Get an attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Language code, empty if absent.
    pub fn lang(&self) -> &str {
        self.get(LANG_ATTRIBUTE).unwrap_or_default()
    }

    /// Variant code, empty if absent.
    pub fn code(&self) -> &str {
        self.get(CODE_ATTRIBUTE).unwrap_or_default()
    }

    /// Values of one metadata table row, in the order of [`AttributeSet::columns`].
    pub fn row(&self, attributes: &AttributeSet) -> Vec<String> {
        attributes
            .iter()
            .map(|name| self.get(name).unwrap_or_default().to_string())
            .chain([
                self.pair_id.to_string(),
                self.filename
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ])
            .collect()
    }
}

/// Segment count of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentCount {
    pub lang: String,
    pub code: String,
    pub count: usize,
}

/// Segment counts of all records in one document, in record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentCounts {
    entries: Vec<SegmentCount>,
}

impl SegmentCounts {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the count of one record.
    pub fn push(&mut self, record: &MetadataRecord, count: usize) {
        self.entries.push(SegmentCount {
            lang: record.lang().to_string(),
            code: record.code().to_string(),
            count,
        });
    }

    /// Whether every record yielded the same number of segments.
    pub fn is_aligned(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].count == pair[1].count)
    }

    /// The common count, if all records agree and there is at least one.
    pub fn common(&self) -> Option<usize> {
        match self.entries.first() {
            Some(first) if self.is_aligned() => Some(first.count),
            _ => None,
        }
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentCount> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no count has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SegmentCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}/{}={}", entry.lang, entry.code, entry.count)?;
        }
        Ok(())
    }
}

/// Outcome of extracting one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Source document.
    pub path: PathBuf,
    /// Records annotated with their planned filename.
    pub records: Vec<MetadataRecord>,
    /// Segment count per record.
    pub counts: SegmentCounts,
    /// Number of `.prepared` files written.
    pub files_written: usize,
}

/// Outcome of a whole batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of documents processed.
    pub documents: usize,
    /// Attribute set the records were unified on.
    pub attributes: AttributeSet,
    /// All records of the batch, in processing order.
    pub records: Vec<MetadataRecord>,
    /// Number of `.prepared` files written.
    pub files_written: usize,
    /// Where the metadata table was written.
    pub metadata_path: PathBuf,
}
