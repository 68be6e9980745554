//! Length filtering applied to document text before the final parse.
//!
//! A filter receives the normalized text of one document together with a
//! label naming its source and returns text of the same overall structure.
//! Filters must be idempotent: running one over its own output changes nothing.

use roxmltree::Node;
use tracing::{debug, warn};

use crate::config::UNIT_TAG;
use crate::error::Result;
use crate::loader::parse_document;
use crate::xml::{find_descendants, segments};

/// Text transform applied to every document before it is parsed.
pub trait LengthFilter {
    /// Filter the document text. `label` identifies the source in diagnostics.
    fn filter(&self, text: &str, label: &str) -> Result<String>;
}

/// Filter that leaves documents untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl LengthFilter for PassThrough {
    fn filter(&self, text: &str, _label: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Drops every translation unit in which some variant is longer than a
/// character limit.
///
/// Whole units are removed so the remaining variants stay aligned across
/// languages.
#[derive(Debug, Clone, Copy)]
pub struct MaxSegmentChars {
    limit: usize,
}

impl MaxSegmentChars {
    /// Create a filter with the given character limit per variant.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// The character limit.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl LengthFilter for MaxSegmentChars {
    fn filter(&self, text: &str, label: &str) -> Result<String> {
        let doc = parse_document(text, label)?;

        let doomed: Vec<_> = find_descendants(&doc, UNIT_TAG)
            .filter(|unit| {
                unit.children()
                    .filter(|c| c.is_element())
                    .any(|variant| variant_chars(variant) > self.limit)
            })
            .map(|unit| unit.range())
            .collect();

        if doomed.is_empty() {
            debug!(label, limit = self.limit, "No overlong units");
            return Ok(text.to_string());
        }

        warn!(
            label,
            limit = self.limit,
            removed = doomed.len(),
            "Removing translation units with overlong segments"
        );

        let mut filtered = String::with_capacity(text.len());
        let mut cursor = 0;
        for range in doomed {
            // Units never nest, so ranges are disjoint and ascending.
            filtered.push_str(&text[cursor..range.start]);
            cursor = range.end;
        }
        filtered.push_str(&text[cursor..]);

        Ok(filtered)
    }
}

/// Character count of a variant: its segments when it has any, its own text otherwise.
fn variant_chars(variant: Node<'_, '_>) -> usize {
    let mut segs = segments(variant).peekable();
    if segs.peek().is_none() {
        return variant.text().map_or(0, |t| t.trim().chars().count());
    }
    segs.map(|seg| {
        seg.descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .map(|t| t.chars().count())
            .sum::<usize>()
    })
    .max()
    .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<tmx><body>
<tu><tuv xml:lang="en"><seg>short</seg></tuv><tuv xml:lang="fi"><seg>lyhyt</seg></tuv></tu>
<tu><tuv xml:lang="en"><seg>this one is far too long</seg></tuv><tuv xml:lang="fi"><seg>ok</seg></tuv></tu>
<tu><tuv xml:lang="en"><seg>fine</seg></tuv><tuv xml:lang="fi"><seg>hyvä</seg></tuv></tu>
</body></tmx>"#;

    #[test]
    fn test_pass_through_is_identity() {
        assert_eq!(PassThrough.filter(DOC, "doc").unwrap(), DOC);
    }

    #[test]
    fn test_max_segment_chars_removes_whole_units() {
        let filtered = MaxSegmentChars::new(10).filter(DOC, "doc").unwrap();

        assert!(!filtered.contains("far too long"));
        assert!(!filtered.contains(">ok<"), "aligned variant must go too");
        assert!(filtered.contains("short"));
        assert!(filtered.contains("hyvä"));

        let doc = parse_document(&filtered, "doc").unwrap();
        assert_eq!(find_descendants(&doc, UNIT_TAG).count(), 2);
    }

    #[test]
    fn test_max_segment_chars_is_idempotent() {
        let filter = MaxSegmentChars::new(10);
        let once = filter.filter(DOC, "doc").unwrap();
        let twice = filter.filter(&once, "doc").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_max_segment_chars_counts_characters_not_bytes() {
        let xml = r#"<tmx><body><tu><tuv xml:lang="fi"><seg>äöäöä</seg></tuv></tu></body></tmx>"#;
        let filtered = MaxSegmentChars::new(5).filter(xml, "doc").unwrap();
        assert_eq!(filtered, xml);
    }

    #[test]
    fn test_max_segment_chars_variant_without_segments() {
        let xml = r#"<tmx><body><tu><tuv xml:lang="fi">liian pitkä teksti</tuv></tu></body></tmx>"#;
        let filtered = MaxSegmentChars::new(5).filter(xml, "doc").unwrap();
        assert_eq!(filtered, "<tmx><body></body></tmx>");
    }

    #[test]
    fn test_max_segment_chars_rejects_malformed_xml() {
        assert!(MaxSegmentChars::new(5).filter("<tmx><tu>", "bad").is_err());
    }
}
