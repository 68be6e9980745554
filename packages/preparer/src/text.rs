//! Text assembly and quote normalization for `.prepared` files.

use std::sync::LazyLock;

use regex::Regex;
use roxmltree::Node;

use crate::config::SEGMENT_DELIMITER;
use crate::xml::segments;

/// Quotation marks that must stand apart from surrounding words.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static QUOTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'|"|&quot;"#).expect("valid regex"));

/// Force single spaces around quotation marks.
///
/// Double quotes (literal or as `&quot;`) always get exactly one space on
/// each side. An apostrophe directly after a letter belongs to a word
/// (`don't`, `dogs'`) and is left alone; any other apostrophe is spaced like
/// a double quote. Spaces already next to a spaced mark are collapsed, so
/// applying this twice gives the same result as applying it once.
///
/// # Examples
/// ```
/// use tmx_preparer::text::fix_quotes;
///
/// assert_eq!(fix_quotes(r#"He said "no""#), r#"He said " no " "#);
/// assert_eq!(fix_quotes("don't"), "don't");
/// assert_eq!(fix_quotes("'Hi'"), " ' Hi'");
/// ```
pub fn fix_quotes(text: &str) -> String {
    let mut fixed = String::with_capacity(text.len() + 16);
    let mut last = 0;
    let mut after_spaced = false;

    for mark in QUOTE_PATTERN.find_iter(text) {
        let between = &text[last..mark.start()];
        fixed.push_str(if after_spaced {
            between.trim_start_matches(' ')
        } else {
            between
        });

        let glued = mark.as_str() == "'"
            && text[..mark.start()]
                .chars()
                .next_back()
                .is_some_and(char::is_alphabetic);

        if glued {
            fixed.push_str(mark.as_str());
        } else {
            fixed.truncate(fixed.trim_end_matches(' ').len());
            fixed.push(' ');
            fixed.push_str(mark.as_str());
            fixed.push(' ');
        }
        after_spaced = !glued;
        last = mark.end();
    }

    let tail = &text[last..];
    fixed.push_str(if after_spaced {
        tail.trim_start_matches(' ')
    } else {
        tail
    });
    fixed
}

/// Text of one aligned unit.
///
/// A variant without segment children contributes its own text; otherwise
/// every segment contributes a space followed by its text, segments without
/// text only the space.
pub fn variant_text(variant: Node<'_, '_>) -> String {
    let mut segs = segments(variant).peekable();
    if segs.peek().is_none() {
        return fix_quotes(variant.text().unwrap_or_default());
    }

    let mut text = String::new();
    for seg in segs {
        text.push(' ');
        if let Some(seg_text) = seg.text() {
            text.push_str(&fix_quotes(seg_text));
        }
    }
    text
}

/// Assemble the content of a `.prepared` file from matched variants.
///
/// Each unit is introduced by a line holding [`SEGMENT_DELIMITER`]. The result
/// is trimmed.
pub fn assemble_units<'a, 'input: 'a>(
    variants: impl IntoIterator<Item = Node<'a, 'input>>,
) -> String {
    let mut prepared = String::new();
    for variant in variants {
        prepared.push('\n');
        prepared.push_str(SEGMENT_DELIMITER);
        prepared.push('\n');
        prepared.push_str(&variant_text(variant));
    }
    prepared.trim().to_string()
}
