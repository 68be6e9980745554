//! XML utility functions for navigating TMX trees.

use roxmltree::{Document, Node};

use crate::config::{LANG_ATTRIBUTE, SEGMENT_TAG, VARIANT_TAG};

/// Namespace bound to the reserved `xml:` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use tmx_preparer::xml::get_tag_name;
///
/// let xml = r#"<tmx><body/></tmx>"#;
/// let doc = Document::parse(xml).unwrap();
/// let body = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(body), "body");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Find all descendant elements with the given tag name, in document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use tmx_preparer::xml::find_descendants;
///
/// let xml = r#"<tmx><header><textdef/><textdef/></header><body/></tmx>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(find_descendants(&doc, "textdef").count(), 2);
/// ```
pub fn find_descendants<'a, 'input>(
    doc: &'a Document<'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants().filter(move |n| has_tag(*n, tag))
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| has_tag(*child, tag))
}

/// Language of a variant element.
///
/// Reads `xml:lang`, falling back to an unprefixed `lang` attribute as written
/// by older TMX producers.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use tmx_preparer::xml::variant_lang;
///
/// let doc = Document::parse(r#"<tuv xml:lang="EN"><seg>Hi</seg></tuv>"#).unwrap();
/// assert_eq!(variant_lang(doc.root_element()), Some("EN"));
/// ```
pub fn variant_lang<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((XML_NAMESPACE, LANG_ATTRIBUTE))
        .or_else(|| node.attribute(LANG_ATTRIBUTE))
}

/// All variant elements of a document, in document order.
pub fn variants<'a, 'input>(doc: &'a Document<'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    find_descendants(doc, VARIANT_TAG)
}

/// Segment children of a variant element.
pub fn segments<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    find_children(node, SEGMENT_TAG)
}
