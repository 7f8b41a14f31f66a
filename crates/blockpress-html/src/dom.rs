//! DOM helpers shared by the sanitizer, the extractors and the paste normalizer
//!
//! Editor content is parsed as a full document with html5ever and walked from
//! `<body>`, so loose fragments (`a<br>b`) and complete exported documents
//! (`<html><head><style>…`) go through the same path.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::cell::RefCell;

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Parses an HTML string into an rcdom tree
pub fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Returns the `<body>` element of a parsed document
///
/// html5ever always synthesizes `html/head/body`, so this only returns `None`
/// for a tree that was not produced by [`parse`].
pub fn body(dom: &RcDom) -> Option<Handle> {
    find_element(&dom.document, "body")
}

/// Depth-first search for the first element with the given local name
pub fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if element_name(child).as_deref() == Some(name) {
            return Some(child.clone());
        }
        if let Some(found) = find_element(child, name) {
            return Some(found);
        }
    }
    None
}

/// Lower-case local name of an element node, `None` for other node kinds
pub fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_ascii_lowercase()),
        _ => None,
    }
}

/// Gets attribute value by name from element attributes
pub fn get_attr(attrs: &RefCell<Vec<Attribute>>, name: &str) -> Option<String> {
    attrs
        .borrow()
        .iter()
        .find(|attr| attr.name.local.as_ref() == name)
        .map(|attr| attr.value.to_string())
}

/// Collects all text content from children recursively
///
/// Equivalent of the DOM `textContent` getter.
pub fn collect_text_from_children(handle: &Handle) -> String {
    let mut text = String::new();
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => {
                text.push_str(&contents.borrow());
            }
            NodeData::Element { .. } => {
                text.push_str(&collect_text_from_children(child));
            }
            _ => {}
        }
    }
    text
}

/// Whether the element is serialized without a closing tag
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Escapes text node content the way `innerHTML` serializes it
pub fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escapes a double-quoted attribute value
pub fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Writes ` name="value"` for one attribute
pub fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_attr(value, out);
    out.push('"');
}
