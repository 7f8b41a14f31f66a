//! Allow-list HTML sanitizer
//!
//! Every piece of externally sourced rich content (pasted HTML, block content
//! restored from storage, content given on the command line) goes through
//! [`sanitize_html`] before the extractors look at it.
//!
//! - Tags outside [`ALLOWED_TAGS`] are unwrapped: the tag goes, its children stay.
//! - `script`, `style`, `noscript` and `template` are dropped with their contents.
//! - Comments, doctypes and processing instructions never survive.
//! - Attributes outside the allow-list, any `on*` attribute, and `href`
//!   values using the `javascript:`, `data:` or `vbscript:` schemes are removed.

use crate::dom;
use markup5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData};
use std::cell::RefCell;

/// Tags kept by the sanitizer
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "div", "span", "strong", "b", "em", "i", "u", "mark", "a", "br", "h1", "h2", "h3", "h4",
    "h5", "h6", "ul", "ol", "li", "code", "pre",
];

/// Attributes allowed on every kept tag
pub const GLOBAL_ATTRS: &[&str] = &[
    "class",
    "id",
    "data-highlight",
    "data-tag-id",
    "data-placeholder",
];

/// Attributes allowed on anchors in addition to [`GLOBAL_ATTRS`]
pub const ANCHOR_ATTRS: &[&str] = &["href", "title"];

/// Elements removed together with everything inside them
const DROPPED_WITH_CONTENT: &[&str] = &["script", "style", "noscript", "template"];

const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

/// Sanitizes an HTML fragment and returns the re-serialized result
///
/// # Example
///
/// ```
/// use blockpress_html::sanitize_html;
///
/// let clean = sanitize_html(r#"<p onclick="x()">Hi <img src=x></p>"#);
/// assert_eq!(clean, "<p>Hi </p>");
/// ```
pub fn sanitize_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let dom = dom::parse(html);
    let mut out = String::with_capacity(html.len());
    if let Some(body) = dom::body(&dom) {
        for child in body.children.borrow().iter() {
            sanitize_node(child, &mut out);
        }
    }
    out
}

/// Whether an `href` value uses a blocked URL scheme
pub fn is_dangerous_href(value: &str) -> bool {
    let normalized: String = value
        .trim_start()
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    DANGEROUS_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn sanitize_node(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => {
            dom::escape_text(&contents.borrow(), out);
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref().to_ascii_lowercase();

            if DROPPED_WITH_CONTENT.contains(&tag.as_str()) {
                return;
            }

            if !ALLOWED_TAGS.contains(&tag.as_str()) {
                for child in handle.children.borrow().iter() {
                    sanitize_node(child, out);
                }
                return;
            }

            out.push('<');
            out.push_str(&tag);
            push_allowed_attrs(&tag, attrs, out);
            out.push('>');

            if dom::is_void(&tag) {
                return;
            }

            for child in handle.children.borrow().iter() {
                sanitize_node(child, out);
            }

            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
        _ => {}
    }
}

fn push_allowed_attrs(tag: &str, attrs: &RefCell<Vec<Attribute>>, out: &mut String) {
    for attr in attrs.borrow().iter() {
        let name = attr.name.local.as_ref().to_ascii_lowercase();

        if name.starts_with("on") {
            continue;
        }

        let allowed = GLOBAL_ATTRS.contains(&name.as_str())
            || (tag == "a" && ANCHOR_ATTRS.contains(&name.as_str()));
        if !allowed {
            continue;
        }

        if name == "href" && is_dangerous_href(&attr.value) {
            log::debug!("Dropped href with blocked scheme: {}", &*attr.value);
            continue;
        }

        dom::push_attr(out, &name, &attr.value);
    }
}
