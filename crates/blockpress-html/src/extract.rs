//! Text extraction from editor content
//!
//! Two modes, both starting from [`sanitize_html`](crate::sanitize_html):
//!
//! - [`extract_text`]: line-oriented text that keeps a small set of inline
//!   formatting tags (`strong, mark, b, em, u, span, a`) so conversions can carry
//!   bold/highlight/link runs into the generated HTML.
//! - [`extract_plain_text`]: rendered text only, used where inline markup must
//!   not leak into the result (link text / URL pairs).

use crate::dom;
use crate::sanitize::sanitize_html;
use markup5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData};
use std::cell::RefCell;

/// Inline formatting elements re-emitted by [`extract_text`]
pub const FORMATTING_TAGS: &[&str] = &["strong", "mark", "b", "em", "u", "span", "a"];

/// Elements followed by a line break in [`extract_text`]
const LINE_BLOCKS: &[&str] = &["div", "p"];

/// Attributes re-emitted on formatting elements other than anchors
const FORMATTING_ATTRS: &[&str] = &["class", "id", "style"];

/// Extracts text with line breaks, preserving inline formatting tags
///
/// # Example
///
/// ```
/// use blockpress_html::extract_text;
///
/// let text = extract_text("<div>one <strong>bold</strong></div><div>two</div>");
/// assert_eq!(text, "one <strong>bold</strong>\ntwo");
/// ```
pub fn extract_text(rich: &str) -> String {
    let sanitized = sanitize_html(rich);
    let dom = dom::parse(&sanitized);

    let mut text = String::new();
    if let Some(body) = dom::body(&dom) {
        for child in body.children.borrow().iter() {
            walk_formatted(child, &mut text);
        }
    }

    trim_trailing_newlines(text)
}

/// Extracts rendered text with line breaks and no markup
///
/// # Example
///
/// ```
/// use blockpress_html::extract_plain_text;
///
/// let text = extract_plain_text("<div><b>Docs</b></div><div>https://e.com</div>");
/// assert_eq!(text, "Docs\nhttps://e.com");
/// ```
pub fn extract_plain_text(rich: &str) -> String {
    let sanitized = sanitize_html(rich);
    let dom = dom::parse(&sanitized);

    let mut writer = PlainTextWriter::default();
    if let Some(body) = dom::body(&dom) {
        for child in body.children.borrow().iter() {
            writer.walk(child, false);
        }
    }

    trim_trailing_newlines(writer.out)
}

/// Turns plain text into block content: escaped, one `<br>` per line break
///
/// ```
/// use blockpress_html::{extract_text, text_to_html};
///
/// let content = text_to_html("a < b\nc");
/// assert_eq!(content, "a &lt; b<br>c");
/// assert_eq!(extract_text(&content), "a < b\nc");
/// ```
pub fn text_to_html(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push_str("<br>");
        }
        dom::escape_text(line, &mut out);
    }
    out
}

fn walk_formatted(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => {
            out.push_str(&contents.borrow());
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref().to_ascii_lowercase();

            if tag == "br" {
                out.push('\n');
                return;
            }

            let is_formatting = FORMATTING_TAGS.contains(&tag.as_str());
            if is_formatting {
                push_formatting_open(&tag, attrs, out);
            }

            for child in handle.children.borrow().iter() {
                walk_formatted(child, out);
            }

            if is_formatting {
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }

            if LINE_BLOCKS.contains(&tag.as_str()) {
                out.push('\n');
            }
        }
        _ => {}
    }
}

fn push_formatting_open(tag: &str, attrs: &RefCell<Vec<Attribute>>, out: &mut String) {
    out.push('<');
    out.push_str(tag);

    let allowed: &[&str] = if tag == "a" { &["href"] } else { FORMATTING_ATTRS };
    for attr in attrs.borrow().iter() {
        let name = attr.name.local.as_ref();
        if name.starts_with("data-") || !allowed.contains(&name) {
            continue;
        }
        dom::push_attr(out, name, &attr.value);
    }

    out.push('>');
}

/// Emulates the rendered-text (`innerText`) view of a tree
#[derive(Default)]
struct PlainTextWriter {
    out: String,
    /// Line breaks owed by block boundaries, emitted before the next text
    pending_breaks: usize,
}

impl PlainTextWriter {
    fn walk(&mut self, handle: &Handle, in_pre: bool) {
        match &handle.data {
            NodeData::Text { contents } => {
                let contents = contents.borrow();
                if in_pre {
                    self.push_text(&contents);
                } else {
                    let collapsed = collapse_whitespace(&contents);
                    let at_line_start = self.out.is_empty()
                        || self.out.ends_with('\n')
                        || self.pending_breaks > 0;
                    let text = if at_line_start {
                        collapsed.trim_start()
                    } else {
                        collapsed.as_str()
                    };
                    if !text.is_empty() {
                        self.push_text(text);
                    }
                }
            }
            NodeData::Element { name, .. } => {
                let tag = name.local.as_ref().to_ascii_lowercase();

                if tag == "br" {
                    self.flush_breaks();
                    self.out.push('\n');
                    return;
                }

                let breaks = block_breaks(&tag);
                self.request_breaks(breaks);

                let in_pre = in_pre || tag == "pre";
                for child in handle.children.borrow().iter() {
                    self.walk(child, in_pre);
                }

                self.request_breaks(breaks);
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        self.flush_breaks();
        self.out.push_str(text);
    }

    fn request_breaks(&mut self, count: usize) {
        self.pending_breaks = self.pending_breaks.max(count);
    }

    fn flush_breaks(&mut self) {
        if !self.out.is_empty() {
            let already = self.out.chars().rev().take_while(|c| *c == '\n').count();
            for _ in already..self.pending_breaks {
                self.out.push('\n');
            }
        }
        self.pending_breaks = 0;
    }
}

/// Number of line breaks a block element forces around itself
fn block_breaks(tag: &str) -> usize {
    match tag {
        "p" => 2,
        "div" | "li" | "ul" | "ol" | "pre" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => 1,
        _ => 0,
    }
}

/// Collapses runs of whitespace (including newlines) into one space
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() && ch != '\u{a0}' {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn trim_trailing_newlines(mut text: String) -> String {
    while text.ends_with('\n') {
        text.pop();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_html_lines() {
        assert_eq!(text_to_html("one\r\ntwo\n\nthree"), "one<br>two<br><br>three");
        assert_eq!(extract_plain_text(&text_to_html("x\ny")), "x\ny");
    }

    #[test]
    fn test_br_becomes_newline() {
        assert_eq!(extract_text("a<br>b"), "a\nb");
    }

    #[test]
    fn test_blocks_followed_by_newline() {
        assert_eq!(extract_text("<div>a</div><div>b</div><p>c</p>"), "a\nb\nc");
    }

    #[test]
    fn test_first_line_without_wrapper() {
        // contenteditable keeps the first line bare and wraps the rest in divs
        assert_eq!(extract_text("first<div>second</div><div>third</div>"), "first\nsecond\nthird");
    }

    #[test]
    fn test_formatting_kept_with_restricted_attrs() {
        let html = r#"<span class="x" id="y" data-highlight="true">hi</span>"#;
        assert_eq!(extract_text(html), r#"<span class="x" id="y">hi</span>"#);
    }

    #[test]
    fn test_anchor_keeps_only_href() {
        let html = r#"<a href="https://e.com" title="t" class="c">link</a>"#;
        assert_eq!(extract_text(html), r#"<a href="https://e.com">link</a>"#);
    }

    #[test]
    fn test_other_elements_unwrapped() {
        assert_eq!(extract_text("<h2>title</h2><ul><li>x</li></ul>"), "titlex");
        assert_eq!(extract_text("<i>it</i> <code>c</code>"), "it c");
    }

    #[test]
    fn test_text_is_decoded() {
        assert_eq!(extract_text("&lt;b&gt; &amp;"), "<b> &");
    }

    #[test]
    fn test_trailing_newlines_trimmed() {
        assert_eq!(extract_text("<div>a</div><div><br></div>"), "a");
    }

    #[test]
    fn test_sanitizes_first() {
        assert_eq!(extract_text("<script>x</script><b onclick=\"y\">ok</b>"), "<b>ok</b>");
    }

    #[test]
    fn test_plain_text_drops_markup() {
        let html = "<div><strong>Home</strong></div><div>https://e.com/<em>x</em></div>";
        assert_eq!(extract_plain_text(html), "Home\nhttps://e.com/x");
    }

    #[test]
    fn test_plain_text_br_and_paragraphs() {
        assert_eq!(extract_plain_text("a<br>b"), "a\nb");
        assert_eq!(extract_plain_text("<p>a</p><p>b</p>"), "a\n\nb");
    }

    #[test]
    fn test_plain_text_collapses_whitespace() {
        assert_eq!(extract_plain_text("<div>  a \n  b </div><div> c</div>"), "a b \nc");
    }

    #[test]
    fn test_plain_text_preserves_pre() {
        assert_eq!(extract_plain_text("<pre>a  b\nc</pre>"), "a  b\nc");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_text(""), "");
        assert_eq!(extract_plain_text(""), "");
    }
}
