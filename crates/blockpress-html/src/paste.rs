//! Word-processor paste normalization
//!
//! Office applications put a full HTML document on the clipboard: conditional
//! comments, `<style>` blocks full of `mso-*` rules, `<o:p>` wrappers and inline
//! styles on every run. [`normalize_word_html`] reduces that to line-oriented text
//! keeping only bold, highlight and links, with bold/highlight rewritten to the
//! tags of the active formatting map.

use crate::dom;
use markup5ever_rcdom::{Handle, NodeData};

/// Attribute marking highlight runs produced by a paste, removed again by output cleanup
pub const HIGHLIGHT_MARKER: &str = r#" data-highlight="true""#;

/// Elements dropped together with their content
const NON_CONTENT: &[&str] = &["style", "script", "meta", "link", "title"];

/// Paragraph text prefixes that indicate leaked stylesheet content
const CSS_PREFIXES: &[&str] = &["<!--", "-->", "/*", "*/", "{", "}"];

/// Paragraph text fragments that indicate leaked stylesheet content
const CSS_MARKERS: &[&str] = &[
    "@font-face",
    "@page",
    "mso-",
    "panose-",
    "Style Definitions",
    "Font Definitions",
    "Page Definitions",
];

/// Open and close tags derived from a `[TEXT]` template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub open: String,
    pub close: String,
}

impl TagPair {
    /// Splits a template at its first `[TEXT]`
    ///
    /// A template without the placeholder yields the whole template as the
    /// opening tag and an empty closing tag.
    pub fn from_template(template: &str) -> Self {
        match template.split_once("[TEXT]") {
            Some((open, close)) => Self {
                open: open.to_string(),
                close: close.to_string(),
            },
            None => Self {
                open: template.to_string(),
                close: String::new(),
            },
        }
    }

    /// Opening tag with the highlight marker inserted before its final `>`
    fn marked_open(&self) -> String {
        match self.open.strip_suffix('>') {
            Some(head) => format!("{head}{HIGHLIGHT_MARKER}>"),
            None => self.open.clone(),
        }
    }
}

/// Tags pasted bold and highlighted runs are rewritten to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingTags {
    pub bold: TagPair,
    pub highlight: TagPair,
}

impl Default for FormattingTags {
    fn default() -> Self {
        Self {
            bold: TagPair::from_template("<strong>[TEXT]</strong>"),
            highlight: TagPair::from_template("<mark>[TEXT]</mark>"),
        }
    }
}

/// Result of [`paste`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Word content, rewritten to the formatting map
    Normalized(String),
    /// Not Word content; insert the HTML through the regular path
    PassThrough,
}

/// Detects HTML produced by Microsoft Office applications
pub fn is_word_html(html: &str) -> bool {
    html.contains("urn:schemas-microsoft-com:office")
        || html.contains("class=\"Mso")
        || html.contains("class='Mso")
        || has_microsoft_generator(html)
}

/// Normalizes pasted HTML when it comes from a word processor
pub fn paste(html: &str, tags: &FormattingTags) -> PasteOutcome {
    if html.trim().is_empty() || !is_word_html(html) {
        return PasteOutcome::PassThrough;
    }
    log::debug!("Normalizing word-processor paste ({} bytes)", html.len());
    PasteOutcome::Normalized(normalize_word_html(html, tags))
}

/// Rewrites word-processor HTML into line-oriented formatted text
///
/// # Example
///
/// ```
/// use blockpress_html::{normalize_word_html, FormattingTags};
///
/// let html = r#"<p class=MsoNormal><b>Bold</b> and <i>plain</i></p>"#;
/// let text = normalize_word_html(html, &FormattingTags::default());
/// assert_eq!(text, "<strong>Bold</strong> and plain");
/// ```
pub fn normalize_word_html(html: &str, tags: &FormattingTags) -> String {
    let dom = dom::parse(html);
    let mut out = String::with_capacity(html.len() / 2);
    if let Some(body) = dom::body(&dom) {
        for child in body.children.borrow().iter() {
            convert_node(child, tags, &mut out);
        }
    }
    normalize_whitespace(&out)
}

fn convert_node(handle: &Handle, tags: &FormattingTags, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => {
            // Word hard-wraps its HTML source at about 76 columns, so a newline
            // inside a run is layout from the exporter and reads as a space
            let text: String = contents
                .borrow()
                .chars()
                .map(|c| if c.is_whitespace() { ' ' } else { c })
                .collect();
            dom::escape_text(&text, out);
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref().to_ascii_lowercase();

            if NON_CONTENT.contains(&tag.as_str()) {
                return;
            }
            if tag == "br" {
                out.push('\n');
                return;
            }
            if tag == "p" && is_css_leak(&dom::collect_text_from_children(handle)) {
                log::debug!("Dropped paragraph holding stylesheet text");
                return;
            }

            let is_line_block = tag == "p" || tag == "div";
            let (open, close) = if tag == "b" || tag == "strong" {
                (tags.bold.open.clone(), tags.bold.close.clone())
            } else if tag == "mark"
                || (!is_line_block && has_background(dom::get_attr(attrs, "style")))
            {
                (tags.highlight.marked_open(), tags.highlight.close.clone())
            } else if tag == "a" {
                match dom::get_attr(attrs, "href").filter(|href| !href.is_empty()) {
                    Some(href) => {
                        let mut open = String::from("<a");
                        dom::push_attr(&mut open, "href", &href);
                        open.push('>');
                        (open, "</a>".to_string())
                    }
                    None => (String::new(), String::new()),
                }
            } else {
                (String::new(), String::new())
            };

            out.push_str(&open);
            for child in handle.children.borrow().iter() {
                convert_node(child, tags, out);
            }
            out.push_str(&close);

            if is_line_block {
                out.push('\n');
            }
        }
        _ => {}
    }
}

/// Whether a paragraph's text is stylesheet residue rather than content
fn is_css_leak(text: &str) -> bool {
    let trimmed = text.trim();
    CSS_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
        || CSS_MARKERS.iter().any(|marker| trimmed.contains(marker))
}

/// Whether an inline style sets a background colour
fn has_background(style: Option<String>) -> bool {
    let Some(style) = style else {
        return false;
    };
    style.split(';').any(|decl| {
        let Some((prop, value)) = decl.split_once(':') else {
            return false;
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();
        (prop == "background" || prop == "background-color")
            && !value.is_empty()
            && value != "transparent"
            && value != "none"
            && value != "initial"
    })
}

fn has_microsoft_generator(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    let mut rest = lower.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let end = tag.find('>').unwrap_or(tag.len());
        let normalized: String = tag[..end]
            .chars()
            .filter(|c| *c != '"' && *c != '\'')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if normalized.starts_with("<meta name=generator content=microsoft") {
            return true;
        }
        rest = &tag[end..];
    }
    false
}

/// Trims, collapses in-line whitespace runs and merges consecutive newlines
fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.trim().chars() {
        if ch == '\n' {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            if !out.ends_with('\n') {
                out.push('\n');
            }
        } else if ch.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_tags() -> FormattingTags {
        FormattingTags {
            bold: TagPair::from_template(r#"<span class="b">[TEXT]</span>"#),
            highlight: TagPair::from_template(r#"<span class="hl">[TEXT]</span>"#),
        }
    }

    #[test]
    fn test_detects_word_markers() {
        assert!(is_word_html(
            r#"<html xmlns:o="urn:schemas-microsoft-com:office:office">"#
        ));
        assert!(is_word_html(r#"<p class="MsoNormal">x</p>"#));
        assert!(is_word_html("<p class='MsoListParagraph'>x</p>"));
        assert!(is_word_html(
            r#"<meta name="Generator" content="Microsoft Word 15">"#
        ));
        assert!(is_word_html("<META name=Generator content=Microsoft>"));
    }

    #[test]
    fn test_rejects_other_html() {
        assert!(!is_word_html("<p>plain <b>html</b></p>"));
        assert!(!is_word_html(r#"<meta name="generator" content="Hugo">"#));
    }

    #[test]
    fn test_bold_and_highlight_use_formatting_map() {
        let html = concat!(
            r#"<p class=MsoNormal><b>bold</b> "#,
            r#"<span style="background:yellow;mso-highlight:yellow">hl</span></p>"#
        );
        assert_eq!(
            normalize_word_html(html, &custom_tags()),
            r#"<span class="b">bold</span> <span class="hl" data-highlight="true">hl</span>"#
        );
    }

    #[test]
    fn test_mark_becomes_highlight() {
        let text = normalize_word_html("<p class=MsoNormal><mark>m</mark></p>", &FormattingTags::default());
        assert_eq!(text, r#"<mark data-highlight="true">m</mark>"#);
    }

    #[test]
    fn test_links_keep_only_href() {
        let html = r#"<p class=MsoNormal><a href="https://e.com" style="color:blue">site</a><a name="_x">anchor</a></p>"#;
        assert_eq!(
            normalize_word_html(html, &FormattingTags::default()),
            r#"<a href="https://e.com">site</a>anchor"#
        );
    }

    #[test]
    fn test_drops_styles_comments_and_css_paragraphs() {
        let html = concat!(
            "<html><head><style>p.MsoNormal{mso-style-parent:\"\"}</style></head><body>",
            "<!--StartFragment-->",
            "<p>/* Style Definitions */ table.MsoNormalTable</p>",
            "<p class=MsoNormal>Body<o:p></o:p></p>",
            "<!--EndFragment--></body></html>"
        );
        assert_eq!(normalize_word_html(html, &FormattingTags::default()), "Body");
    }

    #[test]
    fn test_paragraphs_become_single_newlines() {
        let html = "<p class=MsoNormal>one</p><p class=MsoNormal>&nbsp;</p><p class=MsoNormal>two</p>";
        assert_eq!(
            normalize_word_html(html, &FormattingTags::default()),
            "one\n \ntwo"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        let html = "<p class=MsoNormal>a\t\tb\r\n   c</p>";
        assert_eq!(normalize_word_html(html, &FormattingTags::default()), "a b c");
    }

    #[test]
    fn test_wrapped_source_line_joins_with_space() {
        let html = "<p class=MsoNormal>the quick brown\r\nfox</p>";
        assert_eq!(
            normalize_word_html(html, &FormattingTags::default()),
            "the quick brown fox"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let html = "<p class=MsoNormal>1 &lt; 2</p>";
        assert_eq!(normalize_word_html(html, &FormattingTags::default()), "1 &lt; 2");
    }

    #[test]
    fn test_paste_passes_through_non_word() {
        assert_eq!(
            paste("<b>x</b>", &FormattingTags::default()),
            PasteOutcome::PassThrough
        );
        assert_eq!(
            paste("<p class=MsoNormal><b>x</b></p>", &FormattingTags::default()),
            PasteOutcome::Normalized("<strong>x</strong>".to_string())
        );
    }

    #[test]
    fn test_tag_pair_from_template() {
        let pair = TagPair::from_template("<em class=\"x\">[TEXT]</em>");
        assert_eq!(pair.open, "<em class=\"x\">");
        assert_eq!(pair.close, "</em>");
        assert_eq!(TagPair::from_template("<b>").close, "");
    }
}
