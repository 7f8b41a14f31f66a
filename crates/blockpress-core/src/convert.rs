//! Conversion engine
//!
//! Turns one input block into an HTML fragment using the tag definition it is
//! bound to. Problems never abort a conversion: they degrade to an inert
//! `<!-- Warning: ... -->` comment in the output so the rest of the batch still
//! converts.
//!
//! # Dispatch
//!
//! ```text
//! convert(tag, block)
//!     ├─ tag unresolved        → unknown tag warning
//!     ├─ static                → trimmed template (input ignored)
//!     ├─ extract text          → plain text for link-list, formatted otherwise
//!     ├─ blank input           → ""
//!     ├─ blank template        → empty template warning
//!     └─ per-type algorithm    → cleanup → + "\n"
//! ```

use crate::cleanup::cleanup;
use crate::model::{InputBlock, TagDefinition, TagType};
use crate::placeholder::{substitute, substitute_pairs};
use blockpress_html::{extract_plain_text, extract_text};
use regex::Regex;
use std::sync::OnceLock;

/// Item template used by `link-list` tags without their own
pub const DEFAULT_LINK_ITEM_TEMPLATE: &str = r#"<li><a href="[URL]">[TEXT]</a></li>"#;

const DEFAULT_LINK_TEXT: &str = "link";
const NO_LIST_ITEMS: &str = "<li>no list items</li>";
const NO_LINK_ITEMS: &str = "<li>no link items</li>";
const NO_PARAGRAPH: &str = "no paragraph";

/// Converts one block with the tag it is bound to
///
/// `tag` is `None` when the block's tag id no longer resolves in the active
/// pattern.
///
/// # Example
///
/// ```
/// use blockpress_core::convert::convert;
/// use blockpress_core::model::{InputBlock, TagDefinition, TagType};
///
/// let tag = TagDefinition {
///     id: "p".into(),
///     name: "Paragraph".into(),
///     template: "<p>[TEXT]</p>".into(),
///     tag_type: TagType::Multi,
///     link_item_template: None,
///     remove_last_br: false,
/// };
/// let block = InputBlock {
///     group_id: "area-group-1".into(),
///     tag_id: "p".into(),
///     content: "x<br>y".into(),
/// };
/// assert_eq!(convert(Some(&tag), &block), "<p>x</p>\n<p>y</p>\n");
/// ```
pub fn convert(tag: Option<&TagDefinition>, block: &InputBlock) -> String {
    let Some(tag) = tag else {
        return warning(&format!("unknown tag id ({}), block skipped", block.tag_id));
    };

    let text = match tag.tag_type {
        TagType::Static => return render_static(tag),
        TagType::LinkList => extract_plain_text(&block.content),
        _ => extract_text(&block.content),
    };

    if text.trim().is_empty() {
        return String::new();
    }
    if tag.template.trim().is_empty() {
        return empty_template_warning(tag);
    }

    let rendered = match tag.tag_type {
        TagType::Single => Ok(single(tag, &text)),
        TagType::Multi => multi(tag, &text),
        TagType::List => Ok(list(tag, &text)),
        TagType::Link => link(tag, &text),
        TagType::PList => Ok(p_list(tag, &text)),
        TagType::LinkList => Ok(link_list(tag, &text)),
        TagType::Static => Ok(tag.template.trim().to_string()),
    };

    match rendered {
        Ok(html) => {
            let mut out = cleanup(&html);
            out.push('\n');
            out
        }
        Err(warning) => warning,
    }
}

fn render_static(tag: &TagDefinition) -> String {
    let template = tag.template.trim();
    if template.is_empty() {
        return empty_template_warning(tag);
    }
    format!("{}\n", template)
}

fn single(tag: &TagDefinition, text: &str) -> String {
    let mut content = text.trim().replace('\n', "<br>");
    if tag.remove_last_br {
        content = strip_trailing_br(&content);
    }
    substitute_pairs(&tag.template, &[("[TEXT]", content.as_str())])
}

fn multi(tag: &TagDefinition, text: &str) -> Result<String, String> {
    let mut instances: Vec<String> = non_blank_lines(text)
        .map(|line| substitute_pairs(&tag.template, &[("[TEXT]", line.trim())]))
        .collect();

    if instances.is_empty() {
        return Err(warning("no text entered"));
    }
    if tag.remove_last_br {
        strip_last(&mut instances);
    }
    Ok(instances.join("\n"))
}

fn list(tag: &TagDefinition, text: &str) -> String {
    let mut items: Vec<String> = non_blank_lines(text).map(list_item).collect();
    if tag.remove_last_br {
        strip_last(&mut items);
    }

    let mut content = items.join("\n");
    if content.trim().is_empty() {
        content = NO_LIST_ITEMS.to_string();
    }
    substitute_pairs(&tag.template, &[("[TEXT]", content.as_str())])
}

fn link(tag: &TagDefinition, text: &str) -> Result<String, String> {
    let lines: Vec<&str> = text.trim().split('\n').map(str::trim).collect();
    let link_text = lines
        .first()
        .copied()
        .filter(|line| !line.is_empty())
        .unwrap_or(DEFAULT_LINK_TEXT);
    let url = lines.get(1).copied().unwrap_or_default();

    if url.is_empty() {
        return Err(warning(&format!(
            "link block has no URL on line 2 ({})",
            link_text
        )));
    }

    let mut out = substitute_pairs(&tag.template, &[("[TEXT]", link_text), ("[URL]", url)]);
    if tag.remove_last_br {
        out = strip_trailing_br(&out);
    }
    Ok(out)
}

fn p_list(tag: &TagDefinition, text: &str) -> String {
    let mut paragraphs: Vec<&str> = Vec::new();
    let mut list_lines: Vec<&str> = Vec::new();

    for line in non_blank_lines(text).map(str::trim) {
        match line.strip_prefix(['-', '*']) {
            Some(item) => list_lines.push(item.trim()),
            None => paragraphs.push(line),
        }
    }

    let list_content = if list_lines.is_empty() {
        NO_LIST_ITEMS.to_string()
    } else {
        let mut items: Vec<String> = list_lines.into_iter().map(list_item).collect();
        if tag.remove_last_br {
            strip_last(&mut items);
        }
        items.join("\n")
    };

    substitute(&tag.template, |name| match name {
        "TEXT_LIST" => Some(list_content.clone()),
        "TEXT_P" => Some(paragraphs.first().copied().unwrap_or(NO_PARAGRAPH).to_string()),
        _ => name
            .strip_prefix("TEXT_P_")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| paragraphs.get(index))
            .map(|paragraph| paragraph.to_string()),
    })
}

fn link_list(tag: &TagDefinition, text: &str) -> String {
    let item_template = tag
        .link_item_template
        .as_deref()
        .filter(|template| !template.trim().is_empty())
        .unwrap_or(DEFAULT_LINK_ITEM_TEMPLATE);

    let lines: Vec<&str> = text
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut entries: Vec<String> = lines
        .chunks(2)
        .map(|pair| match pair {
            [text, url] => {
                substitute_pairs(item_template, &[("[TEXT]", *text), ("[URL]", *url)])
            }
            _ => format!("<!-- Warning: no URL given for \"{}\" -->", pair[0]),
        })
        .collect();

    if tag.remove_last_br {
        strip_last(&mut entries);
    }

    let content = if entries.is_empty() {
        NO_LINK_ITEMS.to_string()
    } else {
        entries.join("\n")
    };
    substitute_pairs(&tag.template, &[("[LINK_LIST]", content.trim())])
}

/// Wraps a line in `<li>` unless it already starts with one
fn list_item(line: &str) -> String {
    if line.trim_start().to_ascii_lowercase().starts_with("<li") {
        line.to_string()
    } else {
        format!("<li>{}</li>", line.trim())
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.trim().split('\n').filter(|line| !line.trim().is_empty())
}

fn strip_last(items: &mut [String]) {
    if let Some(last) = items.last_mut() {
        *last = strip_trailing_br(last);
    }
}

/// Strips one trailing `<br>`/`<br/>` and any whitespace after it
fn strip_trailing_br(html: &str) -> String {
    static TRAILING_BR: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_BR
        .get_or_init(|| Regex::new(r"(?i)<br\s*/?\s*>\s*$").expect("trailing br pattern is valid"));
    re.replace(html, "").trim_end().to_string()
}

fn empty_template_warning(tag: &TagDefinition) -> String {
    warning(&format!(
        "template of tag ({}) is empty, block skipped",
        tag.name
    ))
}

fn warning(message: &str) -> String {
    format!("<!-- Warning: {} -->\n", message)
}
