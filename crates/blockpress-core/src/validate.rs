//! Template validation
//!
//! Every template is checked here before it is accepted into a pattern. The
//! rules are shallow: required placeholders by tag type, a fixed
//! set of dangerous constructs, and a tag balance check that only warns.

use crate::model::{placeholders, TagDraft, TagType};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Reasons a template is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("template is missing the required placeholder {placeholder}")]
    MissingPlaceholder { placeholder: &'static str },

    #[error("template contains dangerous content ({reason})")]
    Dangerous { reason: &'static str },

    #[error("tag name must not be blank")]
    EmptyName,

    #[error("link item template: {0}")]
    LinkItem(Box<TemplateError>),
}

/// Elements that never take a closing tag
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

struct DangerRule {
    regex: Regex,
    reason: &'static str,
}

fn danger_rules() -> &'static [DangerRule] {
    static RULES: OnceLock<Vec<DangerRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"(?i)<\s*script\b", "script tag"),
            (r"(?i)javascript\s*:", "javascript: URL"),
            (r"(?i)vbscript\s*:", "vbscript: URL"),
            (
                r#"(?i)\b(?:href|src|action|formaction|xlink:href)\s*=\s*["']?\s*data\s*:"#,
                "data: URL in attribute",
            ),
            (r"(?i)\bon\w+\s*=", "inline event handler"),
            (r"(?i)<\s*(?:iframe|embed|object)\b", "iframe, embed or object tag"),
        ]
        .into_iter()
        .map(|(pattern, reason)| DangerRule {
            regex: Regex::new(pattern).expect("danger rule pattern is valid"),
            reason,
        })
        .collect()
    })
}

/// Returns the reason of the first dangerous construct found
fn find_danger(template: &str) -> Option<&'static str> {
    danger_rules()
        .iter()
        .find(|rule| rule.regex.is_match(template))
        .map(|rule| rule.reason)
}

/// Validates a template for the given tag type
///
/// # Example
///
/// ```
/// use blockpress_core::model::TagType;
/// use blockpress_core::validate::{validate, TemplateError};
///
/// assert!(validate("<p>[TEXT]</p>", TagType::Single).is_ok());
/// assert_eq!(
///     validate("<a>[TEXT]</a>", TagType::Link),
///     Err(TemplateError::MissingPlaceholder { placeholder: "[URL]" })
/// );
/// ```
pub fn validate(template: &str, tag_type: TagType) -> Result<(), TemplateError> {
    if template.trim().is_empty() {
        return Err(TemplateError::Empty);
    }

    if tag_type == TagType::Static {
        return Ok(());
    }

    if let Some(placeholder) = tag_type
        .required_placeholders()
        .iter()
        .copied()
        .find(|placeholder| !template.contains(placeholder))
    {
        return Err(TemplateError::MissingPlaceholder { placeholder });
    }

    if let Some(reason) = find_danger(template) {
        return Err(TemplateError::Dangerous { reason });
    }

    let (open, close) = tag_balance(template);
    if open != close {
        log::warn!(
            "Template tags may be unbalanced ({} opening, {} closing): {}",
            open,
            close,
            template
        );
    }

    Ok(())
}

/// Validates every user-supplied field of a tag definition
pub fn validate_tag(draft: &TagDraft) -> Result<(), TemplateError> {
    if draft.name.trim().is_empty() {
        return Err(TemplateError::EmptyName);
    }

    validate(&draft.template, draft.tag_type)?;

    if draft.tag_type == TagType::LinkList {
        if let Some(item) = &draft.link_item_template {
            validate(item, TagType::Link).map_err(|e| TemplateError::LinkItem(Box::new(e)))?;
        }
    }

    Ok(())
}

/// Validates a formatting map template
pub fn validate_formatting_template(template: &str) -> Result<(), TemplateError> {
    if template.trim().is_empty() {
        return Err(TemplateError::Empty);
    }
    if !template.contains(placeholders::TEXT) {
        return Err(TemplateError::MissingPlaceholder {
            placeholder: placeholders::TEXT,
        });
    }
    if let Some(reason) = find_danger(template) {
        return Err(TemplateError::Dangerous { reason });
    }
    Ok(())
}

/// Counts opening and closing tags, ignoring void elements
fn tag_balance(template: &str) -> (usize, usize) {
    static OPEN: OnceLock<Regex> = OnceLock::new();
    static CLOSE: OnceLock<Regex> = OnceLock::new();
    let open_re = OPEN.get_or_init(|| {
        Regex::new(r"<([A-Za-z][A-Za-z0-9-]*)\b[^>]*>").expect("open tag pattern is valid")
    });
    let close_re = CLOSE
        .get_or_init(|| Regex::new(r"</[A-Za-z][^>]*>").expect("close tag pattern is valid"));

    let open = open_re
        .captures_iter(template)
        .filter(|caps| {
            let name = caps[1].to_ascii_lowercase();
            !VOID_TAGS.contains(&name.as_str()) && !caps[0].ends_with("/>")
        })
        .count();
    let close = close_re.find_iter(template).count();
    (open, close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_template_rejected_for_every_type() {
        for tag_type in TagType::ALL {
            assert_eq!(validate("   ", tag_type), Err(TemplateError::Empty));
        }
    }

    #[test]
    fn test_static_skips_other_checks() {
        assert!(validate("<hr>", TagType::Static).is_ok());
        assert!(validate("<script>x()</script>", TagType::Static).is_ok());
    }

    #[test]
    fn test_missing_placeholder_named() {
        let cases = [
            ("<p></p>", TagType::Single, "[TEXT]"),
            ("<p></p>", TagType::Multi, "[TEXT]"),
            ("<ul></ul>", TagType::List, "[TEXT]"),
            ("<a href=\"[URL]\"></a>", TagType::Link, "[TEXT]"),
            ("<a>[TEXT]</a>", TagType::Link, "[URL]"),
            ("<p>[TEXT_P_1]</p>", TagType::PList, "[TEXT_LIST]"),
            ("<ul>[TEXT]</ul>", TagType::LinkList, "[LINK_LIST]"),
        ];
        for (template, tag_type, placeholder) in cases {
            let err = validate(template, tag_type).unwrap_err();
            assert_eq!(err, TemplateError::MissingPlaceholder { placeholder });
            assert!(err.to_string().contains(placeholder));
        }
    }

    #[test]
    fn test_dangerous_content_rejected() {
        let templates = [
            "<p>[TEXT]</p><script>alert(1)</script>",
            "<p>[TEXT]</p><SCRIPT src=x></SCRIPT>",
            "<p onclick=\"x()\">[TEXT]</p>",
            "<p ONMOUSEOVER = 'x'>[TEXT]</p>",
            "<a href=\"javascript:void(0)\">[TEXT]</a>",
            "<a href=\"VBScript:msg\">[TEXT]</a>",
            "<img src=\"data:image/png;base64,xx\">[TEXT]",
            "<iframe>[TEXT]</iframe>",
            "<embed>[TEXT]",
            "<object>[TEXT]</object>",
        ];
        for template in templates {
            assert!(
                matches!(
                    validate(template, TagType::Single),
                    Err(TemplateError::Dangerous { .. })
                ),
                "should reject {}",
                template
            );
        }
    }

    #[test]
    fn test_benign_lookalikes_accepted() {
        assert!(validate("<button class=\"x\">[TEXT]</button>", TagType::Single).is_ok());
        assert!(validate("<p data-x=\"data:ok\">[TEXT]</p>", TagType::Single).is_ok());
        assert!(validate("<p>Notes on = sign [TEXT]</p>", TagType::Single).is_ok());
    }

    #[test]
    fn test_unbalanced_template_is_still_valid() {
        assert!(validate("<div class=\"box\">[TEXT]", TagType::Multi).is_ok());
        assert_eq!(tag_balance("<div class=\"box\">[TEXT]"), (1, 0));
        assert_eq!(tag_balance("<p>[TEXT]<br><img src=x/></p>"), (1, 1));
    }

    #[test]
    fn test_validate_tag_checks_name_and_item_template() {
        let mut draft = TagDraft::new(" ", TagType::Single, "<p>[TEXT]</p>");
        assert_eq!(validate_tag(&draft), Err(TemplateError::EmptyName));

        draft = TagDraft::new("links", TagType::LinkList, "<ul>[LINK_LIST]</ul>");
        draft.link_item_template = Some("<li>[TEXT]</li>".to_string());
        assert_eq!(
            validate_tag(&draft),
            Err(TemplateError::LinkItem(Box::new(
                TemplateError::MissingPlaceholder { placeholder: "[URL]" }
            )))
        );

        draft.link_item_template = Some("<li><a href=\"[URL]\">[TEXT]</a></li>".to_string());
        assert!(validate_tag(&draft).is_ok());
    }

    #[test]
    fn test_formatting_template_rules() {
        assert!(validate_formatting_template("<b>[TEXT]</b>").is_ok());
        assert_eq!(
            validate_formatting_template("<b></b>"),
            Err(TemplateError::MissingPlaceholder { placeholder: "[TEXT]" })
        );
        assert!(matches!(
            validate_formatting_template("<b onclick=\"x\">[TEXT]</b>"),
            Err(TemplateError::Dangerous { .. })
        ));
    }
}
