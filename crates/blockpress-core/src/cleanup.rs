//! Output cleanup applied to every converted fragment

use regex::Regex;
use std::sync::OnceLock;

/// Formatting tags whose adjacent runs are merged
const MERGE_TAGS: &[&str] = &["strong", "mark", "b", "em", "u", "span", "i"];

/// Tags removed when they hold nothing but whitespace
const EMPTY_TAGS: &[&str] = &[
    "strong", "mark", "b", "em", "u", "span", "i", "a", "p", "div", "h1", "h2", "h3", "h4", "h5",
    "h6",
];

const MAX_PASSES: usize = 5;

fn highlight_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r#"\s*data-highlight="true""#).expect("marker pattern is valid")
    })
}

fn empty_tag_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        EMPTY_TAGS
            .iter()
            .map(|tag| {
                // `<b` must be followed by whitespace or `>` so `<br>` never matches
                Regex::new(&format!(r"<{tag}(?:\s[^>]*)?>\s*</{tag}>"))
                    .expect("empty tag pattern is valid")
            })
            .collect()
    })
}

/// Removes the paste highlight marker, merges split formatting runs and drops empty elements
///
/// # Example
///
/// ```
/// use blockpress_core::cleanup::cleanup;
///
/// assert_eq!(cleanup("<strong></strong>text<em></em>"), "text");
/// assert_eq!(cleanup("<b>a</b><b>b</b>"), "<b>ab</b>");
/// ```
pub fn cleanup(html: &str) -> String {
    let mut cleaned = highlight_marker().replace_all(html, "").into_owned();

    for _ in 0..MAX_PASSES {
        let before = cleaned.clone();

        for tag in MERGE_TAGS {
            cleaned = cleaned.replace(&format!("</{tag}><{tag}>"), "");
        }
        for pattern in empty_tag_patterns() {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }

        if cleaned == before {
            break;
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_empty_formatting() {
        assert_eq!(cleanup("<strong></strong>text<em></em>"), "text");
    }

    #[test]
    fn test_strips_highlight_marker() {
        assert_eq!(
            cleanup(r#"<mark data-highlight="true">hl</mark>"#),
            "<mark>hl</mark>"
        );
        assert_eq!(
            cleanup(r#"<span class="x"  data-highlight="true">hl</span>"#),
            r#"<span class="x">hl</span>"#
        );
    }

    #[test]
    fn test_merges_adjacent_runs() {
        assert_eq!(
            cleanup("<strong>a</strong><strong>b</strong>"),
            "<strong>ab</strong>"
        );
        assert_eq!(
            cleanup("<span>a</span><span class=\"x\">b</span>"),
            "<span>a</span><span class=\"x\">b</span>"
        );
    }

    #[test]
    fn test_empty_with_attributes_and_whitespace() {
        assert_eq!(cleanup("<p class=\"lead\">  \n </p>after"), "after");
        assert_eq!(cleanup("<a href=\"/x\"></a>"), "");
    }

    #[test]
    fn test_nested_empties_removed() {
        assert_eq!(cleanup("<div><p><span> </span></p></div>x"), "x");
    }

    #[test]
    fn test_br_is_not_an_empty_b() {
        assert_eq!(cleanup("<p>a<br></b></p>"), "<p>a<br></b></p>");
        assert_eq!(cleanup("line<br>\n</br>"), "line<br>\n</br>");
    }

    #[test]
    fn test_keeps_void_and_unlisted_tags() {
        let html = "<ul>\n<li></li>\n</ul><hr>";
        assert_eq!(cleanup(html), html);
    }

    #[test]
    fn test_idempotent() {
        let html = "<div class=\"box\"><strong>a</strong><strong></strong></div>";
        let once = cleanup(html);
        assert_eq!(cleanup(&once), once);
        assert_eq!(once, "<div class=\"box\"><strong>a</strong></div>");
    }
}
