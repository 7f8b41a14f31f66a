//! Word paste through sanitization and extraction

use blockpress_html::{
    FormattingTags, PasteOutcome, extract_plain_text, extract_text, paste, sanitize_html,
};
use blockpress_testkit::fixtures::WORD_PASTE_HTML;

fn normalized_word_paste() -> String {
    match paste(WORD_PASTE_HTML, &FormattingTags::default()) {
        PasteOutcome::Normalized(html) => html,
        PasteOutcome::PassThrough => panic!("word fixture should be detected"),
    }
}

#[test]
fn test_word_paste_keeps_only_content() {
    let html = normalized_word_paste();

    assert!(html.contains("<strong>Release notes</strong>"));
    assert!(html.contains(r#"<mark data-highlight="true">login</mark>"#));
    for leaked in ["mso-", "Style Definitions", "MsoNormal", "StartFragment", "lang="] {
        assert!(!html.contains(leaked), "{} leaked into {}", leaked, html);
    }
}

#[test]
fn test_word_paste_extracts_one_line_per_paragraph() {
    let content = sanitize_html(&normalized_word_paste());
    let text = extract_text(&content);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "<strong>Release notes</strong>");
    assert!(lines[1].contains("<mark>login</mark>"));
    assert!(!text.contains("data-highlight"));

    let plain = extract_plain_text(&content);
    assert!(plain.starts_with("Release notes"));
    assert!(!plain.contains('<'));
}

#[test]
fn test_plain_html_is_only_sanitized() {
    let html = r#"<p>Hi <a href="javascript:alert(1)" onclick="x()">there</a></p><script>bad()</script>"#;
    assert_eq!(paste(html, &FormattingTags::default()), PasteOutcome::PassThrough);

    let content = sanitize_html(html);
    assert!(!content.contains("javascript:"));
    assert!(!content.contains("onclick"));
    assert!(!content.contains("bad()"));
    assert_eq!(extract_text(&content), "Hi <a>there</a>");
}
