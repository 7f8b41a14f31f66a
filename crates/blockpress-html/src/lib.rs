//! HTML handling for blockpress block content.
//!
//! Block content is rich HTML as produced by an editable surface or pasted from
//! another application. This crate turns it into the line-oriented text the
//! conversion engine works on.
//!
//! # Architecture
//!
//! - [`sanitize`]: allow-list sanitizer applied to every piece of external content
//! - [`extract`]: formatting-preserving and plain-text extraction
//! - [`paste`]: word-processor paste detection and normalization
//! - [`dom`]: html5ever parsing and tree helpers shared by the modules above
//!
//! # Flow
//!
//! ```text
//! pasted HTML ──paste()──► normalized HTML ─┐
//!                                           ├─► sanitize_html() ─► block content
//! typed/imported HTML ──────────────────────┘
//!
//! block content ─► extract_text() / extract_plain_text() ─► conversion engine
//! ```
//!
//! # Example
//!
//! ```
//! use blockpress_html::{extract_text, sanitize_html};
//!
//! let content = sanitize_html(r#"<div>line <b onclick="x()">one</b></div><div>two</div>"#);
//! assert_eq!(content, "<div>line <b>one</b></div><div>two</div>");
//! assert_eq!(extract_text(&content), "line <b>one</b>\ntwo");
//! ```

pub mod dom;
pub mod extract;
pub mod paste;
pub mod sanitize;

pub use extract::{extract_plain_text, extract_text, text_to_html};
pub use paste::{
    FormattingTags, HIGHLIGHT_MARKER, PasteOutcome, TagPair, is_word_html, normalize_word_html,
    paste,
};
pub use sanitize::{is_dangerous_href, sanitize_html};
