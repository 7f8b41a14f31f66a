//! Configuration data model
//!
//! Shapes mirror the persisted JSON (camelCase keys). A [`Pattern`] owns its tag
//! definitions, formatting map and input blocks; its id is the key it is stored
//! under and is not part of the serialized record.

use crate::error::BlockpressError;
use blockpress_html::{FormattingTags, TagPair};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder tokens recognized in templates
pub mod placeholders {
    pub const TEXT: &str = "[TEXT]";
    pub const URL: &str = "[URL]";
    pub const TEXT_P: &str = "[TEXT_P]";
    pub const TEXT_LIST: &str = "[TEXT_LIST]";
    pub const LINK_LIST: &str = "[LINK_LIST]";

    /// Positional paragraph placeholder, 1-based
    pub fn text_p(n: usize) -> String {
        format!("[TEXT_P_{}]", n)
    }
}

/// Conversion algorithm of a tag definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagType {
    /// Whole input into one template instance, lines joined with `<br>`
    Single,
    /// One template instance per non-blank line
    Multi,
    /// Lines become `<li>` items inside one template instance
    List,
    /// Line 1 is link text, line 2 the URL
    Link,
    /// Paragraph lines and `-`/`*` list lines into separate placeholders
    PList,
    /// Text/URL line pairs rendered through the link item template
    LinkList,
    /// Template emitted verbatim, input ignored
    Static,
}

impl TagType {
    pub const ALL: [TagType; 7] = [
        TagType::Single,
        TagType::Multi,
        TagType::List,
        TagType::Link,
        TagType::PList,
        TagType::LinkList,
        TagType::Static,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TagType::Single => "single",
            TagType::Multi => "multi",
            TagType::List => "list",
            TagType::Link => "link",
            TagType::PList => "p-list",
            TagType::LinkList => "link-list",
            TagType::Static => "static",
        }
    }

    /// Placeholders a template of this type must contain
    pub fn required_placeholders(self) -> &'static [&'static str] {
        use self::placeholders::{LINK_LIST, TEXT, TEXT_LIST, URL};
        match self {
            TagType::Single | TagType::Multi | TagType::List => &[TEXT],
            TagType::Link => &[TEXT, URL],
            TagType::PList => &[TEXT_LIST],
            TagType::LinkList => &[LINK_LIST],
            TagType::Static => &[],
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagType {
    type Err = BlockpressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BlockpressError::UnknownTagType(s.to_string()))
    }
}

/// A named conversion rule binding a tag type to a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDefinition {
    pub id: String,
    pub name: String,
    pub template: String,
    pub tag_type: TagType,
    /// Item template, used only by `link-list`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_item_template: Option<String>,
    #[serde(default)]
    pub remove_last_br: bool,
}

/// User-supplied fields of a tag definition, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDraft {
    pub name: String,
    pub tag_type: TagType,
    pub template: String,
    pub link_item_template: Option<String>,
    pub remove_last_br: bool,
}

impl TagDraft {
    pub fn new(name: impl Into<String>, tag_type: TagType, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag_type,
            template: template.into(),
            link_item_template: None,
            remove_last_br: false,
        }
    }

    pub(crate) fn into_definition(self, id: String) -> TagDefinition {
        TagDefinition {
            id,
            name: self.name,
            template: self.template,
            tag_type: self.tag_type,
            // Only link-list consumes an item template
            link_item_template: match self.tag_type {
                TagType::LinkList => self.link_item_template,
                _ => None,
            },
            remove_last_br: self.remove_last_br,
        }
    }
}

impl From<&TagDefinition> for TagDraft {
    fn from(def: &TagDefinition) -> Self {
        Self {
            name: def.name.clone(),
            tag_type: def.tag_type,
            template: def.template.clone(),
            link_item_template: def.link_item_template.clone(),
            remove_last_br: def.remove_last_br,
        }
    }
}

/// Logical formatting roles mapped by the formatting map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormattingRole {
    Bold,
    Highlight,
}

impl FormattingRole {
    pub const ALL: [FormattingRole; 2] = [FormattingRole::Bold, FormattingRole::Highlight];

    pub fn as_str(self) -> &'static str {
        match self {
            FormattingRole::Bold => "bold",
            FormattingRole::Highlight => "highlight",
        }
    }
}

impl fmt::Display for FormattingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormattingRole {
    type Err = BlockpressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(FormattingRole::Bold),
            "highlight" => Ok(FormattingRole::Highlight),
            other => Err(BlockpressError::UnknownFormattingRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingEntry {
    pub template: String,
    pub display_name: String,
}

/// Templates pasted formatting is rewritten to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingMap {
    pub bold: FormattingEntry,
    pub highlight: FormattingEntry,
}

impl FormattingMap {
    pub fn get(&self, role: FormattingRole) -> &FormattingEntry {
        match role {
            FormattingRole::Bold => &self.bold,
            FormattingRole::Highlight => &self.highlight,
        }
    }

    pub fn get_mut(&mut self, role: FormattingRole) -> &mut FormattingEntry {
        match role {
            FormattingRole::Bold => &mut self.bold,
            FormattingRole::Highlight => &mut self.highlight,
        }
    }

    /// Open/close tag pairs for the paste normalizer
    pub fn tags(&self) -> FormattingTags {
        FormattingTags {
            bold: TagPair::from_template(&self.bold.template),
            highlight: TagPair::from_template(&self.highlight.template),
        }
    }
}

/// One user-entered content area bound to a tag definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBlock {
    pub group_id: String,
    pub tag_id: String,
    /// Sanitized rich HTML
    #[serde(default)]
    pub content: String,
}

/// A named bundle of tag definitions, formatting map and input blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub buttons: Vec<TagDefinition>,
    pub formatting_map: FormattingMap,
    pub input_areas: Vec<InputBlock>,
}

impl Pattern {
    pub fn find_tag(&self, tag_id: &str) -> Option<&TagDefinition> {
        self.buttons.iter().find(|tag| tag.id == tag_id)
    }

    pub fn find_block(&self, group_id: &str) -> Option<&InputBlock> {
        self.input_areas.iter().find(|block| block.group_id == group_id)
    }
}

/// Serialized form of a [`Pattern`] (its id is the map key)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRecord {
    pub name: String,
    pub buttons: Vec<TagDefinition>,
    pub formatting_map: FormattingMap,
    pub input_areas: Vec<InputBlock>,
}

impl PatternRecord {
    pub fn into_pattern(self, id: String) -> Pattern {
        Pattern {
            id,
            name: self.name,
            buttons: self.buttons,
            formatting_map: self.formatting_map,
            input_areas: self.input_areas,
        }
    }
}

impl From<&Pattern> for PatternRecord {
    fn from(pattern: &Pattern) -> Self {
        Self {
            name: pattern.name.clone(),
            buttons: pattern.buttons.clone(),
            formatting_map: pattern.formatting_map.clone(),
            input_areas: pattern.input_areas.clone(),
        }
    }
}

/// `editorSettingsV2` record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub selected_pattern: String,
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_type_wire_names() {
        for tag_type in TagType::ALL {
            let json = serde_json::to_string(&tag_type).unwrap();
            assert_eq!(json, format!("\"{}\"", tag_type.as_str()));
            assert_eq!(tag_type.as_str().parse::<TagType>().unwrap(), tag_type);
        }
        assert!("paragraph".parse::<TagType>().is_err());
    }

    #[test]
    fn test_required_placeholders() {
        assert_eq!(TagType::Link.required_placeholders(), &["[TEXT]", "[URL]"]);
        assert_eq!(TagType::PList.required_placeholders(), &["[TEXT_LIST]"]);
        assert!(TagType::Static.required_placeholders().is_empty());
    }

    #[test]
    fn test_tag_definition_camel_case() {
        let json = r#"{"id":"x","name":"X","template":"<p>[TEXT]</p>","tagType":"p-list","removeLastBr":true}"#;
        let def: TagDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.tag_type, TagType::PList);
        assert!(def.remove_last_br);
        assert!(def.link_item_template.is_none());

        let out = serde_json::to_string(&def).unwrap();
        assert!(out.contains("\"tagType\":\"p-list\""));
        assert!(!out.contains("linkItemTemplate"));
    }

    #[test]
    fn test_draft_drops_item_template_for_other_types() {
        let mut draft = TagDraft::new("n", TagType::Single, "<p>[TEXT]</p>");
        draft.link_item_template = Some("<li>[TEXT]</li>".to_string());
        let def = draft.into_definition("custom1".to_string());
        assert!(def.link_item_template.is_none());
    }

    #[test]
    fn test_formatting_map_tags() {
        let map = FormattingMap {
            bold: FormattingEntry {
                template: "<b class=\"x\">[TEXT]</b>".to_string(),
                display_name: "Bold".to_string(),
            },
            highlight: FormattingEntry {
                template: "<mark>[TEXT]</mark>".to_string(),
                display_name: "Highlight".to_string(),
            },
        };
        let tags = map.tags();
        assert_eq!(tags.bold.open, "<b class=\"x\">");
        assert_eq!(tags.highlight.close, "</mark>");
    }

    #[test]
    fn test_formatting_role_parse() {
        assert_eq!("bold".parse::<FormattingRole>().unwrap(), FormattingRole::Bold);
        assert!("italic".parse::<FormattingRole>().is_err());
    }
}
