//! Data used on first run and whenever saved data is unusable

use crate::convert::DEFAULT_LINK_ITEM_TEMPLATE;
use crate::model::{
    FormattingEntry, FormattingMap, FormattingRole, Pattern, TagDefinition, TagType,
};

pub const DEFAULT_PATTERN_ID: &str = "pattern1";

/// Default entry for one formatting role
pub fn formatting_entry(role: FormattingRole) -> FormattingEntry {
    let (template, display_name) = match role {
        FormattingRole::Bold => ("<strong>[TEXT]</strong>", "Bold"),
        FormattingRole::Highlight => ("<mark>[TEXT]</mark>", "Highlight"),
    };
    FormattingEntry {
        template: template.to_string(),
        display_name: display_name.to_string(),
    }
}

pub fn formatting_map() -> FormattingMap {
    FormattingMap {
        bold: formatting_entry(FormattingRole::Bold),
        highlight: formatting_entry(FormattingRole::Highlight),
    }
}

fn tag(id: &str, name: &str, tag_type: TagType, template: &str) -> TagDefinition {
    TagDefinition {
        id: id.to_string(),
        name: name.to_string(),
        template: template.to_string(),
        tag_type,
        link_item_template: None,
        remove_last_br: false,
    }
}

fn default_tags() -> Vec<TagDefinition> {
    let mut link_list = tag(
        "link-list-sample",
        "Link list",
        TagType::LinkList,
        "<div class=\"link-wrapper\">\n<ul>\n[LINK_LIST]\n</ul>\n</div>",
    );
    link_list.link_item_template = Some(DEFAULT_LINK_ITEM_TEMPLATE.to_string());

    vec![
        tag("p", "Paragraph", TagType::Multi, "<p>[TEXT]</p>"),
        tag("h2", "Heading 2", TagType::Multi, "<h2>[TEXT]</h2>"),
        tag("box", "Box", TagType::Multi, "<div class=\"box\">[TEXT]</div>"),
        tag(
            "box-p-ul",
            "Box with list",
            TagType::PList,
            "<div class=\"box\"><p>[TEXT_P_1]</p><p>[TEXT_P_2]</p><ul>\n[TEXT_LIST]\n</ul></div>",
        ),
        link_list,
    ]
}

fn custom_example_tags() -> Vec<TagDefinition> {
    vec![
        tag(
            "p-red",
            "Red paragraph",
            TagType::Single,
            "<p style=\"color:red;\">[TEXT]</p>",
        ),
        tag(
            "h2-border",
            "Underlined H2",
            TagType::Single,
            "<h2 style=\"border-bottom: 2px solid black;\">[TEXT]</h2>",
        ),
        tag(
            "note",
            "Note box",
            TagType::Single,
            "<div class=\"note\" style=\"border: 1px solid red; padding: 10px;\">\n<p style=\"font-weight: bold;\">Note:</p>\n[TEXT]\n</div>",
        ),
    ]
}

/// The two patterns a fresh workspace starts with
pub fn patterns() -> Vec<Pattern> {
    vec![
        Pattern {
            id: DEFAULT_PATTERN_ID.to_string(),
            name: "Default".to_string(),
            buttons: default_tags(),
            formatting_map: formatting_map(),
            input_areas: Vec::new(),
        },
        Pattern {
            id: "pattern2".to_string(),
            name: "Custom example".to_string(),
            buttons: custom_example_tags(),
            formatting_map: formatting_map(),
            input_areas: Vec::new(),
        },
    ]
}
