//! Sample inputs shared by core and CLI tests

use std::path::Path;

/// Clipboard HTML as produced by a word processor
///
/// Normalized with the default formatting map, the first paragraph is bold
/// and `login` is highlighted.
pub const WORD_PASTE_HTML: &str = r#"<html xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:w="urn:schemas-microsoft-com:office:word">
<head>
<meta name=Generator content="Microsoft Word 15">
<style><!--
/* Style Definitions */
p.MsoNormal {mso-style-parent:""; margin:0mm; font-family:"Calibri",sans-serif;}
--></style>
</head>
<body lang=EN-US>
<!--StartFragment-->
<p class=MsoNormal><b><span lang=EN-US>Release notes</span></b></p>
<p class=MsoNormal>Fixed <span style='background:yellow;mso-highlight:yellow'>login</span> bug</p>
<!--EndFragment-->
</body>
</html>"#;

/// Pattern map written by an older version: `{tag}` formatting entries,
/// retired roles, and no `inputAreas`
pub const LEGACY_PATTERNS_JSON: &str = r#"{
  "pattern1": {
    "name": "Site",
    "buttons": [
      { "id": "p", "name": "Paragraph", "template": "<p>[TEXT]</p>", "tagType": "multi" },
      { "id": "old", "name": "Old", "template": "<p>[TEXT]</p>", "tagType": "paragraph" }
    ],
    "formattingMap": {
      "bold": { "tag": "strong" },
      "italic": { "tag": "em" },
      "highlight": { "template": "<mark>[TEXT]</mark>", "displayName": "Highlight" }
    }
  }
}"#;

/// Global block list from before blocks were stored per pattern
pub const LEGACY_BLOCKS_JSON: &str =
    r#"[{ "groupId": "area-group-4", "tagId": "p", "content": "kept<br>across upgrades" }]"#;

/// Writes a value into a file-backed data directory under `key`
pub fn write_store_value(data_dir: &Path, key: &str, value: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    std::fs::write(data_dir.join(format!("{}.json", key)), value)
}

/// Reads a value from a file-backed data directory
pub fn read_store_value(data_dir: &Path, key: &str) -> Option<String> {
    std::fs::read_to_string(data_dir.join(format!("{}.json", key))).ok()
}

/// Seeds a data directory with [`LEGACY_PATTERNS_JSON`] and [`LEGACY_BLOCKS_JSON`]
pub fn seed_legacy_data(data_dir: &Path) -> std::io::Result<()> {
    write_store_value(data_dir, "customTagPatternsV2", LEGACY_PATTERNS_JSON)?;
    write_store_value(data_dir, "inputAreasV2", LEGACY_BLOCKS_JSON)
}
