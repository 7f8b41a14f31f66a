//! Load-time normalization of saved data
//!
//! Saved data from older versions is upgraded once, when a workspace is
//! loaded. Nothing here fails: unusable input falls back to defaults and is
//! reported as a [`LoadNotice`].
//!
//! ```text
//! customTagPatternsV2 ──► ordered (id, value) pairs
//!                          ├─ formattingMap: add / {tag} → {template} / drop italic, underline
//!                          ├─ inputAreas: add [] / skip unreadable blocks
//!                          └─ buttons: skip unreadable definitions
//! inputAreasV2 (legacy) ──► selected pattern, if it has no blocks
//! editorSettingsV2 ──────► selected id, else pattern1, else first
//! ```

use super::defaults;
use crate::model::{
    FormattingEntry, FormattingMap, FormattingRole, InputBlock, Pattern, PatternRecord, Settings,
    TagDefinition,
};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Version written to the settings record
pub const SCHEMA_VERSION: u32 = 2;

/// Formatting roles older versions supported and that are now dropped
const RETIRED_ROLES: &[&str] = &["italic", "underline"];

/// Something load-time normalization changed or had to discard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadNotice {
    /// Saved pattern data was not valid; defaults were used
    CorruptData { reason: String },
    /// Saved pattern map was empty; defaults were used
    EmptyPatterns,
    /// A pattern entry that is not an object was dropped
    PatternSkipped { pattern: String },
    FormattingMapAdded { pattern: String },
    FormattingUpgraded { pattern: String, role: FormattingRole },
    RolesRemoved { pattern: String, roles: Vec<String> },
    ButtonSkipped { pattern: String, index: usize, reason: String },
    BlockSkipped { pattern: String, index: usize, reason: String },
    LegacyBlocksMigrated { pattern: String, count: usize },
    SelectionReset { requested: String, selected: String },
    /// A stored value could not be read and was treated as missing
    ReadFailed { key: String, reason: String },
    /// Normalized data could not be saved; it is kept in memory only
    WriteBackFailed { reason: String },
}

impl fmt::Display for LoadNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadNotice::CorruptData { reason } => {
                write!(f, "saved patterns could not be read ({}), defaults restored", reason)
            }
            LoadNotice::EmptyPatterns => write!(f, "no saved patterns, defaults restored"),
            LoadNotice::PatternSkipped { pattern } => {
                write!(f, "pattern '{}' is not an object and was dropped", pattern)
            }
            LoadNotice::FormattingMapAdded { pattern } => {
                write!(f, "pattern '{}' had no formatting map, defaults added", pattern)
            }
            LoadNotice::FormattingUpgraded { pattern, role } => {
                write!(f, "pattern '{}': {} formatting upgraded to a template", pattern, role)
            }
            LoadNotice::RolesRemoved { pattern, roles } => write!(
                f,
                "pattern '{}': unsupported formatting removed ({})",
                pattern,
                roles.join(", ")
            ),
            LoadNotice::ButtonSkipped {
                pattern,
                index,
                reason,
            } => write!(
                f,
                "pattern '{}': tag #{} skipped ({})",
                pattern,
                index + 1,
                reason
            ),
            LoadNotice::BlockSkipped {
                pattern,
                index,
                reason,
            } => write!(
                f,
                "pattern '{}': block #{} skipped ({})",
                pattern,
                index + 1,
                reason
            ),
            LoadNotice::LegacyBlocksMigrated { pattern, count } => {
                write!(f, "{} saved block(s) moved into pattern '{}'", count, pattern)
            }
            LoadNotice::SelectionReset {
                requested,
                selected,
            } => write!(
                f,
                "selected pattern '{}' no longer exists, '{}' selected instead",
                requested, selected
            ),
            LoadNotice::ReadFailed { key, reason } => {
                write!(f, "could not read '{}' ({}), continuing without it", key, reason)
            }
            LoadNotice::WriteBackFailed { reason } => write!(
                f,
                "upgraded data could not be saved ({}), changes are kept in memory only",
                reason
            ),
        }
    }
}

/// Raw values read from storage
#[derive(Debug, Default, Clone, Copy)]
pub struct SavedData<'a> {
    pub patterns: Option<&'a str>,
    pub settings: Option<&'a str>,
    pub legacy_blocks: Option<&'a str>,
}

/// Result of normalizing [`SavedData`]
#[derive(Debug)]
pub struct Migrated {
    pub patterns: Vec<Pattern>,
    pub selected: String,
    pub notices: Vec<LoadNotice>,
    /// The legacy block list was read and its key can be removed
    pub legacy_consumed: bool,
}

/// JSON object deserialized with its key order intact
struct OrderedObject(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for OrderedObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedObject;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by pattern id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, Value)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    match entries.iter_mut().find(|(existing, _)| *existing == key) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(OrderedObject(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Serializes patterns as an object keyed by id, in list order
pub fn serialize_patterns(patterns: &[Pattern]) -> serde_json::Result<String> {
    struct PatternMap<'a>(&'a [Pattern]);

    impl Serialize for PatternMap<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(
                self.0
                    .iter()
                    .map(|pattern| (pattern.id.as_str(), PatternRecord::from(pattern))),
            )
        }
    }

    serde_json::to_string(&PatternMap(patterns))
}

/// Normalizes saved data into a usable pattern list and selection
pub fn migrate(saved: SavedData<'_>) -> Migrated {
    let mut notices = Vec::new();

    let mut patterns = match saved.patterns {
        None => defaults::patterns(),
        Some(raw) => match serde_json::from_str::<OrderedObject>(raw) {
            Ok(OrderedObject(entries)) => {
                let patterns: Vec<Pattern> = entries
                    .into_iter()
                    .filter_map(|(id, value)| migrate_pattern(id, value, &mut notices))
                    .collect();
                if patterns.is_empty() {
                    log::warn!("Saved pattern map is empty, restoring defaults");
                    notices.push(LoadNotice::EmptyPatterns);
                    defaults::patterns()
                } else {
                    patterns
                }
            }
            Err(e) => {
                log::warn!("Saved patterns are corrupt, restoring defaults: {}", e);
                notices.push(LoadNotice::CorruptData {
                    reason: e.to_string(),
                });
                defaults::patterns()
            }
        },
    };

    let requested = saved
        .settings
        .and_then(|raw| match serde_json::from_str::<Settings>(raw) {
            Ok(settings) => Some(settings.selected_pattern),
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                None
            }
        });
    let selected = select(&patterns, requested.as_deref());
    if let Some(requested) = requested.filter(|r| *r != selected) {
        notices.push(LoadNotice::SelectionReset {
            requested,
            selected: selected.clone(),
        });
    }

    let legacy_consumed = match saved.legacy_blocks {
        Some(raw) => migrate_legacy_blocks(raw, &mut patterns, &selected, &mut notices),
        None => false,
    };

    for notice in &notices {
        log::info!("{}", notice);
    }

    Migrated {
        patterns,
        selected,
        notices,
        legacy_consumed,
    }
}

/// Saved selection if it exists, else `pattern1`, else the first pattern
fn select(patterns: &[Pattern], requested: Option<&str>) -> String {
    [requested, Some(defaults::DEFAULT_PATTERN_ID)]
        .into_iter()
        .flatten()
        .find(|id| patterns.iter().any(|p| p.id == *id))
        .map(str::to_string)
        .or_else(|| patterns.first().map(|p| p.id.clone()))
        .unwrap_or_else(|| defaults::DEFAULT_PATTERN_ID.to_string())
}

fn migrate_pattern(id: String, value: Value, notices: &mut Vec<LoadNotice>) -> Option<Pattern> {
    let Value::Object(mut object) = value else {
        notices.push(LoadNotice::PatternSkipped { pattern: id });
        return None;
    };

    let name = match object.remove("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => id.clone(),
    };

    let formatting_map = match object.remove("formattingMap") {
        Some(Value::Object(map)) => migrate_formatting(&id, map, notices),
        _ => {
            notices.push(LoadNotice::FormattingMapAdded {
                pattern: id.clone(),
            });
            defaults::formatting_map()
        }
    };

    let buttons = parse_entries::<TagDefinition>(object.remove("buttons"))
        .filter_map(|(index, parsed)| match parsed {
            Ok(tag) => Some(tag),
            Err(reason) => {
                log::warn!("Skipping tag #{} of pattern '{}': {}", index + 1, id, reason);
                notices.push(LoadNotice::ButtonSkipped {
                    pattern: id.clone(),
                    index,
                    reason,
                });
                None
            }
        })
        .collect();

    let input_areas = parse_entries::<InputBlock>(object.remove("inputAreas"))
        .filter_map(|(index, parsed)| match parsed {
            Ok(block) => Some(block),
            Err(reason) => {
                notices.push(LoadNotice::BlockSkipped {
                    pattern: id.clone(),
                    index,
                    reason,
                });
                None
            }
        })
        .collect();

    Some(Pattern {
        id,
        name,
        buttons,
        formatting_map,
        input_areas,
    })
}

/// Parses each element of an optional JSON array, keeping failures by index
fn parse_entries<T>(value: Option<Value>) -> impl Iterator<Item = (usize, Result<T, String>)>
where
    T: serde::de::DeserializeOwned,
{
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| (index, serde_json::from_value(item).map_err(|e| e.to_string())))
}

fn migrate_formatting(
    pattern: &str,
    mut map: Map<String, Value>,
    notices: &mut Vec<LoadNotice>,
) -> FormattingMap {
    let retired: Vec<String> = RETIRED_ROLES
        .iter()
        .filter(|role| map.remove(**role).is_some())
        .map(|role| role.to_string())
        .collect();
    if !retired.is_empty() {
        notices.push(LoadNotice::RolesRemoved {
            pattern: pattern.to_string(),
            roles: retired,
        });
    }

    let mut entry = |role: FormattingRole| {
        let value = map.remove(role.as_str());
        let (entry, upgraded) = migrate_entry(role, value);
        if upgraded {
            notices.push(LoadNotice::FormattingUpgraded {
                pattern: pattern.to_string(),
                role,
            });
        }
        entry
    };

    FormattingMap {
        bold: entry(FormattingRole::Bold),
        highlight: entry(FormattingRole::Highlight),
    }
}

/// Returns the entry and whether an old `{tag}` form was upgraded
fn migrate_entry(role: FormattingRole, value: Option<Value>) -> (FormattingEntry, bool) {
    let default = defaults::formatting_entry(role);
    let Some(Value::Object(mut object)) = value else {
        return (default, false);
    };

    let old_tag = match object.remove("tag") {
        Some(Value::String(tag)) if !tag.trim().is_empty() => Some(tag.trim().to_string()),
        _ => None,
    };

    let (template, upgraded) = match (object.remove("template"), old_tag) {
        (Some(Value::String(template)), _) if !template.trim().is_empty() => (template, false),
        (_, Some(tag)) => (format!("<{tag}>[TEXT]</{tag}>"), true),
        _ => (default.template, false),
    };

    let display_name = match object.remove("displayName") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => default.display_name,
    };

    (
        FormattingEntry {
            template,
            display_name,
        },
        upgraded,
    )
}

/// Moves the legacy global block list into the selected pattern
///
/// Returns true when the legacy value was valid JSON and can be removed.
fn migrate_legacy_blocks(
    raw: &str,
    patterns: &mut [Pattern],
    selected: &str,
    notices: &mut Vec<LoadNotice>,
) -> bool {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Keeping unreadable legacy block list: {}", e);
            return false;
        }
    };

    let blocks: Vec<InputBlock> = parse_entries::<InputBlock>(Some(value))
        .filter_map(|(_, parsed)| parsed.ok())
        .collect();

    if let Some(pattern) = patterns.iter_mut().find(|p| p.id == selected) {
        if pattern.input_areas.is_empty() && !blocks.is_empty() {
            notices.push(LoadNotice::LegacyBlocksMigrated {
                pattern: pattern.id.clone(),
                count: blocks.len(),
            });
            pattern.input_areas = blocks;
        }
    }

    true
}
