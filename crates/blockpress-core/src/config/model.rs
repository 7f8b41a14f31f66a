use super::consts;
use serde::{Deserialize, Serialize};

/// blockpress.toml schema, every section optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockpressConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Saves whose serialized pattern map exceeds this are rejected
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_bytes: consts::storage::MAX_BYTES,
        }
    }
}

fn default_max_bytes() -> u64 {
    consts::storage::MAX_BYTES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: consts::editor::DEBOUNCE_MS,
        }
    }
}

fn default_debounce_ms() -> u64 {
    consts::editor::DEBOUNCE_MS
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Command the buffer is piped into instead of the detected tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl BlockpressConfig {
    /// Reads blockpress.toml
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| crate::error::BlockpressError::ConfigParseError(e.to_string()))
    }
}
