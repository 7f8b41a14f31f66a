//! Constants shared across the workspace

/// Persistence limits and storage keys
pub mod storage {
    /// Largest serialized pattern map accepted by a save (5 MiB)
    pub const MAX_BYTES: u64 = 5 * 1024 * 1024;

    /// Pattern map, keyed by pattern id
    pub const PATTERNS_KEY: &str = "customTagPatternsV2";

    /// Selected pattern and schema version
    pub const SETTINGS_KEY: &str = "editorSettingsV2";

    /// Global block list written before blocks moved into patterns
    pub const LEGACY_BLOCKS_KEY: &str = "inputAreasV2";

    /// Accumulated conversion output
    pub const OUTPUT_KEY: &str = "outputBufferV2";
}

/// Editing behaviour
pub mod editor {
    /// Quiet period before a debounced save fires
    pub const DEBOUNCE_MS: u64 = 500;
}

/// File names inside the data directory
pub mod files {
    pub const CONFIG_FILE: &str = "blockpress.toml";
    pub const LOCK_FILE: &str = ".lock";
    pub const CLIPBOARD_FILE: &str = "clipboard.html";
}

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "BLOCKPRESS_HOME";
