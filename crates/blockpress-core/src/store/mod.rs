//! Pattern, tag and block store
//!
//! A [`Workspace`] holds every pattern, the active selection and the output
//! buffer, and persists them through a [`Storage`] backend. All mutations go
//! through the workspace so validation and the save schedule apply uniformly.
//!
//! # Saving
//!
//! Mutations only mark the workspace dirty. The owner decides when to write:
//! [`Workspace::flush_if_due`] after the debounce quiet period, or
//! [`Workspace::flush`] immediately. While [`Workspace::with_loading`] is
//! running, saves are suppressed so a bulk restore does not write once per
//! block.

mod blocks;
pub mod defaults;
pub mod migrate;
mod patterns;
pub mod storage;
mod tags;

pub use blocks::InsertPosition;
pub use migrate::{LoadNotice, SCHEMA_VERSION};
pub use storage::{FileStorage, MemoryStorage, PersistError, Storage};

use crate::config::consts::storage::{LEGACY_BLOCKS_KEY, OUTPUT_KEY, PATTERNS_KEY, SETTINGS_KEY};
use crate::config::BlockpressConfig;
use crate::convert::convert;
use crate::debounce::Debouncer;
use crate::error::{BlockpressError, Result};
use crate::model::{Pattern, Settings};
use crate::output::{OutputBuffer, NO_BLOCKS_WARNING};
use chrono::Utc;
use migrate::SavedData;
use std::time::{Duration, Instant};

/// Result of a save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Data was written; `bytes` is the size of the serialized pattern map
    Saved { bytes: u64 },
    /// A bulk restore is in progress and nothing was written
    Suppressed,
}

pub struct Workspace {
    patterns: Vec<Pattern>,
    active: String,
    max_pattern_id: u64,
    max_tag_id: u64,
    max_group_id: u64,
    loading: bool,
    debouncer: Debouncer,
    max_bytes: u64,
    output: OutputBuffer,
    storage: Box<dyn Storage>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("patterns", &self.patterns.len())
            .field("active", &self.active)
            .field("loading", &self.loading)
            .field("dirty", &self.debouncer.is_pending())
            .finish_non_exhaustive()
    }
}

/// Highest numeric suffix among ids of the form `<prefix><n>`
fn max_suffix<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> u64 {
    ids.filter_map(|id| id.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

/// Reads `key`, recording a failed read as a notice and treating it as missing
fn read_key(storage: &dyn Storage, key: &str, notices: &mut Vec<LoadNotice>) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Failed to read {}: {}", key, e);
            notices.push(LoadNotice::ReadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            });
            None
        }
    }
}

impl Workspace {
    /// Loads with default configuration
    pub fn load(storage: Box<dyn Storage>) -> (Self, Vec<LoadNotice>) {
        Self::load_with_config(storage, &BlockpressConfig::default())
    }

    /// Reads saved data, normalizes it and returns the workspace with what changed
    ///
    /// Loading never fails. Unreadable keys count as missing and defaults fill
    /// the gap. Normalized data is written back when anything had to change,
    /// unless a read failed. A failed write-back leaves the workspace dirty.
    /// The legacy block list is removed only after the write-back succeeded.
    pub fn load_with_config(
        storage: Box<dyn Storage>,
        config: &BlockpressConfig,
    ) -> (Self, Vec<LoadNotice>) {
        let mut notices = Vec::new();
        let patterns_raw = read_key(storage.as_ref(), PATTERNS_KEY, &mut notices);
        let settings_raw = read_key(storage.as_ref(), SETTINGS_KEY, &mut notices);
        let legacy_raw = read_key(storage.as_ref(), LEGACY_BLOCKS_KEY, &mut notices);
        let output_raw = read_key(storage.as_ref(), OUTPUT_KEY, &mut notices);
        let read_failed = !notices.is_empty();

        let migrated = migrate::migrate(SavedData {
            patterns: patterns_raw.as_deref(),
            settings: settings_raw.as_deref(),
            legacy_blocks: legacy_raw.as_deref(),
        });

        let output = match output_raw.as_deref().map(serde_json::from_str::<String>) {
            Some(Ok(content)) => OutputBuffer::from_saved(content),
            Some(Err(e)) => {
                log::warn!("Discarding unreadable output buffer: {}", e);
                OutputBuffer::new()
            }
            None => OutputBuffer::new(),
        };

        let write_back = !migrated.notices.is_empty() || migrated.legacy_consumed;
        let legacy_consumed = migrated.legacy_consumed;
        notices.extend(migrated.notices);

        let patterns = migrated.patterns;
        let max_pattern_id = max_suffix(patterns.iter().map(|p| p.id.as_str()), "pattern");
        let max_tag_id = max_suffix(
            patterns
                .iter()
                .flat_map(|p| p.buttons.iter().map(|t| t.id.as_str())),
            "custom",
        );
        let max_group_id = max_suffix(
            patterns
                .iter()
                .flat_map(|p| p.input_areas.iter().map(|b| b.group_id.as_str())),
            "area-group-",
        );

        let mut workspace = Self {
            patterns,
            active: migrated.selected,
            max_pattern_id,
            max_tag_id,
            max_group_id,
            loading: false,
            debouncer: Debouncer::new(Duration::from_millis(config.editor.debounce_ms)),
            max_bytes: config.storage.max_bytes,
            output,
            storage,
        };

        if read_failed {
            // Writing now could overwrite data that is only temporarily unreadable
            log::warn!("Saved data could not be read, normalized data not written back");
        } else if write_back {
            match workspace.save() {
                Ok(_) if legacy_consumed => match workspace.storage.remove(LEGACY_BLOCKS_KEY) {
                    Ok(()) => log::info!("Removed legacy block list"),
                    Err(e) => log::warn!("Failed to remove legacy block list: {}", e),
                },
                Ok(_) => {}
                Err(e) => {
                    log::error!("Failed to write normalized data back: {}", e);
                    notices.push(LoadNotice::WriteBackFailed {
                        reason: e.to_string(),
                    });
                    workspace.touch(Instant::now());
                }
            }
        }

        (workspace, notices)
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn active_id(&self) -> &str {
        &self.active
    }

    fn active_index(&self) -> usize {
        self.patterns
            .iter()
            .position(|p| p.id == self.active)
            .unwrap_or(0)
    }

    /// The selected pattern; a workspace always has at least one
    pub fn active_pattern(&self) -> &Pattern {
        &self.patterns[self.active_index()]
    }

    fn active_pattern_mut(&mut self) -> &mut Pattern {
        let index = self.active_index();
        &mut self.patterns[index]
    }

    pub fn find_pattern(&self, id: &str) -> Result<&Pattern> {
        self.patterns
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| BlockpressError::PatternNotFound(id.to_string()))
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
        self.changed();
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    // --- Conversion ---

    /// Converts one block of the active pattern and appends it to the output
    pub fn convert_block(&mut self, group_id: &str) -> Result<String> {
        let pattern = self.active_pattern();
        let block = pattern
            .find_block(group_id)
            .ok_or_else(|| BlockpressError::BlockNotFound(group_id.to_string()))?;
        let html = convert(pattern.find_tag(&block.tag_id), block);

        self.output.append_fragment(&html);
        self.changed();
        Ok(html)
    }

    /// Converts every block of the active pattern in order and appends the batch
    pub fn convert_all(&mut self) -> String {
        let pattern = self.active_pattern();
        let fragments: Vec<String> = pattern
            .input_areas
            .iter()
            .map(|block| convert(pattern.find_tag(&block.tag_id), block))
            .collect();

        let batch = if fragments.is_empty() {
            NO_BLOCKS_WARNING.to_string()
        } else {
            fragments.concat()
        };

        self.output.append_batch(&fragments);
        self.changed();
        batch
    }

    // --- Persistence ---

    /// Runs `f` with saves suppressed
    pub fn with_loading<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let was_loading = std::mem::replace(&mut self.loading, true);
        let result = f(self);
        self.loading = was_loading;
        result
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True when an edit has not been saved yet
    pub fn is_dirty(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Records an edit at `now`
    pub fn touch(&mut self, now: Instant) {
        self.debouncer.touch(now);
    }

    fn changed(&mut self) {
        if !self.loading {
            self.touch(Instant::now());
        }
    }

    /// Saves if the quiet period since the latest edit has passed
    pub fn flush_if_due(
        &mut self,
        now: Instant,
    ) -> std::result::Result<Option<SaveOutcome>, PersistError> {
        if self.debouncer.is_due(now) {
            self.save().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Saves any pending edit immediately
    pub fn flush(&mut self) -> std::result::Result<Option<SaveOutcome>, PersistError> {
        if self.debouncer.is_pending() {
            self.save().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Writes all patterns, the settings record and the output buffer
    ///
    /// The pattern map is checked against the size limit before anything is
    /// written. In-memory state is kept whatever the outcome.
    pub fn save(&mut self) -> std::result::Result<SaveOutcome, PersistError> {
        if self.loading {
            log::debug!("Save suppressed while loading");
            return Ok(SaveOutcome::Suppressed);
        }

        let patterns_json = migrate::serialize_patterns(&self.patterns)?;
        let size = patterns_json.len() as u64;
        if size > self.max_bytes {
            log::error!("Saved data too large: {} bytes (limit {})", size, self.max_bytes);
            return Err(PersistError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let settings = Settings {
            selected_pattern: self.active.clone(),
            schema_version: SCHEMA_VERSION,
            saved_at: Some(Utc::now()),
        };
        let settings_json = serde_json::to_string(&settings)?;
        let output_json = serde_json::to_string(self.output.as_str())?;

        for (key, value) in [
            (PATTERNS_KEY, &patterns_json),
            (SETTINGS_KEY, &settings_json),
            (OUTPUT_KEY, &output_json),
        ] {
            if let Err(e) = self.storage.set(key, value) {
                log::error!("Failed to save {}: {}", key, e);
                return Err(e);
            }
        }

        self.debouncer.clear();
        log::debug!("Saved {} pattern(s), {} bytes", self.patterns.len(), size);
        Ok(SaveOutcome::Saved { bytes: size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InputBlock, TagDraft, TagType};

    pub(super) fn memory_workspace() -> (Workspace, MemoryStorage) {
        let storage = MemoryStorage::new();
        let (workspace, notices) = Workspace::load(Box::new(storage.clone()));
        assert!(notices.is_empty());
        (workspace, storage)
    }

    #[test]
    fn test_fresh_workspace_uses_defaults_without_writing() {
        let (workspace, storage) = memory_workspace();
        assert_eq!(workspace.active_id(), "pattern1");
        assert_eq!(workspace.patterns().len(), 2);
        assert_eq!(storage.write_count(), 0);
        assert!(!workspace.is_dirty());
    }

    #[test]
    fn test_save_and_reload() {
        let (mut workspace, storage) = memory_workspace();
        workspace.select_pattern("pattern2").unwrap();
        let outcome = workspace.save().unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved { bytes } if bytes > 0));

        let settings: Settings =
            serde_json::from_str(&storage.value(SETTINGS_KEY).unwrap()).unwrap();
        assert_eq!(settings.selected_pattern, "pattern2");
        assert_eq!(settings.schema_version, SCHEMA_VERSION);
        assert!(settings.saved_at.is_some());

        let (reloaded, notices) = Workspace::load(Box::new(storage.clone()));
        assert!(notices.is_empty());
        assert_eq!(reloaded.active_id(), "pattern2");
        assert_eq!(reloaded.patterns(), workspace.patterns());
    }

    #[test]
    fn test_save_while_loading_writes_nothing() {
        let (mut workspace, storage) = memory_workspace();
        let outcome = workspace.with_loading(|ws| {
            assert!(ws.is_loading());
            ws.save().unwrap()
        });
        assert_eq!(outcome, SaveOutcome::Suppressed);
        assert_eq!(storage.write_count(), 0);
        assert!(!workspace.is_loading());
    }

    #[test]
    fn test_too_large_rejected_without_write() {
        let storage = MemoryStorage::new();
        let mut config = BlockpressConfig::default();
        config.storage.max_bytes = 100;
        let (mut workspace, _) =
            Workspace::load_with_config(Box::new(storage.clone()), &config);

        let err = workspace.save().unwrap_err();
        assert!(matches!(err, PersistError::TooLarge { limit: 100, .. }));
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_storage_errors_keep_memory_state() {
        let storage = MemoryStorage::with_quota(64);
        let (mut workspace, _) = Workspace::load(Box::new(storage.clone()));
        workspace.rename_pattern("pattern1", "Renamed").unwrap();

        let err = workspace.save().unwrap_err();
        assert!(matches!(err, PersistError::QuotaExceeded { .. }));
        assert_eq!(workspace.active_pattern().name, "Renamed");
        assert!(workspace.is_dirty());

        storage.set_unavailable(true);
        assert!(matches!(workspace.save(), Err(PersistError::Unavailable(_))));
    }

    #[test]
    fn test_debounced_flush() {
        let (mut workspace, storage) = memory_workspace();
        let start = Instant::now();
        workspace.touch(start);

        assert_eq!(workspace.flush_if_due(start + Duration::from_millis(100)).unwrap(), None);
        assert_eq!(storage.write_count(), 0);

        let outcome = workspace.flush_if_due(start + Duration::from_millis(500)).unwrap();
        assert!(matches!(outcome, Some(SaveOutcome::Saved { .. })));
        assert_eq!(storage.write_count(), 3);
        assert!(!workspace.is_dirty());

        assert_eq!(workspace.flush().unwrap(), None);
    }

    #[test]
    fn test_mutations_mark_dirty() {
        let (mut workspace, _) = memory_workspace();
        workspace
            .add_tag(TagDraft::new("Quote", TagType::Single, "<blockquote>[TEXT]</blockquote>"))
            .unwrap();
        assert!(workspace.is_dirty());
        assert!(matches!(workspace.flush().unwrap(), Some(SaveOutcome::Saved { .. })));
    }

    #[test]
    fn test_legacy_blocks_migrated_then_removed() {
        let storage = MemoryStorage::new();
        storage.seed(
            LEGACY_BLOCKS_KEY,
            r#"[{"groupId":"area-group-3","tagId":"p","content":"old"}]"#,
        );

        let (workspace, notices) = Workspace::load(Box::new(storage.clone()));
        assert!(matches!(
            notices[0],
            LoadNotice::LegacyBlocksMigrated { count: 1, .. }
        ));
        assert_eq!(workspace.active_pattern().input_areas[0].content, "old");
        assert!(storage.value(LEGACY_BLOCKS_KEY).is_none());
        assert!(storage.value(PATTERNS_KEY).unwrap().contains("area-group-3"));
    }

    #[test]
    fn test_corrupt_data_replaced_on_load() {
        let storage = MemoryStorage::new();
        storage.seed(PATTERNS_KEY, "{{{");

        let (workspace, notices) = Workspace::load(Box::new(storage.clone()));
        assert!(matches!(notices[0], LoadNotice::CorruptData { .. }));
        assert_eq!(workspace.patterns().len(), 2);
        assert!(storage.value(PATTERNS_KEY).unwrap().starts_with("{\"pattern1\""));
    }

    #[test]
    fn test_failed_write_back_keeps_defaults_in_memory() {
        let storage = MemoryStorage::with_quota(64);
        storage.seed(PATTERNS_KEY, "{not json");

        let (workspace, notices) = Workspace::load(Box::new(storage.clone()));

        assert_eq!(workspace.patterns().len(), 2);
        assert_eq!(workspace.active_id(), "pattern1");
        assert!(matches!(notices[0], LoadNotice::CorruptData { .. }));
        assert!(notices
            .iter()
            .any(|n| matches!(n, LoadNotice::WriteBackFailed { .. })));
        assert!(workspace.is_dirty());
        assert_eq!(storage.write_count(), 0);
        assert_eq!(storage.value(PATTERNS_KEY).as_deref(), Some("{not json"));
    }

    #[test]
    fn test_failed_write_back_keeps_legacy_blocks() {
        let storage = MemoryStorage::with_quota(10);
        storage.seed(
            LEGACY_BLOCKS_KEY,
            r#"[{"groupId":"area-group-3","tagId":"p","content":"old"}]"#,
        );

        let (workspace, notices) = Workspace::load(Box::new(storage.clone()));

        assert_eq!(workspace.active_pattern().input_areas.len(), 1);
        assert!(notices
            .iter()
            .any(|n| matches!(n, LoadNotice::WriteBackFailed { .. })));
        assert!(storage.value(LEGACY_BLOCKS_KEY).is_some());
    }

    #[test]
    fn test_unreadable_storage_loads_defaults() {
        let storage = MemoryStorage::new();
        storage.seed(PATTERNS_KEY, r#"{"pattern9":{"name":"Saved","buttons":[]}}"#);
        storage.set_unavailable(true);

        let (mut workspace, notices) = Workspace::load(Box::new(storage.clone()));

        assert_eq!(workspace.patterns().len(), 2);
        assert_eq!(notices.len(), 4);
        assert!(matches!(
            &notices[0],
            LoadNotice::ReadFailed { key, .. } if key == PATTERNS_KEY
        ));
        assert!(!workspace.is_dirty());
        assert_eq!(workspace.convert_all(), NO_BLOCKS_WARNING);

        // Nothing was written over the unreadable data
        storage.set_unavailable(false);
        assert_eq!(storage.write_count(), 0);
        assert!(storage.value(PATTERNS_KEY).unwrap().contains("pattern9"));
    }

    #[test]
    fn test_output_buffer_persisted() {
        let (mut workspace, storage) = memory_workspace();
        workspace.add_block("p", InsertPosition::End).unwrap();
        let group_id = workspace.active_pattern().input_areas[0].group_id.clone();
        workspace.set_block_content(&group_id, "hello").unwrap();
        workspace.convert_block(&group_id).unwrap();
        workspace.flush().unwrap();

        let (reloaded, _) = Workspace::load(Box::new(storage));
        assert_eq!(reloaded.output().as_str(), "<p>hello</p>\n");
    }

    #[test]
    fn test_convert_all_batches_in_block_order() {
        let (mut workspace, _) = memory_workspace();
        assert_eq!(workspace.convert_all(), NO_BLOCKS_WARNING);

        workspace.clear_output();
        workspace.restore_blocks(vec![
            InputBlock {
                group_id: "area-group-1".to_string(),
                tag_id: "h2".to_string(),
                content: "Title".to_string(),
            },
            InputBlock {
                group_id: "area-group-2".to_string(),
                tag_id: "gone".to_string(),
                content: "x".to_string(),
            },
            InputBlock {
                group_id: "area-group-3".to_string(),
                tag_id: "p".to_string(),
                content: "a<br>b".to_string(),
            },
        ]);

        let batch = workspace.convert_all();
        assert_eq!(
            batch,
            "<h2>Title</h2>\n<!-- Warning: unknown tag id (gone), block skipped -->\n<p>a</p>\n<p>b</p>\n"
        );
        assert_eq!(workspace.output().as_str(), batch.trim_end());
    }

    #[test]
    fn test_convert_block_unknown_group() {
        let (mut workspace, _) = memory_workspace();
        assert!(matches!(
            workspace.convert_block("area-group-9"),
            Err(BlockpressError::BlockNotFound(_))
        ));
    }

    #[test]
    fn test_max_suffix() {
        let ids = ["pattern1", "pattern12", "patternX", "custom3", "pattern"];
        assert_eq!(max_suffix(ids.into_iter(), "pattern"), 12);
        assert_eq!(max_suffix(ids.into_iter(), "area-group-"), 0);
    }
}
