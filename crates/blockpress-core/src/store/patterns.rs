//! Pattern lifecycle

use super::Workspace;
use crate::error::{BlockpressError, Result};
use crate::model::Pattern;

const NEW_PATTERN_PREFIX: &str = "New Pattern ";

/// `New Pattern N` with the smallest positive N not already taken
fn next_pattern_name(patterns: &[Pattern]) -> String {
    let used: Vec<u64> = patterns
        .iter()
        .filter_map(|p| p.name.strip_prefix(NEW_PATTERN_PREFIX)?.parse().ok())
        .collect();
    let n = (1..).find(|n| !used.contains(n)).unwrap_or(1);
    format!("{}{}", NEW_PATTERN_PREFIX, n)
}

impl Workspace {
    /// Creates a pattern from the active one's tags and formatting, and selects it
    ///
    /// Blocks are not copied; the new pattern starts empty.
    pub fn create_pattern(&mut self) -> &Pattern {
        let source = self.active_pattern();
        let buttons = source.buttons.clone();
        let formatting_map = source.formatting_map.clone();

        self.max_pattern_id += 1;
        let pattern = Pattern {
            id: format!("pattern{}", self.max_pattern_id),
            name: next_pattern_name(&self.patterns),
            buttons,
            formatting_map,
            input_areas: Vec::new(),
        };
        log::info!("Created pattern {} ({})", pattern.id, pattern.name);

        self.active = pattern.id.clone();
        self.patterns.push(pattern);
        self.changed();
        self.active_pattern()
    }

    pub fn rename_pattern(&mut self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BlockpressError::EmptyName);
        }
        let pattern = self
            .patterns
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| BlockpressError::PatternNotFound(id.to_string()))?;
        pattern.name = name.to_string();
        self.changed();
        Ok(())
    }

    /// Deletes a pattern; the only remaining pattern cannot be deleted
    pub fn delete_pattern(&mut self, id: &str) -> Result<()> {
        let index = self
            .patterns
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| BlockpressError::PatternNotFound(id.to_string()))?;
        if self.patterns.len() == 1 {
            return Err(BlockpressError::LastPattern(id.to_string()));
        }

        let removed = self.patterns.remove(index);
        log::info!("Deleted pattern {} ({})", removed.id, removed.name);

        if self.active == removed.id {
            self.active = self.patterns[0].id.clone();
        }
        self.changed();
        Ok(())
    }

    pub fn select_pattern(&mut self, id: &str) -> Result<()> {
        self.find_pattern(id)?;
        self.active = id.to_string();
        self.changed();
        Ok(())
    }
}
