//! Input blocks of the active pattern

use super::Workspace;
use crate::error::{BlockpressError, Result};
use crate::model::{InputBlock, TagType};
use blockpress_html::{paste, sanitize_html, PasteOutcome};

/// Where a new block is inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPosition {
    Start,
    End,
    /// Directly after the block with this group id; unknown ids insert at the end
    After(String),
}

/// A block a new block can be inserted after
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    pub group_id: String,
    /// `#<position> <tag name>`
    pub label: String,
}

impl Workspace {
    pub fn blocks(&self) -> &[InputBlock] {
        &self.active_pattern().input_areas
    }

    fn block_mut(&mut self, group_id: &str) -> Result<&mut InputBlock> {
        self.active_pattern_mut()
            .input_areas
            .iter_mut()
            .find(|b| b.group_id == group_id)
            .ok_or_else(|| BlockpressError::BlockNotFound(group_id.to_string()))
    }

    /// Adds an empty block bound to `tag_id` with a fresh `area-group-<n>` id
    pub fn add_block(&mut self, tag_id: &str, position: InsertPosition) -> Result<&InputBlock> {
        if self.active_pattern().find_tag(tag_id).is_none() {
            return Err(BlockpressError::TagNotFound(tag_id.to_string()));
        }

        self.max_group_id += 1;
        let block = InputBlock {
            group_id: format!("area-group-{}", self.max_group_id),
            tag_id: tag_id.to_string(),
            content: String::new(),
        };
        self.changed();

        let blocks = &mut self.active_pattern_mut().input_areas;
        let index = match &position {
            InsertPosition::Start => 0,
            InsertPosition::End => blocks.len(),
            InsertPosition::After(anchor) => {
                match blocks.iter().position(|b| b.group_id == *anchor) {
                    Some(index) => index + 1,
                    None => {
                        log::debug!("Insertion anchor {} not found, appending", anchor);
                        blocks.len()
                    }
                }
            }
        };
        blocks.insert(index, block);
        Ok(&blocks[index])
    }

    fn is_static_block(&self, group_id: &str) -> bool {
        let pattern = self.active_pattern();
        pattern
            .find_block(group_id)
            .and_then(|block| pattern.find_tag(&block.tag_id))
            .is_some_and(|tag| tag.tag_type == TagType::Static)
    }

    /// Replaces a block's content with the sanitized `html`
    ///
    /// Blocks bound to a static tag take no input; their content is left empty.
    pub fn set_block_content(&mut self, group_id: &str, html: &str) -> Result<()> {
        let is_static = self.is_static_block(group_id);
        let block = self.block_mut(group_id)?;
        if is_static {
            log::warn!("Block {} uses a static tag, content ignored", group_id);
            return Ok(());
        }
        block.content = sanitize_html(html);
        self.changed();
        Ok(())
    }

    /// Appends pasted HTML to a block
    ///
    /// Word-processor HTML is rewritten with the active formatting map first;
    /// anything else is only sanitized.
    pub fn paste_into_block(&mut self, group_id: &str, html: &str) -> Result<()> {
        let tags = self.formatting_map().tags();
        let is_static = self.is_static_block(group_id);
        let block = self.block_mut(group_id)?;
        if is_static {
            log::warn!("Block {} uses a static tag, paste ignored", group_id);
            return Ok(());
        }

        let pasted = match paste(html, &tags) {
            PasteOutcome::Normalized(normalized) => {
                log::info!("Normalized word-processor paste into {}", group_id);
                sanitize_html(&normalized)
            }
            PasteOutcome::PassThrough => sanitize_html(html),
        };
        block.content.push_str(&pasted);
        self.changed();
        Ok(())
    }

    pub fn remove_block(&mut self, group_id: &str) -> Result<()> {
        let blocks = &mut self.active_pattern_mut().input_areas;
        let index = blocks
            .iter()
            .position(|b| b.group_id == group_id)
            .ok_or_else(|| BlockpressError::BlockNotFound(group_id.to_string()))?;
        blocks.remove(index);
        self.changed();
        Ok(())
    }

    /// Moves a block so it ends up at `to_index`
    pub fn move_block(&mut self, group_id: &str, to_index: usize) -> Result<()> {
        let blocks = &mut self.active_pattern_mut().input_areas;
        let from = blocks
            .iter()
            .position(|b| b.group_id == group_id)
            .ok_or_else(|| BlockpressError::BlockNotFound(group_id.to_string()))?;
        let len = blocks.len();
        if to_index >= len {
            return Err(BlockpressError::IndexOutOfRange {
                index: to_index,
                len,
            });
        }
        let block = blocks.remove(from);
        blocks.insert(to_index, block);
        self.changed();
        Ok(())
    }

    /// Removes every block of the active pattern
    pub fn clear_blocks(&mut self) {
        self.active_pattern_mut().input_areas.clear();
        self.changed();
    }

    /// Labels for choosing where the next block goes
    pub fn insertion_points(&self) -> Vec<InsertionPoint> {
        let pattern = self.active_pattern();
        pattern
            .input_areas
            .iter()
            .enumerate()
            .map(|(index, block)| {
                let name = pattern
                    .find_tag(&block.tag_id)
                    .map_or("unknown tag", |tag| tag.name.as_str());
                InsertionPoint {
                    group_id: block.group_id.clone(),
                    label: format!("#{} {}", index + 1, name),
                }
            })
            .collect()
    }

    /// Replaces the active pattern's blocks in bulk
    ///
    /// Saves are suppressed while blocks are being restored; one edit is
    /// recorded at the end.
    pub fn restore_blocks(&mut self, blocks: Vec<InputBlock>) {
        self.with_loading(|ws| {
            ws.active_pattern_mut().input_areas.clear();
            for block in blocks {
                let group_id = block.group_id.clone();
                ws.active_pattern_mut().input_areas.push(InputBlock {
                    content: String::new(),
                    ..block.clone()
                });
                if let Err(e) = ws.set_block_content(&group_id, &block.content) {
                    log::warn!("Could not restore block {}: {}", group_id, e);
                }
                if let Some(n) = group_id
                    .strip_prefix("area-group-")
                    .and_then(|n| n.parse::<u64>().ok())
                {
                    ws.max_group_id = ws.max_group_id.max(n);
                }
            }
        });
        self.changed();
    }
}
