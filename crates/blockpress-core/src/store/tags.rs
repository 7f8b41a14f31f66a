//! Tag definitions and formatting map of the active pattern

use super::{defaults, Workspace};
use crate::error::{BlockpressError, Result};
use crate::model::{FormattingMap, FormattingRole, TagDefinition, TagDraft};
use crate::validate::{validate_formatting_template, validate_tag};

impl Workspace {
    pub fn tags(&self) -> &[TagDefinition] {
        &self.active_pattern().buttons
    }

    /// Validates and appends a tag definition, assigning a fresh `custom<n>` id
    pub fn add_tag(&mut self, draft: TagDraft) -> Result<&TagDefinition> {
        validate_tag(&draft)?;

        self.max_tag_id += 1;
        let tag = draft.into_definition(format!("custom{}", self.max_tag_id));
        log::info!("Added tag {} ({})", tag.id, tag.name);

        self.changed();
        let buttons = &mut self.active_pattern_mut().buttons;
        buttons.push(tag);
        Ok(&buttons[buttons.len() - 1])
    }

    /// Replaces a tag's fields, keeping its id and position
    pub fn edit_tag(&mut self, id: &str, draft: TagDraft) -> Result<()> {
        validate_tag(&draft)?;

        let tag = self
            .active_pattern_mut()
            .buttons
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BlockpressError::TagNotFound(id.to_string()))?;
        *tag = draft.into_definition(id.to_string());
        self.changed();
        Ok(())
    }

    /// Removes a tag; blocks bound to it stay and convert to a warning
    pub fn delete_tag(&mut self, id: &str) -> Result<()> {
        let buttons = &mut self.active_pattern_mut().buttons;
        let index = buttons
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BlockpressError::TagNotFound(id.to_string()))?;
        buttons.remove(index);
        self.changed();
        Ok(())
    }

    /// Moves the tag at `from` so it ends up at index `to`
    pub fn move_tag(&mut self, from: usize, to: usize) -> Result<()> {
        let buttons = &mut self.active_pattern_mut().buttons;
        let len = buttons.len();
        for index in [from, to] {
            if index >= len {
                return Err(BlockpressError::IndexOutOfRange { index, len });
            }
        }
        let tag = buttons.remove(from);
        buttons.insert(to, tag);
        self.changed();
        Ok(())
    }

    pub fn formatting_map(&self) -> &FormattingMap {
        &self.active_pattern().formatting_map
    }

    /// Sets the template for a formatting role; a blank template restores the default
    pub fn set_formatting(&mut self, role: FormattingRole, template: &str) -> Result<()> {
        let entry = self.active_pattern_mut().formatting_map.get_mut(role);
        if template.trim().is_empty() {
            *entry = defaults::formatting_entry(role);
        } else {
            validate_formatting_template(template)?;
            entry.template = template.to_string();
        }
        self.changed();
        Ok(())
    }
}
