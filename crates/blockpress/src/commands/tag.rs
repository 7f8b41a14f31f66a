use crate::cli::{TagEditFields, TagFields};
use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use blockpress_core::error::BlockpressError;
use blockpress_core::model::{TagDefinition, TagDraft};
use colored::Colorize;

pub fn list(ctx: &Context, json: bool) -> Result<()> {
    let tags = ctx.workspace.tags();

    if json {
        print_json(&serde_json::to_string_pretty(tags)?)?;
        return Ok(());
    }

    if tags.is_empty() {
        print_text("No tags defined")?;
        return Ok(());
    }
    for tag in tags {
        print_text(&render_tag(tag))?;
    }
    Ok(())
}

fn render_tag(tag: &TagDefinition) -> String {
    let mut line = format!(
        "{:<12} {} [{}] {}",
        tag.id,
        tag.name.bold(),
        tag.tag_type.to_string().cyan(),
        tag.template
    );
    if tag.remove_last_br {
        line.push_str(&format!(" {}", "(no trailing <br>)".dimmed()));
    }
    if let Some(item) = &tag.link_item_template {
        line.push_str(&format!("\n{:<12} item: {}", "", item));
    }
    line
}

pub fn add(ctx: &mut Context, fields: TagFields) -> Result<()> {
    let draft = TagDraft {
        name: fields.name,
        tag_type: fields.tag_type,
        template: fields.template,
        link_item_template: fields.link_item_template,
        remove_last_br: fields.remove_last_br,
    };
    let tag = ctx.workspace.add_tag(draft)?;
    println!("{} Added tag '{}' ({})", "✓".green().bold(), tag.name, tag.id);
    Ok(())
}

pub fn edit(ctx: &mut Context, id: &str, fields: TagEditFields) -> Result<()> {
    let existing = ctx
        .workspace
        .tags()
        .iter()
        .find(|tag| tag.id == id)
        .ok_or_else(|| BlockpressError::TagNotFound(id.to_string()))?;

    let draft = merge_edit(TagDraft::from(existing), fields);
    ctx.workspace.edit_tag(id, draft)?;
    println!("{} Updated tag {}", "✓".green().bold(), id);
    Ok(())
}

/// Applies the given flags on top of the current definition
fn merge_edit(mut draft: TagDraft, fields: TagEditFields) -> TagDraft {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(tag_type) = fields.tag_type {
        draft.tag_type = tag_type;
    }
    if let Some(template) = fields.template {
        draft.template = template;
    }
    if let Some(item) = fields.link_item_template {
        draft.link_item_template = Some(item);
    }
    if fields.remove_last_br {
        draft.remove_last_br = true;
    } else if fields.keep_last_br {
        draft.remove_last_br = false;
    }
    draft
}

pub fn delete(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.workspace.delete_tag(id)?;
    println!("{} Deleted tag {}", "✓".green().bold(), id);
    Ok(())
}

pub fn move_tag(ctx: &mut Context, from: usize, to: usize) -> Result<()> {
    ctx.workspace.move_tag(from, to)?;
    println!("{} Moved tag from position {} to {}", "✓".green().bold(), from, to);
    Ok(())
}
