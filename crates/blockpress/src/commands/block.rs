use crate::cli::{ContentSource, PasteSource};
use crate::context::Context;
use crate::output::print_text;
use anyhow::{Context as _, Result, bail};
use blockpress_core::store::InsertPosition;
use blockpress_html::text_to_html;
use colored::Colorize;
use std::fs;

const PREVIEW_CHARS: usize = 60;

pub fn list(ctx: &Context) -> Result<()> {
    let points = ctx.workspace.insertion_points();
    if points.is_empty() {
        print_text("No blocks")?;
        return Ok(());
    }

    for (point, block) in points.iter().zip(ctx.workspace.blocks()) {
        let content = if ctx.verbose {
            block.content.clone()
        } else {
            preview(&block.content)
        };
        print_text(&format!(
            "{:<16} {:<20} {}",
            point.group_id,
            point.label.bold(),
            content.dimmed()
        ))?;
    }
    Ok(())
}

/// First line of the content, shortened
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.chars().count() > PREVIEW_CHARS {
        let cut: String = first_line.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    } else {
        first_line.to_string()
    }
}

/// Reads the HTML a content flag points at, if any
fn read_content(source: ContentSource) -> Result<Option<String>> {
    if let Some(html) = source.content {
        return Ok(Some(html));
    }
    if let Some(text) = source.text {
        return Ok(Some(text_to_html(&text)));
    }
    if let Some(path) = source.file {
        let html = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Some(html));
    }
    Ok(None)
}

pub fn add(
    ctx: &mut Context,
    tag_id: &str,
    start: bool,
    after: Option<String>,
    content: ContentSource,
) -> Result<()> {
    let position = match (start, after) {
        (true, _) => InsertPosition::Start,
        (false, Some(group_id)) => InsertPosition::After(group_id),
        (false, None) => InsertPosition::End,
    };
    let content = read_content(content)?;

    let group_id = ctx.workspace.add_block(tag_id, position)?.group_id.clone();
    if let Some(html) = content {
        ctx.workspace.set_block_content(&group_id, &html)?;
    }

    println!("{} Added block {} ({})", "✓".green().bold(), group_id, tag_id);
    Ok(())
}

pub fn set(ctx: &mut Context, group_id: &str, content: ContentSource) -> Result<()> {
    let Some(html) = read_content(content)? else {
        bail!("No content given: use --content, --text or --file");
    };
    ctx.workspace.set_block_content(group_id, &html)?;
    println!("{} Updated block {}", "✓".green().bold(), group_id);
    Ok(())
}

pub fn paste(ctx: &mut Context, group_id: &str, source: PasteSource) -> Result<()> {
    let html = match (source.html, source.file) {
        (Some(html), _) => html,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Nothing to paste: use --html or --file"),
    };
    ctx.workspace.paste_into_block(group_id, &html)?;
    println!("{} Pasted into block {}", "✓".green().bold(), group_id);
    Ok(())
}

pub fn delete(ctx: &mut Context, group_id: &str) -> Result<()> {
    ctx.workspace.remove_block(group_id)?;
    println!("{} Deleted block {}", "✓".green().bold(), group_id);
    Ok(())
}

pub fn move_block(ctx: &mut Context, group_id: &str, index: usize) -> Result<()> {
    ctx.workspace.move_block(group_id, index)?;
    println!("{} Moved block {} to position {}", "✓".green().bold(), group_id, index);
    Ok(())
}

pub fn clear(ctx: &mut Context) -> Result<()> {
    let count = ctx.workspace.blocks().len();
    ctx.workspace.clear_blocks();
    println!("{} Deleted {} block(s)", "✓".green().bold(), count);
    Ok(())
}
