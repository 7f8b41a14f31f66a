use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use blockpress_core::model::Pattern;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct PatternSummary<'a> {
    id: &'a str,
    name: &'a str,
    active: bool,
    tags: usize,
    blocks: usize,
}

pub fn list(ctx: &Context, json: bool) -> Result<()> {
    let active = ctx.workspace.active_id();
    let summaries: Vec<PatternSummary> = ctx
        .workspace
        .patterns()
        .iter()
        .map(|p| summarize(p, p.id == active))
        .collect();

    if json {
        print_json(&serde_json::to_string_pretty(&summaries)?)?;
    } else {
        for s in &summaries {
            let marker = if s.active { "*".green().bold() } else { " ".normal() };
            print_text(&format!(
                "{} {:<12} {} ({} tags, {} blocks)",
                marker,
                s.id,
                s.name.bold(),
                s.tags,
                s.blocks
            ))?;
        }
    }

    Ok(())
}

fn summarize(pattern: &Pattern, active: bool) -> PatternSummary<'_> {
    PatternSummary {
        id: &pattern.id,
        name: &pattern.name,
        active,
        tags: pattern.buttons.len(),
        blocks: pattern.input_areas.len(),
    }
}

pub fn new(ctx: &mut Context) -> Result<()> {
    let pattern = ctx.workspace.create_pattern();
    println!(
        "{} Created pattern '{}' ({}) and selected it",
        "✓".green().bold(),
        pattern.name,
        pattern.id
    );
    Ok(())
}

pub fn rename(ctx: &mut Context, id: &str, name: &str) -> Result<()> {
    ctx.workspace.rename_pattern(id, name)?;
    println!("{} Renamed pattern {} to '{}'", "✓".green().bold(), id, name.trim());
    Ok(())
}

pub fn delete(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.workspace.delete_pattern(id)?;
    println!("{} Deleted pattern {}", "✓".green().bold(), id);
    if ctx.verbose {
        println!("{} Active pattern: {}", "→".cyan(), ctx.workspace.active_id());
    }
    Ok(())
}

pub fn select(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.workspace.select_pattern(id)?;
    let pattern = ctx.workspace.active_pattern();
    println!(
        "{} Selected pattern '{}' ({})",
        "✓".green().bold(),
        pattern.name,
        pattern.id
    );
    Ok(())
}
