use anyhow::Result;
use blockpress_core::error::BlockpressError;
use blockpress_core::model::TagType;
use blockpress_core::validate::validate;
use colored::Colorize;

/// Checks a template; an unbalanced template passes with a logged warning
pub fn run(template: &str, tag_type: TagType) -> Result<()> {
    validate(template, tag_type).map_err(BlockpressError::from)?;
    println!("{} Template is valid for {} tags", "✓".green().bold(), tag_type);
    Ok(())
}
