use crate::clipboard::{self, CopyOutcome};
use crate::context::Context;
use crate::output::{print_html, print_text};
use anyhow::Result;
use colored::Colorize;

pub fn show(ctx: &Context) -> Result<()> {
    let output = ctx.workspace.output();
    if output.is_empty() {
        print_text("Output is empty")?;
    } else {
        print_html(output.as_str())?;
        if !output.as_str().ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

pub fn clear(ctx: &mut Context) -> Result<()> {
    ctx.workspace.clear_output();
    println!("{} Output cleared", "✓".green().bold());
    Ok(())
}

pub fn copy(ctx: &Context) -> Result<()> {
    let output = ctx.workspace.output();
    if output.is_empty() {
        println!("{} Output is empty, nothing to copy", "→".cyan());
        return Ok(());
    }

    match clipboard::copy(output.as_str(), &ctx.config.clipboard, &ctx.data_dir) {
        CopyOutcome::Clipboard(tool) => {
            println!("{} Copied output to the clipboard ({})", "✓".green().bold(), tool);
        }
        CopyOutcome::File(path) => {
            println!(
                "{} No clipboard available, output written to {}",
                "→".cyan(),
                path.display()
            );
        }
        // Already logged
        CopyOutcome::Failed => {}
    }
    Ok(())
}
