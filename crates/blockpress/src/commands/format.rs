use crate::context::Context;
use crate::output::print_text;
use anyhow::Result;
use blockpress_core::model::FormattingRole;
use colored::Colorize;

pub fn show(ctx: &Context) -> Result<()> {
    let map = ctx.workspace.formatting_map();
    for role in FormattingRole::ALL {
        let entry = map.get(role);
        print_text(&format!(
            "{:<10} {} ({})",
            role.as_str().bold(),
            entry.template,
            entry.display_name
        ))?;
    }
    Ok(())
}

pub fn set(ctx: &mut Context, role: FormattingRole, template: &str) -> Result<()> {
    ctx.workspace.set_formatting(role, template)?;
    let entry = ctx.workspace.formatting_map().get(role);
    println!(
        "{} {} formatting is now {}",
        "✓".green().bold(),
        role,
        entry.template
    );
    Ok(())
}
