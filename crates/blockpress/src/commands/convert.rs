use crate::context::Context;
use crate::output::print_html;
use anyhow::Result;

/// Converts one block or the whole pattern and prints what was appended
pub fn run(ctx: &mut Context, group_id: Option<&str>) -> Result<()> {
    let html = match group_id {
        Some(id) => ctx.workspace.convert_block(id)?,
        None => ctx.workspace.convert_all(),
    };

    if html.trim().is_empty() {
        log::warn!("Nothing to convert: the block is empty");
        return Ok(());
    }

    print_html(&html)?;
    Ok(())
}
