mod cli;
mod clipboard;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{
    BlockCommands, Cli, Commands, FormatCommands, OutputCommands, PatternCommands, TagCommands,
};
use context::Context;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // validate needs no saved data
    if let Commands::Validate { tag_type, template } = &cli.command {
        return commands::validate::run(template, *tag_type);
    }

    let mut ctx = Context::open(cli.data_dir.as_deref(), cli.verbose)?;

    let result = match cli.command {
        Commands::Pattern(cmd) => match cmd {
            PatternCommands::List { json } => commands::pattern::list(&ctx, json),
            PatternCommands::New => commands::pattern::new(&mut ctx),
            PatternCommands::Rename { id, name } => commands::pattern::rename(&mut ctx, &id, &name),
            PatternCommands::Delete { id } => commands::pattern::delete(&mut ctx, &id),
            PatternCommands::Select { id } => commands::pattern::select(&mut ctx, &id),
        },
        Commands::Tag(cmd) => match cmd {
            TagCommands::List { json } => commands::tag::list(&ctx, json),
            TagCommands::Add(fields) => commands::tag::add(&mut ctx, fields),
            TagCommands::Edit { id, fields } => commands::tag::edit(&mut ctx, &id, fields),
            TagCommands::Delete { id } => commands::tag::delete(&mut ctx, &id),
            TagCommands::Move { from, to } => commands::tag::move_tag(&mut ctx, from, to),
        },
        Commands::Format(cmd) => match cmd {
            FormatCommands::Show => commands::format::show(&ctx),
            FormatCommands::Set { role, template } => {
                commands::format::set(&mut ctx, role, &template)
            }
        },
        Commands::Block(cmd) => match cmd {
            BlockCommands::List => commands::block::list(&ctx),
            BlockCommands::Add {
                tag_id,
                start,
                after,
                content,
            } => commands::block::add(&mut ctx, &tag_id, start, after, content),
            BlockCommands::Set { group_id, content } => {
                commands::block::set(&mut ctx, &group_id, content)
            }
            BlockCommands::Paste { group_id, source } => {
                commands::block::paste(&mut ctx, &group_id, source)
            }
            BlockCommands::Delete { group_id } => commands::block::delete(&mut ctx, &group_id),
            BlockCommands::Move { group_id, index } => {
                commands::block::move_block(&mut ctx, &group_id, index)
            }
            BlockCommands::Clear => commands::block::clear(&mut ctx),
        },
        Commands::Convert { group_id } => commands::convert::run(&mut ctx, group_id.as_deref()),
        Commands::Output(cmd) => match cmd {
            OutputCommands::Show => commands::output::show(&ctx),
            OutputCommands::Clear => commands::output::clear(&mut ctx),
            OutputCommands::Copy => commands::output::copy(&ctx),
        },
        Commands::Validate { .. } => unreachable!("handled before the workspace is opened"),
    };

    // Edits made before a failure are still saved
    let saved = ctx.save();
    result.and(saved)
}
