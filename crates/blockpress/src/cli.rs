//! CLI command structure using clap

use blockpress_core::model::{FormattingRole, TagType};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blockpress")]
#[command(version, about = "Convert rich text blocks to HTML through templates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding saved patterns, output and blockpress.toml
    #[arg(long, global = true, env = "BLOCKPRESS_HOME")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage patterns
    #[command(subcommand)]
    Pattern(PatternCommands),

    /// Manage tag definitions of the active pattern
    #[command(subcommand)]
    Tag(TagCommands),

    /// Show or change the paste formatting map of the active pattern
    #[command(subcommand)]
    Format(FormatCommands),

    /// Manage input blocks of the active pattern
    #[command(subcommand)]
    Block(BlockCommands),

    /// Convert one block, or every block of the active pattern, into the output
    Convert {
        /// Block to convert; all blocks when omitted
        group_id: Option<String>,
    },

    /// Show, clear or copy the accumulated output
    #[command(subcommand)]
    Output(OutputCommands),

    /// Check a template without saving it
    Validate {
        #[arg(long = "type")]
        tag_type: TagType,

        template: String,
    },
}

#[derive(Subcommand)]
pub enum PatternCommands {
    /// List patterns
    List {
        #[arg(long)]
        json: bool,
    },

    /// Create a pattern from the active one's tags and select it
    New,

    /// Rename a pattern
    Rename { id: String, name: String },

    /// Delete a pattern
    Delete { id: String },

    /// Select the active pattern
    Select { id: String },
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// List tag definitions
    List {
        #[arg(long)]
        json: bool,
    },

    /// Add a tag definition
    Add(TagFields),

    /// Change a tag definition; omitted fields keep their value
    Edit {
        id: String,

        #[command(flatten)]
        fields: TagEditFields,
    },

    /// Delete a tag definition
    Delete { id: String },

    /// Move a tag definition to another position (0-based)
    Move { from: usize, to: usize },
}

#[derive(Args)]
pub struct TagFields {
    #[arg(long)]
    pub name: String,

    #[arg(long = "type")]
    pub tag_type: TagType,

    #[arg(long)]
    pub template: String,

    /// Item template for link-list tags
    #[arg(long)]
    pub link_item_template: Option<String>,

    /// Drop the trailing <br> from the generated content
    #[arg(long)]
    pub remove_last_br: bool,
}

#[derive(Args)]
pub struct TagEditFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "type")]
    pub tag_type: Option<TagType>,

    #[arg(long)]
    pub template: Option<String>,

    #[arg(long)]
    pub link_item_template: Option<String>,

    #[arg(long, overrides_with = "keep_last_br")]
    pub remove_last_br: bool,

    #[arg(long, overrides_with = "remove_last_br")]
    pub keep_last_br: bool,
}

#[derive(Subcommand)]
pub enum FormatCommands {
    /// Show the formatting map
    Show,

    /// Set the template for bold or highlight; an empty template restores the default
    Set {
        role: FormattingRole,
        template: String,
    },
}

#[derive(Subcommand)]
pub enum BlockCommands {
    /// List blocks
    List,

    /// Add a block bound to a tag
    Add {
        tag_id: String,

        /// Insert before every other block
        #[arg(long, conflicts_with = "after")]
        start: bool,

        /// Insert after this block
        #[arg(long, value_name = "GROUP_ID")]
        after: Option<String>,

        #[command(flatten)]
        content: ContentSource,
    },

    /// Replace a block's content
    Set {
        group_id: String,

        #[command(flatten)]
        content: ContentSource,
    },

    /// Append clipboard-style HTML to a block
    Paste {
        group_id: String,

        #[command(flatten)]
        source: PasteSource,
    },

    /// Delete a block
    Delete { group_id: String },

    /// Move a block to another position (0-based)
    Move { group_id: String, index: usize },

    /// Delete every block
    Clear,
}

#[derive(Args)]
#[group(multiple = false)]
pub struct ContentSource {
    /// Content as HTML
    #[arg(long, value_name = "HTML")]
    pub content: Option<String>,

    /// Content as plain text; line breaks are kept
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Read HTML content from a file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct PasteSource {
    /// Pasted HTML
    #[arg(long, value_name = "HTML")]
    pub html: Option<String>,

    /// Read pasted HTML from a file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum OutputCommands {
    /// Print the output buffer
    Show,

    /// Empty the output buffer
    Clear,

    /// Copy the output buffer to the system clipboard
    Copy,
}
