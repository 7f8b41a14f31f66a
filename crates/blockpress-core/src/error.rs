use crate::validate::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockpressError {
    // Configuration errors
    #[error("TEMPLATE_INVALID: {0}")]
    InvalidTemplate(#[from] TemplateError),

    #[error("NAME_EMPTY: name must not be blank")]
    EmptyName,

    #[error("PATTERN_NOT_FOUND: pattern '{0}' not found")]
    PatternNotFound(String),

    #[error("PATTERN_LAST: '{0}' is the only pattern and cannot be deleted")]
    LastPattern(String),

    #[error("TAG_NOT_FOUND: tag '{0}' not found in the active pattern")]
    TagNotFound(String),

    #[error("BLOCK_NOT_FOUND: block '{0}' not found in the active pattern")]
    BlockNotFound(String),

    #[error("INDEX_OUT_OF_RANGE: index {index} is outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("FORMATTING_ROLE_UNKNOWN: '{0}' (expected bold or highlight)")]
    UnknownFormattingRole(String),

    #[error("TAG_TYPE_UNKNOWN: '{0}' (expected single, multi, list, link, p-list, link-list or static)")]
    UnknownTagType(String),

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("DATA_DIR_UNAVAILABLE: no data directory found; pass --data-dir or set BLOCKPRESS_HOME")]
    DataDirUnavailable,

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BlockpressError>;
