//! CLI command implementations

pub mod block;
pub mod convert;
pub mod format;
pub mod output;
pub mod pattern;
pub mod tag;
pub mod validate;
