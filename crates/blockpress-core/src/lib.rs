//! Template-driven conversion of rich text blocks into HTML.
//!
//! A workspace holds named patterns. Each pattern bundles tag definitions
//! (a tag type plus an HTML template), a formatting map used when pasting
//! from word processors, and the input blocks the user is editing. Blocks are
//! converted through their tag's template into an accumulating output buffer.
//!
//! - [`validate`]: template checks applied before a tag is accepted
//! - [`convert`]: per-tag-type conversion of one block
//! - [`cleanup`]: normalization applied to every converted fragment
//! - [`store`]: the [`store::Workspace`], persistence and load-time migration
//! - [`output`]: the accumulating output buffer
//! - [`config`]: `blockpress.toml` and data directory resolution

pub mod cleanup;
pub mod config;
pub mod convert;
pub mod debounce;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod placeholder;
pub mod store;
pub mod validate;

pub use error::{BlockpressError, Result};
