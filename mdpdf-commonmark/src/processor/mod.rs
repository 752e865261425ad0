//! Markdown processing.
//!
//! - [`core`]: the processor and its rendering stages
//! - [`types`]: options, the builder and the processor type
pub mod core;
pub mod types;

pub use core::{HIGHLIGHT_CLASS, INLINE_CODE_CLASS, INLINE_CODE_STYLE};

pub use types::{MarkdownOptions, MarkdownOptionsBuilder, MarkdownProcessor};
