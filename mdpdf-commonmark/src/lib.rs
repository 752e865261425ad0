//! # mdpdf-commonmark
//!
//! The HTML half of the mdpdf pipeline: turns Markdown into semantic HTML,
//! highlights fenced code blocks and tags CJK text so that a dedicated font
//! can be applied later on.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdpdf_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! let result = processor
//!   .render("# Hello World\n\nThis is **bold** text.")
//!   .expect("valid markdown");
//!
//! println!("HTML: {}", result.html);
//! println!("Title: {:?}", result.title);
//! ```
//!
//! ## Stages
//!
//! Each stage is also available on its own:
//!
//! - [`MarkdownProcessor::normalize`]: Markdown to HTML using `comrak`, with
//!   tables, fenced code blocks and hard line breaks
//! - [`MarkdownProcessor::highlight`]: syntax highlighting of `pre > code`
//!   blocks followed by inline code restyling
//! - [`script::tag_script`]: wraps CJK runs in `<span lang="..">`
//!
//! All HTML rewriting walks a parsed DOM, never the raw markup.

pub mod dom;
mod error;
pub mod processor;
pub mod script;
pub mod syntax;
mod types;
pub mod utils;

pub use crate::{
  error::ConversionError,
  processor::{MarkdownOptions, MarkdownOptionsBuilder, MarkdownProcessor},
  syntax::create_default_manager,
  types::MarkdownResult,
};
