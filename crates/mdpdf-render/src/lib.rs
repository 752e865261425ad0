//! Turns Markdown into a styled HTML document and hands it to an external
//! PDF engine.
//!
//! [`Pipeline`] ties the stages together: Markdown normalization, code
//! highlighting and CJK tagging from `mdpdf-commonmark`, then
//! [`StyleComposer`] and finally a [`PdfRenderer`].
pub mod error;
pub mod input;
pub mod list;
pub mod options;
pub mod pipeline;
pub mod renderer;
pub mod style;

pub use error::{PipelineError, RenderError};
pub use input::MarkdownSource;
pub use list::ItemList;
pub use options::PdfRenderOptions;
pub use pipeline::{PdfOutput, Pipeline, StyledDocument};
pub use renderer::{PdfRenderer, WkhtmltopdfRenderer};
pub use style::{CjkFont, StyleComposer};
