//! Type definitions for the Markdown processor.
//!
//! # Examples
//!
//! ```
//! use mdpdf_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   highlight_code: true,
//!   tag_cjk: true,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use std::sync::Arc;

use crate::script::DEFAULT_CJK_LANG;

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct MarkdownOptions {
  /// Enable the GitHub Flavored Markdown extras beyond tables
  /// (strikethrough, autolinks, task lists, footnotes).
  pub gfm: bool,

  /// Turn single newlines inside a paragraph into `<br>`.
  pub hard_breaks: bool,

  /// Enable syntax highlighting for fenced code blocks.
  pub highlight_code: bool,

  /// Optional: Custom syntax highlighting theme name.
  pub highlight_theme: Option<String>,

  /// Give inline `code` spans a background and padding.
  pub style_inline_code: bool,

  /// Wrap CJK runs in language-tagged spans.
  pub tag_cjk: bool,

  /// Value of the `lang` attribute put on CJK spans.
  pub cjk_lang: String,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:               true,
      hard_breaks:       true,
      highlight_code:    cfg!(feature = "syntect"),
      highlight_theme:   None,
      style_inline_code: true,
      tag_cjk:           false,
      cjk_lang:          DEFAULT_CJK_LANG.to_string(),
    }
  }
}

/// Main Markdown processor.
///
/// Holds no per-document state; a single processor can render any number of
/// documents, and clones share the syntax manager through an `Arc`.
#[derive(Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:        MarkdownOptions,
  pub(crate) syntax_manager: Option<Arc<crate::syntax::SyntaxManager>>,
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable the GFM extras.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Enable or disable newline-to-`<br>` conversion.
  #[must_use]
  pub const fn hard_breaks(mut self, enabled: bool) -> Self {
    self.options.hard_breaks = enabled;
    self
  }

  /// Enable or disable syntax highlighting.
  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  /// Set the syntax highlighting theme.
  #[must_use]
  pub fn highlight_theme<S: Into<String>>(mut self, theme: Option<S>) -> Self {
    self.options.highlight_theme = theme.map(Into::into);
    self
  }

  /// Enable or disable inline code restyling.
  #[must_use]
  pub const fn style_inline_code(mut self, enabled: bool) -> Self {
    self.options.style_inline_code = enabled;
    self
  }

  /// Enable CJK tagging with the given `lang` value, or disable it with
  /// `None`.
  #[must_use]
  pub fn tag_cjk<S: Into<String>>(mut self, lang: Option<S>) -> Self {
    match lang {
      Some(lang) => {
        self.options.tag_cjk = true;
        self.options.cjk_lang = lang.into();
      },
      None => self.options.tag_cjk = false,
    }
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}
