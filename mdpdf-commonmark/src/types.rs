//! Types for the mdpdf-commonmark public API.
use serde::{Deserialize, Serialize};

/// Result of Markdown processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML fragment (body content only).
  pub html: String,

  /// Title of the document, if found (first H1).
  pub title: Option<String>,
}

impl MarkdownResult {
  /// Whether the rendered HTML has nothing worth putting on a page.
  #[must_use]
  pub fn is_blank(&self) -> bool {
    self.html.trim().is_empty()
  }
}
