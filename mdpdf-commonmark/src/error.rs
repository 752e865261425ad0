use thiserror::Error;

/// Failure of the Markdown to HTML conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
  #[error("Error converting Markdown to HTML: {0}")]
  Render(String),

  #[error("Markdown parser failed unexpectedly: {0}")]
  Panicked(String),
}
