pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Why a code block could not be highlighted.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
  /// No syntax definition matches the fence language.
  #[error("No syntax definition for '{0}'")]
  UnknownLanguage(String),

  /// The backend failed while tokenizing.
  #[error("Failed to highlight code block: {0}")]
  Backend(String),

  #[error(
    "Syntax highlighting was not compiled in; enable the 'syntect' feature"
  )]
  NoBackend,
}
