use thiserror::Error;

/// Error type for mdpdf-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Template error: {0}")]
  Template(String),

  /// A style setting could not be turned into a usable value.
  #[error("Invalid {field} {value:?}: {reason}")]
  Validation {
    field:  &'static str,
    value:  String,
    reason: String,
  },
}

impl ConfigError {
  pub(crate) fn validation(
    field: &'static str,
    value: impl ToString,
    reason: impl Into<String>,
  ) -> Self {
    Self::Validation {
      field,
      value: value.to_string(),
      reason: reason.into(),
    }
  }

  /// Name of the offending field for validation errors.
  #[must_use]
  pub const fn field(&self) -> Option<&'static str> {
    match self {
      Self::Validation { field, .. } => Some(field),
      _ => None,
    }
  }
}
