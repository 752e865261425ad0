use mdpdf_commonmark::ConversionError;
use mdpdf_config::ConfigError;
use thiserror::Error;

/// Hint shown when the PDF engine cannot be run at all.
pub const ENGINE_HINT: &str = "This error might be due to wkhtmltopdf not \
                               being installed or configured correctly. \
                               Please check your system configuration.";

/// Failure of the external PDF engine.
#[derive(Debug, Error)]
pub enum RenderError {
  /// The engine could not be started, or did not finish in time.
  #[error("Error generating PDF: {reason}")]
  EngineUnavailable { reason: String, hint: String },

  /// The engine ran but did not produce a PDF.
  #[error("Failed to generate PDF. {0}")]
  EngineRejected(String),

  #[error("An unexpected error occurred: {0}")]
  Unexpected(String),
}

impl RenderError {
  pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
    Self::EngineUnavailable {
      reason: reason.into(),
      hint:   ENGINE_HINT.to_string(),
    }
  }

  /// Remediation hint, if there is one.
  #[must_use]
  pub fn hint(&self) -> Option<&str> {
    match self {
      Self::EngineUnavailable { hint, .. } => Some(hint),
      _ => None,
    }
  }
}

/// Any failure of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// Unreadable input document.
  #[error("Failed to read {source_name}: {reason}")]
  Input { source_name: String, reason: String },

  /// Invalid settings, including style validation failures.
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Conversion(#[from] ConversionError),

  #[error("Template error: {0}")]
  Template(#[from] tera::Error),

  #[error(transparent)]
  Render(#[from] RenderError),
}

impl PipelineError {
  /// Field name for style validation errors.
  #[must_use]
  pub const fn invalid_field(&self) -> Option<&'static str> {
    match self {
      Self::Config(e) => e.field(),
      _ => None,
    }
  }

  /// Remediation hint, if there is one.
  #[must_use]
  pub fn hint(&self) -> Option<&str> {
    match self {
      Self::Render(e) => e.hint(),
      _ => None,
    }
  }

  /// Message suitable for showing to a user, hint included.
  #[must_use]
  pub fn user_message(&self) -> String {
    let mut message = self.to_string();
    if let Self::Template(e) = self {
      // Tera keeps the interesting part in the source chain
      let mut source = std::error::Error::source(e);
      while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
      }
    }
    if let Some(hint) = self.hint() {
      message.push('\n');
      message.push_str(hint);
    }
    message
  }
}
