use std::{
  fs,
  io::{self, Read},
  path::PathBuf,
};

use crate::error::PipelineError;

/// Where a Markdown document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownSource {
  File(PathBuf),
  Stdin,
  Text(String),
}

impl MarkdownSource {
  /// `-` means stdin, anything else is a file path.
  #[must_use]
  pub fn from_arg(arg: Option<PathBuf>) -> Self {
    match arg {
      Some(path) if path.as_os_str() != "-" => Self::File(path),
      _ => Self::Stdin,
    }
  }

  /// Name used in messages.
  #[must_use]
  pub fn name(&self) -> String {
    match self {
      Self::File(path) => path.display().to_string(),
      Self::Stdin => "standard input".to_string(),
      Self::Text(_) => "inline text".to_string(),
    }
  }

  /// File stem usable as a default output name.
  #[must_use]
  pub fn stem(&self) -> Option<String> {
    match self {
      Self::File(path) => {
        path
          .file_stem()
          .map(|stem| stem.to_string_lossy().into_owned())
      },
      _ => None,
    }
  }

  /// Read the whole document, which must be valid UTF-8.
  ///
  /// # Errors
  ///
  /// Returns [`PipelineError::Input`] if reading fails or the bytes are not
  /// UTF-8.
  pub fn load(&self) -> Result<String, PipelineError> {
    let bytes = match self {
      Self::Text(text) => return Ok(text.clone()),
      Self::File(path) => fs::read(path),
      Self::Stdin => {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer).map(|_| buffer)
      },
    }
    .map_err(|e| self.input_error(e.to_string()))?;

    String::from_utf8(bytes)
      .map_err(|e| self.input_error(format!("not valid UTF-8 ({e})")))
  }

  fn input_error(&self, reason: String) -> PipelineError {
    PipelineError::Input {
      source_name: self.name(),
      reason,
    }
  }
}
