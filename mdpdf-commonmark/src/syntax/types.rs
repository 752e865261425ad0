use std::collections::HashMap;

use super::error::{SyntaxError, SyntaxResult};

/// A highlighting backend.
///
/// Output is the inner markup of a code block: styled `<span>` runs with
/// HTML-escaped text, no `<pre>` or `<code>` wrapper.
pub trait SyntaxHighlighter: Send + Sync {
  fn name(&self) -> &'static str;

  /// Theme names accepted by [`SyntaxHighlighter::highlight`].
  fn available_themes(&self) -> Vec<String>;

  /// Whether `language` (a fence token such as `rust` or `py`) has a syntax
  /// definition.
  fn supports_language(&self, language: &str) -> bool;

  /// Highlight `code` as `language` using `theme`, or the backend's theme
  /// when `None`.
  ///
  /// # Errors
  ///
  /// Returns an error if the language is unknown or tokenizing fails.
  fn highlight(
    &self,
    code: &str,
    language: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<String>;

  /// Escape `code` into the same markup shape without any token colouring.
  ///
  /// # Errors
  ///
  /// Returns an error if the backend fails while producing markup.
  fn highlight_plain(
    &self,
    code: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<String>;
}

/// Fence names people write that backends do not know by that name.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
  ("c++", "cpp"),
  ("console", "bash"),
  ("golang", "go"),
  ("js", "javascript"),
  ("md", "markdown"),
  ("py", "python"),
  ("rb", "ruby"),
  ("sh", "bash"),
  ("shell", "bash"),
  ("ts", "typescript"),
  ("yml", "yaml"),
  ("zsh", "bash"),
];

#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Theme used when a call does not name one.
  pub theme:          Option<String>,
  pub aliases:        HashMap<String, String>,
  /// Emit escaped plain text for unknown languages instead of failing.
  pub plain_fallback: bool,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    Self {
      theme:          None,
      aliases:        LANGUAGE_ALIASES
        .iter()
        .map(|(alias, language)| ((*alias).to_string(), (*language).to_string()))
        .collect(),
      plain_fallback: true,
    }
  }
}

/// A backend plus the policy for picking languages and themes.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  #[must_use]
  pub const fn config(&self) -> &SyntaxConfig {
    &self.config
  }

  /// Lowercase `language` and map known aliases.
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let language = language.trim().to_lowercase();
    match self.config.aliases.get(&language) {
      Some(resolved) => resolved.clone(),
      None => language,
    }
  }

  /// Highlight a fenced block. An empty or unknown language is rendered as
  /// plain text unless plain fallback is disabled.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnknownLanguage`] when fallback is disabled, or
  /// any backend failure.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<String> {
    let language = self.resolve_language(language);
    let theme = theme.or(self.config.theme.as_deref());

    if !language.is_empty() && self.highlighter.supports_language(&language) {
      return self.highlighter.highlight(code, &language, theme);
    }
    if !self.config.plain_fallback {
      return Err(SyntaxError::UnknownLanguage(language));
    }

    log::debug!("No syntax for '{language}', highlighting as plain text");
    self.highlighter.highlight_plain(code, theme)
  }
}
