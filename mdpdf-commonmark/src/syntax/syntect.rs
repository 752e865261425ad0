//! Syntect-based syntax highlighting backend enhanced with two-face.
//!
//! Uses Sublime Text syntax definitions (TextMate grammars) extended by the
//! two-face crate, and emits inline-styled `<span>` runs so the result
//! survives the trip through an HTML-to-PDF engine without a stylesheet.

use std::sync::OnceLock;

use syntect::{
  easy::HighlightLines,
  highlighting::Theme,
  html::{IncludeBackground, styled_line_to_highlighted_html},
  parsing::{SyntaxReference, SyntaxSet},
  util::LinesWithEndings,
};
use two_face::{
  re_exports::syntect::highlighting::ThemeSet,
  theme::{EmbeddedLazyThemeSet, EmbeddedThemeName},
};

use super::{
  error::{SyntaxError, SyntaxResult},
  types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager},
};

/// Theme used when nothing else resolves. Light, so it reads well on the
/// light code block background of the stylesheet.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Themes shipped by two-face, by their canonical names.
const EMBEDDED_THEMES: &[&str] = &[
  "Ansi",
  "Base16",
  "Base16EightiesDark",
  "Base16MochaDark",
  "Base16OceanDark",
  "Base16OceanLight",
  "Base16_256",
  "ColdarkCold",
  "ColdarkDark",
  "DarkNeon",
  "Dracula",
  "Github",
  "GruvboxDark",
  "GruvboxLight",
  "InspiredGithub",
  "Leet",
  "MonokaiExtended",
  "MonokaiExtendedBright",
  "MonokaiExtendedLight",
  "MonokaiExtendedOrigin",
  "Nord",
  "OneHalfDark",
  "OneHalfLight",
  "SolarizedDark",
  "SolarizedLight",
  "SublimeSnazzy",
  "TwoDark",
  "Zenburn",
];

fn embedded_theme(name: &str) -> Option<EmbeddedThemeName> {
  let canonical = EMBEDDED_THEMES
    .iter()
    .find(|candidate| candidate.eq_ignore_ascii_case(name))?;

  let theme = match *canonical {
    "Ansi" => EmbeddedThemeName::Ansi,
    "Base16" => EmbeddedThemeName::Base16,
    "Base16EightiesDark" => EmbeddedThemeName::Base16EightiesDark,
    "Base16MochaDark" => EmbeddedThemeName::Base16MochaDark,
    "Base16OceanDark" => EmbeddedThemeName::Base16OceanDark,
    "Base16OceanLight" => EmbeddedThemeName::Base16OceanLight,
    "Base16_256" => EmbeddedThemeName::Base16_256,
    "ColdarkCold" => EmbeddedThemeName::ColdarkCold,
    "ColdarkDark" => EmbeddedThemeName::ColdarkDark,
    "DarkNeon" => EmbeddedThemeName::DarkNeon,
    "Dracula" => EmbeddedThemeName::Dracula,
    "Github" => EmbeddedThemeName::Github,
    "GruvboxDark" => EmbeddedThemeName::GruvboxDark,
    "GruvboxLight" => EmbeddedThemeName::GruvboxLight,
    "InspiredGithub" => EmbeddedThemeName::InspiredGithub,
    "Leet" => EmbeddedThemeName::Leet,
    "MonokaiExtended" => EmbeddedThemeName::MonokaiExtended,
    "MonokaiExtendedBright" => EmbeddedThemeName::MonokaiExtendedBright,
    "MonokaiExtendedLight" => EmbeddedThemeName::MonokaiExtendedLight,
    "MonokaiExtendedOrigin" => EmbeddedThemeName::MonokaiExtendedOrigin,
    "Nord" => EmbeddedThemeName::Nord,
    "OneHalfDark" => EmbeddedThemeName::OneHalfDark,
    "OneHalfLight" => EmbeddedThemeName::OneHalfLight,
    "SolarizedDark" => EmbeddedThemeName::SolarizedDark,
    "SolarizedLight" => EmbeddedThemeName::SolarizedLight,
    "SublimeSnazzy" => EmbeddedThemeName::SublimeSnazzy,
    "TwoDark" => EmbeddedThemeName::TwoDark,
    "Zenburn" => EmbeddedThemeName::Zenburn,
    _ => return None,
  };
  Some(theme)
}

/// Syntect-based syntax highlighter
pub struct SyntectHighlighter {
  theme_name: String,
}

impl SyntectHighlighter {
  /// Create a new Syntect highlighter with the specified theme.
  #[must_use]
  pub fn new(theme_name: Option<String>) -> Self {
    Self {
      theme_name: theme_name.unwrap_or_else(|| DEFAULT_THEME.to_string()),
    }
  }

  /// Get the syntect `SyntaxSet`.
  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(two_face::syntax::extra_newlines)
  }

  /// Get the two-face theme set with extended themes.
  fn theme_set() -> &'static EmbeddedLazyThemeSet {
    static THEME_SET: OnceLock<EmbeddedLazyThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(two_face::theme::extra)
  }

  /// Get the default syntect `ThemeSet`.
  fn default_theme_set() -> &'static ThemeSet {
    static DEFAULT_THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    DEFAULT_THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  /// Resolve a theme by name: explicit argument first, then the highlighter
  /// default, then [`DEFAULT_THEME`].
  fn get_theme(&self, theme_name: Option<&str>) -> &'static Theme {
    let name = theme_name
      .filter(|name| !name.trim().is_empty())
      .unwrap_or(&self.theme_name);

    let default_theme_set = Self::default_theme_set();
    if let Some(theme) = default_theme_set.themes.get(name) {
      return theme;
    }

    if let Some(embedded) = embedded_theme(name) {
      return Self::theme_set().get(embedded);
    }

    log::debug!("Unknown highlight theme '{name}', using {DEFAULT_THEME}");
    default_theme_set
      .themes
      .get(DEFAULT_THEME)
      .unwrap_or_else(|| {
        Self::theme_set().get(EmbeddedThemeName::InspiredGithub)
      })
  }

  /// Tokenize `code` line by line and emit styled spans.
  fn highlight_with(
    code: &str,
    syntax: &SyntaxReference,
    theme: &Theme,
  ) -> SyntaxResult<String> {
    let syntax_set = Self::syntax_set();
    let mut lines = HighlightLines::new(syntax, theme);
    let mut html = String::with_capacity(code.len() * 2);

    for line in LinesWithEndings::from(code) {
      let regions = lines
        .highlight_line(line, syntax_set)
        .map_err(|e| SyntaxError::Backend(e.to_string()))?;
      let line_html =
        styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
          .map_err(|e| SyntaxError::Backend(e.to_string()))?;
      html.push_str(&line_html);
    }

    Ok(html)
  }
}

impl Default for SyntectHighlighter {
  fn default() -> Self {
    Self::new(None)
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn available_themes(&self) -> Vec<String> {
    let mut themes: Vec<String> =
      Self::default_theme_set().themes.keys().cloned().collect();
    themes.extend(EMBEDDED_THEMES.iter().map(ToString::to_string));
    themes.sort();
    themes.dedup();
    themes
  }

  fn supports_language(&self, language: &str) -> bool {
    Self::syntax_set().find_syntax_by_token(language).is_some()
  }

  fn highlight(
    &self,
    code: &str,
    language: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<String> {
    let syntax = Self::syntax_set()
      .find_syntax_by_token(language)
      .ok_or_else(|| SyntaxError::UnknownLanguage(language.to_string()))?;

    Self::highlight_with(code, syntax, self.get_theme(theme))
  }

  fn highlight_plain(
    &self,
    code: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<String> {
    let syntax = Self::syntax_set().find_syntax_plain_text();
    Self::highlight_with(code, syntax, self.get_theme(theme))
  }
}

/// Create a Syntect-based syntax manager with the given default theme.
///
/// # Errors
///
/// Never fails; the signature matches [`super::create_default_manager`].
pub fn create_syntect_manager(
  theme: Option<&str>,
) -> SyntaxResult<SyntaxManager> {
  let theme = theme.unwrap_or(DEFAULT_THEME).to_string();
  let highlighter = Box::new(SyntectHighlighter::new(Some(theme.clone())));
  let config = SyntaxConfig {
    theme: Some(theme),
    ..SyntaxConfig::default()
  };
  Ok(SyntaxManager::new(highlighter, config))
}
