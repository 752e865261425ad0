//! Document style settings.
//!
//! [`StyleSettings`] is what users write: every field optional, numbers
//! accepted either as numbers or as strings. [`StyleSettings::validate`]
//! coerces it into a [`StyleConfig`], the only form the renderer accepts.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.5;
pub const DEFAULT_FILE_NAME: &str = "converted.pdf";

/// Font families offered by the original presets. Any other family name is
/// accepted as long as it survives sanitizing.
pub const FONT_PRESETS: &[&str] =
  &["Arial", "Helvetica", "Times New Roman", "Courier New", "Verdana"];

const FONT_SIZE_RANGE: (u32, u32) = (1, 144);
const LINE_HEIGHT_RANGE: (f64, f64) = (0.5, 5.0);

/// A number as written in a config file or on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
  Int(i64),
  Float(f64),
  Text(String),
}

impl fmt::Display for Numeric {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Int(i) => write!(f, "{i}"),
      Self::Float(x) => write!(f, "{x}"),
      Self::Text(s) => f.write_str(s),
    }
  }
}

impl From<&str> for Numeric {
  fn from(value: &str) -> Self {
    Self::Text(value.to_string())
  }
}

/// Supported page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
  #[default]
  A4,
  Letter,
  Legal,
}

impl PageSize {
  pub const ALL: [Self; 3] = [Self::A4, Self::Letter, Self::Legal];

  /// Name as understood by the PDF engine.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::A4 => "A4",
      Self::Letter => "Letter",
      Self::Legal => "Legal",
    }
  }
}

impl fmt::Display for PageSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PageSize {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Self::ALL
      .into_iter()
      .find(|size| size.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| {
        ConfigError::validation("page size", s, "expected A4, Letter or Legal")
      })
  }
}

/// Validated style configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
  pub font_family:  String,
  pub font_size_px: u32,
  pub line_height:  f64,
  pub page_size:    PageSize,
  pub file_name:    String,
}

impl Default for StyleConfig {
  fn default() -> Self {
    Self {
      font_family:  DEFAULT_FONT_FAMILY.to_string(),
      font_size_px: DEFAULT_FONT_SIZE,
      line_height:  DEFAULT_LINE_HEIGHT,
      page_size:    PageSize::default(),
      file_name:    DEFAULT_FILE_NAME.to_string(),
    }
  }
}

/// Raw `[style]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font_family: Option<String>,

  /// Font size in pixels.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font_size: Option<Numeric>,

  /// Unitless line height multiplier.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub line_height: Option<Numeric>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub page_size: Option<String>,

  /// Name of the generated file. `.pdf` is appended when missing.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file_name: Option<String>,
}

impl StyleSettings {
  /// Take every value `other` sets.
  pub fn merge(&mut self, other: Self) {
    merge_option(&mut self.font_family, other.font_family);
    merge_option(&mut self.font_size, other.font_size);
    merge_option(&mut self.line_height, other.line_height);
    merge_option(&mut self.page_size, other.page_size);
    merge_option(&mut self.file_name, other.file_name);
  }

  /// Coerce the raw settings into a [`StyleConfig`], filling in defaults for
  /// anything unset.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Validation`] naming the first field that is not
  /// numeric, out of range, or otherwise unusable.
  pub fn validate(&self) -> Result<StyleConfig, ConfigError> {
    let font_family = match self.font_family.as_deref() {
      Some(family) => {
        sanitize_font_family(family).ok_or_else(|| {
          ConfigError::validation("font family", family, "must not be empty")
        })?
      },
      None => DEFAULT_FONT_FAMILY.to_string(),
    };

    let font_size_px = match &self.font_size {
      Some(value) => parse_font_size(value)?,
      None => DEFAULT_FONT_SIZE,
    };

    let line_height = match &self.line_height {
      Some(value) => parse_line_height(value)?,
      None => DEFAULT_LINE_HEIGHT,
    };

    let page_size = match self.page_size.as_deref() {
      Some(size) => size.parse()?,
      None => PageSize::default(),
    };

    let file_name = match self.file_name.as_deref() {
      Some(name) => normalize_file_name(name)?,
      None => DEFAULT_FILE_NAME.to_string(),
    };

    Ok(StyleConfig {
      font_family,
      font_size_px,
      line_height,
      page_size,
      file_name,
    })
  }
}

pub(crate) fn merge_option<T>(base: &mut Option<T>, other: Option<T>) {
  if other.is_some() {
    *base = other;
  }
}

fn parse_font_size(value: &Numeric) -> Result<u32, ConfigError> {
  let invalid =
    |reason: &str| ConfigError::validation("font size", value, reason);

  let size = match value {
    Numeric::Int(i) => {
      u32::try_from(*i).map_err(|_| invalid("must be a positive integer"))?
    },
    Numeric::Float(x) => {
      float_to_whole(*x).ok_or_else(|| invalid("must be a whole number"))?
    },
    Numeric::Text(s) => {
      s.trim()
        .parse::<u32>()
        .map_err(|_| invalid("must be a positive integer"))?
    },
  };

  let (min, max) = FONT_SIZE_RANGE;
  if !(min..=max).contains(&size) {
    return Err(invalid(&format!("must be between {min} and {max}")));
  }
  Ok(size)
}

#[allow(
  clippy::cast_possible_truncation,
  clippy::cast_sign_loss,
  reason = "Range and fraction are checked before casting"
)]
fn float_to_whole(x: f64) -> Option<u32> {
  let whole = x.is_finite() && x.fract() == 0.0;
  (whole && (0.0..=f64::from(u32::MAX)).contains(&x)).then(|| x as u32)
}

fn parse_line_height(value: &Numeric) -> Result<f64, ConfigError> {
  let invalid =
    |reason: &str| ConfigError::validation("line height", value, reason);

  let height = match value {
    Numeric::Int(i) => {
      i32::try_from(*i)
        .map(f64::from)
        .map_err(|_| invalid("out of range"))?
    },
    Numeric::Float(x) => *x,
    Numeric::Text(s) => {
      s.trim()
        .parse::<f64>()
        .map_err(|_| invalid("must be a number"))?
    },
  };

  let (min, max) = LINE_HEIGHT_RANGE;
  if !height.is_finite() || height < min || height > max {
    return Err(invalid(&format!("must be between {min:.1} and {max:.1}")));
  }
  Ok(height)
}

/// Strip characters that could escape the CSS string a font family ends up
/// in. Returns `None` when nothing usable is left.
#[must_use]
pub fn sanitize_font_family(family: &str) -> Option<String> {
  let cleaned: String = family
    .chars()
    .filter(|c| !matches!(c, '\'' | '"' | '\\' | ';' | '{' | '}' | '<' | '>'))
    .collect();
  let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
  (!cleaned.is_empty()).then_some(cleaned)
}

fn normalize_file_name(name: &str) -> Result<String, ConfigError> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(ConfigError::validation(
      "file name",
      name,
      "must not be empty",
    ));
  }
  if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
    return Err(ConfigError::validation(
      "file name",
      name,
      "must be a plain file name, not a path",
    ));
  }

  let has_pdf_extension = trimmed.rsplit_once('.').is_some_and(|(stem, ext)| {
    !stem.is_empty() && ext.eq_ignore_ascii_case("pdf")
  });
  if has_pdf_extension {
    Ok(trimmed.to_string())
  } else {
    Ok(format!("{trimmed}.pdf"))
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_defaults() {
    let style = StyleSettings::default().validate().unwrap();
    assert_eq!(style, StyleConfig::default());
    assert_eq!(style.font_size_px, 14);
    assert!((style.line_height - 1.5).abs() < f64::EPSILON);
    assert_eq!(style.file_name, "converted.pdf");
  }

  #[test]
  fn test_numbers_as_strings_are_coerced() {
    let settings = StyleSettings {
      font_size: Some(" 20 ".into()),
      line_height: Some("2".into()),
      ..Default::default()
    };
    let style = settings.validate().unwrap();
    assert_eq!(style.font_size_px, 20);
    assert!((style.line_height - 2.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_whole_float_font_size_is_accepted() {
    let settings = StyleSettings {
      font_size: Some(Numeric::Float(16.0)),
      ..Default::default()
    };
    assert_eq!(settings.validate().unwrap().font_size_px, 16);

    let settings = StyleSettings {
      font_size: Some(Numeric::Float(16.5)),
      ..Default::default()
    };
    assert_eq!(settings.validate().unwrap_err().field(), Some("font size"));
  }

  #[test]
  fn test_non_numeric_font_size_names_field() {
    let settings = StyleSettings {
      font_size: Some("abc".into()),
      ..Default::default()
    };
    let err = settings.validate().unwrap_err();
    assert_eq!(err.field(), Some("font size"));
    assert!(err.to_string().contains("abc"));
  }

  #[test]
  fn test_out_of_range_values() {
    for size in [Numeric::Int(0), Numeric::Int(-3), Numeric::Int(1000)] {
      let settings = StyleSettings {
        font_size: Some(size),
        ..Default::default()
      };
      assert_eq!(settings.validate().unwrap_err().field(), Some("font size"));
    }

    for height in ["0", "-1", "NaN", "tall"] {
      let settings = StyleSettings {
        line_height: Some(height.into()),
        ..Default::default()
      };
      assert_eq!(
        settings.validate().unwrap_err().field(),
        Some("line height")
      );
    }
  }

  #[test]
  fn test_page_size_parsing() {
    assert_eq!("a4".parse::<PageSize>().unwrap(), PageSize::A4);
    assert_eq!("LETTER".parse::<PageSize>().unwrap(), PageSize::Letter);
    assert_eq!(" Legal ".parse::<PageSize>().unwrap(), PageSize::Legal);
    assert_eq!(
      "A5".parse::<PageSize>().unwrap_err().field(),
      Some("page size")
    );
    assert_eq!(PageSize::Letter.to_string(), "Letter");
  }

  #[test]
  fn test_file_name_gets_pdf_extension() {
    let cases = [
      ("report", "report.pdf"),
      ("report.pdf", "report.pdf"),
      ("report.PDF", "report.PDF"),
      ("notes.v2", "notes.v2.pdf"),
      (".pdf", ".pdf.pdf"),
    ];
    for (input, expected) in cases {
      assert_eq!(normalize_file_name(input).unwrap(), expected);
    }
    assert!(normalize_file_name("   ").is_err());
    assert!(normalize_file_name("../escape.pdf").is_err());
  }

  #[test]
  fn test_font_family_is_sanitized() {
    assert_eq!(
      sanitize_font_family("Times New Roman").as_deref(),
      Some("Times New Roman")
    );
    assert_eq!(
      sanitize_font_family("Evil'; } body { color: red").as_deref(),
      Some("Evil body color: red")
    );

    let settings = StyleSettings {
      font_family: Some("'\"".into()),
      ..Default::default()
    };
    assert_eq!(settings.validate().unwrap_err().field(), Some("font family"));
  }

  #[test]
  fn test_merge_keeps_unset_fields() {
    let mut base = StyleSettings {
      font_family: Some("Verdana".into()),
      font_size: Some(Numeric::Int(12)),
      ..Default::default()
    };
    base.merge(StyleSettings {
      font_size: Some(Numeric::Int(18)),
      ..Default::default()
    });
    assert_eq!(base.font_family.as_deref(), Some("Verdana"));
    assert_eq!(base.font_size, Some(Numeric::Int(18)));
  }

  #[test]
  fn test_untagged_numeric_deserializes_all_forms() {
    let settings: StyleSettings =
      toml::from_str("font_size = 16\nline_height = \"1.8\"").unwrap();
    assert_eq!(settings.font_size, Some(Numeric::Int(16)));
    assert_eq!(settings.line_height, Some(Numeric::Text("1.8".into())));

    let settings: StyleSettings =
      serde_json::from_str(r#"{"line_height": 1.25}"#).unwrap();
    assert_eq!(settings.line_height, Some(Numeric::Float(1.25)));
  }
}
