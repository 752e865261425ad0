//! Stylesheet generation and document assembly.
//!
//! Both the stylesheet and the surrounding document are `tera` templates
//! embedded from `mdpdf-templates`. The document template can be replaced by
//! a user template; it receives `title`, `stylesheet` and `body`.
use mdpdf_config::{StyleConfig, style::sanitize_font_family};
use mdpdf_templates as templates;
use tera::{Context, Tera};

const DOCUMENT: &str = templates::DOCUMENT_TEMPLATE_NAME;
const STYLESHEET: &str = templates::STYLE_TEMPLATE_NAME;

/// Font override for CJK runs tagged with `lang`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CjkFont {
  lang:        String,
  font_family: String,
}

impl CjkFont {
  /// Returns `None` if either value is unusable once sanitized.
  #[must_use]
  pub fn new(lang: &str, font_family: &str) -> Option<Self> {
    let lang: String = lang
      .chars()
      .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
      .collect();
    if lang.is_empty() {
      return None;
    }
    Some(Self {
      lang,
      font_family: sanitize_font_family(font_family)?,
    })
  }

  #[must_use]
  pub fn lang(&self) -> &str {
    &self.lang
  }

  #[must_use]
  pub fn font_family(&self) -> &str {
    &self.font_family
  }
}

/// Builds the stylesheet from a [`StyleConfig`] and wraps rendered HTML into
/// a complete document.
#[derive(Debug, Clone)]
pub struct StyleComposer {
  tera:     Tera,
  cjk_font: Option<CjkFont>,
}

impl StyleComposer {
  /// Composer using the embedded document template.
  ///
  /// # Errors
  ///
  /// Returns an error if the embedded templates fail to parse.
  pub fn new() -> Result<Self, tera::Error> {
    Self::with_document_template(templates::DOCUMENT_TEMPLATE)
  }

  /// Composer using a custom document template.
  ///
  /// # Errors
  ///
  /// Returns an error if `template` is not a valid tera template.
  pub fn with_document_template(template: &str) -> Result<Self, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(DOCUMENT, template)?;
    tera.add_raw_template(STYLESHEET, templates::STYLE_TEMPLATE)?;
    Ok(Self {
      tera,
      cjk_font: None,
    })
  }

  /// Replace the embedded stylesheet template. The template receives
  /// `font_family`, `font_size`, `line_height`, `cjk_lang` and
  /// `cjk_font_family`.
  ///
  /// # Errors
  ///
  /// Returns an error if `template` is not a valid tera template.
  pub fn with_stylesheet_template(
    mut self,
    template: &str,
  ) -> Result<Self, tera::Error> {
    self.tera.add_raw_template(STYLESHEET, template)?;
    Ok(self)
  }

  #[must_use]
  pub fn with_cjk_font(mut self, cjk_font: Option<CjkFont>) -> Self {
    self.cjk_font = cjk_font;
    self
  }

  /// Render the stylesheet alone.
  ///
  /// # Errors
  ///
  /// Returns an error if the stylesheet template fails to render.
  pub fn stylesheet(&self, style: &StyleConfig) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("font_family", &style.font_family);
    context.insert("font_size", &style.font_size_px);
    context.insert("line_height", &css_number(style.line_height));
    context.insert(
      "cjk_lang",
      &self.cjk_font.as_ref().map(CjkFont::lang),
    );
    context.insert(
      "cjk_font_family",
      &self.cjk_font.as_ref().map(CjkFont::font_family),
    );
    self.tera.render(STYLESHEET, &context)
  }

  /// Wrap `html` into a complete document carrying the stylesheet.
  ///
  /// # Errors
  ///
  /// Returns an error if a template fails to render.
  pub fn compose(
    &self,
    html: &str,
    style: &StyleConfig,
    title: Option<&str>,
  ) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("title", &title);
    context.insert("stylesheet", &self.stylesheet(style)?);
    context.insert("body", html);
    self.tera.render(DOCUMENT, &context)
  }
}

/// Format a CSS number, always with at least one decimal so `2.0` does not
/// collapse to `2`.
#[must_use]
pub fn css_number(value: f64) -> String {
  if value.fract() == 0.0 {
    format!("{value:.1}")
  } else {
    value.to_string()
  }
}
