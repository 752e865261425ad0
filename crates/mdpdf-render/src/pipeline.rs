//! The Markdown to PDF pipeline.
//!
//! ```text
//! markdown -> normalize -> highlight -> tag CJK -> compose -> render
//! ```
//!
//! Every stage is a function of its input and the configuration; a
//! [`Pipeline`] holds no per-document state and can be shared between
//! threads.
use std::{
  fs,
  io,
  path::{Path, PathBuf},
  time::Instant,
};

use log::{debug, info};
use mdpdf_commonmark::{MarkdownOptionsBuilder, MarkdownProcessor};
use mdpdf_config::{Config, StyleConfig, StyleSettings};

use crate::{
  error::PipelineError,
  list::ItemList,
  options::PdfRenderOptions,
  renderer::{PdfRenderer, WkhtmltopdfRenderer},
  style::{CjkFont, StyleComposer},
};

/// A rendered PDF, ready to be written or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOutput {
  pub bytes:     Vec<u8>,
  pub file_name: String,
}

impl PdfOutput {
  pub const MIME_TYPE: &'static str = "application/pdf";

  #[must_use]
  pub const fn mime_type(&self) -> &'static str {
    Self::MIME_TYPE
  }

  /// Write the PDF into `dir`, creating it if needed.
  ///
  /// # Errors
  ///
  /// Returns an error if the directory or file cannot be written.
  pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&self.file_name);
    fs::write(&path, &self.bytes)?;
    Ok(path)
  }
}

/// A styled HTML document, the input of the PDF engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledDocument {
  pub html:  String,
  pub title: Option<String>,
}

/// Runs Markdown through all stages down to PDF bytes.
pub struct Pipeline<R = WkhtmltopdfRenderer> {
  processor:         MarkdownProcessor,
  composer:          StyleComposer,
  renderer:          R,
  items:             ItemList,
  local_file_access: bool,
}

impl Pipeline<WkhtmltopdfRenderer> {
  /// Build a pipeline from configuration, using `wkhtmltopdf`.
  ///
  /// # Errors
  ///
  /// Returns an error if a custom template or stylesheet cannot be read or
  /// parsed.
  pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
    let renderer = WkhtmltopdfRenderer::new(
      config.renderer.binary(),
      config.renderer.timeout(),
    );
    Self::from_config_with_renderer(config, renderer)
  }
}

impl<R: PdfRenderer> Pipeline<R> {
  #[must_use]
  pub fn new(
    processor: MarkdownProcessor,
    composer: StyleComposer,
    renderer: R,
  ) -> Self {
    Self {
      processor,
      composer,
      renderer,
      items: ItemList::new(),
      local_file_access: false,
    }
  }

  /// Build a pipeline from configuration with any renderer.
  ///
  /// # Errors
  ///
  /// Returns an error if a custom template or stylesheet cannot be read or
  /// parsed.
  pub fn from_config_with_renderer(
    config: &Config,
    renderer: R,
  ) -> Result<Self, PipelineError> {
    let cjk_lang = config.cjk.lang();
    let options = MarkdownOptionsBuilder::new()
      .highlight_code(config.highlight.is_enabled())
      .highlight_theme(config.highlight.theme.clone())
      .tag_cjk(config.cjk.is_enabled().then_some(cjk_lang))
      .build();

    let mut composer = match config.load_template()? {
      Some(template) => StyleComposer::with_document_template(&template)?,
      None => StyleComposer::new()?,
    };
    if let Some(stylesheet) = config.load_stylesheet()? {
      composer = composer.with_stylesheet_template(&stylesheet)?;
    }
    let cjk_font = config
      .cjk
      .font_family
      .as_deref()
      .filter(|_| config.cjk.is_enabled())
      .and_then(|family| CjkFont::new(cjk_lang, family));

    Ok(
      Self::new(
        MarkdownProcessor::new(options),
        composer.with_cjk_font(cjk_font),
        renderer,
      )
      .with_items(config.items.iter().collect())
      .with_local_file_access(config.renderer.local_file_access()),
    )
  }

  #[must_use]
  pub fn with_items(mut self, items: ItemList) -> Self {
    self.items = items;
    self
  }

  #[must_use]
  pub const fn with_local_file_access(mut self, enabled: bool) -> Self {
    self.local_file_access = enabled;
    self
  }

  #[must_use]
  pub const fn renderer(&self) -> &R {
    &self.renderer
  }

  #[must_use]
  pub const fn processor(&self) -> &MarkdownProcessor {
    &self.processor
  }

  /// Produce the styled HTML document for already validated settings.
  ///
  /// Returns `Ok(None)` for empty or whitespace-only Markdown.
  ///
  /// # Errors
  ///
  /// Returns an error if conversion or template rendering fails.
  pub fn render_html(
    &self,
    markdown: &str,
    style: &StyleConfig,
  ) -> Result<Option<StyledDocument>, PipelineError> {
    if markdown.trim().is_empty() {
      debug!("Nothing to render");
      return Ok(None);
    }

    let started = Instant::now();
    let markdown = self.items.append_to(markdown);
    let result = self.processor.render(&markdown)?;
    debug!("Rendered HTML in {:?}", started.elapsed());

    let started = Instant::now();
    let html =
      self
        .composer
        .compose(&result.html, style, result.title.as_deref())?;
    debug!("Composed document in {:?}", started.elapsed());

    Ok(Some(StyledDocument {
      html,
      title: result.title,
    }))
  }

  /// Validate `settings` and produce the styled HTML document without
  /// running the PDF engine.
  ///
  /// # Errors
  ///
  /// Returns an error if validation, conversion or templating fails.
  pub fn preview(
    &self,
    markdown: &str,
    settings: &StyleSettings,
  ) -> Result<Option<String>, PipelineError> {
    if markdown.trim().is_empty() {
      return Ok(None);
    }
    let style = settings.validate()?;
    Ok(self.render_html(markdown, &style)?.map(|document| document.html))
  }

  /// Convert Markdown into a PDF.
  ///
  /// Returns `Ok(None)` for empty or whitespace-only Markdown, without
  /// touching the renderer. Settings are validated before any rendering
  /// work starts.
  ///
  /// # Errors
  ///
  /// Returns a [`PipelineError`] for invalid settings, conversion, template
  /// or engine failures. No partial PDF is ever returned.
  pub fn convert(
    &self,
    markdown: &str,
    settings: &StyleSettings,
  ) -> Result<Option<PdfOutput>, PipelineError> {
    if markdown.trim().is_empty() {
      debug!("Nothing to render");
      return Ok(None);
    }
    let style = settings.validate()?;

    let Some(document) = self.render_html(markdown, &style)? else {
      return Ok(None);
    };

    let options = PdfRenderOptions::from_style(&style)
      .with_title(document.title)
      .with_local_file_access(self.local_file_access);

    let started = Instant::now();
    let bytes = self.renderer.render(&document.html, &options)?;
    info!(
      "{} produced {} bytes in {:?}",
      self.renderer.name(),
      bytes.len(),
      started.elapsed()
    );

    Ok(Some(PdfOutput {
      bytes,
      file_name: style.file_name,
    }))
  }
}
