use mdpdf_config::{PageSize, StyleConfig};

/// Technical parameters for one PDF engine run.
///
/// The fixed part mirrors what produces good looking output with
/// wkhtmltopdf; page size and minimum font size follow the style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfRenderOptions {
  pub dpi:                      u32,
  pub margin:                   String,
  pub encoding:                 String,
  pub zoom:                     String,
  pub custom_headers:           Vec<(String, String)>,
  pub page_size:                PageSize,
  pub minimum_font_size:        u32,
  pub enable_local_file_access: bool,
  pub title:                    Option<String>,
  pub quiet:                    bool,
  pub outline:                  bool,
}

impl Default for PdfRenderOptions {
  fn default() -> Self {
    Self::from_style(&StyleConfig::default())
  }
}

impl PdfRenderOptions {
  #[must_use]
  pub fn from_style(style: &StyleConfig) -> Self {
    Self {
      dpi:                      300,
      margin:                   "20mm".to_string(),
      encoding:                 "UTF-8".to_string(),
      zoom:                     "1".to_string(),
      custom_headers:           vec![(
        "Accept-Encoding".to_string(),
        "gzip".to_string(),
      )],
      page_size:                style.page_size,
      minimum_font_size:        style.font_size_px,
      enable_local_file_access: false,
      title:                    None,
      quiet:                    true,
      outline:                  false,
    }
  }

  #[must_use]
  pub fn with_title(mut self, title: Option<String>) -> Self {
    self.title = title;
    self
  }

  #[must_use]
  pub const fn with_local_file_access(mut self, enabled: bool) -> Self {
    self.enable_local_file_access = enabled;
    self
  }

  /// Command line arguments for wkhtmltopdf, reading the document from stdin
  /// and writing the PDF to stdout.
  #[must_use]
  pub fn to_args(&self) -> Vec<String> {
    let mut args = Vec::new();
    if self.quiet {
      args.push("--quiet".to_string());
    }
    if !self.outline {
      args.push("--no-outline".to_string());
    }
    args.extend(["--dpi".to_string(), self.dpi.to_string()]);
    for side in ["top", "right", "bottom", "left"] {
      args.push(format!("--margin-{side}"));
      args.push(self.margin.clone());
    }
    if let Some(title) = &self.title {
      args.extend(["--title".to_string(), title.clone()]);
    }
    args.extend([
      "--page-size".to_string(),
      self.page_size.to_string(),
      "--encoding".to_string(),
      self.encoding.clone(),
    ]);
    for (name, value) in &self.custom_headers {
      args.extend(["--custom-header".to_string(), name.clone(), value.clone()]);
    }
    args.extend([
      "--zoom".to_string(),
      self.zoom.clone(),
      "--minimum-font-size".to_string(),
      self.minimum_font_size.to_string(),
    ]);
    if self.enable_local_file_access {
      args.push("--enable-local-file-access".to_string());
    }
    args.extend(["-".to_string(), "-".to_string()]);
    args
  }
}
