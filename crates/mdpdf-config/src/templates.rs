use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, commented so that `mdpdf init`
/// gives users something to start from.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# mdpdf configuration file

# Directory the generated PDF is written to
output_dir = "."

# Custom document template (export the default with `mdpdf export`)
# template_path = "templates/document.html"

# Custom stylesheet template, same variables as the exported style.css
# stylesheet_path = "templates/style.css"

# Items appended to every document as a bulleted list
# items = ["Reviewed by: ...", "Version: 1.0"]

[style]
# Any installed font; presets are Arial, Helvetica, Times New Roman,
# Courier New and Verdana
font_family = "Arial"

# Font size in pixels
font_size = 14

# Line height multiplier
line_height = 1.5

# One of A4, Letter, Legal
page_size = "A4"

# Output file name, ".pdf" is appended when missing
file_name = "converted.pdf"

[highlight]
# Syntax highlighting for fenced code blocks
enable = true

# Highlighting theme, list them with `mdpdf themes`
# theme = "InspiredGitHub"

[cjk]
# Wrap Chinese, Japanese and Korean text so a dedicated font applies to it
enable = false

# Language tag put on the wrapped runs
lang = "zh"

# Font used for the wrapped runs
# font_family = "Noto Sans CJK SC"

[renderer]
# PDF engine binary, looked up on PATH when not absolute
binary = "wkhtmltopdf"

# Seconds before the engine is killed
timeout_secs = 60

# Allow the engine to read local files referenced by the document
enable_local_file_access = false
"#;

/// Default configuration template in JSON. JSON has no comments, see the
/// TOML template for what each field does.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "output_dir": ".",
  "items": [],
  "style": {
    "font_family": "Arial",
    "font_size": 14,
    "line_height": 1.5,
    "page_size": "A4",
    "file_name": "converted.pdf"
  },
  "highlight": {
    "enable": true
  },
  "cjk": {
    "enable": false,
    "lang": "zh"
  },
  "renderer": {
    "binary": "wkhtmltopdf",
    "timeout_secs": 60,
    "enable_local_file_access": false
  }
}
"#;

/// Get the correct configuration template based on the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
