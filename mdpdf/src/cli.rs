use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mdpdf_config::Config;

#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "mdpdf: Convert Markdown documents into styled PDF files"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file (TOML or JSON). Can be specified multiple
  /// times; later files override earlier ones.
  #[arg(
    short = 'c',
    long = "config-file",
    global = true,
    action = clap::ArgAction::Append
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (e.g., --config style.font_size=20)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Convert a Markdown document into a PDF
  Convert {
    /// Markdown file to convert; omit or use `-` to read stdin
    input: Option<PathBuf>,

    /// Directory the PDF is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    style: StyleArgs,
  },

  /// Write the styled HTML document without producing a PDF
  Preview {
    /// Markdown file to preview; omit or use `-` to read stdin
    input: Option<PathBuf>,

    /// File the HTML is written to; prints to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    style: StyleArgs,
  },

  /// Create a default configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mdpdf.toml")]
    output: PathBuf,

    /// Format of the configuration file
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Export the embedded templates for customization
  Export {
    /// Directory to export templates to
    #[arg(short, long, default_value = "templates")]
    output_dir: PathBuf,

    /// Overwrite existing template files
    #[arg(long)]
    force: bool,
  },

  /// List available highlight themes
  Themes,
}

/// Style and content flags shared by `convert` and `preview`.
///
/// Numbers are taken as text; they are checked together with values from
/// configuration files so every source reports the same errors.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleArgs {
  /// Name of the generated PDF file
  #[arg(long)]
  pub file_name: Option<String>,

  /// Body font family
  #[arg(long)]
  pub font: Option<String>,

  /// Body font size in pixels
  #[arg(long)]
  pub font_size: Option<String>,

  /// Line height multiplier
  #[arg(long)]
  pub line_height: Option<String>,

  /// Page size (A4, Letter or Legal)
  #[arg(long)]
  pub page_size: Option<String>,

  /// Append an item to the bullet list at the end of the document
  #[arg(short, long = "item", action = clap::ArgAction::Append)]
  pub items: Vec<String>,

  /// Disable syntax highlighting of code blocks
  #[arg(long)]
  pub no_highlight: bool,

  /// Highlight theme
  #[arg(long)]
  pub theme: Option<String>,

  /// Tag CJK text runs with a language so a CJK font can apply
  #[arg(long)]
  pub cjk: bool,
}

impl StyleArgs {
  /// Layer the flags over `config`; flags that were not given leave the
  /// configuration untouched.
  pub fn apply_to(&self, config: &mut Config) {
    let style = &mut config.style;
    if let Some(font) = &self.font {
      style.font_family = Some(font.clone());
    }
    if let Some(size) = &self.font_size {
      style.font_size = Some(size.as_str().into());
    }
    if let Some(height) = &self.line_height {
      style.line_height = Some(height.as_str().into());
    }
    if let Some(page_size) = &self.page_size {
      style.page_size = Some(page_size.clone());
    }
    if let Some(file_name) = &self.file_name {
      style.file_name = Some(file_name.clone());
    }

    config.items.extend(self.items.iter().cloned());

    if self.no_highlight {
      config.highlight.enable = Some(false);
    }
    if let Some(theme) = &self.theme {
      config.highlight.theme = Some(theme.clone());
    }
    if self.cjk {
      config.cjk.enable = Some(true);
    }
  }
}

impl Cli {
  /// Parse command line arguments
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
