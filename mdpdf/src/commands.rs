//! Command handlers behind the `mdpdf` binary.
use std::{
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail, eyre};
use log::{debug, info, warn};
use mdpdf_commonmark::create_default_manager;
use mdpdf_config::Config;
use mdpdf_render::{MarkdownSource, Pipeline, PipelineError};

use crate::cli::{Cli, Commands, StyleArgs};

/// Run the command selected on the command line.
///
/// # Errors
///
/// Returns an error describing the first failure; pipeline errors carry the
/// same message a user would see in any other front end.
pub fn run(cli: &Cli) -> Result<()> {
  match &cli.command {
    Commands::Convert {
      input,
      output_dir,
      style,
    } => convert(cli, input.as_ref(), output_dir.as_ref(), style),
    Commands::Preview {
      input,
      output,
      style,
    } => preview(cli, input.as_ref(), output.as_deref(), style),
    Commands::Init {
      output,
      format,
      force,
    } => init(output, format, *force),
    Commands::Export { output_dir, force } => export(output_dir, *force),
    Commands::Themes => themes(),
  }
}

/// Load configuration and layer the style flags on top of it.
///
/// # Errors
///
/// Returns an error if a config file or override is invalid.
pub fn load_config(cli: &Cli, style: &StyleArgs) -> Result<Config> {
  let mut config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;
  style.apply_to(&mut config);
  Ok(config)
}

fn pipeline_error(error: &PipelineError) -> color_eyre::Report {
  eyre!(error.user_message())
}

fn read_source(input: Option<&PathBuf>) -> Result<(MarkdownSource, String)> {
  let source = MarkdownSource::from_arg(input.cloned());
  debug!("Reading Markdown from {}", source.name());
  let markdown = source.load().map_err(|e| pipeline_error(&e))?;
  Ok((source, markdown))
}

fn convert(
  cli: &Cli,
  input: Option<&PathBuf>,
  output_dir: Option<&PathBuf>,
  style: &StyleArgs,
) -> Result<()> {
  let mut config = load_config(cli, style)?;
  if let Some(dir) = output_dir {
    config.output_dir = Some(dir.clone());
  }
  config.validate_paths()?;

  let (source, markdown) = read_source(input)?;
  if config.style.file_name.is_none() {
    config.style.file_name = source.stem();
  }

  let pipeline = Pipeline::from_config(&config).map_err(|e| pipeline_error(&e))?;
  let Some(pdf) = pipeline
    .convert(&markdown, &config.style)
    .map_err(|e| pipeline_error(&e))?
  else {
    warn!("{} is empty, nothing to convert", source.name());
    return Ok(());
  };

  let dir = config.output_dir();
  let path = pdf.write_to(&dir).wrap_err_with(|| {
    format!("Failed to write {} to {}", pdf.file_name, dir.display())
  })?;
  info!(
    "Wrote {} ({} bytes, {})",
    path.display(),
    pdf.bytes.len(),
    pdf.mime_type()
  );
  Ok(())
}

fn preview(
  cli: &Cli,
  input: Option<&PathBuf>,
  output: Option<&Path>,
  style: &StyleArgs,
) -> Result<()> {
  let config = load_config(cli, style)?;
  config.validate_paths()?;

  let (source, markdown) = read_source(input)?;
  let pipeline = Pipeline::from_config(&config).map_err(|e| pipeline_error(&e))?;
  let Some(html) = pipeline
    .preview(&markdown, &config.style)
    .map_err(|e| pipeline_error(&e))?
  else {
    warn!("{} is empty, nothing to preview", source.name());
    return Ok(());
  };

  match output {
    Some(path) => {
      if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory {}", parent.display())
        })?;
      }
      fs::write(path, html)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
      info!("Wrote preview to {}", path.display());
    },
    None => {
      io::stdout()
        .lock()
        .write_all(html.as_bytes())
        .wrap_err("Failed to write preview to stdout")?;
    },
  }
  Ok(())
}

fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Config file already exists at {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory {}", parent.display())
    })?;
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate default config at {}", output.display())
  })?;

  info!("Edit this file to customize your conversions.");
  Ok(())
}

fn export(output_dir: &Path, force: bool) -> Result<()> {
  let written = Config::export_templates(output_dir, force)
    .wrap_err("Failed to export templates")?;

  if written.is_empty() {
    warn!(
      "No templates written to {}; use --force to overwrite existing files",
      output_dir.display()
    );
  } else {
    info!(
      "Exported {} template(s) to {}",
      written.len(),
      output_dir.display()
    );
    info!(
      "Point template_path at document.html and stylesheet_path at style.css \
       to use them."
    );
  }
  Ok(())
}

fn themes() -> Result<()> {
  let manager =
    create_default_manager(None).wrap_err("Syntax highlighting unavailable")?;
  let mut themes = manager.highlighter().available_themes();
  themes.sort();

  let mut stdout = io::stdout().lock();
  for theme in themes {
    writeln!(stdout, "{theme}")?;
  }
  Ok(())
}
