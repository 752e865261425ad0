#![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]

use std::{fs, path::Path};

use clap::Parser;
use mdpdf::{
  cli::{Cli, Commands, StyleArgs},
  commands,
};
use mdpdf_config::Config;
use tempfile::TempDir;

/// Parse `args` with an explicit empty config file so no config on the
/// machine running the tests is picked up.
fn parse(dir: &Path, args: &[&str]) -> Cli {
  let config = dir.join("empty.toml");
  fs::write(&config, "").unwrap();
  let mut argv = vec![
    "mdpdf".to_string(),
    "-c".to_string(),
    config.display().to_string(),
  ];
  argv.extend(args.iter().map(ToString::to_string));
  Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_convert_arguments() {
  let cli = Cli::try_parse_from([
    "mdpdf",
    "convert",
    "notes.md",
    "-o",
    "out",
    "--font",
    "Georgia",
    "--font-size",
    "abc",
    "--page-size",
    "letter",
    "--item",
    "one",
    "-i",
    "two",
    "--no-highlight",
    "--cjk",
    "-v",
  ])
  .unwrap();

  assert!(cli.verbose);
  let Commands::Convert {
    input,
    output_dir,
    style,
  } = cli.command
  else {
    panic!("expected convert");
  };
  assert_eq!(input.unwrap(), Path::new("notes.md"));
  assert_eq!(output_dir.unwrap(), Path::new("out"));
  assert_eq!(style.font.as_deref(), Some("Georgia"));
  // Numbers stay text until validation
  assert_eq!(style.font_size.as_deref(), Some("abc"));
  assert_eq!(style.items, ["one", "two"]);
  assert!(style.no_highlight);
  assert!(style.cjk);
}

#[test]
fn test_global_config_flags() {
  let cli = Cli::try_parse_from([
    "mdpdf",
    "themes",
    "-c",
    "a.toml",
    "--config-file",
    "b.json",
    "--config",
    "style.font_size=20",
  ])
  .unwrap();

  assert!(matches!(cli.command, Commands::Themes));
  assert_eq!(cli.config_files.len(), 2);
  assert_eq!(cli.config_overrides, ["style.font_size=20"]);
}

#[test]
fn test_init_rejects_unknown_format() {
  assert!(Cli::try_parse_from(["mdpdf", "init", "-F", "yaml"]).is_err());
}

#[test]
fn test_style_args_layer_over_config() {
  let mut config = Config::default();
  config.items.push("from config".to_string());
  config.highlight.theme = Some("Nord".to_string());

  let args = StyleArgs {
    font: Some("Georgia".to_string()),
    font_size: Some("18".to_string()),
    items: vec!["from flag".to_string()],
    no_highlight: true,
    cjk: true,
    ..StyleArgs::default()
  };
  args.apply_to(&mut config);

  assert_eq!(config.style.font_family.as_deref(), Some("Georgia"));
  assert_eq!(config.items, ["from config", "from flag"]);
  assert!(!config.highlight.is_enabled());
  assert_eq!(config.highlight.theme.as_deref(), Some("Nord"));
  assert!(config.cjk.is_enabled());

  let style = config.style_config().unwrap();
  assert_eq!(style.font_size_px, 18);
}

#[test]
fn test_unset_flags_keep_config() {
  let mut config = Config::default();
  config.style.page_size = Some("Legal".to_string());
  config.highlight.enable = Some(true);

  StyleArgs::default().apply_to(&mut config);

  assert_eq!(config.style.page_size.as_deref(), Some("Legal"));
  assert!(config.highlight.is_enabled());
  assert!(!config.cjk.is_enabled());
}

#[test]
fn test_preview_writes_document() {
  let dir = TempDir::new().unwrap();
  let input = dir.path().join("notes.md");
  fs::write(&input, "# Notes\n\nSome *text*.\n").unwrap();
  let output = dir.path().join("out/preview.html");

  let cli = parse(dir.path(), &[
    "preview",
    input.to_str().unwrap(),
    "-o",
    output.to_str().unwrap(),
    "--font-size",
    "20",
    "--item",
    "Milk",
  ]);
  commands::run(&cli).unwrap();

  let html = fs::read_to_string(output).unwrap();
  assert!(html.starts_with("<!DOCTYPE html>"));
  assert!(html.contains("<title>Notes</title>"));
  assert!(html.contains("font-size: 20px"));
  assert!(html.contains("<li>Milk</li>"));
}

#[test]
fn test_preview_reports_invalid_setting() {
  let dir = TempDir::new().unwrap();
  let input = dir.path().join("notes.md");
  fs::write(&input, "# Notes\n").unwrap();

  let cli = parse(dir.path(), &[
    "preview",
    input.to_str().unwrap(),
    "-o",
    dir.path().join("x.html").to_str().unwrap(),
    "--font-size",
    "abc",
  ]);
  let err = commands::run(&cli).unwrap_err();

  assert!(err.to_string().contains("font size"));
  assert!(!dir.path().join("x.html").exists());
}

#[test]
fn test_convert_reports_missing_engine() {
  let dir = TempDir::new().unwrap();
  let input = dir.path().join("notes.md");
  fs::write(&input, "# Notes\n").unwrap();
  let engine = dir.path().join("no-such-engine");

  let cli = parse(dir.path(), &[
    "convert",
    input.to_str().unwrap(),
    "-o",
    dir.path().join("out").to_str().unwrap(),
    "--config",
    &format!("renderer.binary={}", engine.display()),
  ]);
  let err = commands::run(&cli).unwrap_err().to_string();

  assert!(err.contains("Error generating PDF"));
  assert!(err.contains("wkhtmltopdf not being installed"));
  assert!(!dir.path().join("out/notes.pdf").exists());
}

#[test]
fn test_convert_empty_input_writes_nothing() {
  let dir = TempDir::new().unwrap();
  let input = dir.path().join("empty.md");
  fs::write(&input, "  \n\n").unwrap();
  let out = dir.path().join("out");

  let cli = parse(dir.path(), &[
    "convert",
    input.to_str().unwrap(),
    "-o",
    out.to_str().unwrap(),
  ]);
  commands::run(&cli).unwrap();

  assert!(!out.exists());
}

#[test]
fn test_init_and_export() {
  let dir = TempDir::new().unwrap();
  let config_path = dir.path().join("nested/mdpdf.toml");

  let cli = parse(dir.path(), &["init", "-o", config_path.to_str().unwrap()]);
  commands::run(&cli).unwrap();
  assert!(Config::from_file(&config_path).is_ok());

  // A second init without --force must not clobber the file
  fs::write(&config_path, "output_dir = \"pdfs\"\n").unwrap();
  assert!(commands::run(&cli).is_err());
  assert!(fs::read_to_string(&config_path).unwrap().contains("pdfs"));

  let templates = dir.path().join("templates");
  let cli = parse(dir.path(), &["export", "-o", templates.to_str().unwrap()]);
  commands::run(&cli).unwrap();
  assert!(templates.join("document.html").is_file());
  assert!(templates.join("style.css").is_file());
}
