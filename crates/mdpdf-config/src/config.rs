use std::{
  fs,
  path::{Path, PathBuf},
  str::FromStr,
  sync::OnceLock,
  time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  style::{Numeric, StyleConfig, StyleSettings, merge_option},
};

/// Default `lang` attribute for CJK spans.
pub const DEFAULT_CJK_LANG: &str = "zh";

/// Default PDF engine binary, looked up on `PATH`.
pub const DEFAULT_RENDERER_BINARY: &str = "wkhtmltopdf";

/// Default renderer timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const CONFIG_FILENAMES: [&str; 6] = [
  "mdpdf.toml",
  "mdpdf.json",
  ".mdpdf.toml",
  ".mdpdf.json",
  ".config/mdpdf.toml",
  ".config/mdpdf.json",
];

/// Configuration for mdpdf.
///
/// Every field is optional in files; getters on the sections fill in the
/// defaults. Files are TOML or JSON, and can be layered with
/// [`Config::merge`] and `--config KEY=VALUE` overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory the PDF (or preview) is written to.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output_dir: Option<PathBuf>,

  /// Custom document template replacing the embedded one.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub template_path: Option<PathBuf>,

  /// Custom stylesheet template replacing the embedded `style.css`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stylesheet_path: Option<PathBuf>,

  /// Items appended to every document as a bulleted list.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub items: Vec<String>,

  /// Fonts, sizes and page layout.
  pub style: StyleSettings,

  /// Code block highlighting.
  pub highlight: HighlightConfig,

  /// CJK script tagging.
  pub cjk: CjkConfig,

  /// The external PDF engine.
  pub renderer: RendererConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub enable: Option<bool>,

  /// Highlighting theme name, e.g. `InspiredGitHub` or `Nord`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub theme: Option<String>,
}

impl HighlightConfig {
  #[must_use]
  pub fn is_enabled(&self) -> bool {
    self.enable.unwrap_or(true)
  }

  pub fn merge(&mut self, other: Self) {
    merge_option(&mut self.enable, other.enable);
    merge_option(&mut self.theme, other.theme);
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CjkConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub enable: Option<bool>,

  /// `lang` attribute put on tagged runs.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lang: Option<String>,

  /// Font family used for tagged runs.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font_family: Option<String>,
}

impl CjkConfig {
  #[must_use]
  pub fn is_enabled(&self) -> bool {
    self.enable.unwrap_or(false)
  }

  #[must_use]
  pub fn lang(&self) -> &str {
    self
      .lang
      .as_deref()
      .filter(|lang| !lang.trim().is_empty())
      .unwrap_or(DEFAULT_CJK_LANG)
  }

  pub fn merge(&mut self, other: Self) {
    merge_option(&mut self.enable, other.enable);
    merge_option(&mut self.lang, other.lang);
    merge_option(&mut self.font_family, other.font_family);
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
  /// Engine binary; a bare name is looked up on `PATH`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub binary: Option<PathBuf>,

  /// Seconds before the engine is killed.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeout_secs: Option<u64>,

  /// Let the engine read local files referenced by the document.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub enable_local_file_access: Option<bool>,
}

impl RendererConfig {
  #[must_use]
  pub fn binary(&self) -> PathBuf {
    self
      .binary
      .clone()
      .unwrap_or_else(|| PathBuf::from(DEFAULT_RENDERER_BINARY))
  }

  #[must_use]
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
  }

  #[must_use]
  pub fn local_file_access(&self) -> bool {
    self.enable_local_file_access.unwrap_or(false)
  }

  pub fn merge(&mut self, other: Self) {
    merge_option(&mut self.binary, other.binary);
    merge_option(&mut self.timeout_secs, other.timeout_secs);
    merge_option(
      &mut self.enable_local_file_access,
      other.enable_local_file_access,
    );
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {}",
            path.display(),
            e
          ))
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, or a discovered one when none
  /// are given, then apply `KEY=VALUE` overrides.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if config_files.is_empty() {
      match Self::find_config_file() {
        Some(discovered) => {
          log::info!("Using discovered config file: {}", discovered.display());
          Self::from_file(&discovered)?
        },
        None => Self::default(),
      }
    } else {
      let mut merged = Self::default();
      for config_path in config_files {
        merged.merge(Self::from_file(config_path)?);
      }
      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// Keys use dotted section paths, e.g. `style.font_size=20` or
  /// `highlight.enable=false`.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in `KEY=VALUE` format, names an
  /// unknown key, or carries a value of the wrong type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. An empty value clears optional fields.
  ///
  /// Style numbers are stored as given; they are checked by
  /// [`StyleSettings::validate`].
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys or unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    let text = || non_empty(value).map(ToString::to_string);
    match key {
      "output_dir" => self.output_dir = non_empty(value).map(PathBuf::from),
      "template_path" => {
        self.template_path = non_empty(value).map(PathBuf::from);
      },
      "stylesheet_path" => {
        self.stylesheet_path = non_empty(value).map(PathBuf::from);
      },
      "items" => {
        if let Some(item) = non_empty(value) {
          self.items.push(item.to_string());
        } else {
          self.items.clear();
        }
      },
      "style.font_family" => self.style.font_family = text(),
      "style.font_size" => {
        self.style.font_size = non_empty(value).map(Numeric::from);
      },
      "style.line_height" => {
        self.style.line_height = non_empty(value).map(Numeric::from);
      },
      "style.page_size" => self.style.page_size = text(),
      "style.file_name" => self.style.file_name = text(),
      "highlight.enable" => self.highlight.enable = parse_bool(key, value)?,
      "highlight.theme" => self.highlight.theme = text(),
      "cjk.enable" => self.cjk.enable = parse_bool(key, value)?,
      "cjk.lang" => self.cjk.lang = text(),
      "cjk.font_family" => self.cjk.font_family = text(),
      "renderer.binary" => {
        self.renderer.binary = non_empty(value).map(PathBuf::from);
      },
      "renderer.timeout_secs" => {
        self.renderer.timeout_secs = parse_value(key, value)?;
      },
      "renderer.enable_local_file_access" => {
        self.renderer.enable_local_file_access = parse_bool(key, value)?;
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }
    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - `items`: Other's items are appended
  pub fn merge(&mut self, other: Self) {
    merge_option(&mut self.output_dir, other.output_dir);
    merge_option(&mut self.template_path, other.template_path);
    merge_option(&mut self.stylesheet_path, other.stylesheet_path);
    self.items.extend(other.items);
    self.style.merge(other.style);
    self.highlight.merge(other.highlight);
    self.cjk.merge(other.cjk);
    self.renderer.merge(other.renderer);
  }

  /// Validated style settings.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Validation`] naming the offending field.
  pub fn style_config(&self) -> Result<StyleConfig, ConfigError> {
    self.style.validate()
  }

  /// Output directory, the current directory when unset.
  #[must_use]
  pub fn output_dir(&self) -> PathBuf {
    self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
  }

  /// Read the custom document template, if one is configured.
  ///
  /// # Errors
  ///
  /// Returns an error if the configured file cannot be read.
  pub fn load_template(&self) -> Result<Option<String>, ConfigError> {
    read_template(self.template_path.as_deref())
  }

  /// Read the custom stylesheet template, if one is configured.
  ///
  /// # Errors
  ///
  /// Returns an error if the configured file cannot be read.
  pub fn load_stylesheet(&self) -> Result<Option<String>, ConfigError> {
    read_template(self.stylesheet_path.as_deref())
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let current_dir = std::env::current_dir().ok()?;
        if let Some(found) = Self::find_config_in(&current_dir) {
          return Some(found);
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["mdpdf.toml", "mdpdf.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        if let Ok(home) = std::env::var("HOME") {
          let home_config_dir =
            PathBuf::from(home).join(".config").join("mdpdf");
          for filename in &["config.toml", "config.json"] {
            let config_path = home_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// First config file found directly under `dir`.
  #[must_use]
  pub fn find_config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Validate all paths specified in the configuration
  ///
  /// # Errors
  ///
  /// Returns an error if any configured path does not exist or is invalid.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    for (what, path) in [
      ("Template", &self.template_path),
      ("Stylesheet", &self.stylesheet_path),
    ] {
      let Some(path) = path else { continue };
      if !path.exists() {
        errors.push(format!("{what} file does not exist: {}", path.display()));
      } else if !path.is_file() {
        errors.push(format!("{what} path is not a file: {}", path.display()));
      }
    }

    if let Some(ref output_dir) = self.output_dir
      && output_dir.exists()
      && !output_dir.is_dir()
    {
      errors.push(format!(
        "Output path is not a directory: {}",
        output_dir.display()
      ));
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration path validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the template cannot be retrieved or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Export embedded templates to a directory for customization
  ///
  /// Existing files are kept unless `force` is set. Returns the paths that
  /// were written.
  ///
  /// # Errors
  ///
  /// Returns an error if the output directory cannot be created or a template
  /// cannot be written.
  pub fn export_templates(
    output_dir: &Path,
    force: bool,
  ) -> Result<Vec<PathBuf>, ConfigError> {
    fs::create_dir_all(output_dir).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to create template directory: {}: {}",
        output_dir.display(),
        e
      ))
    })?;

    let mut written = Vec::new();
    for (filename, content) in mdpdf_templates::all_templates() {
      let file_path = output_dir.join(filename);

      if file_path.exists() && !force {
        log::warn!(
          "File {} already exists. Use --force to overwrite.",
          file_path.display()
        );
        continue;
      }

      fs::write(&file_path, content).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to write template file: {}: {}",
          file_path.display(),
          e
        ))
      })?;
      log::info!("Exported template: {}", file_path.display());
      written.push(file_path);
    }

    Ok(written)
  }
}

fn read_template(path: Option<&Path>) -> Result<Option<String>, ConfigError> {
  let Some(path) = path else {
    return Ok(None);
  };
  fs::read_to_string(path).map(Some).map_err(|e| {
    ConfigError::Template(format!(
      "Failed to read template {}: {}",
      path.display(),
      e
    ))
  })
}

fn non_empty(value: &str) -> Option<&str> {
  let value = value.trim();
  (!value.is_empty()).then_some(value)
}

fn parse_bool(key: &str, value: &str) -> Result<Option<bool>, ConfigError> {
  let Some(value) = non_empty(value) else {
    return Ok(None);
  };
  match value.to_lowercase().as_str() {
    "true" | "yes" | "on" | "1" => Ok(Some(true)),
    "false" | "no" | "off" | "0" => Ok(Some(false)),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, on/off or 1/0"
      )))
    },
  }
}

fn parse_value<T>(key: &str, value: &str) -> Result<Option<T>, ConfigError>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  non_empty(value)
    .map(|v| {
      v.parse::<T>().map_err(|e| {
        ConfigError::Config(format!("Invalid value for '{key}': '{v}' ({e})"))
      })
    })
    .transpose()
}
