//! Configuration management for cmout.
//!
//! Parses `cmout.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override smart punctuation.
    pub smart_punctuation: Option<bool>,
    /// Override whether reference definitions are kept in the tree.
    pub reference_definitions: Option<bool>,
    /// Override the top-level tight flag.
    pub tight: Option<bool>,
    /// Override entity preservation.
    pub preserve_entities: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "cmout.toml";

/// Known sections and their keys.
const SECTIONS: &[(&str, &[&str])] = &[
    ("parser", &["smart_punctuation", "reference_definitions"]),
    ("render", &["tight", "preserve_entities"]),
];

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown parser configuration.
    pub parser: ParserConfig,
    /// HTML output configuration.
    pub render: RenderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown parser configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Convert quotes, dashes and ellipses to typographic forms.
    pub smart_punctuation: bool,
    /// Keep link reference definitions as tree nodes.
    pub reference_definitions: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            smart_punctuation: false,
            reference_definitions: true,
        }
    }
}

/// HTML output configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Render the root block tight.
    pub tight: bool,
    /// Keep character references intact in URLs, titles and info strings.
    pub preserve_entities: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tight: false,
            preserve_entities: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cmout.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and take precedence over
    /// config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validating the file fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(smart_punctuation) = settings.smart_punctuation {
            self.parser.smart_punctuation = smart_punctuation;
        }
        if let Some(reference_definitions) = settings.reference_definitions {
            self.parser.reference_definitions = reference_definitions;
        }
        if let Some(tight) = settings.tight {
            self.render.tight = tight;
        }
        if let Some(preserve_entities) = settings.preserve_entities {
            self.render.preserve_entities = preserve_entities;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        discover_from(&current)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let table: toml::Table = toml::from_str(&content)?;
        validate_keys(&table)?;

        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}

/// Search `start` and its parents for a config file.
fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Reject sections and keys the configuration does not define.
fn validate_keys(table: &toml::Table) -> Result<(), ConfigError> {
    for (section, value) in table {
        let Some((_, keys)) = SECTIONS.iter().find(|entry| entry.0 == section.as_str()) else {
            return Err(ConfigError::Validation(format!(
                "unknown section [{section}]"
            )));
        };
        if let Some(fields) = value.as_table()
            && let Some(key) = fields.keys().find(|key| !keys.contains(&key.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "unknown key {section}.{key}"
            )));
        }
    }
    Ok(())
}
