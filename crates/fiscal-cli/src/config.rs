//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use fiscal_extractor::ExtractorConfig;
use fiscal_llm::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "fiscal.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Model connection
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Retry and timeout settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Console settings
    #[serde(default)]
    pub settings: Settings,
}

/// Where documents are read from and results written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for documents
    pub input_dir: PathBuf,

    /// JSON result file
    pub output_file: PathBuf,

    /// SQLite database file
    pub database: PathBuf,
}

/// Console settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// The per-user configuration file path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fiscal").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `fiscal.toml` in the working
    /// directory is tried, then the per-user file, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from(path);
        }

        let candidates = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)).chain(Self::user_path());
        for path in candidates {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.extractor.validate().map_err(CliError::Config)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("mis_archivos_sucios"),
            output_file: PathBuf::from("resultado_final.json"),
            database: PathBuf::from("base_fiscal.db"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.input_dir, PathBuf::from("mis_archivos_sucios"));
        assert_eq!(config.paths.output_file, PathBuf::from("resultado_final.json"));
        assert_eq!(config.paths.database, PathBuf::from("base_fiscal.db"));
        assert_eq!(config.extractor.max_retries, 3);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert!(config.settings.color);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fiscal.toml");
        fs::write(
            &path,
            r#"
[paths]
input_dir = "entrada"

[extractor]
max_retries = 5

[settings]
format = "json"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.paths.input_dir, PathBuf::from("entrada"));
        assert_eq!(config.paths.database, PathBuf::from("base_fiscal.db"));
        assert_eq!(config.extractor.max_retries, 5);
        assert_eq!(config.extractor.call_timeout_secs, 120);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert_eq!(config.gemini, GeminiConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_invalid_extractor_settings_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fiscal.toml");
        fs::write(&path, "[extractor]\nmax_retries = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_unparseable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fiscal.toml");
        fs::write(&path, "[paths\ninput_dir = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
