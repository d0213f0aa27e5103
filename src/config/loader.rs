//! Configuration loader for handle-audit
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_scan")]
    pub scan: ScanConfig,

    #[serde(default = "default_output")]
    pub output: OutputConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Scan configuration: donor process and privilege set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_donor_process")]
    pub donor_process: String,
    #[serde(default = "default_privileges")]
    pub privileges: Vec<String>,
    #[serde(default = "default_impersonate")]
    pub impersonate: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_show_unnamed")]
    pub show_unnamed: bool,
    #[serde(default = "default_format")]
    pub format: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scan: default_scan(),
            output: default_output(),
            logging: default_logging(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration or returns defaults if file doesn't exist
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_default()
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from the default location
pub fn load_config() -> Config {
    ConfigLoader::new("handle-audit.toml").load_or_default()
}

// Default functions for serde
fn default_scan() -> ScanConfig {
    let defaults = default_config();
    ScanConfig {
        donor_process: defaults.scan.donor_process,
        privileges: defaults.scan.privileges,
        impersonate: defaults.scan.impersonate,
    }
}

fn default_output() -> OutputConfig {
    let defaults = default_config();
    OutputConfig {
        show_unnamed: defaults.output.show_unnamed,
        format: defaults.output.format,
    }
}

fn default_logging() -> LoggingConfig {
    let defaults = default_config();
    LoggingConfig {
        level: defaults.logging.level,
    }
}

fn default_donor_process() -> String {
    default_config().scan.donor_process
}

fn default_privileges() -> Vec<String> {
    default_config().scan.privileges
}

fn default_impersonate() -> bool {
    default_config().scan.impersonate
}

fn default_show_unnamed() -> bool {
    default_config().output.show_unnamed
}

fn default_format() -> String {
    default_config().output.format
}

fn default_log_level() -> String {
    default_config().logging.level
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.donor_process, "smss.exe");
        assert!(!config.output.show_unnamed);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let loader = ConfigLoader::new("definitely-missing.toml");
        assert!(matches!(loader.load(), Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_partial_file_merges_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scan]\ndonor_process = \"winlogon.exe\"").unwrap();

        let config = ConfigLoader::new(file.path()).load().unwrap();
        assert_eq!(config.scan.donor_process, "winlogon.exe");
        // untouched sections fall back to defaults
        assert_eq!(config.output.format, "table");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let loader = ConfigLoader::new(file.path());

        let mut config = Config::default();
        config.output.show_unnamed = true;
        loader.save(&config).unwrap();

        let reloaded = loader.load().unwrap();
        assert!(reloaded.output.show_unnamed);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not [valid toml").unwrap();

        let loader = ConfigLoader::new(file.path());
        assert!(matches!(loader.load(), Err(ConfigError::TomlParse(_))));
    }
}
