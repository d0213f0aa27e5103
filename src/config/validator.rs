//! Configuration validation

use super::loader::{Config, ConfigError};

const KNOWN_FORMATS: &[&str] = &["table", "json"];
const KNOWN_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_scan(config)?;
    validate_output(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_scan(config: &Config) -> Result<(), ConfigError> {
    if config.scan.donor_process.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "scan.donor_process must not be empty".to_string(),
        ));
    }

    for privilege in &config.scan.privileges {
        if privilege.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "scan.privileges must not contain empty names".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if !KNOWN_FORMATS.contains(&config.output.format.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "output.format must be one of {:?}, got '{}'",
            KNOWN_FORMATS, config.output.format
        )));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> Result<(), ConfigError> {
    if !KNOWN_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "logging.level must be one of {:?}, got '{}'",
            KNOWN_LEVELS, config.logging.level
        )));
    }
    Ok(())
}
