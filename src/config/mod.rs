//! Configuration management for handle-audit

pub mod defaults;
pub mod loader;
pub mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, Config, ConfigError, ConfigLoader, LoggingConfig, OutputConfig, ScanConfig};
pub use validator::validate_config;

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_without_file_yields_defaults() {
        let config = load_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_defaults_match_loader_defaults() {
        let defaults = default_config();
        let config = Config::default();
        assert_eq!(defaults.scan.donor_process, config.scan.donor_process);
        assert_eq!(defaults.scan.privileges, config.scan.privileges);
        assert_eq!(defaults.output.format, config.output.format);
    }
}
