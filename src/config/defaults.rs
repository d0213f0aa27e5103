//! Default configuration values for handle-audit

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub scan: ScanDefaults,
    pub output: OutputDefaults,
    pub logging: LoggingDefaults,
}

/// Default scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanDefaults {
    pub donor_process: String,
    pub privileges: Vec<String>,
    pub impersonate: bool,
}

/// Default output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDefaults {
    pub show_unnamed: bool,
    pub format: String,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        scan: ScanDefaults {
            // runs before any user session and predictably carries the
            // rights a scan needs
            donor_process: "smss.exe".to_string(),
            privileges: vec!["SeDebugPrivilege".to_string()],
            impersonate: true,
        },
        output: OutputDefaults {
            show_unnamed: false,
            format: "table".to_string(),
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert_eq!(config.scan.donor_process, "smss.exe");
        assert_eq!(config.scan.privileges, vec!["SeDebugPrivilege"]);
        assert!(config.scan.impersonate);
        assert!(!config.output.show_unnamed);
        assert_eq!(config.output.format, "table");
        assert_eq!(config.logging.level, "info");
    }
}
