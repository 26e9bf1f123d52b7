//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::SchoolInfo;
use crate::report::document::{Orientation, PageSize};

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub school: SchoolConfig,
    pub report: ReportConfig,
}

/// Attendance document store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_token: String,
    /// School the attendance collection is keyed by.
    pub school_id: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// School identity printed on report headers and signature blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub npsn: String,
    #[serde(default)]
    pub principal_name: String,
    #[serde(default)]
    pub principal_nip: String,
    #[serde(default)]
    pub place: String,
}

impl SchoolConfig {
    /// Build the render-time identity, substituting "-" for blank fields.
    pub fn school_info(&self) -> SchoolInfo {
        fn or_placeholder(value: &str) -> String {
            let trimmed = value.trim();
            if trimmed.is_empty() { "-".to_string() } else { trimmed.to_string() }
        }

        SchoolInfo {
            name: or_placeholder(&self.name),
            address: or_placeholder(&self.address),
            npsn: or_placeholder(&self.npsn),
            principal_name: or_placeholder(&self.principal_name),
            principal_nip: or_placeholder(&self.principal_nip),
            place: or_placeholder(&self.place),
        }
    }
}

/// Report generation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub page_size: PageSize,
    pub show_charts: bool,
    /// Append HHmmss to artifact filenames.
    pub timestamp_in_filename: bool,
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.store.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "Store base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.store.school_id.trim().is_empty() {
            return Err(ConfigError::Validation("School id cannot be empty".to_string()));
        }
        if self.store.timeout_secs < 5 {
            return Err(ConfigError::Validation(
                "Store timeout must be at least 5 seconds".to_string(),
            ));
        }
        if self.report.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("Output directory cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_token: String::new(),
            school_id: "demo".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            orientation: Orientation::default(),
            page_size: PageSize::default(),
            show_charts: true,
            timestamp_in_filename: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let mut config = AppConfig::default();
        config.store.base_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_school_id() {
        let mut config = AppConfig::default();
        config.store.school_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout_bounds() {
        let mut config = AppConfig::default();

        config.store.timeout_secs = 1;
        assert!(config.validate().is_err());

        config.store.timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_school_info_placeholders() {
        let school = SchoolConfig {
            name: "SMA Negeri 1".to_string(),
            ..Default::default()
        };
        let info = school.school_info();
        assert_eq!(info.name, "SMA Negeri 1");
        assert_eq!(info.npsn, "-");
        assert_eq!(info.principal_name, "-");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.store.base_url, config.store.base_url);
        assert_eq!(parsed.report.show_charts, config.report.show_charts);
    }
}
