//! Configuration management for the travel planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the travel planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// How results are presented
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Backend API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the travel planner backend
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds; requests wait indefinitely when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Prefix for every rendered cost
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Page the search bar redirects to
    #[serde(default = "default_itinerary_page")]
    pub itinerary_page: String,
}

// Default value functions
fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_user_agent() -> String {
    format!("TravelPlanner/{}", crate::VERSION)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_itinerary_page() -> String {
    "itinerary.html".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            itinerary_page: default_itinerary_page(),
        }
    }
}

impl ApiConfig {
    /// Request timeout, if one is configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl PlannerConfig {
    /// Load configuration from `config_path`, or the default location, plus
    /// environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVEL_PLANNER__API__BASE_URL and friends
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_PLANNER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-planner").join("config.toml"))
    }

    /// Apply default values to fields that were set but left empty
    pub fn apply_defaults(&mut self) {
        if self.api.base_url.is_empty() {
            self.api.base_url = default_api_base_url();
        }
        if self.api.user_agent.is_empty() {
            self.api.user_agent = default_user_agent();
        }
        if self.api.timeout_seconds == Some(0) {
            self.api.timeout_seconds = None;
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.display.itinerary_page.is_empty() {
            self.display.itinerary_page = default_itinerary_page();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_api(&self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(
                PlannerError::config("API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        url::Url::parse(&self.api.base_url)
            .map_err(|e| PlannerError::config(format!("Invalid API base URL: {e}")))?;

        if let Some(timeout) = self.api.timeout_seconds {
            if timeout > 300 {
                return Err(
                    PlannerError::config("API timeout cannot exceed 300 seconds").into(),
                );
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.display.itinerary_page.contains('?') {
            return Err(PlannerError::config(
                "Itinerary page must not carry its own query string",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert!(config.api.timeout_seconds.is_none());
        assert!(config.api.timeout().is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.display.currency_symbol, "₹");
        assert_eq!(config.display.itinerary_page, "itinerary.html");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = PlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_base_url_scheme() {
        let mut config = PlannerConfig::default();
        config.api.base_url = "ftp://localhost:5000".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = PlannerConfig::default();
        config.api.timeout_seconds = Some(500);
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        config.api.timeout_seconds = Some(30);
        assert!(config.validate().is_ok());
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = PlannerConfig::default();
        config.api.base_url.clear();
        config.api.timeout_seconds = Some(0);
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert!(config.api.timeout_seconds.is_none());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "travel-planner-config-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://planner.test:8080\"\ntimeout_seconds = 15\n\n[display]\ncurrency_symbol = \"$\""
        )
        .unwrap();

        let config = PlannerConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.api.base_url, "http://planner.test:8080");
        assert_eq!(config.api.timeout_seconds, Some(15));
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.display.itinerary_page, "itinerary.html");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = PlannerConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("travel-planner"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
