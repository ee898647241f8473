//! Configuration management for Beacon
//!
//! Configuration is merged from three layers, lowest priority first:
//! embedded defaults, a `beacon.toml` in the working directory (or the
//! file passed with `--config`), and `BEACON_`-prefixed environment
//! variables. Nested keys use a double underscore in the environment,
//! e.g. `BEACON_API__TOKEN` sets `api.token`.

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Main configuration structure for Beacon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scan attribution settings
    pub scan: ScanConfig,

    /// Collector API settings
    pub api: ApiConfig,
}

/// Settings describing the scan whose results are being delivered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Path that was scanned
    #[serde(default = "default_target")]
    pub target: String,

    /// Base branch when delivering a diff scan
    #[serde(default)]
    pub diff_base_branch: Option<String>,

    /// Version of the rule set the scan ran with
    #[serde(default = "default_rules_version")]
    pub rules_version: String,
}

/// Remote collector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the collector service
    pub base_url: String,

    /// API token; requests go out unauthenticated when unset
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_target() -> String {
    ".".to_string()
}

fn default_rules_version() -> String {
    "builtin".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from defaults, file and environment
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            figment = figment.merge(Toml::file(custom_path));
        } else {
            figment = figment.merge(Toml::file("beacon.toml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("BEACON_").split("__"));

        figment.extract().context("Invalid configuration")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            diff_base_branch: None,
            rules_version: default_rules_version(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cloud.getbeacon.dev".to_string(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_load() {
        let config = Config::load(None).expect("Should load default config");

        assert_eq!(config.scan.target, ".");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.base_url.starts_with("https://"));
    }

    #[test]
    fn missing_custom_config_falls_back_to_defaults() {
        let config = Config::load(Some("non_existent.toml"));
        assert!(config.is_ok(), "Should handle missing custom config gracefully");
    }
}
