//! CLI configuration file.
//!
//! Optional TOML file layered between built-in defaults and command-line flags.
//!
//! ## Example Configuration
//!
//! ```toml
//! base_url = "https://api.sky.blackbaud.com/"
//! timeout_ms = 29000
//! subscription_key_env = "AUTH_SUBSCRIPTION_KEY"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use skyproxy_common::Config;

/// Settings read from the configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Base URL of the SKY API.
    pub base_url: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Environment variable holding the subscription key.
    pub subscription_key_env: Option<String>,
}

/// Values given on the command line; these win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Base URL given with `--base-url`.
    pub base_url: Option<String>,
    /// Timeout given with `--timeout-ms`.
    pub timeout_ms: Option<u64>,
    /// Key variable given with `--subscription-key-env`.
    pub subscription_key_env: Option<String>,
}

impl FileConfig {
    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid TOML or has unknown keys.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Layers defaults, this file, and `overrides` into a gateway [`Config`].
    #[must_use]
    pub fn resolve(self, overrides: Overrides) -> Config {
        let mut config = Config::default();

        if let Some(base_url) = overrides.base_url.or(self.base_url) {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout_ms) = overrides.timeout_ms.or(self.timeout_ms) {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }

        if let Some(var) = overrides
            .subscription_key_env
            .or(self.subscription_key_env)
        {
            config = config.with_subscription_key_env(var);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use skyproxy_common::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, SubscriptionKey};

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = FileConfig::parse("").unwrap().resolve(Overrides::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(matches!(
            config.subscription_key,
            SubscriptionKey::Env(ref var) if var == "AUTH_SUBSCRIPTION_KEY"
        ));
    }

    #[test]
    fn test_file_values_apply() {
        let file = FileConfig::parse(
            r#"
            base_url = "http://localhost:8080/"
            timeout_ms = 5000
            subscription_key_env = "SKY_KEY"
            "#,
        )
        .unwrap();

        let config = file.resolve(Overrides::default());
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert!(matches!(
            config.subscription_key,
            SubscriptionKey::Env(ref var) if var == "SKY_KEY"
        ));
    }

    #[test]
    fn test_overrides_win() {
        let file = FileConfig::parse("timeout_ms = 5000\nbase_url = \"http://file/\"").unwrap();
        let config = file.resolve(Overrides {
            base_url: Some("http://flag/".to_string()),
            timeout_ms: None,
            subscription_key_env: None,
        });

        assert_eq!(config.base_url, "http://flag/");
        assert_eq!(config.timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(FileConfig::parse("subscription_key = \"inline\"").is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_ms = 1000").unwrap();

        let loaded = FileConfig::load(file.path()).unwrap();
        assert_eq!(loaded.timeout_ms, Some(1000));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/skyproxy.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
