//! Gateway configuration.
//!
//! The gateway is built from a [`Config`] value rather than reading process
//! state ambiently. The subscription key source is part of that value; the
//! default source still reads `AUTH_SUBSCRIPTION_KEY` on every request so a
//! rotated key takes effect without a restart.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use skyproxy_common::Config;
//!
//! let config = Config::default()
//!     .with_base_url("https://api.sky.blackbaud.com/")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_subscription_key("my-subscription-key");
//!
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use secrecy::{ExposeSecret, SecretString};

/// Base URL of the SKY API.
pub const DEFAULT_BASE_URL: &str = "https://api.sky.blackbaud.com/";

/// Per-request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(29_000);

/// Environment variable holding the subscription key.
pub const SUBSCRIPTION_KEY_ENV: &str = "AUTH_SUBSCRIPTION_KEY";

/// Header carrying the subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "bb-api-subscription-key";

/// Resolver used by [`SubscriptionKey::Dynamic`].
pub type KeyResolver = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Where the subscription key comes from.
///
/// `Env` and `Dynamic` are resolved on every request.
#[derive(Clone)]
pub enum SubscriptionKey {
    /// A fixed key supplied at construction.
    Static(SecretString),
    /// Read from the named environment variable at call time.
    Env(String),
    /// Produced by a caller-supplied function at call time.
    Dynamic(KeyResolver),
}

impl SubscriptionKey {
    /// Resolves the key for one request.
    ///
    /// Returns `None` if the source yields nothing or an empty string.
    #[must_use]
    pub fn resolve(&self) -> Option<SecretString> {
        let key = match self {
            Self::Static(key) => Some(key.expose_secret().to_string()),
            Self::Env(var) => std::env::var(var).ok(),
            Self::Dynamic(resolver) => resolver(),
        };

        key.filter(|k| !k.trim().is_empty())
            .map(|k| SecretString::new(k.into()))
    }

    /// Short description of the source, safe to log.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Static(_) => "static key".to_string(),
            Self::Env(var) => format!("environment variable {var}"),
            Self::Dynamic(_) => "dynamic resolver".to_string(),
        }
    }
}

impl Default for SubscriptionKey {
    fn default() -> Self {
        Self::Env(SUBSCRIPTION_KEY_ENV.to_string())
    }
}

impl fmt::Debug for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Static([REDACTED])"),
            Self::Env(var) => f.debug_tuple("Env").field(var).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Configuration for a gateway client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Timeout applied to each request.
    pub timeout: Duration,
    /// Source of the `bb-api-subscription-key` header.
    pub subscription_key: SubscriptionKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            subscription_key: SubscriptionKey::default(),
        }
    }
}

impl Config {
    /// Sets a custom base URL, e.g. for a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses a fixed subscription key.
    #[must_use]
    pub fn with_subscription_key(mut self, key: impl Into<String>) -> Self {
        self.subscription_key = SubscriptionKey::Static(SecretString::new(key.into().into()));
        self
    }

    /// Reads the subscription key from `var` on every request.
    #[must_use]
    pub fn with_subscription_key_env(mut self, var: impl Into<String>) -> Self {
        self.subscription_key = SubscriptionKey::Env(var.into());
        self
    }

    /// Resolves the subscription key through `resolver` on every request.
    #[must_use]
    pub fn with_subscription_key_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.subscription_key = SubscriptionKey::Dynamic(Arc::new(resolver));
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute `http`/`https` URL
    /// or the timeout is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid base URL '{}': {e}", self.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Base URL must use http or https, got {}", url.scheme());
        }

        if self.timeout.is_zero() {
            anyhow::bail!("Timeout must be greater than zero");
        }

        debug!(
            "Gateway config: base_url={}, timeout={:?}, subscription key from {}",
            self.base_url,
            self.timeout,
            self.subscription_key.describe()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://api.sky.blackbaud.com/");
        assert_eq!(config.timeout.as_millis(), 29_000);
        assert!(matches!(
            config.subscription_key,
            SubscriptionKey::Env(ref var) if var == "AUTH_SUBSCRIPTION_KEY"
        ));
    }

    #[test]
    fn test_static_key_resolves() {
        let config = Config::default().with_subscription_key("key-1");
        let key = config.subscription_key.resolve().unwrap();
        assert_eq!(key.expose_secret(), "key-1");
    }

    #[test]
    fn test_blank_key_does_not_resolve() {
        let config = Config::default().with_subscription_key("  ");
        assert!(config.subscription_key.resolve().is_none());
    }

    #[test]
    fn test_unset_env_does_not_resolve() {
        let config =
            Config::default().with_subscription_key_env("SKYPROXY_TEST_KEY_THAT_IS_NEVER_SET");
        assert!(config.subscription_key.resolve().is_none());
    }

    #[test]
    fn test_dynamic_key_is_resolved_each_time() {
        let current = Arc::new(Mutex::new("first".to_string()));
        let source = Arc::clone(&current);
        let config = Config::default()
            .with_subscription_key_resolver(move || source.lock().ok().map(|k| k.clone()));

        assert_eq!(
            config.subscription_key.resolve().unwrap().expose_secret(),
            "first"
        );

        *current.lock().unwrap() = "second".to_string();
        assert_eq!(
            config.subscription_key.resolve().unwrap().expose_secret(),
            "second"
        );
    }

    #[test]
    fn test_debug_redacts_static_key() {
        let config = Config::default().with_subscription_key("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());
        assert!(
            Config::default()
                .with_base_url("not a url")
                .validate()
                .is_err()
        );
        assert!(
            Config::default()
                .with_base_url("ftp://example.com/")
                .validate()
                .is_err()
        );
        assert!(
            Config::default()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
