//! Connection configuration.

use std::env;
use std::time::Duration;

use wetstock_types::{Result, WetstockError};

use crate::RetryPolicy;

/// Environment variable holding the shared-secret credential.
pub const PSK_ENV: &str = "SYSTEM_PSK";

/// Configuration for a service connection.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the service, without a trailing slash.
    pub base_url: String,
    /// Shared-secret credential attached to every request.
    pub system_psk: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry policy for transport-level failures.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout and retry policy.
    pub fn new(base_url: impl Into<String>, system_psk: impl Into<String>) -> Self {
        Self {
            base_url: trim_trailing_slash(base_url.into()),
            system_psk: system_psk.into(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    /// Reads the base address from `url_var` and the credential from
    /// [`PSK_ENV`].
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is unset.
    pub fn from_env(url_var: &str) -> Result<Self> {
        let base_url =
            env::var(url_var).map_err(|_| WetstockError::MissingEnv(url_var.to_string()))?;
        let system_psk =
            env::var(PSK_ENV).map_err(|_| WetstockError::MissingEnv(PSK_ENV.to_string()))?;
        Ok(Self::new(base_url, system_psk))
    }

    /// Replaces the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("http://ims.internal", "secret");
        assert_eq!(config.base_url, "http://ims.internal");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("http://ims.internal/", "secret");
        assert_eq!(config.base_url, "http://ims.internal");
    }

    #[test]
    fn test_missing_env() {
        let result = ClientConfig::from_env("WETSTOCK_TEST_UNSET_URL");
        assert!(matches!(result, Err(WetstockError::MissingEnv(var)) if var == "WETSTOCK_TEST_UNSET_URL"));
    }
}
