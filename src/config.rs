//! Suite configuration
//!
//! Settings come from the environment with documented defaults, so the suite
//! runs against the sandbox without any setup beyond a token.

use crate::{PayoutError, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default payout API base URL
pub const DEFAULT_BASE_URL: &str = "https://api-test.qiwi.com/partner/payout/";

/// Default agent identifier
pub const DEFAULT_AGENT_ID: &str = "acme";

/// Default point identifier
pub const DEFAULT_POINT_ID: &str = "00001";

/// Per-request ceiling applied to every call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Configuration for a contract run
#[derive(Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Bearer token
    pub token: String,
    /// Agent (merchant) identifier
    pub agent_id: String,
    /// Point (sub-merchant) identifier
    pub point_id: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl fmt::Debug for ContractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("agent_id", &self.agent_id)
            .field("point_id", &self.point_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: String::new(),
            agent_id: DEFAULT_AGENT_ID.to_string(),
            point_id: DEFAULT_POINT_ID.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ContractConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("PAYOUT_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(token) = lookup("QIWI_TOKEN") {
            config.token = token;
        }

        if let Some(agent_id) = lookup("AGENT_ID") {
            config.agent_id = agent_id;
        }

        if let Some(point_id) = lookup("POINT_ID") {
            config.point_id = point_id;
        }

        if let Some(timeout) = lookup("PAYOUT_TIMEOUT_MS") {
            let millis: u64 = timeout
                .parse()
                .map_err(|e| PayoutError::config(format!("Invalid PAYOUT_TIMEOUT_MS: {}", e)))?;
            config.timeout = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set agent and point identifiers
    pub fn with_point(mut self, agent_id: impl Into<String>, point_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self.point_id = point_id.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parsed base URL
    pub fn parsed_base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self
            .parsed_base_url()
            .map_err(|e| PayoutError::config(format!("Invalid PAYOUT_BASE_URL: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PayoutError::config(format!(
                "PAYOUT_BASE_URL must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.agent_id.is_empty() {
            return Err(PayoutError::config("AGENT_ID must not be empty"));
        }

        if self.point_id.is_empty() {
            return Err(PayoutError::config("POINT_ID must not be empty"));
        }

        if self.timeout.is_zero() {
            return Err(PayoutError::config("PAYOUT_TIMEOUT_MS must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ContractConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.agent_id, "acme");
        assert_eq!(config.point_id, "00001");
        assert_eq!(config.token, "");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_env_overrides() {
        let config = ContractConfig::from_lookup(lookup(&[
            ("QIWI_TOKEN", "secret"),
            ("AGENT_ID", "agent-7"),
            ("POINT_ID", "p-9"),
            ("PAYOUT_BASE_URL", "http://localhost:8080/payout/"),
            ("PAYOUT_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();

        assert_eq!(config.token, "secret");
        assert_eq!(config.agent_id, "agent-7");
        assert_eq!(config.point_id, "p-9");
        assert_eq!(config.base_url, "http://localhost:8080/payout/");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ContractConfig::from_lookup(lookup(&[("PAYOUT_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("PAYOUT_TIMEOUT_MS"));

        let err = ContractConfig::from_lookup(lookup(&[("PAYOUT_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(err.to_string().contains("must be positive"));

        let err = ContractConfig::from_lookup(lookup(&[("PAYOUT_BASE_URL", "not a url")])).unwrap_err();
        assert!(err.to_string().contains("PAYOUT_BASE_URL"));

        let err =
            ContractConfig::from_lookup(lookup(&[("PAYOUT_BASE_URL", "ftp://example.com/")])).unwrap_err();
        assert!(err.to_string().contains("http or https"));

        let err = ContractConfig::from_lookup(lookup(&[("AGENT_ID", "")])).unwrap_err();
        assert!(err.to_string().contains("AGENT_ID"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ContractConfig::default().with_token("very-secret-token");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
