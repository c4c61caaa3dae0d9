//! Client configuration
//!
//! A [`ClientConfig`] is owned by exactly one façade. Hosts either build it
//! directly or leave the URL and credential empty and bind them later from a
//! [`ConfigSource`] through the façade's `init_app`.

mod loader;
mod source;

pub use loader::FileConfig;
pub use source::{parse_key_values, ConfigSource, EnvConfig};

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;

/// Default read timeout in seconds
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 45;

/// Connect and read timeouts applied to every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeout {
    /// Time allowed to establish the connection
    #[serde(with = "secs_serde")]
    pub connect: Duration,
    /// Time allowed for the whole exchange once connected
    #[serde(with = "secs_serde")]
    pub read: Duration,
}

impl Default for Timeout {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }
}

impl Timeout {
    /// Create a timeout pair
    #[must_use]
    pub fn new(connect: Duration, read: Duration) -> Self {
        Self { connect, read }
    }
}

mod secs_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

fn default_enabled() -> bool {
    true
}

/// Configuration for a single API client
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API
    #[serde(default)]
    pub base_url: Option<String>,
    /// Auth token or API key; never serialized
    #[serde(default, skip_serializing)]
    pub credential: Option<String>,
    /// When false every operation is a no-op that makes no request
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Request timeouts
    #[serde(default)]
    pub timeout: Timeout,
    /// Default `updated_by` attribution for mutating calls
    #[serde(default)]
    pub user: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            credential: None,
            enabled: true,
            timeout: Timeout::default(),
            user: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("enabled", &self.enabled)
            .field("timeout", &self.timeout)
            .field("user", &self.user)
            .finish()
    }
}

impl ClientConfig {
    /// Create an enabled configuration for a base URL and credential
    #[must_use]
    pub fn new(base_url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            credential: Some(credential.into()),
            ..Self::default()
        }
    }

    /// Create a disabled configuration; the client will never make requests
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builder-style method to set the credential
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Builder-style method to set the default `updated_by` user
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Builder-style method to set timeouts
    #[must_use]
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to enable or disable the client
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Validate the configuration
    ///
    /// A missing base URL is allowed: it may be bound later by `init_app`.
    pub fn validate(&self) -> ApiResult<()> {
        if let Some(url) = &self.base_url {
            if url.is_empty() {
                return Err(ApiError::config("base_url cannot be empty"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::config("base_url must start with http:// or https://"));
            }
        }

        if self.timeout.connect.is_zero() || self.timeout.read.is_zero() {
            return Err(ApiError::config("timeouts cannot be zero"));
        }

        Ok(())
    }
}
