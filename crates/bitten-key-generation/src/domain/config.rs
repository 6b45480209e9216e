//! Key generation configuration and validation
//!
//! Built once at startup and injected into the service as an immutable value.
//!
//! # Example
//!
//! ```ignore
//! use bitten_key_generation::domain::KeyGenConfig;
//! use std::time::Duration;
//!
//! let config = KeyGenConfig::default()
//!     .with_lookup_timeout(Duration::from_secs(2))
//!     .with_free_remarks("Trial");
//! config.validate()?;
//! ```

use super::errors::ConfigError;
use super::value_objects::{DEFAULT_FREE_REMARKS, DEFAULT_USER_REMARKS, FREE_TIER_CLIENT_ID};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// Default bound on all store calls of one request.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Key generation configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyGenConfig {
    /// Client id embedded in anonymous keys
    pub free_tier_client_id: Uuid,
    /// Remarks used when a user request has none
    pub user_remarks: String,
    /// Remarks used when a free request has none
    pub free_remarks: String,
    /// Deadline applied when the caller did not set one
    #[serde(with = "millis")]
    pub lookup_timeout: Duration,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            free_tier_client_id: FREE_TIER_CLIENT_ID,
            user_remarks: DEFAULT_USER_REMARKS.to_string(),
            free_remarks: DEFAULT_FREE_REMARKS.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

impl KeyGenConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// - `BV_FREE_TIER_CLIENT_ID`: UUID for anonymous keys
    /// - `BV_USER_REMARKS`: default remarks for user keys
    /// - `BV_FREE_REMARKS`: default remarks for free keys
    /// - `BV_LOOKUP_TIMEOUT_MS`: store deadline in milliseconds
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("BV_FREE_TIER_CLIENT_ID") {
            config.free_tier_client_id =
                Uuid::parse_str(raw.trim()).map_err(|e| ConfigError::InvalidFreeTierClientId {
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
        }

        if let Some(remarks) = lookup("BV_USER_REMARKS").filter(|r| !r.is_empty()) {
            config.user_remarks = remarks;
        }

        if let Some(remarks) = lookup("BV_FREE_REMARKS").filter(|r| !r.is_empty()) {
            config.free_remarks = remarks;
        }

        if let Some(raw) = lookup("BV_LOOKUP_TIMEOUT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.lookup_timeout = Duration::from_millis(ms),
                _ => warn!(
                    value = %raw,
                    default_ms = config.lookup_timeout.as_millis() as u64,
                    "Invalid BV_LOOKUP_TIMEOUT_MS, using default"
                ),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.free_tier_client_id.is_nil() {
            return Err(ConfigError::NilFreeTierClientId);
        }

        if self.user_remarks.is_empty() {
            return Err(ConfigError::EmptyRemarks("user"));
        }

        if self.free_remarks.is_empty() {
            return Err(ConfigError::EmptyRemarks("free"));
        }

        if self.lookup_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// Builder-style method to set the free-tier client id
    pub fn with_free_tier_client_id(mut self, id: Uuid) -> Self {
        self.free_tier_client_id = id;
        self
    }

    /// Builder-style method to set user remarks
    pub fn with_user_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.user_remarks = remarks.into();
        self
    }

    /// Builder-style method to set free remarks
    pub fn with_free_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.free_remarks = remarks.into();
        self
    }

    /// Builder-style method to set the lookup timeout
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
