//! # Domain Value Objects
//!
//! Immutable request/response types for key generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{uuid, Uuid};

/// Client id used for every key issued without a user record.
pub const FREE_TIER_CLIENT_ID: Uuid = uuid!("5ccc43c4-3c3e-4220-a878-761aa1182dd9");

/// Default remarks for keys issued to registered users.
pub const DEFAULT_USER_REMARKS: &str = "BittenVPN";

/// Default remarks for anonymous free-tier keys.
pub const DEFAULT_FREE_REMARKS: &str = "BittenVPN-Free";

/// Host eligibility class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Hosts flagged for free-tier clients.
    Free,
    /// Hosts reserved for subscribers.
    Paid,
}

impl Tier {
    /// Tier granted by a subscription check.
    pub fn for_subscription(has_active_subscription: bool) -> Self {
        if has_active_subscription {
            Self::Paid
        } else {
            Self::Free
        }
    }

    /// Whether this tier maps to the host's free-tier flag.
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("free"),
            Self::Paid => f.write_str("paid"),
        }
    }
}

/// Host store filter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostQuery {
    /// Required tier.
    pub tier: Tier,
    /// Country filter, never `Some("")`.
    pub country: Option<String>,
}

impl HostQuery {
    /// Build a query. Blank countries become `None`.
    pub fn new(tier: Tier, country: Option<&str>) -> Self {
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self { tier, country }
    }

    /// Same tier, any country.
    pub fn without_country(&self) -> Self {
        Self {
            tier: self.tier,
            country: None,
        }
    }

    /// Whether a country filter is set.
    pub fn has_country(&self) -> bool {
        self.country.is_some()
    }
}

impl fmt::Display for HostQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{} tier in {}", self.tier, country),
            None => write!(f, "{} tier (any country)", self.tier),
        }
    }
}

/// Caller input for both key paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRequest {
    /// Label appended as the URL fragment. Blank means the configured default.
    pub remarks: Option<String>,
    /// Preferred host country.
    pub country: Option<String>,
}

impl KeyRequest {
    /// Request with no remarks and no country.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set remarks.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Set country preference.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Remarks, or `default` when absent or blank.
    pub fn remarks_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.remarks.as_deref() {
            Some(r) if !r.is_empty() => r,
            _ => default,
        }
    }
}

/// Key issued to a registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKey {
    /// Connection URL.
    pub vless_key: String,
    /// User the key was issued to.
    pub user_id: Uuid,
    /// Remarks embedded in the URL.
    pub remarks: String,
    /// Whether the user was served from the paid tier.
    pub has_active_subscription: bool,
}

/// Anonymous free-tier key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeKey {
    /// Connection URL.
    pub vless_key: String,
    /// Remarks embedded in the URL.
    pub remarks: String,
}
