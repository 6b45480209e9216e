//! # Domain Entities
//!
//! Records read from the user, subscription and host stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational status of a host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    /// Operational and serving.
    Active,
    /// Intentionally not operational.
    Inactive,
    /// Temporarily down for maintenance.
    Maintenance,
    /// Not determined. Also used for unrecognised stored values.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Proxy endpoint a key can point at.
///
/// Optional string fields treat `Some("")` the same as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    /// Store identifier.
    pub id: u64,
    /// Descriptive name.
    pub host_name: Option<String>,
    /// IP address or domain.
    pub address: String,
    /// Service port.
    pub port: String,
    /// Proxy protocol, e.g. `vless`.
    pub protocol: String,
    /// Transport: `tcp`, `ws`, `grpc`... `tcp` when absent.
    pub network: Option<String>,
    /// Security mode: `none`, `tls`, `reality`...
    pub security_type: Option<String>,
    /// TLS server name.
    pub sni: Option<String>,
    /// TLS fingerprint.
    pub fingerprint: Option<String>,
    /// Reality public key.
    pub public_key: Option<String>,
    /// Reality short id.
    #[serde(alias = "rsid")]
    pub short_id: Option<String>,
    /// Flow-control tag.
    pub flow: Option<String>,
    /// Usable by free-tier clients.
    pub is_free_tier: bool,
    /// Hidden from general listings.
    pub is_private: bool,
    /// Liveness flag.
    pub is_online: bool,
    /// Detailed status.
    pub status: HostStatus,
    /// Country code.
    pub country: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// Infrastructure provider.
    pub provider: Option<String>,
    /// Last health check.
    pub last_checked_at: Option<DateTime<Utc>>,
}

/// Non-empty view of an optional field.
pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

impl Host {
    /// Network type with the `tcp` default applied.
    pub fn network_or_default(&self) -> &str {
        non_empty(&self.network).unwrap_or("tcp")
    }

    /// Security type when set.
    pub fn security(&self) -> Option<&str> {
        non_empty(&self.security_type)
    }

    /// Whether the host uses Reality security (case-insensitive).
    pub fn is_reality(&self) -> bool {
        self.security()
            .is_some_and(|s| s.eq_ignore_ascii_case("reality"))
    }

    /// Whether the host is online with status `active`.
    pub fn is_active(&self) -> bool {
        self.is_online && self.status == HostStatus::Active
    }
}

/// Registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id, also the VLESS client id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Telegram account id.
    #[serde(default)]
    pub telegram_id: Option<i64>,
    /// Account enabled.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Create an active user.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            telegram_id: None,
            is_active: true,
        }
    }
}

/// Subscription plan held by a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription id.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Plan name.
    pub plan_name: String,
    /// Start of validity.
    pub start_date: DateTime<Utc>,
    /// End of validity (exclusive).
    pub end_date: DateTime<Utc>,
    /// Manually enabled flag.
    pub is_active: bool,
}

impl Subscription {
    /// Whether the subscription grants paid access at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now < self.end_date
    }
}
