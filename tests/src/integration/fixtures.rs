//! Shared builders for integration flows.

use std::sync::Arc;

use bitten_key_generation::{
    Host, HostStatus, InMemoryHostStore, InMemorySubscriptionStore, InMemoryUserStore,
    KeyGenConfig, KeyGenerationService, Subscription, User,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

/// Service wired to in-memory stores.
pub type InMemoryService =
    KeyGenerationService<InMemoryUserStore, InMemorySubscriptionStore, InMemoryHostStore>;

/// Online, active host with plain security.
pub fn host(id: u64, free: bool, country: &str) -> Host {
    Host {
        id,
        host_name: Some(format!("node-{}", id)),
        address: format!("192.0.2.{}", id),
        port: "443".to_string(),
        protocol: "vless".to_string(),
        security_type: Some("none".to_string()),
        is_free_tier: free,
        is_online: true,
        status: HostStatus::Active,
        country: Some(country.to_string()),
        ..Default::default()
    }
}

/// Reality host with the given public key.
pub fn reality_host(id: u64, free: bool, country: &str, public_key: &str) -> Host {
    Host {
        security_type: Some("reality".to_string()),
        public_key: Some(public_key.to_string()),
        short_id: Some("ab12".to_string()),
        sni: Some("www.example.com".to_string()),
        fingerprint: Some("chrome".to_string()),
        flow: Some("xtls-rprx-vision".to_string()),
        ..host(id, free, country)
    }
}

/// Subscription valid for the next 30 days.
pub fn active_subscription(user_id: Uuid) -> Subscription {
    let now = Utc::now();
    Subscription {
        id: Uuid::new_v4(),
        user_id,
        plan_name: "monthly".to_string(),
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(30),
        is_active: true,
    }
}

/// Stores plus one registered user.
pub struct World {
    /// User store
    pub users: Arc<InMemoryUserStore>,
    /// Subscription store
    pub subscriptions: Arc<InMemorySubscriptionStore>,
    /// Host store
    pub hosts: Arc<InMemoryHostStore>,
    /// Registered user without a subscription
    pub user_id: Uuid,
}

impl World {
    /// World with the given hosts.
    pub fn new(hosts: impl IntoIterator<Item = Host>) -> Self {
        let user_id = Uuid::new_v4();
        Self {
            users: Arc::new(InMemoryUserStore::with_users([User::new(user_id, "alice")])),
            subscriptions: Arc::new(InMemorySubscriptionStore::new()),
            hosts: Arc::new(InMemoryHostStore::with_hosts(hosts)),
            user_id,
        }
    }

    /// Give the registered user an active subscription.
    pub fn subscribe(&self) {
        self.subscriptions.insert(active_subscription(self.user_id));
    }

    /// Service with default configuration.
    pub fn service(&self) -> InMemoryService {
        self.service_with(KeyGenConfig::default())
    }

    /// Service with the given configuration.
    pub fn service_with(&self, config: KeyGenConfig) -> InMemoryService {
        KeyGenerationService::new(
            self.users.clone(),
            self.subscriptions.clone(),
            self.hosts.clone(),
            config,
        )
    }
}
