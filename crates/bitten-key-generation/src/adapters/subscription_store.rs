//! In-memory Subscription Store Adapter
//!
//! Implements `SubscriptionStore`. A subscription counts as active when its
//! flag is set and the current time lies inside its validity window.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::time::Duration;
use uuid::Uuid;

use super::fault::Faults;
use crate::domain::{StoreError, Subscription};
use crate::ports::outbound::SubscriptionStore;

/// In-memory subscription store.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    subscriptions: RwLock<Vec<Subscription>>,
    faults: Faults,
}

impl InMemorySubscriptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `subscriptions`.
    pub fn with_subscriptions(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        Self {
            subscriptions: RwLock::new(subscriptions.into_iter().collect()),
            faults: Faults::default(),
        }
    }

    /// Load subscriptions from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let subscriptions: Vec<Subscription> = serde_json::from_str(json)?;
        Ok(Self::with_subscriptions(subscriptions))
    }

    /// Add a subscription.
    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions.write().push(subscription);
    }

    /// Simulate an outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults.set_unavailable(unavailable);
    }

    /// Delay every lookup by `latency`.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.faults.set_latency(Some(latency));
        self
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn has_active_subscription(&self, user_id: Uuid) -> Result<bool, StoreError> {
        self.faults.apply("subscription").await?;

        let now = Utc::now();
        Ok(self
            .subscriptions
            .read()
            .iter()
            .any(|s| s.user_id == user_id && s.is_active_at(now)))
    }
}
