//! # Outbound Ports
//!
//! Store collaborators consumed by key generation. Implementations report
//! absence as `Ok(None)` and infrastructure faults as [`StoreError`].

use crate::domain::{Host, HostQuery, StoreError, User};
use async_trait::async_trait;
use uuid::Uuid;

/// User store - outbound port.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Resolve a user by id.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Subscription store - outbound port.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Whether the user holds at least one active subscription.
    async fn has_active_subscription(&self, user_id: Uuid) -> Result<bool, StoreError>;
}

/// Host store - outbound port.
#[async_trait]
pub trait HostStore: Send + Sync {
    /// Pick one online host matching the query, uniformly at random.
    ///
    /// Must tolerate hosts changing state concurrently: an empty eligible
    /// set yields `Ok(None)`.
    async fn random_active_host(&self, query: &HostQuery) -> Result<Option<Host>, StoreError>;
}
