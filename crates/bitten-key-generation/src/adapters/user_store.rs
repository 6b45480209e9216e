//! In-memory User Store Adapter
//!
//! Implements `UserStore` over a map guarded by `parking_lot::RwLock`.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::fault::Faults;
use crate::domain::{StoreError, User};
use crate::ports::outbound::UserStore;

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
    faults: Faults,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert(user);
        }
        store
    }

    /// Load users from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let users: Vec<User> = serde_json::from_str(json)?;
        Ok(Self::with_users(users))
    }

    /// Insert or replace a user.
    pub fn insert(&self, user: User) {
        self.users.write().insert(user.id, user);
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
impl UserStore for InMemoryUserStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.faults.apply("user").await?;
        debug!(user_id = %id, "Looking up user");
        Ok(self.users.read().get(&id).cloned())
    }
}
