//! In-memory Host Store Adapter
//!
//! Implements `HostStore`. Among the hosts eligible for a query, hosts whose
//! status is `active` are preferred; when none are, any online host of the
//! tier is used. The pick is uniform over a snapshot taken under the read
//! lock, so concurrent online/offline flips can only shrink the candidate set
//! to empty (`Ok(None)`), never cause a panic.

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::fault::Faults;
use crate::domain::{invariant_host_eligible, Host, HostQuery, HostStatus, StoreError};
use crate::ports::outbound::HostStore;

/// In-memory host store.
#[derive(Debug, Default)]
pub struct InMemoryHostStore {
    hosts: RwLock<BTreeMap<u64, Host>>,
    faults: Faults,
}

impl InMemoryHostStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `hosts`.
    pub fn with_hosts(hosts: impl IntoIterator<Item = Host>) -> Self {
        let store = Self::new();
        for host in hosts {
            store.insert(host);
        }
        store
    }

    /// Load hosts from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let hosts: Vec<Host> = serde_json::from_str(json)?;
        Ok(Self::with_hosts(hosts))
    }

    /// Insert or replace a host.
    pub fn insert(&self, host: Host) {
        self.hosts.write().insert(host.id, host);
    }

    /// Remove a host.
    pub fn remove(&self, id: u64) -> Option<Host> {
        self.hosts.write().remove(&id)
    }

    /// Flip a host's liveness. Returns false if the host is unknown.
    pub fn set_online(&self, id: u64, online: bool) -> bool {
        match self.hosts.write().get_mut(&id) {
            Some(host) => {
                host.is_online = online;
                true
            }
            None => false,
        }
    }

    /// Set a host's detailed status. Returns false if the host is unknown.
    pub fn set_status(&self, id: u64, status: HostStatus) -> bool {
        match self.hosts.write().get_mut(&id) {
            Some(host) => {
                host.status = status;
                true
            }
            None => false,
        }
    }

    /// Number of stored hosts.
    pub fn len(&self) -> usize {
        self.hosts.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.hosts.read().is_empty()
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

    /// Eligible hosts for `query`, preferring online hosts with status `active`.
    fn candidates(&self, query: &HostQuery) -> Vec<Host> {
        let hosts = self.hosts.read();
        let eligible: Vec<&Host> = hosts
            .values()
            .filter(|h| invariant_host_eligible(h, query))
            .collect();

        let active: Vec<&Host> = eligible
            .iter()
            .copied()
            .filter(|h| h.is_active())
            .collect();

        let pool = if active.is_empty() { eligible } else { active };
        pool.into_iter().cloned().collect()
    }
}

#[async_trait]
impl HostStore for InMemoryHostStore {
    async fn random_active_host(&self, query: &HostQuery) -> Result<Option<Host>, StoreError> {
        self.faults.apply("host").await?;

        let candidates = self.candidates(query);
        debug!(%query, candidates = candidates.len(), "Host candidates");

        Ok(candidates.choose(&mut rand::thread_rng()).cloned())
    }
}
