//! Fault injection shared by the in-memory stores.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::domain::StoreError;

/// Simulated outage and latency.
#[derive(Debug, Default)]
pub(crate) struct Faults {
    unavailable: AtomicBool,
    latency: RwLock<Option<Duration>>,
}

impl Faults {
    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub(crate) fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write() = latency;
    }

    /// Sleep for the configured latency, then fail if marked unavailable.
    pub(crate) async fn apply(&self, store: &str) -> Result<(), StoreError> {
        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{} store offline", store)));
        }
        Ok(())
    }
}
