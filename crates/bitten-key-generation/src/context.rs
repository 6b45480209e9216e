//! # Request Context
//!
//! Per-request deadline and cancellation signal. Every store call made by the
//! selector and the service goes through [`RequestContext::run`].

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::domain::Interrupted;

/// Deadline and cancellation for one key-generation request.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every context cloned from the one it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl RequestContext {
    /// Context with no deadline and no cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    /// Context that expires after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline, keeping the earlier one if already set.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Apply `timeout` only when no deadline is set.
    pub fn with_default_deadline(self, timeout: Duration) -> Self {
        if self.deadline.is_some() {
            self
        } else {
            self.with_deadline(Instant::now() + timeout)
        }
    }

    /// Attach a cancellation signal.
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle { tx })
    }

    /// Current deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context is already done.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Err(Interrupted::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(Interrupted::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `fut` until it completes or the context is done.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Interrupted::Cancelled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }

    /// Resolves once cancellation is signalled. Never resolves without a signal.
    async fn cancelled(&self) {
        let Some(rx) = &self.cancel else {
            return std::future::pending().await;
        };

        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without cancelling.
                return std::future::pending().await;
            }
        }
    }
}
