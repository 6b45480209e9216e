//! # Domain Errors
//!
//! Typed error taxonomy for key generation. Callers branch on variants
//! (or on [`ErrorKind`]), never on message text.

use super::value_objects::{HostQuery, Tier};
use thiserror::Error;
use uuid::Uuid;

/// Infrastructure fault reported by a store collaborator.
///
/// Absence of a record is not an error: lookups return `Ok(None)`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Store did not answer in time.
    #[error("store timed out")]
    Timeout,

    /// Store rejected or failed the query.
    #[error("store query failed: {0}")]
    Query(String),
}

/// Why a request context stopped a pending call.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Interrupted {
    /// Caller cancelled the request.
    #[error("cancelled by caller")]
    Cancelled,

    /// Request deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Key encoding failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Host uses Reality security without a public key.
    #[error("host {host_id} is configured for Reality but missing public key (pbk)")]
    MissingRealityPublicKey {
        /// Offending host
        host_id: u64,
    },
}

/// Host selection failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// No online host matched the query, even after dropping the country filter.
    #[error("no active hosts available for {query}")]
    NoHostAvailable {
        /// The query as originally requested
        query: HostQuery,
    },

    /// Host store fault.
    #[error("host store failure: {0}")]
    Store(#[from] StoreError),

    /// Request context stopped the lookup.
    #[error("host lookup interrupted: {0}")]
    Interrupted(#[from] Interrupted),
}

/// Key generation error surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum KeyGenError {
    /// Requested user does not exist.
    #[error("user with ID {0} not found")]
    UserNotFound(Uuid),

    /// User store fault.
    #[error("could not retrieve user {user_id}: {source}")]
    UserLookupFailed {
        /// User being resolved
        user_id: Uuid,
        /// Underlying fault
        #[source]
        source: StoreError,
    },

    /// No host available for the requested criteria.
    #[error("no active hosts available to generate key for {query}")]
    NoHostAvailable {
        /// Query that found nothing
        query: HostQuery,
    },

    /// Host store fault.
    #[error("could not retrieve an active {tier} host: {source}")]
    HostLookupFailed {
        /// Tier being served
        tier: Tier,
        /// Underlying fault
        #[source]
        source: StoreError,
    },

    /// Selected host cannot be encoded.
    #[error(transparent)]
    Validation(#[from] EncodeError),

    /// Request was cancelled or ran out of time.
    #[error("request interrupted during {stage}: {reason}")]
    Interrupted {
        /// Pipeline step that was running
        stage: &'static str,
        /// Cancellation or deadline
        reason: Interrupted,
    },
}

/// Coarse error class for transport layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Resource does not exist (404).
    NotFound,
    /// Temporarily unable to serve the criteria (503).
    Unavailable,
    /// Infrastructure or data-integrity fault (500).
    Internal,
    /// Caller gave up or deadline passed.
    Cancelled,
}

impl KeyGenError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::NoHostAvailable { .. } => ErrorKind::Unavailable,
            Self::UserLookupFailed { .. } | Self::HostLookupFailed { .. } | Self::Validation(_) => {
                ErrorKind::Internal
            }
            Self::Interrupted { .. } => ErrorKind::Cancelled,
        }
    }

    /// Message safe to show to the caller. Never includes store details.
    pub fn public_message(&self) -> String {
        match self {
            Self::UserNotFound(_) => self.to_string(),
            Self::NoHostAvailable { .. } => {
                "Unable to generate key: No active hosts are currently available for your criteria."
                    .to_string()
            }
            Self::Interrupted { .. } => "Request cancelled before the key was generated.".to_string(),
            _ => "Failed to generate VLESS key.".to_string(),
        }
    }

    /// Map a selection failure for the given query.
    pub(crate) fn from_selection(err: SelectionError, query: &HostQuery) -> Self {
        match err {
            SelectionError::NoHostAvailable { query } => Self::NoHostAvailable { query },
            SelectionError::Store(source) => Self::HostLookupFailed {
                tier: query.tier,
                source,
            },
            SelectionError::Interrupted(reason) => Self::Interrupted {
                stage: "host selection",
                reason,
            },
        }
    }
}

/// Invalid configuration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Free-tier client id must be a real UUID.
    #[error("free-tier client id must not be the nil UUID")]
    NilFreeTierClientId,

    /// Free-tier client id could not be parsed.
    #[error("invalid free-tier client id {value:?}: {reason}")]
    InvalidFreeTierClientId {
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },

    /// Remarks default is empty.
    #[error("default remarks for {0} keys cannot be empty")]
    EmptyRemarks(&'static str),

    /// Lookup timeout is zero.
    #[error("lookup timeout cannot be 0")]
    ZeroTimeout,
}
