//! # Bitten Key Generation
//!
//! Issues VLESS connection keys for BittenVPN clients.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Pick an online host for the caller's tier, preferring the requested
//!   country and relaxing that preference once when it cannot be met
//! - Encode the host as a deterministic `vless://` URL
//! - Route registered users to paid or free hosts by subscription status,
//!   falling back to free when the subscription store is unreachable
//!
//! ## Error Classes
//!
//! | Kind | Cause |
//! |------|-------|
//! | `NotFound` | Unknown user |
//! | `Unavailable` | No online host for the tier |
//! | `Internal` | Store fault or misconfigured host |
//! | `Cancelled` | Caller cancelled or deadline passed |
//!
//! ## Module Structure
//!
//! ```text
//! bitten-key-generation/
//! ├── domain/          # Host, User, Subscription, errors, config
//! ├── algorithms/      # Host selection, VLESS encoding
//! ├── ports/           # KeyGenerationApi, store traits
//! ├── adapters/        # In-memory stores
//! ├── service/         # KeyGenerationService
//! └── context.rs       # Deadlines and cancellation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod context;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{InMemoryHostStore, InMemorySubscriptionStore, InMemoryUserStore};
pub use algorithms::{encode_vless_key, query_params, select_host, VLESS_SCHEME};
pub use context::{CancelHandle, RequestContext};
pub use domain::{
    invariant_host_eligible, invariant_reality_public_key, ConfigError, EncodeError, ErrorKind,
    FreeKey, Host, HostQuery, HostStatus, Interrupted, KeyGenConfig, KeyGenError, KeyRequest,
    SelectionError, StoreError, Subscription, Tier, User, UserKey, DEFAULT_FREE_REMARKS,
    DEFAULT_LOOKUP_TIMEOUT, DEFAULT_USER_REMARKS, FREE_TIER_CLIENT_ID,
};
pub use ports::{HostStore, KeyGenerationApi, SubscriptionStore, UserStore};
pub use service::KeyGenerationService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
