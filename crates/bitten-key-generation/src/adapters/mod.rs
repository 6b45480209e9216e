//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound store ports.

mod fault;
mod host_store;
mod subscription_store;
mod user_store;

pub use host_store::InMemoryHostStore;
pub use subscription_store::InMemorySubscriptionStore;
pub use user_store::InMemoryUserStore;
