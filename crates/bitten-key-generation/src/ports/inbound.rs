//! # Inbound Ports
//!
//! API trait defining what the key generation subsystem can do.

use crate::context::RequestContext;
use crate::domain::{FreeKey, KeyGenError, KeyRequest, UserKey};
use async_trait::async_trait;
use uuid::Uuid;

/// Key generation API - inbound port.
#[async_trait]
pub trait KeyGenerationApi: Send + Sync {
    /// Issue a key for a registered user.
    ///
    /// The user is routed to a paid host when they hold an active
    /// subscription, otherwise to a free host.
    async fn generate_key_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        request: &KeyRequest,
    ) -> Result<UserKey, KeyGenError>;

    /// Issue an anonymous free-tier key.
    async fn generate_free_key(
        &self,
        ctx: &RequestContext,
        request: &KeyRequest,
    ) -> Result<FreeKey, KeyGenError>;
}
