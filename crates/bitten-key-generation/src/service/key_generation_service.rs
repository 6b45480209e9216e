//! Key Generation Service
//!
//! Orchestrates the two key paths over the injected stores:
//!
//! - user path: user lookup, subscription check (fail-open to free), host
//!   selection for the derived tier, encoding with the user's id
//! - free path: host selection for the free tier, encoding with the shared
//!   free-tier client id
//!
//! Every store call is bounded by the request context. When the caller sets
//! no deadline, the configured lookup timeout applies.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::algorithms::{encode_vless_key, select_host};
use crate::context::RequestContext;
use crate::domain::{
    EncodeError, FreeKey, Host, HostQuery, KeyGenConfig, KeyGenError, KeyRequest, SelectionError,
    Tier, UserKey,
};
use crate::ports::inbound::KeyGenerationApi;
use crate::ports::outbound::{HostStore, SubscriptionStore, UserStore};

/// Key generation service.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct KeyGenerationService<U, S, H>
where
    U: UserStore,
    S: SubscriptionStore,
    H: HostStore,
{
    users: Arc<U>,
    subscriptions: Arc<S>,
    hosts: Arc<H>,
    config: KeyGenConfig,
}

impl<U, S, H> KeyGenerationService<U, S, H>
where
    U: UserStore,
    S: SubscriptionStore,
    H: HostStore,
{
    /// Create a service over the given stores.
    pub fn new(users: Arc<U>, subscriptions: Arc<S>, hosts: Arc<H>, config: KeyGenConfig) -> Self {
        Self {
            users,
            subscriptions,
            hosts,
            config,
        }
    }

    /// Subscription status, treating store faults as "no subscription".
    async fn subscription_status(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> Result<bool, KeyGenError> {
        let result = ctx
            .run(self.subscriptions.has_active_subscription(user_id))
            .await
            .map_err(|reason| KeyGenError::Interrupted {
                stage: "subscription check",
                reason,
            })?;

        match result {
            Ok(active) => Ok(active),
            Err(e) => {
                error!(
                    %user_id,
                    error = %e,
                    "Failed to check subscription status, serving free tier"
                );
                Ok(false)
            }
        }
    }

    async fn pick_host(&self, ctx: &RequestContext, query: &HostQuery) -> Result<Host, KeyGenError> {
        select_host(self.hosts.as_ref(), ctx, query).await.map_err(|e| {
            match &e {
                SelectionError::Store(source) => {
                    error!(%query, error = %source, "Failed to retrieve active host")
                }
                SelectionError::NoHostAvailable { .. } => warn!(%query, "No active hosts available"),
                SelectionError::Interrupted(reason) => warn!(%query, %reason, "Host lookup interrupted"),
            }
            KeyGenError::from_selection(e, query)
        })
    }

    fn encode(&self, client_id: &str, host: &Host, remarks: &str) -> Result<String, KeyGenError> {
        encode_vless_key(client_id, host, remarks).map_err(|e: EncodeError| {
            error!(host_id = host.id, error = %e, "Selected host cannot be encoded");
            KeyGenError::Validation(e)
        })
    }
}

#[async_trait]
impl<U, S, H> KeyGenerationApi for KeyGenerationService<U, S, H>
where
    U: UserStore,
    S: SubscriptionStore,
    H: HostStore,
{
    #[instrument(skip(self, ctx, request))]
    async fn generate_key_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        request: &KeyRequest,
    ) -> Result<UserKey, KeyGenError> {
        info!(country = ?request.country, "Generating key for user");
        let ctx = ctx.clone().with_default_deadline(self.config.lookup_timeout);

        let user = ctx
            .run(self.users.get_by_id(user_id))
            .await
            .map_err(|reason| KeyGenError::Interrupted {
                stage: "user lookup",
                reason,
            })?
            .map_err(|source| {
                error!(error = %source, "Failed to retrieve user");
                KeyGenError::UserLookupFailed { user_id, source }
            })?;

        if user.is_none() {
            warn!("User not found");
            return Err(KeyGenError::UserNotFound(user_id));
        }

        let has_active_subscription = self.subscription_status(&ctx, user_id).await?;
        let tier = Tier::for_subscription(has_active_subscription);
        let query = HostQuery::new(tier, request.country.as_deref());

        let host = self.pick_host(&ctx, &query).await?;

        let remarks = request.remarks_or(&self.config.user_remarks);
        let vless_key = self.encode(&user_id.to_string(), &host, remarks)?;

        info!(
            host_id = host.id,
            %tier,
            has_active_subscription,
            "Generated key for user"
        );

        Ok(UserKey {
            vless_key,
            user_id,
            remarks: remarks.to_string(),
            has_active_subscription,
        })
    }

    #[instrument(skip(self, ctx, request))]
    async fn generate_free_key(
        &self,
        ctx: &RequestContext,
        request: &KeyRequest,
    ) -> Result<FreeKey, KeyGenError> {
        info!(country = ?request.country, "Generating free key");
        let ctx = ctx.clone().with_default_deadline(self.config.lookup_timeout);

        let query = HostQuery::new(Tier::Free, request.country.as_deref());
        let host = self.pick_host(&ctx, &query).await?;

        let remarks = request.remarks_or(&self.config.free_remarks);
        let vless_key = self.encode(&self.config.free_tier_client_id.to_string(), &host, remarks)?;

        info!(host_id = host.id, "Generated free key");

        Ok(FreeKey {
            vless_key,
            remarks: remarks.to_string(),
        })
    }
}
