//! # Host Selection
//!
//! Country-then-fallback search over the host store:
//!
//! 1. random online host of the tier in the requested country
//! 2. if none and a country was given, any online host of the tier
//! 3. otherwise [`SelectionError::NoHostAvailable`]
//!
//! Store faults are never treated as "no host": they abort the search.

use bitten_telemetry::log_event;
use tracing::debug;

use crate::context::RequestContext;
use crate::domain::{Host, HostQuery, SelectionError};
use crate::ports::HostStore;

const COMPONENT: &str = "host-selector";

/// Select a host for `query`, relaxing the country filter once.
pub async fn select_host<H>(
    store: &H,
    ctx: &RequestContext,
    query: &HostQuery,
) -> Result<Host, SelectionError>
where
    H: HostStore + ?Sized,
{
    if let Some(host) = ctx.run(store.random_active_host(query)).await?? {
        debug!(host_id = host.id, %query, "Selected host");
        return Ok(host);
    }

    if query.has_country() {
        log_event!(
            warn,
            COMPONENT,
            "No active hosts in requested country, retrying without country filter",
            %query
        );

        let relaxed = query.without_country();
        if let Some(host) = ctx.run(store.random_active_host(&relaxed)).await?? {
            log_event!(
                info,
                COMPONENT,
                "Selected fallback host outside requested country",
                host_id = host.id,
                host_country = host.country.as_deref().unwrap_or(""),
                %query
            );
            return Ok(host);
        }
    }

    log_event!(warn, COMPONENT, "No active hosts available for criteria", %query);
    Err(SelectionError::NoHostAvailable {
        query: query.clone(),
    })
}
