//! # Domain Invariants
//!
//! Business rules for host eligibility and key encoding.

use super::entities::{non_empty, Host};
use super::errors::EncodeError;
use super::value_objects::HostQuery;

/// Invariant: Reality hosts carry a public key.
///
/// Checked when encoding, not when selecting: a selected host may violate it.
pub fn invariant_reality_public_key(host: &Host) -> Result<(), EncodeError> {
    if host.is_reality() && non_empty(&host.public_key).is_none() {
        return Err(EncodeError::MissingRealityPublicKey { host_id: host.id });
    }
    Ok(())
}

/// Invariant: a host may serve a query only if it is online, its free-tier
/// flag matches the tier, and its country matches the filter (if any).
pub fn invariant_host_eligible(host: &Host, query: &HostQuery) -> bool {
    if !host.is_online || host.is_free_tier != query.tier.is_free() {
        return false;
    }

    match &query.country {
        Some(wanted) => non_empty(&host.country).is_some_and(|c| c.eq_ignore_ascii_case(wanted)),
        None => true,
    }
}
