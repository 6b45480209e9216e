//! # VLESS Key Encoding
//!
//! Builds `vless://<client>@<address>:<port>?<query>#<remarks>`.
//!
//! | Host field | Query key | Emitted when |
//! |------------|-----------|--------------|
//! | security type | `security` | set and not exactly `none` |
//! | SNI | `sni` | set |
//! | fingerprint | `fp` | set |
//! | public key | `pbk` | Reality (mandatory) |
//! | short id | `sid` | Reality and set |
//! | flow | `flow` | set |
//! | network | `type` | always, `tcp` by default |
//!
//! Query keys are sorted. Values are query-component escaped: only
//! `-_.~` and alphanumerics stay literal and space is `+`. Remarks are
//! path-segment escaped (space is `%20`, `:`/`@`/`=` stay literal).

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

use crate::domain::entities::non_empty;
use crate::domain::{invariant_reality_public_key, EncodeError, Host};

/// URL scheme of the produced keys.
pub const VLESS_SCHEME: &str = "vless";

/// Characters escaped in a query value. Space is kept and mapped to `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b' ');

/// Characters left unescaped in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Collect the query parameters for `host`, keyed and sorted by name.
pub fn query_params(host: &Host) -> Result<BTreeMap<&'static str, &str>, EncodeError> {
    invariant_reality_public_key(host)?;

    let mut params = BTreeMap::new();

    if let Some(security) = host.security() {
        if security != "none" {
            params.insert("security", security);
        }
    }
    if let Some(sni) = non_empty(&host.sni) {
        params.insert("sni", sni);
    }
    if let Some(fp) = non_empty(&host.fingerprint) {
        params.insert("fp", fp);
    }

    if host.is_reality() {
        if let Some(pbk) = non_empty(&host.public_key) {
            params.insert("pbk", pbk);
        }
        if let Some(sid) = non_empty(&host.short_id) {
            params.insert("sid", sid);
        }
    }

    if let Some(flow) = non_empty(&host.flow) {
        params.insert("flow", flow);
    }

    params.insert("type", host.network_or_default());

    Ok(params)
}

/// Encode a connection key for `client_id` on `host`.
///
/// Deterministic: identical inputs give byte-identical output. Fails only
/// when a Reality host lacks its public key, in which case nothing is built.
pub fn encode_vless_key(client_id: &str, host: &Host, remarks: &str) -> Result<String, EncodeError> {
    let params = query_params(host)?;

    let mut key = format!(
        "{}://{}@{}:{}",
        VLESS_SCHEME, client_id, host.address, host.port
    );

    let mut separator = '?';
    for (name, value) in params {
        key.push(separator);
        key.push_str(name);
        key.push('=');
        key.push_str(&escape_query_value(value));
        separator = '&';
    }

    if !remarks.is_empty() {
        key.push('#');
        key.extend(utf8_percent_encode(remarks, PATH_SEGMENT));
    }

    Ok(key)
}

fn escape_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT)
        .to_string()
        .replace(' ', "+")
}
