//! # Algorithms Module
//!
//! Host selection policy and key encoding.

pub mod host_selection;
pub mod vless;

pub use host_selection::select_host;
pub use vless::{encode_vless_key, query_params, VLESS_SCHEME};
