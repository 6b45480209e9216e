//! Cross-module key generation flows.

pub mod fixtures;

mod key_flows;
