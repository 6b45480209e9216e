//! # BittenVPN Test Suite
//!
//! Unified test crate for flows that span several modules of
//! `bitten-key-generation`.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs     # Host, user and service builders
//!     ├── key_flows.rs    # End-to-end key scenarios
//!     └── concurrency.rs  # Parallel requests, host churn, cancellation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bitten-tests
//! cargo test -p bitten-tests integration::concurrency::
//! ```

#![allow(dead_code)]

pub mod integration;
