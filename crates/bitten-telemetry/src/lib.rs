//! # Bitten Telemetry
//!
//! Logging bootstrap for BittenVPN services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bitten_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BV_SERVICE_NAME` | `bitten-vpn` | Service name in logs |
//! | `BV_LOG_LEVEL` / `RUST_LOG` | `info` | `EnvFilter` directive |
//! | `BV_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `BV_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};

#[doc(hidden)]
pub use tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// `BV_LOG_LEVEL` / `RUST_LOG` is not a valid filter.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Initialize logging.
///
/// Returns a guard to hold for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Logs shutdown on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Service name logs are emitted under.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
