//! Tracing subscriber setup for binaries and test harnesses embedding the engine

use tracing_subscriber::EnvFilter;

use crate::error::{FlowgradeError, Result};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` is used
/// (e.g. `"info,flowgrade_core=debug"`).
///
/// # Errors
///
/// Returns an error if the directive is invalid or a global subscriber is
/// already installed.
pub fn init(default_directive: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            FlowgradeError::Configuration(format!("Invalid log directive '{}': {}", default_directive, e))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| FlowgradeError::Configuration(format!("Failed to install subscriber: {}", e)))
}
