//! Tracing bootstrap for applications and tests.
//!
//! The library itself only emits `tracing` spans and events; installing a
//! subscriber is the embedding application's choice. These helpers wire up
//! the usual stack of env-filter, fmt output, and span-trace capture
//! for error reports, filtered through the `PATHLOOM_LOG` environment
//! variable.

use miette::Diagnostic;
use thiserror::Error;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable controlling the default filter.
pub const FILTER_ENV: &str = "PATHLOOM_LOG";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error, Diagnostic)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {message}")]
    #[diagnostic(
        code(pathloom::telemetry::init),
        help("a global subscriber can only be installed once per process")
    )]
    InitFailed {
        /// The subscriber error's message.
        message: String,
    },
}

/// Install the default subscriber stack.
///
/// Filter resolution: `PATHLOOM_LOG` if set, otherwise `"info"`.
pub fn try_init() -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| TelemetryError::InitFailed {
            message: e.to_string(),
        })
}

/// Install the default subscriber stack, ignoring an already-installed
/// one. Convenient in tests, where several suites race to initialize.
pub fn init() {
    let _ = try_init();
}
