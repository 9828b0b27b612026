//! Observability: subscriber setup for the `tracing` events the engine emits.
//!
//! The library only emits. Binaries embedding it call [`init_logging`] once
//! at startup. Metrics go through the `metrics` facade, so whichever
//! recorder the host installs receives them.

mod logging;

pub use logging::{LOG_FILTER_ENV, LOG_FORMAT_ENV, LogFormat, LoggingConfig};

use crate::{Error, Result};
use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if logging was already initialized or
/// another global subscriber is installed.
///
/// # Example
///
/// ```rust,no_run
/// use signal_dedup::observability::{LoggingConfig, init_logging};
///
/// init_logging(LoggingConfig::from_env()).unwrap();
/// tracing::info!("ingestion started");
/// ```
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    if LOGGING_INIT.get().is_some() {
        return Err(Error::OperationFailed {
            operation: "logging_init".to_string(),
            cause: "logging already initialized".to_string(),
        });
    }

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .with(config.filter)
                .try_init()
                .map_err(init_error)?;
        },
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .with(config.filter)
                .try_init()
                .map_err(init_error)?;
        },
    }

    LOGGING_INIT.set(()).map_err(|()| Error::OperationFailed {
        operation: "logging_init".to_string(),
        cause: "failed to mark logging initialized".to_string(),
    })
}

/// Helper to convert init errors.
#[allow(clippy::needless_pass_by_value)]
fn init_error(e: tracing_subscriber::util::TryInitError) -> Error {
    Error::OperationFailed {
        operation: "logging_init".to_string(),
        cause: e.to_string(),
    }
}
