//! Structured logging setup

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Error raised when the global subscriber cannot be installed
#[derive(Debug, thiserror::Error)]
pub enum LoggingInitError {
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. `logging.format` selects
/// JSON lines (`json`) or human-readable output (`pretty`). Logs go to stderr
/// so stdout stays free for the report.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingInitError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            EnvFilter::try_new(&config.level).map_err(|e| LoggingInitError::InvalidFilter {
                filter: config.level.clone(),
                message: e.to_string(),
            })?
        }
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.format == "pretty" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| LoggingInitError::Install(e.to_string()))
}
