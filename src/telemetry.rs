//! Tracing subscriber setup for the binary and for tests that want logs.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
#[error("tracing init failed: {0}")]
pub struct TelemetryError(String);

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` controls filtering (default `info`). Set `LOG_FORMAT=json`
/// for one JSON object per event; anything else gives pretty output.
///
/// Returns an error, rather than panicking, if a subscriber is already
/// installed.
pub fn init_tracing() -> Result<(), TelemetryError> {
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| TelemetryError(e.to_string()))
}
