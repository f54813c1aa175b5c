//! Tracing subscriber setup shared by the binaries
//!
//! The minimum severity is explicit: `RUST_LOG` wins, then the configured
//! filter (see [`AppConfig::log_filter`]).

use crate::config::AppConfig;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. Call once per process.
pub fn init_tracing(config: &AppConfig) {
    init_with_filter(&config.log_filter(), config.observability.json_logging);
}

/// Initialize the global subscriber with an explicit default filter
pub fn init_with_filter(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    // A second init (e.g. in tests) keeps the first subscriber
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already initialized");
    }
}
