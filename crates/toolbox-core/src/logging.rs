#![forbid(unsafe_code)]

//! Structured logging hooks.
//!
//! With the `tracing` feature enabled, the observable and table layers emit
//! `trace`/`debug`/`warn` events and this module re-exports the macros so
//! downstream crates need no direct `tracing` dependency.
//!
//! With `tracing-json`, [`init_json_subscriber`] installs a JSON formatter
//! filtered by the [`ENV_LOG_FILTER`] environment variable (same syntax as
//! `RUST_LOG`, defaulting to `info`).

/// Environment variable holding the log filter directive.
pub const ENV_LOG_FILTER: &str = "TOOLBOX_LOG";

/// Filter used when [`ENV_LOG_FILTER`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Install a global JSON `tracing` subscriber.
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
}
