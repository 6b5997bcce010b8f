#![forbid(unsafe_code)]

//! Logging bootstrap.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! host binary's job. With the `tracing-json` feature, [`init`] installs a
//! JSON `fmt` subscriber filtered by the `HGUARD_LOG` environment variable.

/// Environment variable consulted for the log filter directive.
pub const LOG_ENV: &str = "HGUARD_LOG";

/// Filter used when `HGUARD_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, info_span, trace, trace_span, warn};

/// Install the global JSON subscriber.
///
/// Returns `false` if a global subscriber was already installed (repeated
/// calls are harmless).
#[cfg(feature = "tracing-json")]
pub fn init() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
