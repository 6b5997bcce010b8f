#![forbid(unsafe_code)]

//! Unified error model and graceful degradation.
//!
//! The overlay has no user-visible error state. Geometry problems degrade to
//! the fallback bubble position and absent elements are skipped, so neither
//! reaches this type. What remains are embedder-facing failures: a bad
//! configuration file, a backend misuse, or a trace that cannot be replayed.
//! Each maps to a [`DegradationAction`] the embedder applies instead of
//! aborting.

use std::fmt;

use hguard_overlay::ConfigError;
use hguard_web::WebBackendError;
use hguard_web::session_record::ReplayError;

/// Top-level error type for HealthGuard embedders.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// The host backend was driven incorrectly.
    Backend(WebBackendError),
    /// A recorded session could not be replayed.
    Replay(ReplayError),
}

/// Standard result type for HealthGuard APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What the embedder should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Continue with `OverlayConfig::default()`.
    UseDefaults,
    /// Drop the current update and keep the overlay running.
    SkipUpdate,
    /// Unrecoverable; tear the overlay down.
    Shutdown,
}

impl Error {
    /// Determine the graceful degradation action for this error.
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Config(_) => DegradationAction::UseDefaults,
            Self::Backend(err) | Self::Replay(ReplayError::Backend(err)) => backend_degradation(err),
            Self::Replay(ReplayError::MissingHeader | ReplayError::UnknownSchema(_)) => {
                DegradationAction::SkipUpdate
            }
        }
    }

    /// Error type label for tracing fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Backend(_) => "backend",
            Self::Replay(_) => "replay",
        }
    }

    /// Whether the error is recoverable (does not require shutdown).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.degradation(), DegradationAction::Shutdown)
    }
}

fn backend_degradation(err: &WebBackendError) -> DegradationAction {
    match err {
        // Stepping before init means the embedder skipped startup entirely.
        WebBackendError::NotInitialized => DegradationAction::Shutdown,
        WebBackendError::Unsupported(_) => DegradationAction::SkipUpdate,
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Backend(err) => write!(f, "backend: {err}"),
            Self::Replay(err) => write!(f, "replay: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Backend(err) => Some(err),
            Self::Replay(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<WebBackendError> for Error {
    fn from(err: WebBackendError) -> Self {
        Self::Backend(err)
    }
}

impl From<ReplayError> for Error {
    fn from(err: ReplayError) -> Self {
        Self::Replay(err)
    }
}

impl fmt::Display for DegradationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseDefaults => write!(f, "use_defaults"),
            Self::SkipUpdate => write!(f, "skip_update"),
            Self::Shutdown => write!(f, "shutdown"),
        }
    }
}
