#![forbid(unsafe_code)]

//! `hguard-web` provides a host-driven backend for the HealthGuard overlay.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) pushes input events and size changes.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The crate does not bind to `wasm-bindgen`. It provides the building blocks
//! a JS shim wraps: [`step_program::StepProgram`] drives any
//! [`Model`](hguard_runtime::program::Model), [`host::OverlayHost`] executes
//! overlay effects against the page, and [`session_record`] captures traces
//! for deterministic replay.

pub mod host;
pub mod session_record;
pub mod step_program;

use core::time::Duration;
use std::collections::VecDeque;

use hguard_core::event::Event;
use hguard_runtime::surface::{ElementId, Surface, SurfaceDiff};

/// Web backend error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebBackendError {
    /// `step` was called before `init`.
    NotInitialized,
    /// Generic unsupported operation.
    Unsupported(&'static str),
}

impl core::fmt::Display for WebBackendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "program stepped before init"),
            Self::Unsupported(msg) => write!(f, "unsupported: {msg}"),
        }
    }
}

impl std::error::Error for WebBackendError {}

/// Monotonic time source.
pub trait BackendClock {
    fn now_mono(&self) -> Duration;
}

/// Queue of input events plus the current window size.
pub trait BackendEventSource {
    type Error;

    /// Current window size in pixels.
    fn size(&self) -> Result<(f64, f64), Self::Error>;

    /// Whether an event is waiting. Never blocks.
    fn poll_event(&mut self) -> Result<bool, Self::Error>;

    fn read_event(&mut self) -> Result<Option<Event>, Self::Error>;
}

/// Sink for rendered surfaces and log lines.
pub trait BackendPresenter {
    type Error;

    fn write_log(&mut self, text: &str) -> Result<(), Self::Error>;

    fn present(&mut self, surface: &Surface, diff: &SurfaceDiff) -> Result<(), Self::Error>;
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl BackendClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Host-driven event source.
///
/// The host is responsible for pushing [`Event`] values and updating size.
#[derive(Debug, Clone)]
pub struct WebEventSource {
    size: (f64, f64),
    queue: VecDeque<Event>,
}

impl WebEventSource {
    /// Create a new event source with an initial window size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: (width, height),
            queue: VecDeque::new(),
        }
    }

    /// Update the current size.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = (width, height);
    }

    /// Push a canonical event into the queue.
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}

impl BackendEventSource for WebEventSource {
    type Error = WebBackendError;

    fn size(&self) -> Result<(f64, f64), Self::Error> {
        Ok(self.size)
    }

    fn poll_event(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.queue.is_empty())
    }

    fn read_event(&mut self) -> Result<Option<Event>, Self::Error> {
        Ok(self.queue.pop_front())
    }
}

/// Captured presentation outputs for host consumption.
#[derive(Debug, Default, Clone)]
pub struct WebOutputs {
    /// Log lines written by the runtime.
    pub logs: Vec<String>,
    /// Last fully-rendered surface presented.
    pub last_surface: Option<Surface>,
    /// Elements changed by the last present, in id order.
    pub last_patches: Vec<ElementId>,
    /// Total presents so far.
    pub frames_presented: u64,
}

/// Presenter that captures surfaces and logs for the host.
#[derive(Debug, Default, Clone)]
pub struct WebPresenter {
    outputs: WebOutputs,
}

impl WebPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get captured outputs.
    #[must_use]
    pub const fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Take captured outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }
}

impl BackendPresenter for WebPresenter {
    type Error = WebBackendError;

    fn write_log(&mut self, text: &str) -> Result<(), Self::Error> {
        self.outputs.logs.push(text.to_owned());
        Ok(())
    }

    fn present(&mut self, surface: &Surface, diff: &SurfaceDiff) -> Result<(), Self::Error> {
        self.outputs.last_surface = Some(surface.clone());
        self.outputs.last_patches = diff.changes().to_vec();
        self.outputs.frames_presented += 1;
        Ok(())
    }
}
