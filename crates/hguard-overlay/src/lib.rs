#![forbid(unsafe_code)]

//! HealthGuard fact-check overlay.
//!
//! The user triggers a scan, the panel shows a loading state, and after a
//! fixed delay the result card appears together with a callout bubble
//! anchored to the highlighted claim in the content region.
//!
//! # Components
//!
//! - [`OverlayModel`] - the scan/panel state machine (a runtime [`Model`])
//! - [`BubbleAnchorEngine`] - clamped bubble placement relative to a target
//! - [`ScrollForwarder`] - routes background wheel input to the content region
//! - [`ResultSource`] - collaborator supplying claim/verdict/source data
//! - [`OverlayConfig`] - every delay, offset and key in one place
//!
//! The model never arms real timers or touches the DOM. It returns
//! [`Cmd`](hguard_runtime::Cmd) values and writes presentation attributes in
//! `view()`; `hguard-web` executes the rest.
//!
//! [`Model`]: hguard_runtime::Model

pub mod anchor;
pub mod config;
pub mod model;
pub mod result;
pub mod scroll;
pub mod state;
pub mod view;

pub use anchor::{AnchorConfig, AnchorGeometry, BubbleAnchorEngine, BubblePosition};
pub use config::{ConfigError, OverlayConfig};
pub use model::{
    BubbleView, CURSOR_HINT_TIMER, Effect, Msg, OverlayModel, SCAN_TIMER, STARTUP_TIMER,
};
pub use result::{AiVerdict, FixtureSource, ResultSource, ScanResult, Source, Tone, Verdict};
pub use scroll::{HitRegions, ScrollForwarder, WheelRoute};
pub use state::{OverlayState, PanelState, Phase};
