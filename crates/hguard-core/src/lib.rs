#![forbid(unsafe_code)]

//! Core: input events, pixel geometry, and display scaling.
//!
//! # Role in HealthGuard
//! `hguard-core` is the input layer. It owns the normalized event types the
//! host pushes into the runtime (keys, wheel input, control activation,
//! resize and content-scroll notifications) and the pixel geometry shared by
//! the bubble anchor engine and the scroll forwarder.
//!
//! # How it fits in the system
//! The runtime (`hguard-runtime`) consumes `hguard-core::Event` values and
//! drives application models. Nothing here holds state across events, so the
//! crate is safe to use from any host (native test harness or WASM).

pub mod event;
pub mod geometry;
pub mod logging;
pub mod scale;

pub use event::{Control, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, WheelEvent};
pub use geometry::{Point, Rect, Size};
pub use scale::{ScaleConfig, scale_for_window};
