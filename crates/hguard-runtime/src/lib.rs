#![forbid(unsafe_code)]

//! HealthGuard Runtime
//!
//! This crate provides the runtime contract that overlay models are written
//! against and the host-independent pieces a backend needs to execute it.
//!
//! # Key Components
//!
//! - [`Model`] - Trait for application state, transitions, and view
//! - [`Cmd`] - Commands for side effects (timers, frames, host effects)
//! - [`TimerCoordinator`] - Per-kind exclusive deferred actions
//! - [`FrameCoalescer`] - Collapses bursts of reposition requests into one per frame
//! - [`Surface`] - Retained presentation attributes with guarded updates
//!
//! # Role in HealthGuard
//! `hguard-runtime` is the orchestrator contract. Models never touch real
//! timers, animation frames, or DOM nodes; they return commands, and a host
//! backend (`hguard-web`) executes them against a deterministic clock.

pub mod frame;
pub mod program;
pub mod surface;
pub mod timer;

pub use frame::{FrameCoalescer, FrameScheduler, ManualFrameScheduler};
pub use program::{Cmd, Model};
pub use surface::{Element, ElementId, Surface, SurfaceDiff};
pub use timer::{FiredTimer, TimerCoordinator, TimerHandle, TimerKind};
