#![forbid(unsafe_code)]

//! HealthGuard public facade crate.
//!
//! Re-exports the types an embedder needs to run the fact-check overlay on a
//! host-driven backend, plus the unified [`Error`] and a prelude.
//!
//! ```
//! use hguard::prelude::*;
//!
//! let mut program = hguard::headless_program(OverlayConfig::default());
//! program.init()?;
//! program.push_event(Event::Click(Control::Activate));
//! program.step()?;
//! assert_eq!(program.model().state(), OverlayState::Scanning);
//! # Ok::<(), hguard::Error>(())
//! ```

pub mod error;

pub use error::{DegradationAction, Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use hguard_core::event::{Control, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, WheelEvent};
pub use hguard_core::geometry::{Point, Rect, Size};
pub use hguard_core::scale::{ScaleConfig, scale_for_window};

// --- Runtime re-exports ----------------------------------------------------

pub use hguard_runtime::{Cmd, Element, Model, Surface, SurfaceDiff, TimerCoordinator, TimerKind};

// --- Overlay re-exports ----------------------------------------------------

pub use hguard_overlay::{
    AnchorConfig, BubbleAnchorEngine, BubblePosition, ConfigError, FixtureSource, OverlayConfig,
    OverlayModel, OverlayState, ResultSource, ScanResult, ScrollForwarder,
};

// --- Web re-exports --------------------------------------------------------

pub use hguard_web::host::{ContentRegion, Layout, OverlayHost, StaticContent, StaticLayout};
pub use hguard_web::session_record::{SessionRecorder, SessionTrace, replay};
pub use hguard_web::step_program::{StepProgram, StepResult};
pub use hguard_web::WebBackendError;

/// Overlay program over the in-memory host.
pub type HeadlessProgram = StepProgram<OverlayModel, OverlayHost<StaticContent, StaticLayout>>;

/// Content column of the reference page layout, in window pixels.
pub const DEMO_CONTENT_BOUNDS: Rect = Rect::new(40.0, 60.0, 700.0, 560.0);
/// Claim position inside the content column.
pub const DEMO_CLAIM: Rect = Rect::new(80.0, 420.0, 400.0, 48.0);
/// Panel column of the reference page layout.
pub const DEMO_PANEL_BOUNDS: Rect = Rect::new(880.0, 40.0, 360.0, 640.0);

/// A 1280x720 overlay program over a static page with the claim registered
/// as the anchor target.
#[must_use]
pub fn headless_program(config: OverlayConfig) -> HeadlessProgram {
    let content = StaticContent::new(DEMO_CONTENT_BOUNDS, Size::new(DEMO_CONTENT_BOUNDS.width, 2400.0))
        .with_anchor(hguard_overlay::view::ids::CLAIM_TARGET, DEMO_CLAIM);
    let layout = StaticLayout::new(Rect::from_size(1280.0, 720.0), Size::new(300.0, 90.0))
        .with_panel(DEMO_PANEL_BOUNDS);
    StepProgram::new(
        OverlayModel::new(config),
        OverlayHost::new(content, layout),
        hguard_overlay::view::full_surface(),
        1280.0,
        720.0,
    )
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Control, Error, Event, HeadlessProgram, KeyCode, KeyEvent, Model, OverlayConfig,
        OverlayModel, OverlayState, Rect, Result, Size, StepProgram, Surface,
    };

    pub use crate::{core, overlay, runtime, web};
}

pub use hguard_core as core;
pub use hguard_overlay as overlay;
pub use hguard_runtime as runtime;
pub use hguard_web as web;
