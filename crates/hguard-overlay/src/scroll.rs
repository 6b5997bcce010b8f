#![forbid(unsafe_code)]

//! Background wheel forwarding.
//!
//! The background viewport behaves as a pass-through for scroll intent:
//! wheel input over it scrolls the content region instead, while input over
//! the panel or the content region itself keeps its native behavior.

use hguard_core::event::WheelEvent;
use hguard_core::geometry::Rect;

/// On-screen regions the forwarder hit-tests against.
///
/// A region that is not present in the deployment is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitRegions {
    pub panel: Option<Rect>,
    pub content: Option<Rect>,
}

impl HitRegions {
    #[must_use]
    pub const fn new(panel: Option<Rect>, content: Option<Rect>) -> Self {
        Self { panel, content }
    }
}

/// Where a wheel event goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelRoute {
    /// Leave the event alone.
    Native,
    /// Scroll the content region by these deltas and suppress the default.
    Forward { delta_x: f64, delta_y: f64 },
}

impl WheelRoute {
    /// Whether the event's default action must be suppressed.
    #[must_use]
    pub const fn prevents_default(&self) -> bool {
        matches!(self, Self::Forward { .. })
    }
}

/// Stateless wheel router.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollForwarder;

impl ScrollForwarder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Route `event` given the current regions.
    ///
    /// Without a content region there is nothing to forward to, so every
    /// event stays native.
    #[must_use]
    pub fn route(&self, event: &WheelEvent, regions: &HitRegions) -> WheelRoute {
        let Some(content) = regions.content else {
            return WheelRoute::Native;
        };
        let inside_panel = regions.panel.is_some_and(|p| p.contains(event.origin));
        if inside_panel || content.contains(event.origin) {
            return WheelRoute::Native;
        }
        tracing::trace!(
            target: "hguard.overlay",
            dx = event.delta_x,
            dy = event.delta_y,
            "wheel forwarded to content"
        );
        WheelRoute::Forward {
            delta_x: event.delta_x,
            delta_y: event.delta_y,
        }
    }
}
