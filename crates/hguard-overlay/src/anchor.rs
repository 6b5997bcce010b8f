#![forbid(unsafe_code)]

//! Bubble anchor engine.
//!
//! Places the callout bubble above its anchor target and clamps it inside
//! the viewport:
//!
//! ```text
//! left = clamp(target.left - viewport.left - offset_x,
//!              margin_left, viewport.width - bubble.width - margin_right)
//! top  = clamp(target.top - viewport.top - bubble.height - gap_y,
//!              margin_top, viewport.height - bubble.height - margin_bottom)
//! ```
//!
//! When the upper bound falls below the lower bound (bubble larger than the
//! viewport) the lower bound wins. Geometry that is not laid out yet (empty
//! target) or not finite degrades to `{ margin_left, margin_top }`.
//!
//! The bubble's size is only known after it is laid out with content, so
//! callers reveal it at the origin, measure, then apply the computed
//! position. The provisional placement is never final output.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use hguard_core::geometry::{Rect, Size, clamp_lower_wins};

/// Offsets and margins for bubble placement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct AnchorConfig {
    /// Shift left of the target's left edge.
    pub offset_x: f64,
    /// Gap between the bubble's bottom edge and the target's top edge.
    pub gap_y: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            offset_x: 14.0,
            gap_y: 18.0,
            margin_left: 14.0,
            margin_right: 14.0,
            margin_top: 10.0,
            margin_bottom: 18.0,
        }
    }
}

/// Measured geometry for one placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorGeometry {
    /// On-screen rect of the anchor target.
    pub target: Rect,
    /// On-screen rect of the bounding viewport.
    pub viewport: Rect,
    /// Laid-out size of the bubble.
    pub bubble: Size,
}

impl AnchorGeometry {
    #[must_use]
    pub const fn new(target: Rect, viewport: Rect, bubble: Size) -> Self {
        Self {
            target,
            viewport,
            bubble,
        }
    }

    /// Whether the engine can place against this geometry.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.target.is_empty()
            && self.target.is_finite()
            && self.viewport.is_finite()
            && self.bubble.width.is_finite()
            && self.bubble.height.is_finite()
    }
}

/// Viewport-local bubble offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BubblePosition {
    pub left: f64,
    pub top: f64,
}

impl BubblePosition {
    #[must_use]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Computes clamped bubble positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BubbleAnchorEngine {
    config: AnchorConfig,
}

impl BubbleAnchorEngine {
    #[must_use]
    pub const fn new(config: AnchorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Position used when geometry is unusable.
    #[must_use]
    pub const fn fallback(&self) -> BubblePosition {
        BubblePosition::new(self.config.margin_left, self.config.margin_top)
    }

    /// Allowed `(min, max)` ranges for `left` and `top`.
    ///
    /// `max` is never below `min`.
    #[must_use]
    pub fn bounds(&self, viewport: &Rect, bubble: Size) -> ((f64, f64), (f64, f64)) {
        let c = &self.config;
        let max_left = viewport.width - bubble.width - c.margin_right;
        let max_top = viewport.height - bubble.height - c.margin_bottom;
        (
            (c.margin_left, max_left.max(c.margin_left)),
            (c.margin_top, max_top.max(c.margin_top)),
        )
    }

    /// Compute the bubble position for `geometry`.
    #[must_use]
    pub fn compute(&self, geometry: &AnchorGeometry) -> BubblePosition {
        if !geometry.is_usable() {
            tracing::debug!(
                target: "hguard.overlay",
                ?geometry,
                "anchor geometry unusable, using fallback position"
            );
            return self.fallback();
        }
        compute_position(
            &geometry.target,
            &geometry.viewport,
            geometry.bubble,
            &self.config,
        )
    }
}

/// Raw placement followed by the lower-bound-wins clamp.
///
/// Does not check geometry; see [`BubbleAnchorEngine::compute`].
#[must_use]
pub fn compute_position(
    target: &Rect,
    viewport: &Rect,
    bubble: Size,
    config: &AnchorConfig,
) -> BubblePosition {
    let raw_left = target.left() - viewport.left() - config.offset_x;
    let raw_top = target.top() - viewport.top() - bubble.height - config.gap_y;
    let left = clamp_lower_wins(
        raw_left,
        config.margin_left,
        viewport.width - bubble.width - config.margin_right,
    );
    let top = clamp_lower_wins(
        raw_top,
        config.margin_top,
        viewport.height - bubble.height - config.margin_bottom,
    );
    BubblePosition::new(left, top)
}
