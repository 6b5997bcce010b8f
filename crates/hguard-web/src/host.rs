#![forbid(unsafe_code)]

//! Host side of a step program: input interception and effect execution.
//!
//! A [`Host`] sees every event before the model does and executes the
//! model's [`Cmd::Effect`](hguard_runtime::program::Cmd::Effect) values.
//! [`OverlayHost`] is the overlay's host: it runs the Scroll Forwarder on
//! wheel input, performs content scrolls and measures the bubble anchor
//! against the [`ContentRegion`] and [`Layout`] collaborators.

use std::collections::BTreeMap;

use hguard_core::event::{Control, Event};
use hguard_core::geometry::{Rect, Size};
use hguard_overlay::anchor::AnchorGeometry;
use hguard_overlay::model::{Effect, Msg};
use hguard_overlay::scroll::{HitRegions, ScrollForwarder, WheelRoute};
use hguard_overlay::view::ids;

use crate::WebEventSource;

/// What happens to an event after interception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disposition {
    /// Deliver the event to the model.
    pub dispatch: bool,
    /// Suppress the event's default browser action.
    pub prevent_default: bool,
}

impl Disposition {
    /// Deliver to the model, keep the default action.
    pub const DISPATCH: Self = Self {
        dispatch: true,
        prevent_default: false,
    };

    /// Fully handled by the host.
    #[must_use]
    pub const fn handled(prevent_default: bool) -> Self {
        Self {
            dispatch: false,
            prevent_default,
        }
    }
}

/// Executes a model's effects and filters its input.
///
/// `E` is the model's effect type and `M` its message type. Follow-up
/// events (such as the scroll notification caused by a programmatic scroll)
/// are queued on `events` and reach the model on the next step.
pub trait Host<E, M> {
    /// Inspect `event` before the model sees it.
    fn intercept(&mut self, event: &Event, events: &mut WebEventSource) -> Disposition {
        let _ = (event, events);
        Disposition::DISPATCH
    }

    /// Perform `effect`, optionally answering with a message.
    fn perform(&mut self, effect: E, events: &mut WebEventSource) -> Option<M>;
}

/// Host for models without effects.
impl<M> Host<(), M> for () {
    fn perform(&mut self, _effect: (), _events: &mut WebEventSource) -> Option<M> {
        None
    }
}

/// Scroll offset of a content region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub top: f64,
    pub left: f64,
}

/// The scrollable content the overlay annotates.
pub trait ContentRegion {
    /// On-screen rect of the scroll container, if present.
    fn bounds(&self) -> Option<Rect>;

    fn scroll_position(&self) -> ScrollPosition;

    fn scroll_to(&mut self, top: f64, smooth: bool);

    fn scroll_by(&mut self, delta_x: f64, delta_y: f64);

    /// On-screen rect of the named anchor target.
    fn anchor_target(&self, name: &str) -> Option<Rect>;
}

/// Layout queries for overlay chrome.
pub trait Layout {
    /// On-screen rect of the panel, if present.
    fn panel_bounds(&self) -> Option<Rect>;

    /// Rect the bubble is clamped into.
    fn viewport_bounds(&self) -> Rect;

    /// Laid-out size of the bubble with its current content.
    fn bubble_size(&self) -> Size;
}

/// In-memory content region.
///
/// Anchor targets are stored in content coordinates and reported on screen
/// relative to the current scroll offset. Scrolls are immediate and clamped
/// to the scrollable extent.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticContent {
    bounds: Option<Rect>,
    scroll_size: Size,
    scroll: ScrollPosition,
    anchors: BTreeMap<String, Rect>,
    scroll_calls: u64,
    last_smooth: Option<bool>,
}

impl StaticContent {
    /// Container at `bounds` whose content is `scroll_size` large.
    #[must_use]
    pub fn new(bounds: Rect, scroll_size: Size) -> Self {
        Self {
            bounds: Some(bounds),
            scroll_size,
            scroll: ScrollPosition::default(),
            anchors: BTreeMap::new(),
            scroll_calls: 0,
            last_smooth: None,
        }
    }

    /// A deployment without a content region.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            bounds: None,
            ..Self::new(Rect::default(), Size::default())
        }
    }

    /// Builder: register an anchor target in content coordinates.
    #[must_use]
    pub fn with_anchor(mut self, name: &str, rect: Rect) -> Self {
        self.anchors.insert(name.to_owned(), rect);
        self
    }

    /// Programmatic scroll calls received.
    #[must_use]
    pub const fn scroll_calls(&self) -> u64 {
        self.scroll_calls
    }

    /// Whether the last `scroll_to` asked for smooth scrolling.
    #[must_use]
    pub const fn last_smooth(&self) -> Option<bool> {
        self.last_smooth
    }

    fn set_scroll(&mut self, top: f64, left: f64) {
        let (max_left, max_top) = match self.bounds {
            Some(b) => (
                (self.scroll_size.width - b.width).max(0.0),
                (self.scroll_size.height - b.height).max(0.0),
            ),
            None => (0.0, 0.0),
        };
        self.scroll = ScrollPosition {
            top: top.clamp(0.0, max_top),
            left: left.clamp(0.0, max_left),
        };
    }
}

impl ContentRegion for StaticContent {
    fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    fn scroll_position(&self) -> ScrollPosition {
        self.scroll
    }

    fn scroll_to(&mut self, top: f64, smooth: bool) {
        self.scroll_calls += 1;
        self.last_smooth = Some(smooth);
        self.set_scroll(top, self.scroll.left);
    }

    fn scroll_by(&mut self, delta_x: f64, delta_y: f64) {
        self.scroll_calls += 1;
        self.set_scroll(self.scroll.top + delta_y, self.scroll.left + delta_x);
    }

    fn anchor_target(&self, name: &str) -> Option<Rect> {
        let bounds = self.bounds?;
        let rect = self.anchors.get(name)?;
        Some(rect.offset(bounds.x - self.scroll.left, bounds.y - self.scroll.top))
    }
}

/// In-memory layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticLayout {
    pub panel: Option<Rect>,
    pub viewport: Rect,
    pub bubble: Size,
}

impl StaticLayout {
    #[must_use]
    pub const fn new(viewport: Rect, bubble: Size) -> Self {
        Self {
            panel: None,
            viewport,
            bubble,
        }
    }

    #[must_use]
    pub const fn with_panel(mut self, panel: Rect) -> Self {
        self.panel = Some(panel);
        self
    }
}

impl Layout for StaticLayout {
    fn panel_bounds(&self) -> Option<Rect> {
        self.panel
    }

    fn viewport_bounds(&self) -> Rect {
        self.viewport
    }

    fn bubble_size(&self) -> Size {
        self.bubble
    }
}

/// Executes overlay effects against the page.
#[derive(Debug, Clone)]
pub struct OverlayHost<C, L> {
    content: C,
    layout: L,
    forwarder: ScrollForwarder,
    anchor: String,
}

impl<C: ContentRegion, L: Layout> OverlayHost<C, L> {
    /// Host anchoring the bubble to the claim target.
    pub fn new(content: C, layout: L) -> Self {
        Self {
            content,
            layout,
            forwarder: ScrollForwarder::new(),
            anchor: ids::CLAIM_TARGET.to_owned(),
        }
    }

    /// Builder: anchor to a different named target.
    #[must_use]
    pub fn with_anchor(mut self, name: &str) -> Self {
        name.clone_into(&mut self.anchor);
        self
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    /// Measure the anchor geometry.
    ///
    /// A missing target measures as an empty rect, which the anchor engine
    /// turns into its fallback position.
    pub fn measure(&self) -> AnchorGeometry {
        let target = self.content.anchor_target(&self.anchor).unwrap_or_else(|| {
            tracing::debug!(target: "hguard.overlay", anchor = %self.anchor, "anchor target absent");
            Rect::default()
        });
        AnchorGeometry::new(
            target,
            self.layout.viewport_bounds(),
            self.layout.bubble_size(),
        )
    }

    /// Run `f` against the content region and queue a scroll notification
    /// if the offset changed.
    fn scroll_with(&mut self, events: &mut WebEventSource, f: impl FnOnce(&mut C)) {
        let before = self.content.scroll_position();
        f(&mut self.content);
        let after = self.content.scroll_position();
        if after != before {
            events.push_event(Event::ContentScroll {
                top: after.top,
                left: after.left,
            });
        }
    }
}

impl<C: ContentRegion, L: Layout> Host<Effect, Msg> for OverlayHost<C, L> {
    fn intercept(&mut self, event: &Event, events: &mut WebEventSource) -> Disposition {
        match event {
            Event::Wheel(wheel) => {
                let regions = HitRegions::new(self.layout.panel_bounds(), self.content.bounds());
                match self.forwarder.route(wheel, &regions) {
                    WheelRoute::Native => Disposition::handled(false),
                    WheelRoute::Forward { delta_x, delta_y } => {
                        self.scroll_with(events, |c| c.scroll_by(delta_x, delta_y));
                        Disposition::handled(true)
                    }
                }
            }
            Event::ControlKey {
                control: Control::Activate,
                key,
            } if key.is_activation() => Disposition {
                dispatch: true,
                prevent_default: true,
            },
            _ => Disposition::DISPATCH,
        }
    }

    fn perform(&mut self, effect: Effect, events: &mut WebEventSource) -> Option<Msg> {
        match effect {
            Effect::ScrollContentTo { top, smooth } => {
                self.scroll_with(events, |c| c.scroll_to(top, smooth));
                None
            }
            Effect::MeasureAnchor => Some(Msg::AnchorMeasured(self.measure())),
        }
    }
}
