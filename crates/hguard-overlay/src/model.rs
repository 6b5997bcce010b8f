#![forbid(unsafe_code)]

//! Scan/panel state machine.
//!
//! ```text
//!            toggle / scan                 scan timer
//!  Closed ─────────────────▶ Scanning ─────────────────▶ Result
//!    ▲                        │  ▲                          │
//!    │      toggle / close    │  └──── scan / replay ───────┤
//!    └────────────────────────┴─────────────────────────────┘
//! ```
//!
//! Every transition that leaves a phase emits `CancelAll` ahead of any new
//! `Schedule`, so a timer armed for an earlier phase can never fire into a
//! later one. Timer and frame messages that arrive after their phase ended
//! anyway are logged and ignored.

use std::fmt;

use hguard_core::event::{Control, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
use hguard_runtime::program::{Cmd, Model};
use hguard_runtime::surface::Surface;
use hguard_runtime::timer::TimerKind;

use crate::anchor::{AnchorGeometry, BubbleAnchorEngine, BubblePosition};
use crate::config::OverlayConfig;
use crate::result::{FixtureSource, ResultSource, ScanResult};
use crate::state::{OverlayState, PanelState, Phase};
use crate::view;

/// Delay between scan start and result reveal.
pub const SCAN_TIMER: TimerKind = TimerKind::new("scan");
/// Lifetime of the cursor hint after a reveal.
pub const CURSOR_HINT_TIMER: TimerKind = TimerKind::new("cursor-hint");
/// One-shot demonstration scan after startup.
pub const STARTUP_TIMER: TimerKind = TimerKind::new("startup");

/// Overlay messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Primary activation control.
    Toggle,
    /// Close control or cancel key.
    Close,
    /// Replay control or scan shortcut.
    Scan,
    /// Startup timer.
    AutoScan,
    /// Scan timer.
    ScanElapsed,
    /// Cursor-hint timer.
    CursorHintElapsed,
    /// Host measured the bubble and its anchor.
    AnchorMeasured(AnchorGeometry),
    ContentScrolled,
    Resized { width: f64, height: f64 },
    /// Coalesced frame callback.
    Reposition,
    /// Global key, resolved against the configured shortcuts.
    Key(KeyEvent),
    Ignore,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Click(control) => control_msg(control),
            Event::ControlKey { control, key } if key.is_activation() => control_msg(control),
            Event::ControlKey { key, .. } | Event::Key(key) => Self::Key(key),
            Event::Resize { width, height } => Self::Resized { width, height },
            Event::ContentScroll { .. } => Self::ContentScrolled,
            // Routed by the host before dispatch.
            Event::Wheel(_) => Self::Ignore,
        }
    }
}

fn control_msg(control: Control) -> Msg {
    match control {
        Control::Activate => Msg::Toggle,
        Control::Close => Msg::Close,
        Control::Replay => Msg::Scan,
    }
}

/// Host-executed side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Scroll the content region to an absolute vertical offset.
    ScrollContentTo { top: f64, smooth: bool },
    /// Lay out the bubble at its provisional origin, then report
    /// [`Msg::AnchorMeasured`].
    MeasureAnchor,
}

/// Bubble presentation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BubbleView {
    #[default]
    Hidden,
    /// Revealed at the origin awaiting measurement.
    Provisional,
    Placed(BubblePosition),
}

impl BubbleView {
    /// Whether the bubble is meant to be on screen.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Final position, if measured.
    #[must_use]
    pub const fn position(&self) -> Option<BubblePosition> {
        match self {
            Self::Placed(pos) => Some(*pos),
            _ => None,
        }
    }
}

type OverlayCmd = Cmd<Msg, Effect>;

/// The fact-check overlay controller.
///
/// Owns all overlay state. Nothing is shared between instances.
pub struct OverlayModel {
    config: OverlayConfig,
    engine: BubbleAnchorEngine,
    source: Box<dyn ResultSource>,
    panel: PanelState,
    result: Option<ScanResult>,
    result_shown: bool,
    bubble: BubbleView,
    highlighted: bool,
    cursor_hint: bool,
    scale: f64,
    session: u64,
    started: bool,
}

impl fmt::Debug for OverlayModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayModel")
            .field("state", &self.state())
            .field("session", &self.session)
            .field("bubble", &self.bubble)
            .field("highlighted", &self.highlighted)
            .field("cursor_hint", &self.cursor_hint)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl Default for OverlayModel {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl OverlayModel {
    /// Overlay serving the bundled fixture.
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self::with_source(config, FixtureSource::default())
    }

    /// Overlay fetching results from `source`.
    pub fn with_source(config: OverlayConfig, source: impl ResultSource + 'static) -> Self {
        Self {
            engine: BubbleAnchorEngine::new(config.anchor),
            config,
            source: Box::new(source),
            panel: PanelState::closed(),
            result: None,
            result_shown: false,
            bubble: BubbleView::Hidden,
            highlighted: false,
            cursor_hint: false,
            scale: 1.0,
            session: 0,
            started: false,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &OverlayConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> OverlayState {
        self.panel.overlay_state()
    }

    #[must_use]
    pub const fn panel(&self) -> PanelState {
        self.panel
    }

    /// Last fetched result. Kept after close; shown only in `Result`.
    #[must_use]
    pub fn result(&self) -> Option<&ScanResult> {
        self.result.as_ref()
    }

    /// Whether the result block (rather than the scanning block) is shown.
    #[must_use]
    pub const fn result_shown(&self) -> bool {
        self.result_shown
    }

    #[must_use]
    pub const fn bubble(&self) -> BubbleView {
        self.bubble
    }

    #[must_use]
    pub const fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    #[must_use]
    pub const fn cursor_hint_visible(&self) -> bool {
        self.cursor_hint
    }

    /// Current root display scale.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of scans started so far.
    #[must_use]
    pub const fn session(&self) -> u64 {
        self.session
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    fn start_scan(&mut self, reason: &'static str) -> OverlayCmd {
        let from = self.state();
        self.session += 1;
        self.panel.begin_scan();
        self.result_shown = false;
        self.bubble = BubbleView::Hidden;
        self.highlighted = false;
        self.cursor_hint = false;
        tracing::debug!(
            target: "hguard.overlay",
            from = from.as_str(),
            to = self.state().as_str(),
            session = self.session,
            reason,
            "scan started"
        );
        Cmd::sequence(vec![
            Cmd::cancel_all(),
            Cmd::effect(Effect::ScrollContentTo {
                top: self.config.scroll_target_top,
                smooth: self.config.smooth_scroll,
            }),
            Cmd::schedule(SCAN_TIMER, self.config.scan_delay(), Msg::ScanElapsed),
        ])
    }

    fn reveal_result(&mut self) -> OverlayCmd {
        if self.panel.phase() != Phase::Scanning {
            tracing::debug!(
                target: "hguard.overlay",
                state = self.state().as_str(),
                "stale scan timer ignored"
            );
            return Cmd::none();
        }
        self.result = Some(self.source.fetch_result().normalized());
        self.panel.reveal_result();
        self.result_shown = true;
        self.highlighted = true;
        self.bubble = BubbleView::Provisional;
        self.cursor_hint = true;
        tracing::debug!(
            target: "hguard.overlay",
            from = OverlayState::Scanning.as_str(),
            to = self.state().as_str(),
            session = self.session,
            "result revealed"
        );
        Cmd::sequence(vec![
            Cmd::effect(Effect::MeasureAnchor),
            Cmd::schedule(
                CURSOR_HINT_TIMER,
                self.config.cursor_hint_duration(),
                Msg::CursorHintElapsed,
            ),
        ])
    }

    fn close(&mut self) -> OverlayCmd {
        let from = self.state();
        if from == OverlayState::Closed {
            // Not a transition: the startup scan stays armed.
            tracing::trace!(target: "hguard.overlay", "close while closed");
            return Cmd::none();
        }
        self.panel.close();
        self.result_shown = false;
        self.bubble = BubbleView::Hidden;
        self.highlighted = false;
        self.cursor_hint = false;
        tracing::debug!(
            target: "hguard.overlay",
            from = from.as_str(),
            to = self.state().as_str(),
            session = self.session,
            "panel closed"
        );
        Cmd::cancel_all()
    }

    fn place_bubble(&mut self, geometry: &AnchorGeometry) -> OverlayCmd {
        if !self.bubble.is_visible() {
            tracing::debug!(target: "hguard.overlay", "stale anchor measurement ignored");
            return Cmd::none();
        }
        let pos = self.engine.compute(geometry);
        tracing::trace!(
            target: "hguard.overlay",
            left = pos.left,
            top = pos.top,
            "bubble placed"
        );
        self.bubble = BubbleView::Placed(pos);
        Cmd::none()
    }

    fn request_reposition(&self) -> OverlayCmd {
        if self.bubble.is_visible() {
            Cmd::next_frame(Msg::Reposition)
        } else {
            Cmd::none()
        }
    }

    fn reposition(&mut self) -> OverlayCmd {
        if !self.bubble.is_visible() {
            tracing::debug!(target: "hguard.overlay", "stale reposition ignored");
            return Cmd::none();
        }
        self.bubble = BubbleView::Provisional;
        Cmd::effect(Effect::MeasureAnchor)
    }

    fn key(&mut self, key: KeyEvent) -> OverlayCmd {
        if key.kind == KeyEventKind::Release {
            return Cmd::none();
        }
        if key.code == KeyCode::Escape {
            return self.close();
        }
        let chorded = key
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER);
        if !chorded && key.is_char_ignore_case(self.config.scan_key) {
            return self.start_scan("shortcut");
        }
        Cmd::none()
    }
}

impl Model for OverlayModel {
    type Message = Msg;
    type Effect = Effect;

    fn init(&mut self) -> OverlayCmd {
        if self.started {
            tracing::debug!(target: "hguard.overlay", "init repeated, ignored");
            return Cmd::none();
        }
        self.started = true;
        tracing::info!(
            target: "hguard.overlay",
            startup_delay_ms = self.config.startup_delay_ms,
            "overlay started"
        );
        Cmd::schedule(STARTUP_TIMER, self.config.startup_delay(), Msg::AutoScan)
    }

    fn update(&mut self, msg: Msg) -> OverlayCmd {
        match msg {
            Msg::Toggle => {
                if self.panel.is_open() {
                    self.close()
                } else {
                    self.start_scan("toggle")
                }
            }
            Msg::Close => self.close(),
            Msg::Scan => self.start_scan("replay"),
            Msg::AutoScan => self.start_scan("startup"),
            Msg::ScanElapsed => self.reveal_result(),
            Msg::CursorHintElapsed => {
                self.cursor_hint = false;
                Cmd::none()
            }
            Msg::AnchorMeasured(geometry) => self.place_bubble(&geometry),
            Msg::ContentScrolled => self.request_reposition(),
            Msg::Resized { width, height } => {
                self.scale = self.config.scale.scale(width, height);
                self.request_reposition()
            }
            Msg::Reposition => self.reposition(),
            Msg::Key(key) => self.key(key),
            Msg::Ignore => Cmd::none(),
        }
    }

    fn view(&self, surface: &mut Surface) {
        view::render(self, surface);
    }
}
