#![forbid(unsafe_code)]

//! Elm-style model contract for host-driven overlays.
//!
//! The runtime separates state (Model) from presentation (View) and routes
//! every side effect through a command value. Transition functions mutate
//! the model and return a [`Cmd`]; they never arm a real timer or touch a
//! DOM node, which keeps them testable without a host.
//!
//! # Example
//!
//! ```ignore
//! use hguard_core::event::Event;
//! use hguard_runtime::program::{Cmd, Model};
//! use hguard_runtime::surface::Surface;
//! use hguard_runtime::timer::TimerKind;
//! use std::time::Duration;
//!
//! const BLINK: TimerKind = TimerKind::new("blink");
//!
//! struct Blinker {
//!     lit: bool,
//! }
//!
//! enum Msg {
//!     Start,
//!     Off,
//!     Ignore,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(_: Event) -> Self {
//!         Msg::Ignore
//!     }
//! }
//!
//! impl Model for Blinker {
//!     type Message = Msg;
//!     type Effect = ();
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Start => {
//!                 self.lit = true;
//!                 Cmd::schedule(BLINK, Duration::from_millis(500), Msg::Off)
//!             }
//!             Msg::Off => {
//!                 self.lit = false;
//!                 Cmd::none()
//!             }
//!             Msg::Ignore => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self, surface: &mut Surface) {
//!         surface.update("lamp", |el| el.toggle_class("is-lit", self.lit));
//!     }
//! }
//! ```

use std::time::Duration;

use hguard_core::event::Event;

use crate::surface::Surface;
use crate::timer::TimerKind;

/// The Model trait defines application state and behavior.
///
/// Implementations define how the application responds to messages and
/// renders its current state onto a [`Surface`].
pub trait Model {
    /// The message type for this model.
    ///
    /// Messages represent actions that update the model state.
    /// Must be convertible from host input events.
    type Message: From<Event>;

    /// Host-executed side effects this model may request.
    type Effect;

    /// Initialize the model with startup commands.
    ///
    /// Called once when the program starts.
    fn init(&mut self) -> Cmd<Self::Message, Self::Effect> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns commands
    /// for any side effects that should be executed.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message, Self::Effect>;

    /// Render the current state onto the presentation surface.
    ///
    /// Called after updates, before control returns to the host.
    fn view(&self, surface: &mut Surface);
}

/// Commands represent side effects to be executed by the runtime.
///
/// Commands are returned from `init()` and `update()`. Leaves run in the
/// order they appear, depth first, so a `Sequence` of cancel-then-schedule
/// never lets a stale timer survive into the new phase.
#[derive(Debug)]
pub enum Cmd<M, E = ()> {
    /// No operation.
    None,
    /// Execute independent commands.
    Batch(Vec<Cmd<M, E>>),
    /// Execute commands strictly in order.
    Sequence(Vec<Cmd<M, E>>),
    /// Send a message to the model.
    Msg(M),
    /// Arm a timer of `kind`, replacing any live timer of the same kind.
    Schedule {
        kind: TimerKind,
        delay: Duration,
        msg: M,
    },
    /// Cancel the live timer of `kind`, if any.
    Cancel(TimerKind),
    /// Cancel every live timer.
    CancelAll,
    /// Deliver a message on the next animation frame (coalesced).
    NextFrame(M),
    /// Ask the host to perform a side effect.
    Effect(E),
    /// Write a log line to the host's log output.
    Log(String),
}

impl<M, E> Cmd<M, E> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a host effect command.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self::Effect(effect)
    }

    /// Arm a timer of `kind` that delivers `msg` after `delay`.
    #[inline]
    pub fn schedule(kind: TimerKind, delay: Duration, msg: M) -> Self {
        Self::Schedule { kind, delay, msg }
    }

    /// Cancel the live timer of `kind`.
    #[inline]
    pub fn cancel(kind: TimerKind) -> Self {
        Self::Cancel(kind)
    }

    /// Cancel every live timer.
    #[inline]
    pub fn cancel_all() -> Self {
        Self::CancelAll
    }

    /// Deliver `msg` on the next animation frame.
    #[inline]
    pub fn next_frame(msg: M) -> Self {
        Self::NextFrame(msg)
    }

    /// Create a batch of independent commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Batch)
    }

    /// Create a sequence of ordered commands.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Sequence)
    }

    fn collapse(mut cmds: Vec<Self>, wrap: fn(Vec<Self>) -> Self) -> Self {
        cmds.retain(|c| !c.is_none());
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => wrap(cmds),
        }
    }

    /// Whether this is the no-op command.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Flatten into leaf commands in execution order.
    ///
    /// `Batch` and `Sequence` are expanded depth first; `None` is dropped.
    pub fn into_leaves(self) -> Vec<Self> {
        let mut out = Vec::new();
        self.push_leaves(&mut out);
        out
    }

    fn push_leaves(self, out: &mut Vec<Self>) {
        match self {
            Self::None => {}
            Self::Batch(cmds) | Self::Sequence(cmds) => {
                for c in cmds {
                    c.push_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }

    /// Short name of the command variant, for tracing fields.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Batch(_) => "batch",
            Self::Sequence(_) => "sequence",
            Self::Msg(_) => "msg",
            Self::Schedule { .. } => "schedule",
            Self::Cancel(_) => "cancel",
            Self::CancelAll => "cancel_all",
            Self::NextFrame(_) => "next_frame",
            Self::Effect(_) => "effect",
            Self::Log(_) => "log",
        }
    }
}

impl<M, E> Default for Cmd<M, E> {
    fn default() -> Self {
        Self::None
    }
}
