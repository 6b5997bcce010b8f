#![forbid(unsafe_code)]

//! Step-driven program runner.
//!
//! [`StepProgram`] owns a [`Model`], its host, and every runtime resource
//! the model's commands touch: the timer coordinator, the animation-frame
//! coalescer and the presentation surface. Nothing runs on its own. The
//! host pushes events, advances time and calls [`StepProgram::step`]; the
//! same calls in the same order always produce the same surfaces.
//!
//! # Time
//!
//! [`StepProgram::advance_time`] fires due timers in deadline order. Before
//! each timer's message is dispatched, the clock is set to that timer's
//! deadline, so a timer armed by the handler (scan reveal arming the cursor
//! hint) is measured from the moment its parent fired, not from the end of
//! the advance.

use core::time::Duration;

use hguard_core::event::Event;
use hguard_runtime::frame::{FrameCoalescer, ManualFrameScheduler};
use hguard_runtime::program::{Cmd, Model};
use hguard_runtime::surface::{Surface, SurfaceDiff};
use hguard_runtime::timer::TimerCoordinator;

use crate::host::Host;
use crate::{
    BackendClock, BackendEventSource, BackendPresenter, DeterministicClock, WebBackendError,
    WebEventSource, WebOutputs, WebPresenter,
};

/// Outcome of one [`StepProgram::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Events drained from the queue (dispatched or handled by the host).
    pub events_processed: usize,
    /// Animation frames run (0 or 1).
    pub frames_run: usize,
    /// Whether the surface was re-rendered.
    pub rendered: bool,
    /// Events whose default action the host suppressed.
    pub default_prevented: usize,
}

/// Host-driven runner for a [`Model`].
pub struct StepProgram<M: Model, H> {
    model: M,
    host: H,
    clock: DeterministicClock,
    events: WebEventSource,
    presenter: WebPresenter,
    surface: Surface,
    timers: TimerCoordinator<M::Message>,
    frames: ManualFrameScheduler,
    coalescer: FrameCoalescer<M::Message>,
    initialized: bool,
    dirty: bool,
    frame_idx: u64,
}

impl<M, H> StepProgram<M, H>
where
    M: Model,
    H: Host<M::Effect, M::Message>,
{
    /// Create a program rendering onto `surface` in a `width` x `height`
    /// window. Nothing runs until [`Self::init`].
    pub fn new(model: M, host: H, surface: Surface, width: f64, height: f64) -> Self {
        Self {
            model,
            host,
            clock: DeterministicClock::new(),
            events: WebEventSource::new(width, height),
            presenter: WebPresenter::new(),
            surface,
            timers: TimerCoordinator::new(),
            frames: ManualFrameScheduler::default(),
            coalescer: FrameCoalescer::new(),
            initialized: false,
            dirty: false,
            frame_idx: 0,
        }
    }

    /// Start the program: deliver the initial window size, run the model's
    /// `init` commands and render the first frame.
    ///
    /// Repeated calls are no-ops.
    pub fn init(&mut self) -> Result<(), WebBackendError> {
        if self.initialized {
            tracing::debug!(target: "hguard.surface", "program already initialized");
            return Ok(());
        }
        self.initialized = true;
        let (width, height) = self.events.size()?;
        self.dispatch(Event::Resize { width, height }.into())?;
        let cmd = self.model.init();
        self.execute(cmd)?;
        self.render()
    }

    /// Queue an input event for the next step.
    pub fn push_event(&mut self, event: Event) {
        self.events.push_event(event);
    }

    /// Record a window resize and queue the matching event.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.events.set_size(width, height);
        self.events.push_event(Event::Resize { width, height });
    }

    /// Set the window size without notifying the model (before `init`).
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.events.set_size(width, height);
    }

    /// Advance the clock by `dt`, firing every timer that falls due.
    ///
    /// Timer messages update the model but do not render. The surface
    /// reflects them after the next [`Self::step`], which also records the
    /// frame when running under a [`SessionRecorder`](crate::session_record::SessionRecorder).
    ///
    /// Returns how many timers fired.
    pub fn advance_time(&mut self, dt: Duration) -> Result<usize, WebBackendError> {
        let target = self.clock.now_mono().saturating_add(dt);
        let mut fired = 0;
        while let Some(timer) = self.timers.pop_due(target) {
            self.clock.set(timer.deadline);
            fired += 1;
            self.dispatch(timer.msg)?;
        }
        self.clock.set(target);
        Ok(fired)
    }

    /// Advance the clock to the absolute time `now`. Earlier times are
    /// ignored.
    pub fn advance_to(&mut self, now: Duration) -> Result<usize, WebBackendError> {
        self.advance_time(now.saturating_sub(self.clock.now_mono()))
    }

    /// Process queued events, run at most one animation frame, render.
    pub fn step(&mut self) -> Result<StepResult, WebBackendError> {
        if !self.initialized {
            return Err(WebBackendError::NotInitialized);
        }
        let mut result = StepResult::default();

        // Follow-up events queued while processing wait for the next step.
        let batch: Vec<Event> = self.events.drain_events().collect();
        for event in batch {
            result.events_processed += 1;
            let disposition = self.host.intercept(&event, &mut self.events);
            if disposition.prevent_default {
                result.default_prevented += 1;
            }
            if disposition.dispatch {
                self.dispatch(event.into())?;
            }
        }

        if self.frames.take_request() {
            if let Some(msg) = self.coalescer.on_frame() {
                result.frames_run = 1;
                self.dispatch(msg)?;
            }
        }

        if self.dirty {
            self.render()?;
            result.rendered = true;
        }
        Ok(result)
    }

    fn dispatch(&mut self, msg: M::Message) -> Result<(), WebBackendError> {
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute(cmd)
    }

    fn execute(&mut self, cmd: Cmd<M::Message, M::Effect>) -> Result<(), WebBackendError> {
        for leaf in cmd.into_leaves() {
            match leaf {
                Cmd::None | Cmd::Batch(_) | Cmd::Sequence(_) => {}
                Cmd::Msg(msg) => self.dispatch(msg)?,
                Cmd::Schedule { kind, delay, msg } => {
                    self.timers.schedule(kind, delay, self.clock.now_mono(), msg);
                }
                Cmd::Cancel(kind) => {
                    self.timers.cancel(kind);
                }
                Cmd::CancelAll => {
                    self.timers.cancel_all();
                }
                Cmd::NextFrame(msg) => {
                    self.coalescer.request(msg, &mut self.frames);
                }
                Cmd::Effect(effect) => {
                    if let Some(msg) = self.host.perform(effect, &mut self.events) {
                        self.dispatch(msg)?;
                    }
                }
                Cmd::Log(text) => self.presenter.write_log(&text)?,
            }
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), WebBackendError> {
        let prev = self.surface.clone();
        self.model.view(&mut self.surface);
        let diff = SurfaceDiff::compute(&prev, &self.surface);
        self.presenter.present(&self.surface, &diff)?;
        tracing::trace!(
            target: "hguard.surface",
            frame = self.frame_idx,
            changed = diff.len(),
            "surface presented"
        );
        self.frame_idx += 1;
        self.dirty = false;
        Ok(())
    }

    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current rendered surface.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub const fn outputs(&self) -> &WebOutputs {
        self.presenter.outputs()
    }

    /// Take captured outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> WebOutputs {
        self.presenter.take_outputs()
    }

    #[must_use]
    pub const fn timers(&self) -> &TimerCoordinator<M::Message> {
        &self.timers
    }

    #[must_use]
    pub const fn frames(&self) -> &ManualFrameScheduler {
        &self.frames
    }

    #[must_use]
    pub const fn coalescer(&self) -> &FrameCoalescer<M::Message> {
        &self.coalescer
    }

    /// Current monotonic time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    /// Frames rendered so far.
    #[must_use]
    pub const fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Queued events not yet processed.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.pending()
    }
}
