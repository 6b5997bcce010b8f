#![forbid(unsafe_code)]

//! Animation-frame coalescing.
//!
//! Scroll and resize notifications arrive in bursts, often many per rendered
//! frame. [`FrameCoalescer`] keeps a single pending-work slot: the first
//! request in a frame asks the [`FrameScheduler`] for a callback, later
//! requests in the same frame are absorbed, and [`FrameCoalescer::on_frame`]
//! hands back the pending work exactly once.
//!
//! # Usage
//!
//! ```
//! use hguard_runtime::frame::{FrameCoalescer, ManualFrameScheduler};
//!
//! let mut frames = ManualFrameScheduler::default();
//! let mut coalescer = FrameCoalescer::new();
//!
//! assert!(coalescer.request("reposition", &mut frames));
//! assert!(!coalescer.request("reposition", &mut frames));
//! assert_eq!(frames.requests(), 1);
//!
//! assert!(frames.take_request());
//! assert_eq!(coalescer.on_frame(), Some("reposition"));
//! assert_eq!(coalescer.on_frame(), None);
//! ```

/// Something that can run a callback on the next rendered frame.
///
/// Browser hosts map this onto `requestAnimationFrame`; tests use
/// [`ManualFrameScheduler`] and fire frames explicitly.
pub trait FrameScheduler {
    /// Request one callback on the next frame.
    fn request_frame(&mut self);
}

/// Frame scheduler driven by hand.
///
/// Requests are recorded; [`Self::take_request`] reports (and clears)
/// whether a frame is owed.
#[derive(Debug, Default, Clone)]
pub struct ManualFrameScheduler {
    requested: bool,
    requests: u64,
}

impl ManualFrameScheduler {
    /// Whether a frame callback is outstanding.
    #[must_use]
    pub const fn is_requested(&self) -> bool {
        self.requested
    }

    /// Consume the outstanding request, if any.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }

    /// Total requests received.
    #[must_use]
    pub const fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) {
        self.requested = true;
        self.requests += 1;
    }
}

/// Single-slot debounce keyed to animation frames.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<M> {
    pending: Option<M>,
    requested_total: u64,
    coalesced_total: u64,
}

impl<M> Default for FrameCoalescer<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> FrameCoalescer<M> {
    /// Create an idle coalescer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            requested_total: 0,
            coalesced_total: 0,
        }
    }

    /// Queue `msg` for the next frame.
    ///
    /// Returns `true` if a frame was requested from `scheduler`, `false` if
    /// work was already pending and this request was absorbed.
    pub fn request(&mut self, msg: M, scheduler: &mut dyn FrameScheduler) -> bool {
        self.requested_total += 1;
        if self.pending.is_some() {
            self.coalesced_total += 1;
            return false;
        }
        self.pending = Some(msg);
        scheduler.request_frame();
        true
    }

    /// Whether work is waiting for a frame.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Frame callback: clear the pending flag and return the work.
    pub fn on_frame(&mut self) -> Option<M> {
        self.pending.take()
    }

    /// Total requests received, including absorbed ones.
    #[must_use]
    pub const fn requested_total(&self) -> u64 {
        self.requested_total
    }

    /// Requests absorbed into an already-pending frame.
    #[must_use]
    pub const fn coalesced_total(&self) -> u64 {
        self.coalesced_total
    }
}
