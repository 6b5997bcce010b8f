#![forbid(unsafe_code)]

//! Deferred actions with per-kind mutual exclusion.
//!
//! A [`TimerCoordinator`] holds at most one live timer per [`TimerKind`].
//! Arming a kind that is already live cancels the old timer first, so a
//! stale callback can never fire into a later phase. Kinds are independent:
//! arming `"scan"` leaves a live `"cursor-hint"` untouched.
//!
//! The coordinator owns no clock. Hosts pass the current monotonic time to
//! [`TimerCoordinator::schedule`] and [`TimerCoordinator::pop_due`], which
//! keeps firing order deterministic under a host-driven clock.
//!
//! # Firing
//!
//! [`TimerCoordinator::pop_due`] removes the timer before returning its
//! message. By the time the caller dispatches the message, the kind is no
//! longer live, so the action may re-arm the same kind without cancelling
//! itself.

use std::fmt;
use std::time::Duration;

/// Named timer slot.
///
/// Kinds compare by name; declare them as constants next to the model that
/// owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerKind(&'static str);

impl TimerKind {
    /// Create a timer kind with a stable name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The kind's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Opaque identifier for one armed timer.
///
/// Handles are never reused within a coordinator, so a handle observed
/// before a cancel can be told apart from the one armed after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Raw id, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct PendingTimer<M> {
    handle: TimerHandle,
    kind: TimerKind,
    deadline: Duration,
    msg: M,
}

/// A timer removed from the coordinator because its deadline passed.
#[derive(Debug)]
pub struct FiredTimer<M> {
    pub kind: TimerKind,
    pub handle: TimerHandle,
    /// Monotonic time the timer was due.
    pub deadline: Duration,
    pub msg: M,
}

/// Owns every pending deferred action for one program.
#[derive(Debug)]
pub struct TimerCoordinator<M> {
    pending: Vec<PendingTimer<M>>,
    next_id: u64,
    fired_total: u64,
    cancelled_total: u64,
}

impl<M> Default for TimerCoordinator<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TimerCoordinator<M> {
    /// Create an empty coordinator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
            fired_total: 0,
            cancelled_total: 0,
        }
    }

    /// Arm `kind` to deliver `msg` at `now + delay`.
    ///
    /// Any live timer of the same kind is cancelled first.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration, now: Duration, msg: M) -> TimerHandle {
        self.cancel(kind);
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let deadline = now.saturating_add(delay);
        tracing::trace!(
            target: "hguard.timer",
            kind = kind.name(),
            handle = handle.id(),
            delay_ms = delay.as_millis() as u64,
            "timer armed"
        );
        self.pending.push(PendingTimer {
            handle,
            kind,
            deadline,
            msg,
        });
        handle
    }

    /// Cancel the live timer of `kind`. Returns `true` if one was live.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let Some(index) = self.pending.iter().position(|t| t.kind == kind) else {
            return false;
        };
        let timer = self.pending.swap_remove(index);
        self.cancelled_total += 1;
        tracing::trace!(
            target: "hguard.timer",
            kind = kind.name(),
            handle = timer.handle.id(),
            "timer cancelled"
        );
        true
    }

    /// Cancel every live timer. Safe to call with nothing pending.
    ///
    /// Returns how many timers were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        if count > 0 {
            tracing::trace!(target: "hguard.timer", count, "all timers cancelled");
        }
        self.pending.clear();
        self.cancelled_total += count as u64;
        count
    }

    /// Whether a timer of `kind` is live.
    #[must_use]
    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    /// Handle of the live timer of `kind`.
    #[must_use]
    pub fn handle(&self, kind: TimerKind) -> Option<TimerHandle> {
        self.pending.iter().find(|t| t.kind == kind).map(|t| t.handle)
    }

    /// Deadline of the live timer of `kind`.
    #[must_use]
    pub fn deadline(&self, kind: TimerKind) -> Option<Duration> {
        self.pending.iter().find(|t| t.kind == kind).map(|t| t.deadline)
    }

    /// Number of live timers across all kinds.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest deadline among live timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`.
    ///
    /// Ties on deadline fire in arming order.
    pub fn pop_due(&mut self, now: Duration) -> Option<FiredTimer<M>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.handle))
            .map(|(i, _)| i)?;
        let timer = self.pending.swap_remove(index);
        self.fired_total += 1;
        tracing::debug!(
            target: "hguard.timer",
            kind = timer.kind.name(),
            handle = timer.handle.id(),
            "timer fired"
        );
        Some(FiredTimer {
            kind: timer.kind,
            handle: timer.handle,
            deadline: timer.deadline,
            msg: timer.msg,
        })
    }

    /// Total timers fired since creation.
    #[must_use]
    pub const fn fired_total(&self) -> u64 {
        self.fired_total
    }

    /// Total timers cancelled (explicitly or by re-arming) since creation.
    #[must_use]
    pub const fn cancelled_total(&self) -> u64 {
        self.cancelled_total
    }
}
