#![forbid(unsafe_code)]

//! Panel openness and scan phase.

use std::fmt;

/// Phase within the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Scanning,
    Result,
}

/// Flattened observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayState {
    Closed,
    Scanning,
    Result,
}

impl OverlayState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Scanning => "open.scanning",
            Self::Result => "open.result",
        }
    }
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{ open, phase }` with the invariant that a closed panel is idle.
///
/// Only the overlay model mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelState {
    open: bool,
    phase: Phase,
}

impl PanelState {
    /// Closed and idle.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            open: false,
            phase: Phase::Idle,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn overlay_state(&self) -> OverlayState {
        match (self.open, self.phase) {
            (true, Phase::Scanning) => OverlayState::Scanning,
            (true, Phase::Result) => OverlayState::Result,
            _ => OverlayState::Closed,
        }
    }

    pub(crate) fn begin_scan(&mut self) {
        self.open = true;
        self.phase = Phase::Scanning;
    }

    pub(crate) fn reveal_result(&mut self) {
        debug_assert!(self.open, "result revealed on a closed panel");
        self.phase = Phase::Result;
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed_and_idle() {
        let s = PanelState::default();
        assert!(!s.is_open());
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.overlay_state(), OverlayState::Closed);
    }

    #[test]
    fn close_forces_idle() {
        let mut s = PanelState::closed();
        s.begin_scan();
        s.reveal_result();
        assert_eq!(s.overlay_state(), OverlayState::Result);
        s.close();
        assert_eq!(s.phase(), Phase::Idle);
        s.begin_scan();
        assert_eq!(s.overlay_state(), OverlayState::Scanning);
    }

    #[test]
    fn display_names() {
        assert_eq!(OverlayState::Scanning.to_string(), "open.scanning");
        assert_eq!(OverlayState::Closed.as_str(), "closed");
    }
}
