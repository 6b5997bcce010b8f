#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! [`SessionRecorder`] wraps a [`StepProgram`] and records every input
//! event, resize, time advance and step together with a checksum of each
//! rendered surface. [`replay`] feeds the same records through a fresh
//! program and compares checksums frame by frame.
//!
//! # Determinism contract
//!
//! Given identical recorded inputs and the same model, replay produces
//! identical surface checksums. This holds because:
//!
//! 1. Time only advances through recorded tick records.
//! 2. Events are replayed from the trace, in the original step batches.
//! 3. Rendering is a pure function of model state.
//!
//! # Example
//!
//! ```ignore
//! let mut recorder = SessionRecorder::new(program(), 1280.0, 720.0);
//! recorder.init()?;
//! recorder.push_event(Event::Click(Control::Activate));
//! recorder.step()?;
//! recorder.advance_time(Duration::from_millis(900))?;
//! recorder.step()?;
//!
//! let trace = recorder.finish();
//! assert!(replay(program(), &trace)?.ok());
//! ```

use core::time::Duration;

use hguard_core::event::Event;
use hguard_runtime::program::Model;

use crate::WebBackendError;
use crate::host::Host;
use crate::step_program::{StepProgram, StepResult};

/// Schema version for session traces.
pub const SCHEMA_VERSION: &str = "hguard-trace-v1";

// FNV-1a constants.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = fnv1a64_bytes(FNV_OFFSET_BASIS, &prev.to_le_bytes());
    fnv1a64_bytes(hash, &next.to_le_bytes())
}

fn nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    /// Session header (must be first).
    Header {
        schema: &'static str,
        width: f64,
        height: f64,
    },
    /// An input event queued at `ts_ns`.
    Input { ts_ns: u64, event: Event },
    /// Window resize.
    Resize { ts_ns: u64, width: f64, height: f64 },
    /// Clock advanced to `ts_ns`.
    Tick { ts_ns: u64 },
    /// One `step` call.
    Step { ts_ns: u64 },
    /// Frame checkpoint with checksum.
    Frame {
        frame_idx: u64,
        ts_ns: u64,
        checksum: u64,
        checksum_chain: u64,
    },
    /// Trace summary (must be last).
    Summary {
        total_frames: u64,
        final_checksum_chain: u64,
    },
}

/// A complete recorded session trace.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    /// Number of frame checkpoints in the trace.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Frame { .. }))
            .count() as u64
    }

    /// Final checksum chain from the summary record.
    #[must_use]
    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }
}

/// Records a session for deterministic replay.
pub struct SessionRecorder<M: Model, H> {
    program: StepProgram<M, H>,
    records: Vec<TraceRecord>,
    checksum_chain: u64,
}

impl<M, H> SessionRecorder<M, H>
where
    M: Model,
    H: Host<M::Effect, M::Message>,
{
    /// Start recording `program`, which must not be initialized yet.
    pub fn new(program: StepProgram<M, H>, width: f64, height: f64) -> Self {
        let mut program = program;
        program.set_size(width, height);
        Self {
            program,
            records: vec![TraceRecord::Header {
                schema: SCHEMA_VERSION,
                width,
                height,
            }],
            checksum_chain: 0,
        }
    }

    /// Initialize the program and record the first frame checkpoint.
    pub fn init(&mut self) -> Result<(), WebBackendError> {
        self.program.init()?;
        self.record_frame();
        Ok(())
    }

    /// Record an input event.
    pub fn push_event(&mut self, event: Event) {
        self.records.push(TraceRecord::Input {
            ts_ns: self.ts_ns(),
            event: event.clone(),
        });
        self.program.push_event(event);
    }

    /// Record a window resize.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.records.push(TraceRecord::Resize {
            ts_ns: self.ts_ns(),
            width,
            height,
        });
        self.program.resize(width, height);
    }

    /// Record a time advance.
    pub fn advance_time(&mut self, dt: Duration) -> Result<usize, WebBackendError> {
        let fired = self.program.advance_time(dt)?;
        self.records.push(TraceRecord::Tick {
            ts_ns: self.ts_ns(),
        });
        Ok(fired)
    }

    /// Process one step and record a frame checkpoint if rendered.
    pub fn step(&mut self) -> Result<StepResult, WebBackendError> {
        self.records.push(TraceRecord::Step {
            ts_ns: self.ts_ns(),
        });
        let result = self.program.step()?;
        if result.rendered {
            self.record_frame();
        }
        Ok(result)
    }

    /// Finish recording and return the completed trace.
    #[must_use]
    pub fn finish(mut self) -> SessionTrace {
        let total_frames = self
            .records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Frame { .. }))
            .count() as u64;
        self.records.push(TraceRecord::Summary {
            total_frames,
            final_checksum_chain: self.checksum_chain,
        });
        SessionTrace {
            records: self.records,
        }
    }

    #[must_use]
    pub const fn program(&self) -> &StepProgram<M, H> {
        &self.program
    }

    fn ts_ns(&self) -> u64 {
        nanos(self.program.now())
    }

    fn record_frame(&mut self) {
        let checksum = self.program.surface().checksum();
        let chain = fnv1a64_pair(self.checksum_chain, checksum);
        self.records.push(TraceRecord::Frame {
            frame_idx: self.program.frame_idx().saturating_sub(1),
            ts_ns: self.ts_ns(),
            checksum,
            checksum_chain: chain,
        });
        self.checksum_chain = chain;
    }
}

/// Result of replaying a session trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Frames checked.
    pub total_frames: u64,
    /// Checksum chain computed during replay.
    pub final_checksum_chain: u64,
    /// First frame whose checksum differed, if any.
    pub first_mismatch: Option<ReplayMismatch>,
}

impl ReplayResult {
    /// Whether the replay produced identical checksums.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// A checksum mismatch found during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    pub frame_idx: u64,
    pub expected: u64,
    pub actual: u64,
}

/// Errors that can occur during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The trace is missing a header record.
    MissingHeader,
    /// The header names a schema this build does not understand.
    UnknownSchema(&'static str),
    /// A backend error occurred during replay.
    Backend(WebBackendError),
}

impl core::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "trace missing header record"),
            Self::UnknownSchema(s) => write!(f, "unknown trace schema: {s}"),
            Self::Backend(e) => write!(f, "backend error: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<WebBackendError> for ReplayError {
    fn from(e: WebBackendError) -> Self {
        Self::Backend(e)
    }
}

/// Replay `trace` through `program`, which must be fresh (not initialized).
///
/// Records are applied in order; each `Frame` record is checked against the
/// checksum of the surface at that point.
pub fn replay<M, H>(
    mut program: StepProgram<M, H>,
    trace: &SessionTrace,
) -> Result<ReplayResult, ReplayError>
where
    M: Model,
    H: Host<M::Effect, M::Message>,
{
    let (schema, width, height) = trace
        .records
        .first()
        .and_then(|r| match r {
            TraceRecord::Header {
                schema,
                width,
                height,
            } => Some((*schema, *width, *height)),
            _ => None,
        })
        .ok_or(ReplayError::MissingHeader)?;
    if schema != SCHEMA_VERSION {
        return Err(ReplayError::UnknownSchema(schema));
    }

    program.set_size(width, height);
    program.init()?;

    let mut total_frames: u64 = 0;
    let mut checksum_chain: u64 = 0;
    let mut first_mismatch: Option<ReplayMismatch> = None;

    for record in &trace.records {
        match record {
            TraceRecord::Input { event, .. } => program.push_event(event.clone()),
            TraceRecord::Resize { width, height, .. } => program.resize(*width, *height),
            TraceRecord::Tick { ts_ns } => {
                program.advance_to(Duration::from_nanos(*ts_ns))?;
            }
            TraceRecord::Step { .. } => {
                program.step()?;
            }
            TraceRecord::Frame {
                frame_idx,
                checksum: expected,
                ..
            } => {
                let actual = program.surface().checksum();
                checksum_chain = fnv1a64_pair(checksum_chain, actual);
                if actual != *expected && first_mismatch.is_none() {
                    first_mismatch = Some(ReplayMismatch {
                        frame_idx: *frame_idx,
                        expected: *expected,
                        actual,
                    });
                }
                total_frames += 1;
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_frames,
        final_checksum_chain: checksum_chain,
        first_mismatch,
    })
}
