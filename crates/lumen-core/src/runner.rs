//! Frame loop driving an [`EffectsEngine`].
//!
//! [`run_frames`] starts the engine and then, once per frame:
//!
//! 1. reads the clock,
//! 2. for every input the [`InputSource`] has due by then, sweeps timers up
//!    to the input's time and applies it,
//! 3. sweeps the remaining timers up to the clock reading and builds a
//!    [`FrameSnapshot`],
//! 4. hands the combined sweep report and the snapshot to the [`FrameCallback`],
//! 5. sleeps for the frame interval.
//!
//! Inputs and timers are therefore processed in time order within a frame.
//!
//! The loop ends at the frame limit, or once the source is exhausted and no
//! timers remain pending. The engine is torn down before returning.

use std::time::Duration;

use lumen_types::FrameSnapshot;
use tracing::info;

use crate::clock::{Clock, Timestamp};
use crate::engine::{EffectsEngine, EngineError, SweepReport};
use crate::input::InputSource;

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The engine refused to start.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// Reached the configured `max_frames` limit.
    FrameLimitReached,
    /// The input source ran dry and no timers were left pending.
    Quiescent,
}

/// Settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Real time to sleep between frames; zero never sleeps.
    pub frame_interval: Duration,
    /// Stop after this many frames (0 = no limit).
    pub max_frames: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            max_frames: 0,
        }
    }
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// The reason the run ended.
    pub end_reason: RunEndReason,
    /// Total number of frames produced.
    pub frames: u64,
    /// Snapshot of the final frame.
    pub final_snapshot: Option<FrameSnapshot>,
}

/// Callback invoked after each frame.
pub trait FrameCallback: Send {
    /// Called with the frame number (starting at 1), what the frame's timer
    /// sweeps did, and the snapshot of the frame.
    fn on_frame(&mut self, frame: u64, report: &SweepReport, snapshot: &FrameSnapshot);
}

/// A no-op frame callback for testing.
pub struct NoOpCallback;

impl FrameCallback for NoOpCallback {
    fn on_frame(&mut self, _frame: u64, _report: &SweepReport, _snapshot: &FrameSnapshot) {}
}

/// Drive `engine` until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError::Engine`] if the engine has already been started.
pub async fn run_frames(
    engine: &mut EffectsEngine,
    clock: &mut dyn Clock,
    source: &mut dyn InputSource,
    callback: &mut dyn FrameCallback,
    options: RunOptions,
) -> Result<RunResult, RunnerError> {
    engine.start(clock.now())?;

    info!(
        frame_interval_ms = u64::try_from(options.frame_interval.as_millis()).unwrap_or(u64::MAX),
        max_frames = options.max_frames,
        "frame loop starting"
    );

    let mut frames: u64 = 0;
    let end_reason = loop {
        let now = clock.now();

        let mut report = SweepReport::default();
        for input in source.poll(now) {
            let at = Timestamp::from_millis(input.at_ms);
            report.absorb(engine.advance(at));
            engine.apply(input.event, at);
        }
        report.absorb(engine.advance(now));

        let snapshot = engine.snapshot(now);
        frames = frames.saturating_add(1);
        callback.on_frame(frames, &report, &snapshot);

        if options.max_frames > 0 && frames >= options.max_frames {
            break RunEndReason::FrameLimitReached;
        }
        if source.is_exhausted() && engine.pending_timers() == 0 {
            break RunEndReason::Quiescent;
        }

        if !options.frame_interval.is_zero() {
            tokio::time::sleep(options.frame_interval).await;
        }
    };

    let final_snapshot = engine.snapshot(clock.now());
    engine.teardown();

    info!(
        reason = ?end_reason,
        frames,
        counter_phase = ?final_snapshot.counter_phase,
        "frame loop ended"
    );

    Ok(RunResult {
        end_reason,
        frames,
        final_snapshot: Some(final_snapshot),
    })
}
