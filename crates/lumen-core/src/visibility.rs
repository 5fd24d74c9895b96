//! One-shot visibility trigger for the stats region.
//!
//! ```text
//!   Pending --(ratio crosses up through threshold)--> Fired
//! ```
//!
//! `Fired` is terminal. Once detached, the trigger ignores every
//! notification regardless of state.

use lumen_types::LatchState;
use tracing::{debug, info};

/// Latches the first time the observed region becomes sufficiently visible.
#[derive(Debug, Clone)]
pub struct VisibilityTrigger {
    state: LatchState,
    threshold: f64,
    /// Ratio from the previous notification; 0 before the first one.
    last_ratio: f64,
    observing: bool,
}

impl VisibilityTrigger {
    /// Create a pending trigger that fires at `threshold` (e.g. `0.5`).
    pub const fn new(threshold: f64) -> Self {
        Self {
            state: LatchState::Pending,
            threshold,
            last_ratio: 0.0,
            observing: true,
        }
    }

    /// Feed an intersection-ratio notification.
    ///
    /// Returns `true` exactly once: on the first notification that moves the
    /// ratio from below the threshold to at-or-above it while pending.
    /// Non-finite ratios are dropped without touching the stored ratio.
    pub fn observe(&mut self, ratio: f64) -> bool {
        if !self.observing || self.has_fired() {
            debug!(ratio, state = ?self.state, observing = self.observing, "intersection ignored");
            return false;
        }
        if !ratio.is_finite() {
            debug!(ratio, "non-finite intersection ratio ignored");
            return false;
        }

        let crossed = self.last_ratio < self.threshold && ratio >= self.threshold;
        self.last_ratio = ratio;
        if crossed {
            self.state = LatchState::Fired;
            info!(ratio, threshold = self.threshold, "stats region visible, trigger fired");
        }
        crossed
    }

    /// Stop observing. Subsequent notifications are ignored.
    pub const fn detach(&mut self) {
        self.observing = false;
    }

    /// Current latch state.
    pub const fn state(&self) -> LatchState {
        self.state
    }

    /// Whether the trigger has fired.
    pub const fn has_fired(&self) -> bool {
        matches!(self.state, LatchState::Fired)
    }

    /// Whether the trigger is still observing.
    pub const fn is_observing(&self) -> bool {
        self.observing
    }
}
