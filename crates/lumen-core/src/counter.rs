//! Counter animator: a fixed-length eased run from zero to a set of targets.
//!
//! The animation ticks `steps` times over `duration`. On every tick:
//!
//! ```text
//! progress   = step / steps
//! eased      = easing(progress)           // 1 - (1 - t)^4 by default
//! current[i] = floor(target[i] * eased)
//! ```
//!
//! The terminal tick cancels the periodic schedule and forces every value to
//! its exact target, since flooring would otherwise leave fractional targets
//! (e.g. `99.9`) one unit short.

use std::time::Duration;

use lumen_types::CounterPhase;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::clock::Timestamp;
use crate::engine::EffectTask;
use crate::timer::{TimerId, TimerQueue};

/// Easing curve applied to linear progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No easing.
    Linear,
    /// `1 - (1 - t)^2`.
    EaseOutQuad,
    /// `1 - (1 - t)^3`.
    EaseOutCubic,
    /// `1 - (1 - t)^4`: fast initial growth, smooth settle.
    #[default]
    EaseOutQuart,
}

impl Easing {
    /// Map linear progress `t` (clamped to `0.0..=1.0`) onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }
}

/// Drives the animated statistics.
#[derive(Debug, Clone)]
pub struct CounterAnimator {
    steps: u32,
    duration: Duration,
    easing: Easing,
    phase: CounterPhase,
    step: u32,
    targets: Vec<f64>,
    current: Vec<f64>,
    timer: Option<TimerId>,
}

impl CounterAnimator {
    /// Create an idle animator that will run `steps` ticks over `duration`.
    pub const fn new(steps: u32, duration: Duration, easing: Easing) -> Self {
        Self {
            steps,
            duration,
            easing,
            phase: CounterPhase::Idle,
            step: 0,
            targets: Vec::new(),
            current: Vec::new(),
            timer: None,
        }
    }

    /// Time between ticks: `duration / steps`.
    pub fn interval(&self) -> Duration {
        self.duration
            .checked_div(self.steps)
            .unwrap_or(self.duration)
    }

    /// Start animating from zero towards `targets`.
    ///
    /// Returns `false` and changes nothing if the animator is not idle.
    pub fn start(
        &mut self,
        targets: &[f64],
        now: Timestamp,
        timers: &mut TimerQueue<EffectTask>,
    ) -> bool {
        if self.phase != CounterPhase::Idle {
            warn!(phase = ?self.phase, "counter start ignored, already started");
            return false;
        }

        self.targets = targets.to_vec();
        self.current = vec![0.0; targets.len()];
        self.step = 0;
        self.phase = CounterPhase::Running;
        let interval = self.interval();
        self.timer = Some(timers.schedule_every(now, interval, EffectTask::CounterTick));

        info!(
            targets = targets.len(),
            steps = self.steps,
            interval_us = u64::try_from(interval.as_micros()).unwrap_or(u64::MAX),
            "counter animation started"
        );
        true
    }

    /// Advance one step. Returns `true` if this was the terminal tick.
    ///
    /// Ticks that arrive while not running are ignored.
    pub fn tick(&mut self, timers: &mut TimerQueue<EffectTask>) -> bool {
        if self.phase != CounterPhase::Running {
            return false;
        }

        self.step = self.step.saturating_add(1);
        let progress = if self.steps == 0 {
            1.0
        } else {
            f64::from(self.step) / f64::from(self.steps)
        };
        let eased = self.easing.apply(progress);

        for (current, target) in self.current.iter_mut().zip(&self.targets) {
            *current = (target * eased).floor();
        }
        debug!(step = self.step, eased, "counter tick");

        if self.step >= self.steps {
            self.stop_timer(timers);
            self.current.clone_from(&self.targets);
            self.phase = CounterPhase::Finished;
            info!(step = self.step, "counter animation finished");
            return true;
        }
        false
    }

    /// Stop a running animation, freezing the current values.
    pub fn cancel(&mut self, timers: &mut TimerQueue<EffectTask>) {
        if self.phase == CounterPhase::Running {
            self.stop_timer(timers);
            self.phase = CounterPhase::Cancelled;
            info!(step = self.step, "counter animation cancelled");
        }
    }

    /// Current values, one per target; empty before [`start`](Self::start).
    pub fn values(&self) -> &[f64] {
        &self.current
    }

    /// Targets the animation settles on.
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Current phase.
    pub const fn phase(&self) -> CounterPhase {
        self.phase
    }

    /// Ticks completed so far.
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Total ticks in a run.
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    fn stop_timer(&mut self, timers: &mut TimerQueue<EffectTask>) {
        if let Some(id) = self.timer.take() {
            let _ = timers.cancel(id);
        }
    }
}
