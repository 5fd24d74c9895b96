//! The effects engine: one owned instance composing every effect.
//!
//! ```text
//!   Idle --start--> Running --teardown--> TornDown
//!     \_______________teardown______________/
//! ```
//!
//! Hosts construct an [`EffectsEngine`] from configuration, call
//! [`start`](EffectsEngine::start), feed it input through the `on_*`
//! functions (or [`apply`](EffectsEngine::apply)), and call
//! [`frame`](EffectsEngine::frame) once per rendered frame. All deferred
//! work lives in one [`TimerQueue`] swept by [`advance`](EffectsEngine::advance).
//! Input is only accepted while running.

use lumen_types::{
    CounterReading, FeatureReading, FrameSnapshot, InputEvent, LayerTransform, Lifecycle, Point, RippleId,
    RippleKind,
};
use tracing::{debug, info, trace};

use crate::clock::Timestamp;
use crate::config::{ConfigError, EffectsConfig};
use crate::counter::CounterAnimator;
use crate::format::format_stat;
use crate::parallax::ParallaxLayer;
use crate::ripple::RippleManager;
use crate::sampler::{InputSampler, SampleState};
use crate::timer::TimerQueue;
use crate::visibility::VisibilityTrigger;

/// Deferred work held in the engine's timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTask {
    /// Remove a ripple once its lifetime has elapsed.
    ExpireRipple {
        /// Collection the ripple lives in.
        kind: RippleKind,
        /// The ripple to remove.
        id: RippleId,
    },
    /// Advance the counter animation by one step.
    CounterTick,
}

/// Errors from engine construction and lifecycle control.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration failed validation.
    #[error("invalid engine configuration: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// A lifecycle transition was requested from the wrong state.
    #[error("cannot move engine from {from} to {to}")]
    InvalidTransition {
        /// State the engine was in.
        from: Lifecycle,
        /// State that was requested.
        to: Lifecycle,
    },
}

/// What one [`advance`](EffectsEngine::advance) sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Ripples removed by expiry.
    pub expired: usize,
    /// Counter ticks applied.
    pub counter_ticks: u32,
    /// Whether the counter animation finished during this sweep.
    pub counter_finished: bool,
}

impl SweepReport {
    /// Whether the sweep changed any state.
    pub const fn is_idle(&self) -> bool {
        self.expired == 0 && self.counter_ticks == 0
    }

    /// Fold a later sweep into this one.
    pub const fn absorb(&mut self, other: Self) {
        self.expired = self.expired.saturating_add(other.expired);
        self.counter_ticks = self.counter_ticks.saturating_add(other.counter_ticks);
        self.counter_finished |= other.counter_finished;
    }
}

/// Owns every piece of effect state for one page instance.
#[derive(Debug)]
pub struct EffectsEngine {
    config: EffectsConfig,
    lifecycle: Lifecycle,
    loaded: bool,
    sampler: InputSampler,
    ripples: RippleManager,
    layers: Vec<ParallaxLayer>,
    visibility: VisibilityTrigger,
    counter: CounterAnimator,
    timers: TimerQueue<EffectTask>,
    active_card: u32,
}

impl EffectsEngine {
    /// Build an idle engine from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is out of range.
    pub fn new(config: EffectsConfig) -> Result<Self, EngineError> {
        config.validate()?;

        Ok(Self {
            lifecycle: Lifecycle::Idle,
            loaded: false,
            sampler: InputSampler::new(config.ripples.ambient_throttle()),
            ripples: RippleManager::new(config.ripples.ttl()),
            layers: config.layers.clone(),
            visibility: VisibilityTrigger::new(config.visibility.threshold),
            counter: CounterAnimator::new(
                config.counter.steps,
                config.counter.duration(),
                config.counter.easing,
            ),
            timers: TimerQueue::new(),
            active_card: 0,
            config,
        })
    }

    /// Begin accepting input and mark the page as loaded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTransition`] unless the engine is idle.
    pub fn start(&mut self, now: Timestamp) -> Result<(), EngineError> {
        if self.lifecycle != Lifecycle::Idle {
            return Err(EngineError::InvalidTransition {
                from: self.lifecycle,
                to: Lifecycle::Running,
            });
        }
        self.lifecycle = Lifecycle::Running;
        self.loaded = true;

        info!(
            %now,
            layers = self.layers.len(),
            stats = self.config.stats.len(),
            ttl_ms = self.config.ripples.ttl_ms,
            "effects engine started"
        );
        Ok(())
    }

    /// Stop everything: cancel all pending timers, drop live ripples, detach
    /// the visibility trigger, and ignore all further input. Terminal and
    /// idempotent.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.counter.cancel(&mut self.timers);
        let cancelled = self.timers.cancel_all();
        let click_ripples = self.ripples.len(RippleKind::Click);
        let ambient_ripples = self.ripples.len(RippleKind::Ambient);
        self.ripples.clear();
        self.visibility.detach();
        let from = self.lifecycle;
        self.lifecycle = Lifecycle::TornDown;

        info!(
            %from,
            cancelled,
            click_ripples,
            ambient_ripples,
            "effects engine torn down"
        );
    }

    /// Pointer moved to viewport position `(x, y)`.
    ///
    /// Returns the id of the ambient ripple spawned, if the throttle allowed one.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, now: Timestamp) -> Option<RippleId> {
        if !self.accepting("pointer_move") {
            return None;
        }
        let position = self.sampler.on_pointer_move(Point::new(x, y), now)?;
        Some(
            self.ripples
                .spawn(RippleKind::Ambient, position, now, &mut self.timers),
        )
    }

    /// Page scrolled to `offset`.
    pub fn on_scroll(&mut self, offset: f64) {
        if self.accepting("scroll") {
            self.sampler.on_scroll(offset);
        }
    }

    /// A ripple-enabled element whose top-left corner is at `element_origin`
    /// was clicked at `client`. The ripple is placed relative to the element.
    pub fn on_click(
        &mut self,
        client: Point,
        element_origin: Point,
        now: Timestamp,
    ) -> Option<RippleId> {
        if !self.accepting("click") {
            return None;
        }
        let local = client.relative_to(element_origin);
        Some(
            self.ripples
                .spawn(RippleKind::Click, local, now, &mut self.timers),
        )
    }

    /// The stats region's intersection ratio changed.
    ///
    /// Returns `true` if this notification fired the trigger and started the
    /// counter animation.
    pub fn on_intersection(&mut self, ratio: f64, now: Timestamp) -> bool {
        if !self.accepting("intersection") || !self.visibility.observe(ratio) {
            return false;
        }
        let targets = self.config.targets();
        self.counter.start(&targets, now, &mut self.timers)
    }

    /// A stat or feature card gained focus.
    pub fn on_card_focus(&mut self, index: u32) {
        if self.accepting("card_focus") {
            debug!(index, "card focused");
            self.active_card = index;
        }
    }

    /// Dispatch a serialized input notification.
    pub fn apply(&mut self, event: InputEvent, now: Timestamp) {
        match event {
            InputEvent::PointerMove { x, y } => {
                let _ = self.on_pointer_move(x, y, now);
            }
            InputEvent::Scroll { offset } => self.on_scroll(offset),
            InputEvent::Click {
                client,
                element_origin,
            } => {
                let _ = self.on_click(client, element_origin, now);
            }
            InputEvent::Intersection { ratio } => {
                let _ = self.on_intersection(ratio, now);
            }
            InputEvent::CardFocus { index } => self.on_card_focus(index),
        }
    }

    /// Run every timer due at or before `now`, earliest first.
    pub fn advance(&mut self, now: Timestamp) -> SweepReport {
        let mut report = SweepReport::default();

        while let Some(fired) = self.timers.pop_due(now) {
            match fired.task {
                EffectTask::ExpireRipple { kind, id } => {
                    if self.ripples.expire(kind, id) {
                        report.expired = report.expired.saturating_add(1);
                    }
                }
                EffectTask::CounterTick => {
                    report.counter_ticks = report.counter_ticks.saturating_add(1);
                    if self.counter.tick(&mut self.timers) {
                        report.counter_finished = true;
                    }
                }
            }
        }

        if !report.is_idle() {
            debug!(
                %now,
                expired = report.expired,
                counter_ticks = report.counter_ticks,
                pending = self.timers.len(),
                "timers swept"
            );
        }
        report
    }

    /// Parallax transforms of every configured layer for the latest samples.
    pub fn layer_transforms(&self) -> Vec<LayerTransform> {
        let samples = self.sampler.samples();
        self.layers
            .iter()
            .map(|layer| layer.transform(samples))
            .collect()
    }

    /// Current values of the animated statistics.
    ///
    /// Values read zero until the counter starts. Bar fills read zero until
    /// the stats region has been seen.
    pub fn counter_readings(&self) -> Vec<CounterReading> {
        let values = self.counter.values();
        let seen = self.visibility.has_fired();

        self.config
            .stats
            .iter()
            .enumerate()
            .map(|(index, stat)| {
                let value = values.get(index).copied().unwrap_or(0.0);
                CounterReading {
                    label: stat.label.clone(),
                    value,
                    target: stat.target,
                    display: format_stat(stat.format, value),
                    bar_fill: if seen { stat.bar_fill } else { 0 },
                }
            })
            .collect()
    }

    /// Feature cards with only the highlighted one filling its bar.
    pub fn feature_readings(&self) -> Vec<FeatureReading> {
        self.config
            .features
            .iter()
            .zip(0_u32..)
            .map(|(feature, index)| {
                let active = index == self.active_card;
                FeatureReading {
                    title: feature.title.clone(),
                    progress: feature.progress,
                    active,
                    bar_fill: if active { feature.progress } else { 0 },
                }
            })
            .collect()
    }

    /// Copy out everything the renderer needs for a frame at `now`.
    pub fn snapshot(&self, now: Timestamp) -> FrameSnapshot {
        let samples = self.sampler.samples();
        FrameSnapshot {
            at_ms: now.as_millis(),
            lifecycle: self.lifecycle,
            loaded: self.loaded,
            scroll: samples.scroll,
            pointer: samples.pointer,
            layers: self.layer_transforms(),
            click_ripples: self.ripples.views(RippleKind::Click, now),
            ambient_ripples: self.ripples.views(RippleKind::Ambient, now),
            stats_latch: self.visibility.state(),
            counter_phase: self.counter.phase(),
            counters: self.counter_readings(),
            active_card: self.active_card,
            features: self.feature_readings(),
        }
    }

    /// [`advance`](Self::advance) then [`snapshot`](Self::snapshot).
    pub fn frame(&mut self, now: Timestamp) -> FrameSnapshot {
        let _ = self.advance(now);
        self.snapshot(now)
    }

    /// Drop every live ripple. Id counters keep counting.
    pub fn clear_ripples(&mut self) {
        self.ripples.clear();
    }

    /// Current lifecycle state.
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether [`start`](Self::start) has run.
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The configuration the engine was built from.
    pub const fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Latest scroll and pointer samples.
    pub const fn samples(&self) -> SampleState {
        self.sampler.samples()
    }

    /// The ripple collections.
    pub const fn ripples(&self) -> &RippleManager {
        &self.ripples
    }

    /// The stats visibility trigger.
    pub const fn visibility(&self) -> &VisibilityTrigger {
        &self.visibility
    }

    /// The counter animator.
    pub const fn counter(&self) -> &CounterAnimator {
        &self.counter
    }

    /// Index of the highlighted card.
    pub const fn active_card(&self) -> u32 {
        self.active_card
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&mut self) -> Option<Timestamp> {
        self.timers.next_due()
    }

    fn accepting(&self, input: &'static str) -> bool {
        let running = self.lifecycle == Lifecycle::Running;
        if !running {
            trace!(input, lifecycle = %self.lifecycle, "input dropped");
        }
        running
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::arithmetic_side_effects)]
mod tests {
    use lumen_types::{CounterPhase, LatchState, Transform};

    use super::*;

    const TARGETS: [f64; 4] = [10_000_000.0, 500_000_000.0, 50.0, 99.9];

    fn ms(value: u64) -> Timestamp {
        Timestamp::from_millis(value)
    }

    fn running() -> EffectsEngine {
        let mut engine = EffectsEngine::new(EffectsConfig::default()).unwrap();
        engine.start(ms(0)).unwrap();
        engine
    }

    #[test]
    fn engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<EffectsEngine>();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EffectsConfig::default();
        config.counter.steps = 0;
        let result = EffectsEngine::new(config);
        assert!(matches!(result, Err(EngineError::Config { .. })));
    }

    #[test]
    fn start_marks_loaded_and_only_runs_once() {
        let mut engine = EffectsEngine::new(EffectsConfig::default()).unwrap();
        assert!(!engine.is_loaded());
        engine.start(ms(0)).unwrap();
        assert!(engine.is_loaded());
        assert_eq!(engine.lifecycle(), Lifecycle::Running);

        let again = engine.start(ms(5));
        assert!(matches!(
            again,
            Err(EngineError::InvalidTransition {
                from: Lifecycle::Running,
                to: Lifecycle::Running
            })
        ));
    }

    #[test]
    fn input_before_start_is_dropped() {
        let mut engine = EffectsEngine::new(EffectsConfig::default()).unwrap();
        assert_eq!(engine.on_pointer_move(10.0, 10.0, ms(0)), None);
        engine.on_scroll(300.0);
        assert!(!engine.on_intersection(1.0, ms(0)));
        assert!(engine.ripples().is_empty());
        assert_eq!(engine.samples(), SampleState::default());
        assert_eq!(engine.visibility().state(), LatchState::Pending);
    }

    #[test]
    fn click_ripple_is_relative_to_element_and_expires() {
        let mut engine = running();
        let id = engine
            .on_click(Point::new(150.0, 90.0), Point::new(100.0, 40.0), ms(10))
            .unwrap();

        let snapshot = engine.snapshot(ms(10));
        let view = snapshot.click_ripples.first().unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.position, Point::new(50.0, 50.0));
        assert_eq!(view.marker_diameter, 20);

        assert_eq!(engine.advance(ms(1009)).expired, 0);
        assert_eq!(engine.advance(ms(1010)).expired, 1);
        assert!(engine.snapshot(ms(1010)).click_ripples.is_empty());
    }

    #[test]
    fn ambient_ripples_respect_the_throttle() {
        let mut engine = running();
        let mut spawned = Vec::new();
        for step in 0..100_u32 {
            let now = ms(u64::from(step) * 16);
            if engine.on_pointer_move(f64::from(step), 0.0, now).is_some() {
                spawned.push(now);
            }
        }
        assert!(spawned.len() > 1);
        for pair in spawned.windows(2) {
            if let [earlier, later] = pair {
                assert!(later.saturating_since(*earlier).as_millis() >= 100);
            }
        }
        // The pointer sample always tracks the latest move.
        assert_eq!(engine.samples().pointer, Point::new(99.0, 0.0));
    }

    #[test]
    fn all_ripples_gone_after_ttl_without_new_spawns() {
        let mut engine = running();
        for step in 0..50_u64 {
            let now = ms(step * 20);
            let _ = engine.on_pointer_move(1.0, 1.0, now);
            let _ = engine.on_click(Point::ORIGIN, Point::ORIGIN, now);
        }
        let _ = engine.advance(ms(980 + 1000));
        assert!(engine.ripples().is_empty());
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn counters_read_zero_until_the_stats_are_seen() {
        let engine = running();
        let readings = engine.counter_readings();
        assert_eq!(readings.len(), 4);
        assert!(readings.iter().all(|r| r.value == 0.0 && r.bar_fill == 0));
        let displays: Vec<&str> = readings.iter().map(|r| r.display.as_str()).collect();
        assert_eq!(displays, vec!["0.0M+", "0M+", "0+", "0.0%"]);
    }

    #[test]
    fn visibility_starts_the_counter_and_it_lands_on_targets() {
        let mut engine = running();
        assert!(!engine.on_intersection(0.2, ms(100)));
        assert!(engine.on_intersection(0.6, ms(200)));
        assert_eq!(engine.counter().phase(), CounterPhase::Running);

        let report = engine.advance(ms(2200));
        assert_eq!(report.counter_ticks, 60);
        assert!(report.counter_finished);

        let snapshot = engine.snapshot(ms(2200));
        assert_eq!(snapshot.counter_phase, CounterPhase::Finished);
        assert_eq!(snapshot.stats_latch, LatchState::Fired);
        let values: Vec<f64> = snapshot.counters.iter().map(|c| c.value).collect();
        assert_eq!(values, TARGETS.to_vec());
        let displays: Vec<&str> = snapshot.counters.iter().map(|c| c.display.as_str()).collect();
        assert_eq!(displays, vec!["10.0M+", "500M+", "50+", "99.9%"]);
        let fills: Vec<u8> = snapshot.counters.iter().map(|c| c.bar_fill).collect();
        assert_eq!(fills, vec![85, 90, 95, 100]);
        assert_eq!(engine.pending_timers(), 0);
    }

    #[test]
    fn visibility_toggles_start_the_counter_once() {
        let mut engine = running();
        let starts = [(0, 0.8), (10, 0.0), (20, 0.9), (30, 0.1), (40, 1.0)]
            .into_iter()
            .filter(|&(at, ratio)| engine.on_intersection(ratio, ms(at)))
            .count();
        assert_eq!(starts, 1);
        // Only the one periodic tick is scheduled.
        assert_eq!(engine.pending_timers(), 1);
    }

    #[test]
    fn counter_values_never_decrease_across_frames() {
        let mut engine = running();
        let _ = engine.on_intersection(1.0, ms(0));
        let mut previous = engine.frame(ms(0)).counters;
        for frame in 1..200_u64 {
            let current = engine.frame(ms(frame * 16)).counters;
            for (before, after) in previous.iter().zip(&current) {
                assert!(after.value >= before.value);
            }
            previous = current;
        }
    }

    #[test]
    fn parallax_follows_the_latest_samples() {
        let mut engine = running();
        let rest = engine.snapshot(ms(0));
        assert!(rest.layers.iter().all(|l| l.transform == Transform::IDENTITY));

        engine.on_scroll(500.0);
        let _ = engine.on_pointer_move(200.0, 100.0, ms(1));
        let snapshot = engine.snapshot(ms(1));
        let hero = snapshot.layer("hero-backdrop").unwrap();
        assert!((hero.translate_y - 150.0).abs() < 1e-9);
        assert!((hero.scale - 1.1).abs() < 1e-9);
        assert_eq!(snapshot.layers.len(), engine.config().layers.len());
    }

    #[test]
    fn first_card_starts_highlighted() {
        let engine = running();
        let snapshot = engine.snapshot(ms(0));
        assert_eq!(snapshot.active_card, 0);

        let fills: Vec<u8> = snapshot.features.iter().map(|f| f.bar_fill).collect();
        assert_eq!(fills, vec![95, 0, 0, 0]);
        assert!(snapshot.features.first().unwrap().active);
    }

    #[test]
    fn card_focus_moves_the_feature_bar() {
        let mut engine = running();
        engine.apply(InputEvent::CardFocus { index: 2 }, ms(0));
        let snapshot = engine.snapshot(ms(0));
        assert_eq!(snapshot.active_card, 2);

        let fills: Vec<u8> = snapshot.features.iter().map(|f| f.bar_fill).collect();
        assert_eq!(fills, vec![0, 0, 92, 0]);
        let progress: Vec<u8> = snapshot.features.iter().map(|f| f.progress).collect();
        assert_eq!(progress, vec![95, 88, 92, 90]);

        // Focus on a card with no feature entry leaves every bar empty.
        engine.on_card_focus(9);
        assert!(engine.feature_readings().iter().all(|f| f.bar_fill == 0 && !f.active));
    }

    #[test]
    fn apply_dispatches_every_event() {
        let mut engine = running();
        engine.apply(InputEvent::Scroll { offset: 42.0 }, ms(0));
        engine.apply(InputEvent::PointerMove { x: 3.0, y: 4.0 }, ms(0));
        engine.apply(
            InputEvent::Click {
                client: Point::new(5.0, 5.0),
                element_origin: Point::ORIGIN,
            },
            ms(0),
        );
        engine.apply(InputEvent::Intersection { ratio: 0.75 }, ms(0));

        assert_eq!(engine.samples().scroll, 42.0);
        assert_eq!(engine.ripples().len(RippleKind::Ambient), 1);
        assert_eq!(engine.ripples().len(RippleKind::Click), 1);
        assert!(engine.visibility().has_fired());
    }

    #[test]
    fn nothing_changes_after_teardown() {
        let mut engine = running();
        let _ = engine.on_click(Point::ORIGIN, Point::ORIGIN, ms(0));
        let _ = engine.on_pointer_move(1.0, 1.0, ms(0));
        let _ = engine.on_intersection(1.0, ms(0));
        let _ = engine.advance(ms(500));
        assert_eq!(engine.ripples().len(RippleKind::Click), 1);
        assert_eq!(engine.ripples().len(RippleKind::Ambient), 1);

        engine.teardown();
        assert_eq!(engine.lifecycle(), Lifecycle::TornDown);
        assert_eq!(engine.pending_timers(), 0);
        assert_eq!(engine.counter().phase(), CounterPhase::Cancelled);
        assert!(!engine.visibility().is_observing());

        assert!(engine.ripples().is_empty());
        let values_before = engine.counter().values().to_vec();

        let report = engine.advance(ms(60_000));
        assert!(report.is_idle());
        assert_eq!(engine.on_pointer_move(9.0, 9.0, ms(60_000)), None);
        assert_eq!(engine.on_click(Point::ORIGIN, Point::ORIGIN, ms(60_000)), None);
        assert!(!engine.on_intersection(0.0, ms(60_000)));

        assert!(engine.ripples().is_empty());
        assert_eq!(engine.counter().values(), values_before.as_slice());
        let snapshot = engine.snapshot(ms(60_000));
        assert!(snapshot.click_ripples.is_empty());
        assert!(snapshot.ambient_ripples.is_empty());

        // Teardown is terminal and idempotent.
        engine.teardown();
        assert!(engine.start(ms(60_000)).is_err());
    }

    #[test]
    fn clear_ripples_keeps_ids_increasing() {
        let mut engine = running();
        let first = engine.on_click(Point::ORIGIN, Point::ORIGIN, ms(0)).unwrap();
        engine.clear_ripples();
        assert!(engine.ripples().is_empty());
        assert_eq!(engine.advance(ms(1000)).expired, 0);

        let second = engine.on_click(Point::ORIGIN, Point::ORIGIN, ms(1000)).unwrap();
        assert!(second > first);
    }
}
