//! Seeded synthetic input: a visitor wandering over the page.
//!
//! Every 16ms of session time the generator nudges the pointer, scrolls a
//! little further down, and reports the stats region's intersection ratio
//! whenever it changes. Clicks and card focus happen at random. The same
//! seed always produces the same session.

use std::time::Duration;

use lumen_core::clock::Timestamp;
use lumen_core::input::InputSource;
use lumen_types::{InputEvent, Point, TimedInput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STEP_MS: u64 = 16;
const VIEWPORT_WIDTH: f64 = 1280.0;
const VIEWPORT_HEIGHT: f64 = 720.0;
const POINTER_JITTER: f64 = 24.0;
/// Scroll offset at which the stats region starts entering the viewport.
const STATS_TOP: f64 = 400.0;
/// Scroll distance over which the stats region goes from hidden to fully visible.
const STATS_HEIGHT: f64 = 400.0;
const CLICK_CHANCE: f64 = 0.03;
const FOCUS_CHANCE: f64 = 0.01;
const CARD_COUNT: u32 = 4;

/// Generates a deterministic pseudo-random browsing session.
#[derive(Debug, Clone)]
pub struct SyntheticInput {
    rng: StdRng,
    next_at_ms: u64,
    end_ms: u64,
    pointer: Point,
    scroll: f64,
    ratio: f64,
}

impl SyntheticInput {
    /// Create a session of `length` driven by `seed`.
    pub fn new(seed: u64, length: Duration) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_at_ms: 0,
            end_ms: u64::try_from(length.as_millis()).unwrap_or(u64::MAX),
            pointer: Point::new(VIEWPORT_WIDTH / 2.0, VIEWPORT_HEIGHT / 2.0),
            scroll: 0.0,
            ratio: 0.0,
        }
    }

    fn step(&mut self, at_ms: u64, out: &mut Vec<TimedInput>) {
        let mut push = |event| out.push(TimedInput { at_ms, event });

        self.pointer = Point::new(
            (self.pointer.x + self.rng.random_range(-POINTER_JITTER..=POINTER_JITTER))
                .clamp(0.0, VIEWPORT_WIDTH),
            (self.pointer.y + self.rng.random_range(-POINTER_JITTER..=POINTER_JITTER))
                .clamp(0.0, VIEWPORT_HEIGHT),
        );
        push(InputEvent::PointerMove {
            x: self.pointer.x,
            y: self.pointer.y,
        });

        self.scroll += self.rng.random_range(2.0..6.0);
        push(InputEvent::Scroll {
            offset: self.scroll,
        });

        let ratio = ((self.scroll - STATS_TOP) / STATS_HEIGHT).clamp(0.0, 1.0);
        if (ratio - self.ratio).abs() > f64::EPSILON {
            self.ratio = ratio;
            push(InputEvent::Intersection { ratio });
        }

        if self.rng.random_bool(CLICK_CHANCE) {
            let element_origin = Point::new(
                (self.pointer.x - self.rng.random_range(0.0..200.0)).max(0.0),
                (self.pointer.y - self.rng.random_range(0.0..80.0)).max(0.0),
            );
            push(InputEvent::Click {
                client: self.pointer,
                element_origin,
            });
        }

        if self.rng.random_bool(FOCUS_CHANCE) {
            push(InputEvent::CardFocus {
                index: self.rng.random_range(0..CARD_COUNT),
            });
        }
    }
}

impl InputSource for SyntheticInput {
    fn poll(&mut self, now: Timestamp) -> Vec<TimedInput> {
        let until = now.as_millis().min(self.end_ms);
        let mut out = Vec::new();
        while self.next_at_ms <= until {
            let at_ms = self.next_at_ms;
            self.step(at_ms, &mut out);
            self.next_at_ms = at_ms.saturating_add(STEP_MS);
        }
        out
    }

    fn is_exhausted(&self) -> bool {
        self.next_at_ms > self.end_ms
    }
}
