//! Input sampler: latest scroll and pointer samples plus the ambient ripple
//! throttle.
//!
//! Samples are overwritten in place; no history is kept apart from the
//! timestamp of the last accepted ambient ripple request.

use std::time::Duration;

use lumen_types::Point;
use tracing::trace;

use crate::clock::Timestamp;

/// Latest scroll offset and pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampleState {
    /// Vertical scroll offset in pixels.
    pub scroll: f64,
    /// Pointer position in viewport pixels.
    pub pointer: Point,
}

/// Normalizes pointer and scroll notifications and throttles ambient ripple
/// requests.
#[derive(Debug, Clone)]
pub struct InputSampler {
    samples: SampleState,
    /// When the last ambient ripple request was accepted.
    last_ambient: Option<Timestamp>,
    /// Minimum spacing between accepted ambient requests.
    throttle: Duration,
}

impl InputSampler {
    /// Create a sampler with the given ambient ripple spacing.
    pub const fn new(throttle: Duration) -> Self {
        Self {
            samples: SampleState {
                scroll: 0.0,
                pointer: Point::ORIGIN,
            },
            last_ambient: None,
            throttle,
        }
    }

    /// Record a pointer move.
    ///
    /// The pointer sample is always updated. Returns `Some(position)` when an
    /// ambient ripple should be spawned, i.e. when at least the throttle
    /// interval has passed since the last accepted request (the very first
    /// move is always accepted).
    pub fn on_pointer_move(&mut self, position: Point, now: Timestamp) -> Option<Point> {
        self.samples.pointer = position;

        let accepted = self
            .last_ambient
            .is_none_or(|last| now.saturating_since(last) >= self.throttle);
        trace!(x = position.x, y = position.y, accepted, "pointer move");

        if accepted {
            self.last_ambient = Some(now);
            Some(position)
        } else {
            None
        }
    }

    /// Record a scroll offset. Never throttled.
    pub fn on_scroll(&mut self, offset: f64) {
        trace!(offset, "scroll");
        self.samples.scroll = offset;
    }

    /// The latest samples.
    pub const fn samples(&self) -> SampleState {
        self.samples
    }

    /// When the last ambient ripple request was accepted.
    pub const fn last_ambient(&self) -> Option<Timestamp> {
        self.last_ambient
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn sampler() -> InputSampler {
        InputSampler::new(Duration::from_millis(100))
    }

    #[test]
    fn first_move_is_accepted() {
        let mut sampler = sampler();
        let request = sampler.on_pointer_move(Point::new(5.0, 6.0), Timestamp::from_millis(3));
        assert_eq!(request, Some(Point::new(5.0, 6.0)));
        assert_eq!(sampler.last_ambient(), Some(Timestamp::from_millis(3)));
    }

    #[test]
    fn moves_inside_the_window_update_pointer_only() {
        let mut sampler = sampler();
        let _ = sampler.on_pointer_move(Point::new(0.0, 0.0), Timestamp::from_millis(0));

        let request = sampler.on_pointer_move(Point::new(9.0, 9.0), Timestamp::from_millis(99));
        assert_eq!(request, None);
        assert_eq!(sampler.samples().pointer, Point::new(9.0, 9.0));
        assert_eq!(sampler.last_ambient(), Some(Timestamp::from_millis(0)));
    }

    #[test]
    fn move_exactly_at_the_throttle_boundary_is_accepted() {
        let mut sampler = sampler();
        let _ = sampler.on_pointer_move(Point::ORIGIN, Timestamp::from_millis(0));
        let request = sampler.on_pointer_move(Point::new(1.0, 1.0), Timestamp::from_millis(100));
        assert!(request.is_some());
    }

    #[test]
    fn accepted_requests_are_never_closer_than_the_throttle() {
        let mut sampler = sampler();
        let mut accepted = Vec::new();
        // One event every 7ms for two seconds.
        for step in 0..300_u64 {
            let now = Timestamp::from_millis(step * 7);
            if sampler.on_pointer_move(Point::ORIGIN, now).is_some() {
                accepted.push(now);
            }
        }
        assert!(accepted.len() > 1);
        for pair in accepted.windows(2) {
            if let [earlier, later] = pair {
                assert!(later.saturating_since(*earlier) >= Duration::from_millis(100));
            }
        }
    }

    #[test]
    fn scroll_is_never_throttled() {
        let mut sampler = sampler();
        sampler.on_scroll(10.0);
        sampler.on_scroll(20.0);
        sampler.on_scroll(35.5);
        assert_eq!(sampler.samples().scroll, 35.5);
    }
}
