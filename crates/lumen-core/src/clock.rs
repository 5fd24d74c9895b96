//! Monotonic time for the effects engine.
//!
//! Every engine operation takes the current [`Timestamp`] explicitly, so the
//! engine itself never reads a clock. Hosts own a [`Clock`] and pass its
//! readings in. Two clocks are provided:
//!
//! - [`MonotonicClock`] reads [`std::time::Instant`] for live hosts.
//! - [`SteppedClock`] advances by a fixed step per reading, which makes
//!   trace replays and tests fully deterministic.

use std::time::{Duration, Instant};

/// A point in engine time, measured from the owning clock's origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// The clock origin.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Create a timestamp from whole milliseconds since the origin.
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Create a timestamp from a duration since the origin.
    pub const fn from_duration(since_origin: Duration) -> Self {
        Self(since_origin)
    }

    /// Duration since the clock origin.
    pub const fn since_origin(self) -> Duration {
        self.0
    }

    /// Whole milliseconds since the origin, saturating at `u64::MAX`.
    pub fn as_millis(self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    /// Time elapsed from `earlier` to `self`; zero if `earlier` is later.
    pub const fn saturating_since(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    /// This timestamp moved forward by `delay`, saturating at the maximum
    /// representable duration.
    #[must_use]
    pub const fn saturating_add(self, delay: Duration) -> Self {
        Self(self.0.saturating_add(delay))
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

/// A monotonic time source.
pub trait Clock: Send {
    /// Read the current time.
    fn now(&mut self) -> Timestamp;
}

/// Wall-clock backed monotonic time, with the origin at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock whose origin is the current instant.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> Timestamp {
        Timestamp(self.origin.elapsed())
    }
}

/// A deterministic clock that returns its current reading and then moves
/// forward by a fixed step.
#[derive(Debug, Clone, Copy)]
pub struct SteppedClock {
    next: Timestamp,
    step: Duration,
}

impl SteppedClock {
    /// Create a clock whose first reading is `start`.
    pub const fn new(start: Timestamp, step: Duration) -> Self {
        Self { next: start, step }
    }

    /// Peek at the next reading without consuming it.
    pub const fn peek(&self) -> Timestamp {
        self.next
    }
}

impl Clock for SteppedClock {
    fn now(&mut self) -> Timestamp {
        let reading = self.next;
        self.next = self.next.saturating_add(self.step);
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_round_trip() {
        let ts = Timestamp::from_millis(1500);
        assert_eq!(ts.as_millis(), 1500);
        assert_eq!(ts.since_origin(), Duration::from_millis(1500));
    }

    #[test]
    fn saturating_since_never_goes_negative() {
        let early = Timestamp::from_millis(10);
        let late = Timestamp::from_millis(30);
        assert_eq!(late.saturating_since(early), Duration::from_millis(20));
        assert_eq!(early.saturating_since(late), Duration::ZERO);
    }

    #[test]
    fn stepped_clock_advances_per_reading() {
        let mut clock = SteppedClock::new(Timestamp::ZERO, Duration::from_millis(16));
        assert_eq!(clock.now(), Timestamp::ZERO);
        assert_eq!(clock.now(), Timestamp::from_millis(16));
        assert_eq!(clock.peek(), Timestamp::from_millis(32));
    }

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let mut clock = MonotonicClock::start();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn display_in_millis() {
        assert_eq!(Timestamp::from_millis(250).to_string(), "250ms");
    }
}
