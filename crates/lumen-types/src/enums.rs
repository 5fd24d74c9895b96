//! Enumeration types shared between the engine and the renderer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Ripples
// ---------------------------------------------------------------------------

/// The kind of a ripple, each kind owning an independent collection and id
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum RippleKind {
    /// Spawned by a click, positioned relative to the clicked element.
    Click,
    /// Spawned by throttled pointer movement, positioned in the viewport.
    Ambient,
}

impl RippleKind {
    /// Diameter in pixels of the marker the renderer draws for this kind.
    ///
    /// Markers are centered on the ripple position, so the renderer offsets
    /// them by half this value.
    pub const fn marker_diameter(self) -> u32 {
        match self {
            Self::Click => 20,
            Self::Ambient => 16,
        }
    }
}

impl core::fmt::Display for RippleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Click => write!(f, "click"),
            Self::Ambient => write!(f, "ambient"),
        }
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// How a counter value is projected into its display string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum StatFormat {
    /// Divide by one million and append `M+` (e.g. `10.0M+`).
    Millions {
        /// Digits after the decimal point.
        decimals: u8,
    },
    /// The raw value followed by `+` (e.g. `50+`).
    Count,
    /// The raw value with a fixed number of decimals and a `%` suffix.
    Percent {
        /// Digits after the decimal point.
        decimals: u8,
    },
    /// The raw value, unadorned.
    #[default]
    Plain,
}

/// Lifecycle phase of the counter animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum CounterPhase {
    /// Not started yet; every value is zero.
    Idle,
    /// Ticking towards the targets.
    Running,
    /// Terminal tick reached; values equal the targets exactly.
    Finished,
    /// Stopped by teardown before the terminal tick; values are frozen.
    Cancelled,
}

/// State of the one-shot visibility latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum LatchState {
    /// Waiting for the first qualifying intersection.
    Pending,
    /// Fired once; never resets.
    Fired,
}

/// Lifecycle of an effects engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Constructed but not yet subscribed to input.
    Idle,
    /// Accepting input and sweeping timers.
    Running,
    /// Torn down; all timers cancelled and input ignored.
    TornDown,
}

impl core::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::TornDown => write!(f, "torn down"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn marker_diameters_match_the_page() {
        assert_eq!(RippleKind::Click.marker_diameter(), 20);
        assert_eq!(RippleKind::Ambient.marker_diameter(), 16);
    }

    #[test]
    fn stat_format_uses_a_style_tag() {
        let json = serde_json::to_string(&StatFormat::Millions { decimals: 1 }).unwrap();
        assert_eq!(json, r#"{"style":"millions","decimals":1}"#);

        let parsed: StatFormat = serde_json::from_str(r#"{"style":"count"}"#).unwrap();
        assert_eq!(parsed, StatFormat::Count);
    }

    #[test]
    fn ripple_kind_serializes_snake_case() {
        let json = serde_json::to_string(&RippleKind::Ambient).unwrap();
        assert_eq!(json, r#""ambient""#);
    }
}
