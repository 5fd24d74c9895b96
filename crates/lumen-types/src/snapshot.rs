//! Read-only views handed to the renderer once per frame.
//!
//! The renderer never holds references into engine state. Everything it
//! needs to draw a frame is copied into a [`FrameSnapshot`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CounterPhase, LatchState, Lifecycle, RippleKind};
use crate::geometry::{Point, Transform};
use crate::ids::RippleId;

/// One live ripple as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RippleView {
    /// Identifier, unique within the ripple's kind.
    pub id: RippleId,
    /// The kind this ripple belongs to.
    pub kind: RippleKind,
    /// Where the ripple was spawned.
    pub position: Point,
    /// Milliseconds since the ripple was spawned.
    pub age_ms: u64,
    /// `age / ttl`, clamped to `0.0..=1.0`; drives fade and expansion.
    pub progress: f64,
    /// Marker size in pixels for this ripple's kind; offset by half to center.
    pub marker_diameter: u32,
}

/// The transform of one named parallax layer for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LayerTransform {
    /// Layer name from configuration.
    pub name: String,
    /// Transform computed from the latest samples.
    pub transform: Transform,
}

/// The current value of one animated statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CounterReading {
    /// Caption shown under the number.
    pub label: String,
    /// Raw animated value.
    pub value: f64,
    /// Final value the animation settles on.
    pub target: f64,
    /// `value` projected through the stat's display format.
    pub display: String,
    /// Progress-bar fill percentage; zero until the stats region is seen.
    pub bar_fill: u8,
}

/// One feature card and the progress bar it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeatureReading {
    /// Card title.
    pub title: String,
    /// Configured progress percentage, shown next to the bar.
    pub progress: u8,
    /// Whether this card is the highlighted one.
    pub active: bool,
    /// Bar fill percentage; `progress` on the active card, zero elsewhere.
    pub bar_fill: u8,
}

/// Everything the renderer reads for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FrameSnapshot {
    /// Engine time of this snapshot, in milliseconds since the clock origin.
    pub at_ms: u64,
    /// Engine lifecycle at snapshot time.
    pub lifecycle: Lifecycle,
    /// Whether the page has finished loading (hides the loader overlay).
    pub loaded: bool,
    /// Latest scroll offset.
    pub scroll: f64,
    /// Latest pointer position.
    pub pointer: Point,
    /// Per-layer parallax transforms in configuration order.
    pub layers: Vec<LayerTransform>,
    /// Live click ripples in spawn order.
    pub click_ripples: Vec<RippleView>,
    /// Live ambient ripples in spawn order.
    pub ambient_ripples: Vec<RippleView>,
    /// State of the stats visibility latch.
    pub stats_latch: LatchState,
    /// Phase of the counter animation.
    pub counter_phase: CounterPhase,
    /// Animated statistics in configuration order.
    pub counters: Vec<CounterReading>,
    /// Index of the highlighted card. The first card starts highlighted.
    pub active_card: u32,
    /// Feature cards in configuration order.
    pub features: Vec<FeatureReading>,
}

impl FrameSnapshot {
    /// Live ripples of the given kind.
    pub fn ripples(&self, kind: RippleKind) -> &[RippleView] {
        match kind {
            RippleKind::Click => &self.click_ripples,
            RippleKind::Ambient => &self.ambient_ripples,
        }
    }

    /// Look up a layer transform by name.
    pub fn layer(&self, name: &str) -> Option<&Transform> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| &layer.transform)
    }
}
