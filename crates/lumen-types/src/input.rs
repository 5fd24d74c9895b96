//! Input notifications consumed by the engine.
//!
//! Hosts either call the engine's input functions directly or feed it
//! [`InputEvent`] values, which is how recorded traces are replayed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::Point;

/// A single notification from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// The pointer moved to an absolute viewport position.
    PointerMove {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// The page scrolled to a new offset.
    Scroll {
        /// Vertical scroll offset in pixels.
        offset: f64,
    },
    /// A ripple-enabled element was clicked.
    Click {
        /// Client position of the click.
        client: Point,
        /// Top-left corner of the clicked element.
        element_origin: Point,
    },
    /// The stats region's intersection ratio changed.
    Intersection {
        /// Visible fraction of the region, `0.0..=1.0`.
        ratio: f64,
    },
    /// A stat or feature card gained hover or click focus.
    CardFocus {
        /// Index of the focused card.
        index: u32,
    },
}

/// An [`InputEvent`] stamped with the engine time it should be applied at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimedInput {
    /// Milliseconds since the clock origin.
    pub at_ms: u64,
    /// The notification itself.
    pub event: InputEvent,
}
