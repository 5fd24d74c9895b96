//! Shared type definitions for the Lumen effects engine.
//!
//! This crate is the single source of truth for the values that cross the
//! boundary between the engine and the page renderer. Types defined here
//! flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Counter-backed identifier wrappers
//! - [`enums`] -- Ripple kinds, stat formats, and lifecycle states
//! - [`geometry`] -- Points, transforms, and parallax coefficients
//! - [`input`] -- Input notifications and timestamped trace entries
//! - [`snapshot`] -- Per-frame read views for the renderer

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod input;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use enums::{CounterPhase, LatchState, Lifecycle, RippleKind, StatFormat};
pub use geometry::{LayerCoefficients, Point, Transform};
pub use ids::RippleId;
pub use input::{InputEvent, TimedInput};
pub use snapshot::{CounterReading, FeatureReading, FrameSnapshot, LayerTransform, RippleView};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        let _ = crate::ids::RippleId::export_all();

        let _ = crate::enums::RippleKind::export_all();
        let _ = crate::enums::StatFormat::export_all();
        let _ = crate::enums::CounterPhase::export_all();
        let _ = crate::enums::LatchState::export_all();
        let _ = crate::enums::Lifecycle::export_all();

        let _ = crate::geometry::Point::export_all();
        let _ = crate::geometry::Transform::export_all();
        let _ = crate::geometry::LayerCoefficients::export_all();

        let _ = crate::input::InputEvent::export_all();
        let _ = crate::input::TimedInput::export_all();

        let _ = crate::snapshot::RippleView::export_all();
        let _ = crate::snapshot::LayerTransform::export_all();
        let _ = crate::snapshot::CounterReading::export_all();
        let _ = crate::snapshot::FeatureReading::export_all();
        let _ = crate::snapshot::FrameSnapshot::export_all();
    }
}
