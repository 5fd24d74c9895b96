//! Points, transforms, and parallax coefficients.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A position in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Express this point relative to `origin` (e.g. a client position
    /// relative to the top-left corner of the element that was clicked).
    pub fn relative_to(self, origin: Self) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

/// A 2D transform applied to one visual layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Transform {
    /// Horizontal translation in pixels.
    pub translate_x: f64,
    /// Vertical translation in pixels.
    pub translate_y: f64,
    /// Uniform scale; `1.0` for layers without a scale factor.
    pub scale: f64,
}

impl Transform {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-layer multipliers mapping scroll and pointer samples to motion.
///
/// Background layers use small coefficients and foreground cards larger
/// ones, which is what produces the depth illusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct LayerCoefficients {
    /// Horizontal motion per pixel of scroll.
    pub scroll_x: f64,
    /// Vertical motion per pixel of scroll.
    pub scroll_y: f64,
    /// Horizontal motion per pixel of pointer x.
    pub pointer_x: f64,
    /// Vertical motion per pixel of pointer y.
    pub pointer_y: f64,
    /// Scale growth per pixel of scroll; `None` keeps the layer unscaled.
    #[ts(optional)]
    pub scale_factor: Option<f64>,
}

impl LayerCoefficients {
    /// All-zero coefficients: the layer never moves.
    pub const STILL: Self = Self {
        scroll_x: 0.0,
        scroll_y: 0.0,
        pointer_x: 0.0,
        pointer_y: 0.0,
        scale_factor: None,
    };

    /// Set the scroll multipliers.
    #[must_use]
    pub const fn with_scroll(mut self, x: f64, y: f64) -> Self {
        self.scroll_x = x;
        self.scroll_y = y;
        self
    }

    /// Set the pointer multipliers.
    #[must_use]
    pub const fn with_pointer(mut self, x: f64, y: f64) -> Self {
        self.pointer_x = x;
        self.pointer_y = y;
        self
    }

    /// Set the scroll-driven scale factor.
    #[must_use]
    pub const fn with_scale(mut self, factor: f64) -> Self {
        self.scale_factor = Some(factor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_to_subtracts_origin() {
        let client = Point::new(150.0, 40.0);
        let origin = Point::new(100.0, 25.0);
        assert_eq!(client.relative_to(origin), Point::new(50.0, 15.0));
    }

    #[test]
    fn builders_compose() {
        let coeffs = LayerCoefficients::STILL
            .with_scroll(0.05, 0.2)
            .with_pointer(0.01, 0.01)
            .with_scale(0.0002);
        assert_eq!(coeffs.scroll_y, 0.2);
        assert_eq!(coeffs.pointer_x, 0.01);
        assert_eq!(coeffs.scale_factor, Some(0.0002));
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default(), Transform::IDENTITY);
    }
}
