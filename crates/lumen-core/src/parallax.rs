//! Parallax transform calculator and the page's layer catalog.
//!
//! [`compute`] is pure: identical scroll, pointer, and coefficients always
//! produce the identical transform. It always consumes the most recent
//! sample and applies no smoothing between frames.

use lumen_types::{LayerCoefficients, LayerTransform, Point, Transform};
use serde::Deserialize;

use crate::sampler::SampleState;

/// Number of floating icons drifting over the page background.
pub const FLOATING_OBJECT_COUNT: u32 = 6;

/// Compute the transform of one layer.
///
/// ```text
/// translate_x = pointer.x * pointer_x + scroll * scroll_x
/// translate_y = pointer.y * pointer_y + scroll * scroll_y
/// scale       = 1 + scroll * scale_factor   (1 without a scale factor)
/// ```
pub fn compute(scroll: f64, pointer: Point, coefficients: &LayerCoefficients) -> Transform {
    Transform {
        translate_x: pointer.x.mul_add(coefficients.pointer_x, scroll * coefficients.scroll_x),
        translate_y: pointer.y.mul_add(coefficients.pointer_y, scroll * coefficients.scroll_y),
        scale: coefficients
            .scale_factor
            .map_or(1.0, |factor| scroll.mul_add(factor, 1.0)),
    }
}

/// A named visual layer and its motion coefficients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParallaxLayer {
    /// Name the renderer uses to find this layer's transform.
    pub name: String,
    /// Motion coefficients.
    #[serde(default)]
    pub coefficients: LayerCoefficients,
}

impl ParallaxLayer {
    /// Create a named layer.
    pub fn new(name: impl Into<String>, coefficients: LayerCoefficients) -> Self {
        Self {
            name: name.into(),
            coefficients,
        }
    }

    /// Transform of this layer for the given samples.
    pub fn transform(&self, samples: SampleState) -> LayerTransform {
        LayerTransform {
            name: self.name.clone(),
            transform: compute(samples.scroll, samples.pointer, &self.coefficients),
        }
    }
}

/// Coefficients of the `index`-th floating icon. Icons further down the list
/// drift faster with scroll.
pub fn floating_object(index: u32) -> LayerCoefficients {
    let i = f64::from(index);
    LayerCoefficients::STILL
        .with_scroll(0.05f64.mul_add(i, 0.1), 0.02f64.mul_add(i, 0.05))
        .with_pointer(0.01, 0.008)
}

/// The layers of the landing page, back to front.
pub fn page_layers() -> Vec<ParallaxLayer> {
    let mut layers = vec![
        // Full-viewport radial glows behind everything.
        ParallaxLayer::new(
            "backdrop-glow-center",
            LayerCoefficients::STILL
                .with_scroll(0.0, 0.1)
                .with_pointer(0.02, 0.02),
        ),
        ParallaxLayer::new(
            "backdrop-glow-upper-right",
            LayerCoefficients::STILL
                .with_scroll(0.0, 0.05)
                .with_pointer(-0.015, -0.015),
        ),
        ParallaxLayer::new(
            "backdrop-glow-lower-left",
            LayerCoefficients::STILL
                .with_scroll(0.0, 0.15)
                .with_pointer(0.01, 0.01),
        ),
    ];

    layers.extend(
        (0..FLOATING_OBJECT_COUNT)
            .map(|index| ParallaxLayer::new(format!("floating-object-{index}"), floating_object(index))),
    );

    layers.extend([
        ParallaxLayer::new(
            "hero-backdrop",
            LayerCoefficients::STILL.with_scroll(0.0, 0.3).with_scale(0.0002),
        ),
        ParallaxLayer::new(
            "hero-sparkles",
            LayerCoefficients::STILL
                .with_scroll(0.05, 0.2)
                .with_pointer(0.01, 0.01),
        ),
        ParallaxLayer::new(
            "floating-card-left",
            LayerCoefficients::STILL
                .with_scroll(0.0, -0.2)
                .with_pointer(0.01, 0.01),
        ),
        ParallaxLayer::new(
            "floating-card-right",
            LayerCoefficients::STILL
                .with_scroll(0.0, -0.3)
                .with_pointer(-0.01, 0.015),
        ),
        ParallaxLayer::new(
            "floating-card-bottom",
            LayerCoefficients::STILL
                .with_scroll(0.0, -0.15)
                .with_pointer(0.008, -0.01),
        ),
        ParallaxLayer::new(
            "stat-tile",
            LayerCoefficients::STILL
                .with_scroll(0.0, 0.05)
                .with_pointer(0.005, 0.003),
        ),
        ParallaxLayer::new(
            "feature-card",
            LayerCoefficients::STILL
                .with_scroll(0.0, 0.02)
                .with_pointer(0.003, 0.002),
        ),
        ParallaxLayer::new("cta-backdrop", LayerCoefficients::STILL.with_scroll(0.0, 0.1)),
    ]);

    layers
}
