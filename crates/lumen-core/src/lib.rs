//! Effects engine for the Lumen page layer.
//!
//! This crate owns every piece of interactive effect state behind one
//! explicitly constructed [`EffectsEngine`]: click and ambient ripples,
//! scroll/pointer parallax, the stats visibility trigger, and the eased
//! counter animation it starts.
//!
//! # Modules
//!
//! - [`clock`] -- Engine timestamps and the [`Clock`] trait (monotonic and
//!   stepped implementations).
//! - [`config`] -- Configuration loading from `lumen-config.yaml` into
//!   strongly-typed structs.
//! - [`counter`] -- Eased counter animation and easing curves.
//! - [`engine`] -- The [`EffectsEngine`] composing everything below.
//! - [`format`] -- Display projection of counter values.
//! - [`input`] -- [`InputSource`] trait, trace replay, and [`NoInput`].
//! - [`parallax`] -- Pure layer transforms and the page's layer catalog.
//! - [`ripple`] -- Per-kind ripple collections with timed expiry.
//! - [`runner`] -- Async frame loop.
//! - [`sampler`] -- Latest scroll/pointer samples and the ambient throttle.
//! - [`timer`] -- Min-heap queue for deferred and periodic tasks.
//! - [`visibility`] -- One-shot visibility latch.
//!
//! [`Clock`]: clock::Clock
//! [`EffectsEngine`]: engine::EffectsEngine
//! [`InputSource`]: input::InputSource
//! [`NoInput`]: input::NoInput

pub mod clock;
pub mod config;
pub mod counter;
pub mod engine;
pub mod format;
pub mod input;
pub mod parallax;
pub mod ripple;
pub mod runner;
pub mod sampler;
pub mod timer;
pub mod visibility;
