//! Configuration loading and typed config structures for the effects engine.
//!
//! The canonical configuration lives in `lumen-config.yaml` next to the host
//! binary. Every field has a default matching the landing page, so an empty
//! file (or no file at all) yields the page's behavior.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use lumen_types::StatFormat;
use serde::Deserialize;
use tracing::warn;

use crate::counter::Easing;
use crate::parallax::{self, ParallaxLayer};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `lumen-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EffectsConfig {
    /// Ripple lifetime and ambient throttle.
    #[serde(default)]
    pub ripples: RippleConfig,

    /// Counter animation timing.
    #[serde(default)]
    pub counter: CounterConfig,

    /// Stats region visibility trigger.
    #[serde(default)]
    pub visibility: VisibilityConfig,

    /// Animated statistics, in display order.
    #[serde(default = "default_stats")]
    pub stats: Vec<StatConfig>,

    /// Feature cards, in display order. Only the active card fills its bar.
    #[serde(default = "default_features")]
    pub features: Vec<FeatureConfig>,

    /// Parallax layers, back to front.
    #[serde(default = "parallax::page_layers")]
    pub layers: Vec<ParallaxLayer>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Frame driver settings for the host binary.
    #[serde(default)]
    pub driver: DriverConfig,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            ripples: RippleConfig::default(),
            counter: CounterConfig::default(),
            visibility: VisibilityConfig::default(),
            stats: default_stats(),
            features: default_features(),
            layers: parallax::page_layers(),
            logging: LoggingConfig::default(),
            driver: DriverConfig::default(),
        }
    }
}

impl EffectsConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// Environment variables override driver values:
    /// - `LUMEN_TRACE` overrides `driver.trace_path`
    /// - `LUMEN_MAX_FRAMES` overrides `driver.max_frames`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.driver.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ripples.ttl_ms == 0 {
            return Err(invalid("ripples.ttl_ms must be at least 1"));
        }
        if self.counter.steps == 0 {
            return Err(invalid("counter.steps must be at least 1"));
        }
        if self.counter.duration_ms == 0 {
            return Err(invalid("counter.duration_ms must be at least 1"));
        }
        let threshold = self.visibility.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(invalid(format!(
                "visibility.threshold must be in (0, 1], got {threshold}"
            )));
        }

        for stat in &self.stats {
            if !stat.target.is_finite() || stat.target < 0.0 {
                return Err(invalid(format!(
                    "stat '{}' target must be a finite non-negative number",
                    stat.label
                )));
            }
            if stat.bar_fill > 100 {
                return Err(invalid(format!(
                    "stat '{}' bar_fill must be at most 100",
                    stat.label
                )));
            }
        }

        for feature in &self.features {
            if feature.progress > 100 {
                return Err(invalid(format!(
                    "feature '{}' progress must be at most 100",
                    feature.title
                )));
            }
        }

        let mut names = BTreeSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(invalid("layer names must not be empty"));
            }
            if !names.insert(layer.name.as_str()) {
                return Err(invalid(format!("duplicate layer name '{}'", layer.name)));
            }
        }

        if self.driver.snapshot_every == 0 {
            return Err(invalid("driver.snapshot_every must be at least 1"));
        }
        Ok(())
    }

    /// Targets of every configured stat, in display order.
    pub fn targets(&self) -> Vec<f64> {
        self.stats.iter().map(|stat| stat.target).collect()
    }
}

/// Ripple configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RippleConfig {
    /// Lifetime of every ripple in milliseconds.
    #[serde(default = "default_ripple_ttl_ms")]
    pub ttl_ms: u64,

    /// Minimum spacing between ambient ripples in milliseconds.
    #[serde(default = "default_ambient_throttle_ms")]
    pub ambient_throttle_ms: u64,
}

impl RippleConfig {
    /// Ripple lifetime.
    pub const fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Ambient ripple spacing.
    pub const fn ambient_throttle(&self) -> Duration {
        Duration::from_millis(self.ambient_throttle_ms)
    }
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ripple_ttl_ms(),
            ambient_throttle_ms: default_ambient_throttle_ms(),
        }
    }
}

/// Counter animation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CounterConfig {
    /// Total animation length in milliseconds.
    #[serde(default = "default_counter_duration_ms")]
    pub duration_ms: u64,

    /// Number of ticks in a run.
    #[serde(default = "default_counter_steps")]
    pub steps: u32,

    /// Easing curve.
    #[serde(default)]
    pub easing: Easing,
}

impl CounterConfig {
    /// Total animation length.
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_counter_duration_ms(),
            steps: default_counter_steps(),
            easing: Easing::default(),
        }
    }
}

/// Visibility trigger configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VisibilityConfig {
    /// Intersection ratio at which the stats region counts as visible.
    #[serde(default = "default_visibility_threshold")]
    pub threshold: f64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            threshold: default_visibility_threshold(),
        }
    }
}

/// One animated statistic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatConfig {
    /// Caption shown under the number.
    pub label: String,

    /// Final value of the animation.
    pub target: f64,

    /// Display projection.
    #[serde(default)]
    pub format: StatFormat,

    /// Progress-bar fill percentage once the stats region is seen.
    #[serde(default)]
    pub bar_fill: u8,
}

/// One feature card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeatureConfig {
    /// Card title.
    pub title: String,

    /// Progress percentage the card's bar fills to while highlighted.
    #[serde(default)]
    pub progress: u8,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Frame driver configuration for the host binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverConfig {
    /// Milliseconds between frames; 0 replays as fast as possible.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Stop after this many frames (0 = until input and timers run out).
    #[serde(default)]
    pub max_frames: u64,

    /// Emit one snapshot every N frames.
    #[serde(default = "default_snapshot_every")]
    pub snapshot_every: u64,

    /// Newline-delimited JSON input trace to replay. Synthetic input is
    /// generated when absent.
    #[serde(default)]
    pub trace_path: Option<String>,

    /// Seed for the synthetic input generator.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Length of the synthetic input session in milliseconds.
    #[serde(default = "default_synthetic_duration_ms")]
    pub synthetic_duration_ms: u64,
}

impl DriverConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("LUMEN_TRACE") {
            self.trace_path = Some(path);
        }
        if let Ok(raw) = std::env::var("LUMEN_MAX_FRAMES") {
            match raw.parse::<u64>() {
                Ok(max_frames) => self.max_frames = max_frames,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid LUMEN_MAX_FRAMES"),
            }
        }
    }

    /// Time between frames.
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            max_frames: 0,
            snapshot_every: default_snapshot_every(),
            trace_path: None,
            seed: default_seed(),
            synthetic_duration_ms: default_synthetic_duration_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_ripple_ttl_ms() -> u64 {
    1000
}

const fn default_ambient_throttle_ms() -> u64 {
    100
}

const fn default_counter_duration_ms() -> u64 {
    2000
}

const fn default_counter_steps() -> u32 {
    60
}

const fn default_visibility_threshold() -> f64 {
    0.5
}

fn default_stats() -> Vec<StatConfig> {
    vec![
        StatConfig {
            label: "Active Streamers".to_owned(),
            target: 10_000_000.0,
            format: StatFormat::Millions { decimals: 1 },
            bar_fill: 85,
        },
        StatConfig {
            label: "Hours Watched".to_owned(),
            target: 500_000_000.0,
            format: StatFormat::Millions { decimals: 0 },
            bar_fill: 90,
        },
        StatConfig {
            label: "Game Categories".to_owned(),
            target: 50.0,
            format: StatFormat::Count,
            bar_fill: 95,
        },
        StatConfig {
            label: "Uptime".to_owned(),
            target: 99.9,
            format: StatFormat::Percent { decimals: 1 },
            bar_fill: 100,
        },
    ]
}

fn default_features() -> Vec<FeatureConfig> {
    [
        ("Ultra-Low Latency", 95),
        ("Community Hub", 88),
        ("AI-Powered Tools", 92),
        ("Monetization", 90),
    ]
    .into_iter()
    .map(|(title, progress)| FeatureConfig {
        title: title.to_owned(),
        progress,
    })
    .collect()
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_frame_interval_ms() -> u64 {
    16
}

const fn default_snapshot_every() -> u64 {
    1
}

const fn default_seed() -> u64 {
    42
}

const fn default_synthetic_duration_ms() -> u64 {
    5000
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EffectsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ripples.ttl_ms, 1000);
        assert_eq!(config.ripples.ambient_throttle_ms, 100);
        assert_eq!(config.counter.steps, 60);
        assert_eq!(config.counter.duration_ms, 2000);
        assert_eq!(config.counter.easing, Easing::EaseOutQuart);
        assert_eq!(config.targets(), vec![10_000_000.0, 500_000_000.0, 50.0, 99.9]);
        assert_eq!(config.layers.len(), 17);
        let progress: Vec<u8> = config.features.iter().map(|f| f.progress).collect();
        assert_eq!(progress, vec![95, 88, 92, 90]);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
ripples:
  ttl_ms: 800
  ambient_throttle_ms: 50

counter:
  duration_ms: 1000
  steps: 30
  easing: ease_out_cubic

visibility:
  threshold: 0.25

stats:
  - label: "Players"
    target: 1200
    format: { style: count }
    bar_fill: 70
  - label: "Satisfaction"
    target: 97.5
    format: { style: percent, decimals: 1 }

features:
  - title: "Matchmaking"
    progress: 80
  - title: "Replays"

layers:
  - name: "sky"
    coefficients: { scroll_y: 0.1, pointer_x: 0.02, pointer_y: 0.02 }
  - name: "title"
    coefficients: { scroll_y: 0.3, scale_factor: 0.0002 }

logging:
  level: "debug"

driver:
  frame_interval_ms: 0
  snapshot_every: 5
  seed: 7
"#;

        let config = EffectsConfig::parse(yaml).unwrap();
        assert_eq!(config.ripples.ttl_ms, 800);
        assert_eq!(config.counter.steps, 30);
        assert_eq!(config.counter.easing, Easing::EaseOutCubic);
        assert!((config.visibility.threshold - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.stats.len(), 2);
        assert_eq!(config.stats.get(1).map(|s| s.format), Some(StatFormat::Percent { decimals: 1 }));
        assert_eq!(config.stats.get(1).map(|s| s.bar_fill), Some(0));
        assert_eq!(config.features.len(), 2);
        assert_eq!(config.features.first().map(|f| f.progress), Some(80));
        assert_eq!(config.features.get(1).map(|f| f.progress), Some(0));
        assert_eq!(config.layers.len(), 2);
        assert_eq!(
            config.layers.get(1).and_then(|l| l.coefficients.scale_factor),
            Some(0.0002)
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.driver.snapshot_every, 5);
        assert_eq!(config.driver.seed, 7);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = EffectsConfig::parse("ripples:\n  ttl_ms: 500\n").unwrap();
        assert_eq!(config.ripples.ttl_ms, 500);
        // Everything else uses defaults.
        assert_eq!(config.ripples.ambient_throttle_ms, 100);
        assert_eq!(config.stats.len(), 4);
        assert_eq!(config.layers.len(), 17);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(EffectsConfig::parse("").is_ok());
    }

    #[test]
    fn reject_zero_ttl() {
        let result = EffectsConfig::parse("ripples:\n  ttl_ms: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn reject_zero_steps() {
        let result = EffectsConfig::parse("counter:\n  steps: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn reject_threshold_out_of_range() {
        assert!(EffectsConfig::parse("visibility:\n  threshold: 0\n").is_err());
        assert!(EffectsConfig::parse("visibility:\n  threshold: 1.5\n").is_err());
        assert!(EffectsConfig::parse("visibility:\n  threshold: 1.0\n").is_ok());
    }

    #[test]
    fn reject_feature_progress_over_100() {
        let yaml = "features:\n  - title: x\n    progress: 101\n";
        let result = EffectsConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
        assert!(EffectsConfig::parse("features:\n  - title: x\n    progress: 100\n").is_ok());
    }

    #[test]
    fn reject_duplicate_layer_names() {
        let yaml = "layers:\n  - name: a\n  - name: a\n";
        let result = EffectsConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn reject_malformed_yaml() {
        let result = EffectsConfig::parse("ripples: [not, a, map");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }
}
