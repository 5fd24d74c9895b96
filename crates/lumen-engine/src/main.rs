//! Headless host for the Lumen effects engine.
//!
//! Wires configuration, an input source, and a JSON-lines frame sink around
//! one [`EffectsEngine`] and runs the frame loop until it goes quiet or hits
//! its frame limit.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lumen-config.yaml` (or `LUMEN_CONFIG`)
//! 2. Initialize structured logging (tracing) on stderr
//! 3. Build the engine
//! 4. Pick the input source: recorded trace if configured, synthetic otherwise
//! 5. Run the frame loop, writing snapshots to stdout
//! 6. Log the result
//!
//! [`EffectsEngine`]: lumen_core::engine::EffectsEngine

mod error;
mod sink;
mod synthetic;

use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lumen_core::clock::MonotonicClock;
use lumen_core::config::EffectsConfig;
use lumen_core::engine::EffectsEngine;
use lumen_core::input::{InputSource, ScriptedInput};
use lumen_core::runner::{self, RunOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::HostError;
use crate::sink::JsonLinesSink;
use crate::synthetic::SyntheticInput;

const DEFAULT_CONFIG_PATH: &str = "lumen-config.yaml";

/// Application entry point for the host.
///
/// # Errors
///
/// Returns an error if configuration, trace loading, or the frame loop fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        config_path = ?config_path,
        layers = config.layers.len(),
        stats = config.stats.len(),
        frame_interval_ms = config.driver.frame_interval_ms,
        max_frames = config.driver.max_frames,
        "Configuration loaded"
    );

    // 3. Build the engine.
    let driver = config.driver.clone();
    let mut engine = EffectsEngine::new(config).map_err(HostError::from)?;

    // 4. Pick the input source.
    let mut source: Box<dyn InputSource> = match driver.trace_path.as_deref() {
        Some(path) => Box::new(ScriptedInput::from_file(Path::new(path)).map_err(HostError::from)?),
        None => {
            info!(
                seed = driver.seed,
                duration_ms = driver.synthetic_duration_ms,
                "No input trace configured, generating synthetic input"
            );
            Box::new(SyntheticInput::new(
                driver.seed,
                Duration::from_millis(driver.synthetic_duration_ms),
            ))
        }
    };

    // 5. Run the frame loop.
    let mut clock = MonotonicClock::start();
    let mut sink = JsonLinesSink::new(BufWriter::new(std::io::stdout()), driver.snapshot_every);
    let options = RunOptions {
        frame_interval: driver.frame_interval(),
        max_frames: driver.max_frames,
    };

    let result = runner::run_frames(&mut engine, &mut clock, source.as_mut(), &mut sink, options)
        .await
        .map_err(HostError::from)?;

    // 6. Log the result.
    let written = sink.written();
    let _ = sink.finish().map_err(HostError::from)?;
    info!(
        reason = ?result.end_reason,
        frames = result.frames,
        written,
        "lumen-engine finished"
    );

    Ok(())
}

/// Load configuration from `LUMEN_CONFIG`, or `lumen-config.yaml` in the
/// working directory. Falls back to defaults when neither exists.
fn load_config() -> Result<(EffectsConfig, Option<PathBuf>), HostError> {
    let config_path = std::env::var("LUMEN_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if config_path.exists() {
        let config = EffectsConfig::from_file(&config_path)?;
        Ok((config, Some(config_path)))
    } else {
        let mut config = EffectsConfig::default();
        config.driver.apply_env_overrides();
        Ok((config, None))
    }
}
