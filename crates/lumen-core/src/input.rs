//! Input sources feeding the frame runner.
//!
//! The [`InputSource`] trait abstracts where notifications come from: a
//! recorded trace ([`ScriptedInput`]), a synthetic generator in the host
//! binary, or nothing at all ([`NoInput`]). The runner polls the source once
//! per frame and applies every event due by then.
//!
//! Traces are newline-delimited JSON, one [`TimedInput`] per line:
//!
//! ```text
//! {"at_ms":0,"event":{"type":"scroll","offset":0.0}}
//! {"at_ms":120,"event":{"type":"pointer_move","x":12.5,"y":40.0}}
//! ```

use std::collections::VecDeque;
use std::path::Path;

use lumen_types::TimedInput;
use tracing::info;

use crate::clock::Timestamp;

/// Errors that can occur when loading an input trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// Failed to read the trace file.
    #[error("failed to read input trace: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A line is not a valid timed input.
    #[error("invalid input trace line {line}: {source}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// A source of input notifications.
pub trait InputSource: Send {
    /// Return every pending input due at or before `now`, in time order.
    fn poll(&mut self, now: Timestamp) -> Vec<TimedInput>;

    /// Whether the source will never produce another input.
    fn is_exhausted(&self) -> bool;
}

/// Replays a fixed list of inputs in time order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending: VecDeque<TimedInput>,
}

impl ScriptedInput {
    /// Build a source from `inputs`. Inputs are stably sorted by time, so
    /// events sharing a timestamp keep their recorded order.
    pub fn new(mut inputs: Vec<TimedInput>) -> Self {
        inputs.sort_by_key(|input| input.at_ms);
        Self {
            pending: inputs.into(),
        }
    }

    /// Parse a newline-delimited JSON trace. Blank lines are skipped.
    pub fn parse_trace(trace: &str) -> Result<Self, TraceError> {
        let mut inputs = Vec::new();
        for (index, raw) in trace.lines().enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let input = serde_json::from_str::<TimedInput>(raw).map_err(|source| {
                TraceError::Parse {
                    line: index.saturating_add(1),
                    source,
                }
            })?;
            inputs.push(input);
        }
        Ok(Self::new(inputs))
    }

    /// Load a trace file.
    pub fn from_file(path: &Path) -> Result<Self, TraceError> {
        let contents = std::fs::read_to_string(path)?;
        let source = Self::parse_trace(&contents)?;
        info!(path = %path.display(), events = source.remaining(), "input trace loaded");
        Ok(source)
    }

    /// Inputs not yet handed out.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, now: Timestamp) -> Vec<TimedInput> {
        let now_ms = now.as_millis();
        let due = self
            .pending
            .iter()
            .take_while(|input| input.at_ms <= now_ms)
            .count();
        self.pending.drain(..due).collect()
    }

    fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

/// A source that never produces input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _now: Timestamp) -> Vec<TimedInput> {
        Vec::new()
    }

    fn is_exhausted(&self) -> bool {
        true
    }
}
