//! Error types for the host binary.
//!
//! [`HostError`] is the top-level error type that wraps every failure mode
//! during startup and the frame loop.

/// Top-level error for the host binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lumen_core::config::ConfigError,
    },

    /// The engine could not be constructed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: lumen_core::engine::EngineError,
    },

    /// The input trace could not be loaded.
    #[error("trace error: {source}")]
    Trace {
        /// The underlying trace error.
        #[from]
        source: lumen_core::input::TraceError,
    },

    /// The frame loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: lumen_core::runner::RunnerError,
    },

    /// Writing frame output failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
