//! Error types for knowgraph-engine
//!
//! Only failures of the engine itself surface as `Err`. Problems with the
//! scanned input are reported as [`Diagnostic`](crate::shared::Diagnostic)s.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// IO error outside per-file reading (e.g. walking the root directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The scan was cancelled; no partial graph is returned
    #[error("Scan cancelled")]
    Cancelled,

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Graph snapshot (de)serialization failed
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
