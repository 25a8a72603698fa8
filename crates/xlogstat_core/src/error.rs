//! Error types for xlogstat core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Errors that can occur while analyzing xlog dumps.
///
/// Classification and accumulation never fail; these errors come from the
/// rollup precondition and from collaborators (input sources, resolvers).
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A rollup was finished without any merged input.
    #[error("rollup requires at least one input")]
    EmptyInputSet,

    /// An input segment dump does not exist or is not a regular file.
    #[error("input not found: {}", .path.display())]
    InputNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// I/O error while reading an input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Relation name mapping could not be parsed.
    #[error("invalid relation name mapping: {0}")]
    Mapping(#[from] serde_json::Error),

    /// A relation name lookup failed.
    #[error("relation resolver failed: {message}")]
    Resolver {
        /// Description of the failure.
        message: String,
    },

    /// The analyzer configuration is not usable.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// A worker thread panicked while analyzing a segment.
    #[error("worker for segment {segment} panicked")]
    WorkerPanicked {
        /// Name of the segment the worker was processing.
        segment: String,
    },
}

impl AnalyzerError {
    /// Creates an input not found error.
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Creates a resolver error.
    pub fn resolver(message: impl Into<String>) -> Self {
        Self::Resolver {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
