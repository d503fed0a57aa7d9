//! Error types for the filesystem-facing layer.
//!
//! Ranking and caching are infallible; only walking a directory and
//! coordinating background index builds can fail.

use std::path::PathBuf;

/// Result type alias for path search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while building or swapping an index.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The specified root directory does not exist.
    #[error("Root directory does not exist: {0}")]
    RootNotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An ignore pattern could not be compiled.
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidIgnorePattern { pattern: String, reason: String },

    /// Index is currently being built.
    #[error("Path index is currently being built. Please wait.")]
    IndexBuilding,

    /// The background indexing task did not complete.
    #[error("Indexing task failed: {0}")]
    TaskFailed(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error wrapper.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl SearchError {
    /// Creates a new `RootNotFound` error.
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound(path.into())
    }

    /// Creates a new `NotADirectory` error.
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Creates a new `InvalidIgnorePattern` error.
    pub fn invalid_ignore_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIgnorePattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `TaskFailed` error.
    pub fn task_failed(reason: impl std::fmt::Display) -> Self {
        Self::TaskFailed(reason.to_string())
    }
}
