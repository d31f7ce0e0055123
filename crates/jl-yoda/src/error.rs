//! Error types for YODA archive I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, decoding or writing YODA archives.
#[derive(Error, Debug)]
pub enum YodaError {
    /// The input archive does not exist.
    #[error("input archive not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The archive text could not be parsed.
    #[error("malformed archive at line {line}: {message}")]
    MalformedArchive {
        /// 1-based line number of the offending line.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// An output archive could not be written.
    #[error("failed to write {}: {source}", path.display())]
    OutputWriteFailure {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid histogram operation (bad binning, null-area normalization, ...).
    #[error("histogram error: {0}")]
    Histogram(String),

    /// I/O error while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl YodaError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedArchive { line, message: message.into() }
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, YodaError>;
