//! Error types for label matrices and label selection.

use jl_yoda::YodaError;
use thiserror::Error;

/// jl-label error type
#[derive(Error, Debug)]
pub enum LabelError {
    /// No label pattern occurs in the key. Callers log and skip these.
    #[error("no label pattern matches '{key}'")]
    NoCategoryMatch {
        /// The unmatched key.
        key: String,
    },

    /// The category table cannot be used.
    #[error("invalid category table: {0}")]
    InvalidCategories(String),

    /// A vocabulary produced no usable patterns.
    #[error("invalid label vocabulary: {0}")]
    InvalidVocabulary(String),

    /// A histogram cannot be read as a confusion matrix.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// Histogram model error.
    #[error(transparent)]
    Yoda(#[from] YodaError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LabelError>;
