//! Error types for mesh processing.

use thiserror::Error;

/// Result type for processing operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors that can occur during mesh processing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// Scale factor is not a finite positive number.
    #[error("invalid scale factor {scale}: must be finite and greater than zero")]
    InvalidScale {
        /// The rejected factor.
        scale: f64,
    },
}
