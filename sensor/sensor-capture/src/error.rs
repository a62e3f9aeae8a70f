//! Error types for capture aggregation.

use std::fmt;

use thiserror::Error;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// How a sample's topology differs from the session's first sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyMismatch {
    /// The sample has a different number of vertices.
    VertexCount {
        /// Vertex count of the first sample.
        expected: usize,
        /// Vertex count of the offending sample.
        actual: usize,
    },

    /// The sample carries a different triangle index list.
    Faces {
        /// Face count of the first sample.
        expected: usize,
        /// Face count of the offending sample.
        actual: usize,
    },
}

impl fmt::Display for TopologyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VertexCount { expected, actual } => {
                write!(f, "expected {expected} vertices, got {actual}")
            }
            Self::Faces { expected, actual } => write!(
                f,
                "triangle index list differs ({expected} faces expected, {actual} found)"
            ),
        }
    }
}

/// Errors that can occur while aggregating captured frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// No frames were captured.
    #[error("capture is empty: at least one frame is required")]
    EmptyCapture,

    /// A frame does not share the session's topology.
    #[error("frame {frame} has inconsistent topology: {mismatch}")]
    InconsistentTopology {
        /// Position of the offending frame in the capture.
        frame: usize,
        /// What differs.
        mismatch: TopologyMismatch,
    },
}
