//! Error types for pipeline runs.

use std::fmt;
use std::path::PathBuf;

use mesh_io::{IoError, MeshFormat};
use mesh_process::ProcessError;
use sensor_capture::CaptureError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline stages, in the order a run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    /// Averaging buffered frames into one mesh.
    Capture,
    /// Laplacian smoothing.
    Smooth,
    /// Uniform scaling.
    Scale,
    /// Vertex normal generation.
    Normals,
    /// Encoding artifacts in memory.
    Export,
    /// Writing artifacts to their destination.
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Capture => "capture",
            Self::Smooth => "smooth",
            Self::Scale => "scale",
            Self::Normals => "normals",
            Self::Export => "export",
            Self::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Errors that can end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Frames could not be aggregated.
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// The scale factor was rejected.
    #[error("scaling failed: {0}")]
    Scale(#[from] ProcessError),

    /// An artifact could not be encoded.
    #[error("{format} export failed: {source}")]
    Export {
        /// Format being encoded.
        format: MeshFormat,
        /// Underlying error.
        #[source]
        source: IoError,
    },

    /// An artifact could not be written to disk.
    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: IoError,
    },

    /// The run was cancelled before `stage` started.
    #[error("pipeline cancelled before {stage}")]
    Cancelled {
        /// Stage that did not run.
        stage: Stage,
    },

    /// The worker thread panicked.
    #[error("pipeline worker panicked")]
    WorkerPanicked,
}

impl PipelineError {
    /// Stage at which the run stopped, if attributable.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Capture(_) => Some(Stage::Capture),
            Self::Scale(_) => Some(Stage::Scale),
            Self::Export { .. } => Some(Stage::Export),
            Self::Persist { .. } => Some(Stage::Persist),
            Self::Cancelled { stage } => Some(*stage),
            Self::WorkerPanicked => None,
        }
    }

    /// Returns true if the run was cancelled rather than failing.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_attribution() {
        assert_eq!(
            PipelineError::from(CaptureError::EmptyCapture).stage(),
            Some(Stage::Capture)
        );
        assert_eq!(
            PipelineError::from(ProcessError::InvalidScale { scale: 0.0 }).stage(),
            Some(Stage::Scale)
        );
        assert_eq!(
            PipelineError::Cancelled {
                stage: Stage::Persist
            }
            .stage(),
            Some(Stage::Persist)
        );
        assert_eq!(PipelineError::WorkerPanicked.stage(), None);
    }

    #[test]
    fn messages_name_the_stage() {
        let err = PipelineError::Cancelled {
            stage: Stage::Smooth,
        };
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "pipeline cancelled before smooth");
    }
}
