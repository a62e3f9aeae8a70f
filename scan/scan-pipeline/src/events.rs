//! Progress events published by a running pipeline.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use mesh_io::{ExportStats, MeshFormat};

use crate::error::Stage;

/// Something observable happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A stage is about to run.
    StageStarted {
        /// The stage.
        stage: Stage,
    },
    /// A stage completed.
    StageFinished {
        /// The stage.
        stage: Stage,
        /// Wall time spent in the stage.
        elapsed: Duration,
    },
    /// An artifact reached its destination.
    ArtifactPersisted {
        /// Artifact format.
        format: MeshFormat,
        /// Final path.
        path: PathBuf,
        /// Export counts.
        stats: ExportStats,
    },
    /// The run stopped at a cancellation check.
    Cancelled {
        /// Stage that did not run.
        stage: Stage,
    },
}

/// Sending half used by the pipeline; a no-op when nobody listens.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventEmitter {
    sender: Option<mpsc::Sender<PipelineEvent>>,
}

impl EventEmitter {
    pub(crate) const fn new(sender: mpsc::Sender<PipelineEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    pub(crate) const fn silent() -> Self {
        Self { sender: None }
    }

    /// Send an event. A dropped receiver is not an error.
    pub(crate) fn emit(&self, event: PipelineEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
