//! Running the pipeline off the capture thread.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use sensor_capture::{CaptureBuffer, FrameSample};
use tracing::{error, info};

use crate::cancel::CancelToken;
use crate::config::PipelineConfig;
use crate::context::ExportContext;
use crate::error::{PipelineError, PipelineResult};
use crate::events::{EventEmitter, PipelineEvent};
use crate::pipeline::{PipelineReport, run_with};

/// Handle to a pipeline running on its own thread.
///
/// The worker owns its frames, configuration and context; nothing is shared
/// with the capture side except the [`CancelToken`] and the event channel.
///
/// # Example
///
/// ```no_run
/// use scan_pipeline::{ExportContext, PipelineConfig, PipelineWorker};
///
/// let frames = Vec::new(); // filled by the capture session
/// let worker = PipelineWorker::spawn(
///     frames,
///     PipelineConfig::for_printing(),
///     ExportContext::new("/tmp/scans", "face"),
/// )
/// .unwrap();
///
/// for event in worker.events() {
///     println!("{event:?}");
/// }
/// let report = worker.join().unwrap();
/// println!("{report}");
/// ```
#[derive(Debug)]
pub struct PipelineWorker {
    handle: JoinHandle<PipelineResult<PipelineReport>>,
    events: mpsc::Receiver<PipelineEvent>,
    cancel: CancelToken,
}

impl PipelineWorker {
    /// Start a run on a new thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be created.
    pub fn spawn(
        frames: Vec<FrameSample>,
        config: PipelineConfig,
        context: ExportContext,
    ) -> std::io::Result<Self> {
        let (sender, events) = mpsc::channel();
        let cancel = CancelToken::new();
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name("scan-pipeline".to_string())
            .spawn(move || {
                let emitter = EventEmitter::new(sender);
                let result = run_with(&frames, &config, &context, &token, &emitter);
                if let Err(e) = &result {
                    if !e.is_cancelled() {
                        error!(error = %e, stage = ?e.stage(), "Scan pipeline failed");
                    }
                }
                result
            })?;

        info!("Spawned scan pipeline worker");
        Ok(Self {
            handle,
            events,
            cancel,
        })
    }

    /// Start a run on the frames currently held by `buffer`, leaving it empty.
    ///
    /// # Errors
    ///
    /// See [`spawn`](Self::spawn).
    pub fn spawn_from_buffer(
        buffer: &mut CaptureBuffer,
        config: PipelineConfig,
        context: ExportContext,
    ) -> std::io::Result<Self> {
        Self::spawn(buffer.take(), config, context)
    }

    /// Request cancellation. The run stops at its next check.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token sharing this worker's cancellation flag.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Blocking iterator over progress events. Ends when the run finishes.
    pub fn events(&self) -> mpsc::Iter<'_, PipelineEvent> {
        self.events.iter()
    }

    /// Events published since the last call, without blocking.
    pub fn drain_events(&self) -> Vec<PipelineEvent> {
        self.events.try_iter().collect()
    }

    /// Returns true once the worker thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to end and return its outcome.
    ///
    /// # Errors
    ///
    /// Returns the run's error, or [`PipelineError::WorkerPanicked`].
    pub fn join(self) -> PipelineResult<PipelineReport> {
        self.handle
            .join()
            .map_err(|_| PipelineError::WorkerPanicked)?
    }
}
