//! Capture-to-file pipeline for tracked face scans.
//!
//! A run takes the frames buffered during a capture session and produces
//! printable files:
//!
//! ```text
//! frames ─► aggregate ─► smooth ∘ scale ─► normals ─► export ─► persist
//! ```
//!
//! - [`run_pipeline`] runs synchronously on the calling thread
//! - [`PipelineWorker`] runs on a dedicated thread and publishes
//!   [`PipelineEvent`]s over a channel
//!
//! Configuration lives in [`PipelineConfig`], the destination in an
//! [`ExportContext`] the caller builds once and passes in. Files are written
//! atomically; a cancelled or failed run never leaves a partial file at a
//! destination path.
//!
//! # Example
//!
//! ```no_run
//! use mesh_types::Point3;
//! use scan_pipeline::{run_pipeline, CancelToken, ExportContext, PipelineConfig};
//! use sensor_capture::{CaptureBuffer, FrameSample, Topology};
//!
//! let topology = Topology::new(vec![[0, 1, 2]]);
//! let mut buffer = CaptureBuffer::default();
//! for _ in 0..3 {
//!     buffer.push(FrameSample::new(
//!         vec![
//!             Point3::new(0.0, 0.0, 0.0),
//!             Point3::new(0.01, 0.0, 0.0),
//!             Point3::new(0.0, 0.01, 0.0),
//!         ],
//!         topology.clone(),
//!     ));
//! }
//!
//! let report = run_pipeline(
//!     buffer.frames(),
//!     &PipelineConfig::for_printing(),
//!     &ExportContext::new("/tmp/scans", "face"),
//!     &CancelToken::new(),
//! )
//! .unwrap();
//! println!("{report}");
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cancel;
mod config;
mod context;
mod error;
mod events;
mod pipeline;
mod worker;

pub use cancel::CancelToken;
pub use config::{PipelineConfig, StageOrder};
pub use context::ExportContext;
pub use error::{PipelineError, PipelineResult, Stage};
pub use events::PipelineEvent;
pub use pipeline::{
    PersistedArtifact, PipelineReport, ProcessedMesh, SmoothingStats, export_artifacts,
    process_mesh, run_pipeline, run_pipeline_with_events,
};
pub use worker::PipelineWorker;
