//! Capture and temporal aggregation of tracked face samples.
//!
//! A tracking session delivers one [`FrameSample`] per update tick. Every
//! sample of a session shares the same fixed [`Topology`]; only vertex
//! positions move. This crate provides:
//!
//! - [`CaptureBuffer`] - Bounded buffer that owns samples until aggregation
//! - [`FrameAccumulator`] - Running-sum accumulator that averages samples
//!   without retaining them
//! - [`aggregate_frames`] - Average a list of samples into one [`IndexedMesh`]
//!
//! Which frames are offered is decided by the tracking collaborator's own
//! quality gate; this crate does not re-validate frame quality.
//!
//! # Example
//!
//! ```
//! use sensor_capture::{aggregate_frames, FrameSample, Topology};
//! use nalgebra::Point3;
//!
//! let topology = Topology::new(vec![[0, 1, 2]]);
//! let a = FrameSample::new(
//!     vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
//!     topology.clone(),
//! );
//! let b = FrameSample::new(
//!     vec![Point3::new(2.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
//!     topology,
//! );
//!
//! let mesh = aggregate_frames([&a, &b]).unwrap();
//! assert!((mesh.vertices[0].position.x - 1.0).abs() < 1e-12);
//! ```
//!
//! [`IndexedMesh`]: mesh_types::IndexedMesh

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod aggregate;
mod buffer;
mod error;
mod frame;

pub use aggregate::{FrameAccumulator, aggregate_frames};
pub use buffer::{CaptureBuffer, DEFAULT_CAPTURE_CAPACITY, PushOutcome};
pub use error::{CaptureError, CaptureResult, TopologyMismatch};
pub use frame::{FrameSample, Topology};
