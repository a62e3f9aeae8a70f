//! Temporal averaging of tracked frames.
//!
//! Each output vertex is the arithmetic mean of that vertex across all
//! accumulated samples:
//!
//! ```text
//! mesh.vertices[i] = (1 / N) * sum_k frame_k.vertices[i]
//! ```
//!
//! The accumulator keeps one running sum per vertex, so memory is bounded
//! by the vertex count, not by the number of frames.

// Frame counts don't overflow f64 precision in practice
#![allow(clippy::cast_precision_loss)]

use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::error::{CaptureError, CaptureResult, TopologyMismatch};
use crate::frame::{FrameSample, Topology};

/// Running-sum accumulator for same-topology frames.
///
/// The first sample fixes the topology. Later samples must match it; a
/// rejected sample leaves the accumulator unchanged.
///
/// # Example
///
/// ```
/// use sensor_capture::{FrameAccumulator, FrameSample, Topology};
/// use nalgebra::Point3;
///
/// let topology = Topology::new(vec![[0, 1, 2]]);
/// let mut acc = FrameAccumulator::new();
///
/// for x in [0.0, 2.0, 4.0] {
///     let sample = FrameSample::new(
///         vec![Point3::new(x, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
///         topology.clone(),
///     );
///     acc.add(&sample).unwrap();
/// }
///
/// let mesh = acc.finish().unwrap();
/// assert!((mesh.vertices[0].position.x - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameAccumulator {
    sums: Vec<Vector3<f64>>,
    topology: Option<Topology>,
    frames: usize,
}

impl FrameAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames accumulated so far.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frames
    }

    /// Check whether no frame has been accumulated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.frames == 0
    }

    /// Add one sample to the running sums.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InconsistentTopology`] if the sample's vertex
    /// count or triangle list differs from the first accumulated sample.
    pub fn add(&mut self, sample: &FrameSample) -> CaptureResult<()> {
        match &self.topology {
            None => {
                self.sums = sample.vertices().iter().map(|p| p.coords).collect();
                self.topology = Some(sample.topology().clone());
            }
            Some(topology) => {
                if sample.vertex_count() != self.sums.len() {
                    return Err(CaptureError::InconsistentTopology {
                        frame: self.frames,
                        mismatch: TopologyMismatch::VertexCount {
                            expected: self.sums.len(),
                            actual: sample.vertex_count(),
                        },
                    });
                }
                if !topology.same_as(sample.topology()) {
                    return Err(CaptureError::InconsistentTopology {
                        frame: self.frames,
                        mismatch: TopologyMismatch::Faces {
                            expected: topology.face_count(),
                            actual: sample.topology().face_count(),
                        },
                    });
                }
                for (sum, p) in self.sums.iter_mut().zip(sample.vertices()) {
                    *sum += p.coords;
                }
            }
        }

        self.frames += 1;
        debug!(frame = self.frames, "Accumulated frame");
        Ok(())
    }

    /// Produce the averaged mesh.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::EmptyCapture`] if no frame was accumulated.
    pub fn finish(self) -> CaptureResult<IndexedMesh> {
        let Some(topology) = self.topology else {
            return Err(CaptureError::EmptyCapture);
        };

        let n = self.frames as f64;
        let positions = self
            .sums
            .into_iter()
            .map(|sum| Point3::from(sum / n))
            .collect();

        info!(
            frames = self.frames,
            faces = topology.face_count(),
            "Aggregated capture"
        );

        Ok(IndexedMesh::from_positions(
            positions,
            topology.faces().to_vec(),
        ))
    }
}

/// Average a non-empty list of same-topology frames into one mesh.
///
/// The mesh's faces are the session topology, unchanged.
///
/// # Errors
///
/// - [`CaptureError::EmptyCapture`] if `frames` yields nothing
/// - [`CaptureError::InconsistentTopology`] if any frame differs from the
///   first; no partial average is produced
pub fn aggregate_frames<'a, I>(frames: I) -> CaptureResult<IndexedMesh>
where
    I: IntoIterator<Item = &'a FrameSample>,
{
    let mut acc = FrameAccumulator::new();
    for sample in frames {
        acc.add(sample)?;
    }
    acc.finish()
}
