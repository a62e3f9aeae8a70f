//! Tracked frame samples and their shared topology.

use std::sync::Arc;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The fixed triangle index list of a capture session.
///
/// Cloning is cheap: every sample of a session holds the same shared list.
///
/// # Example
///
/// ```
/// use sensor_capture::Topology;
///
/// let topology = Topology::new(vec![[0, 1, 2], [0, 2, 3]]);
/// let shared = topology.clone();
///
/// assert_eq!(topology.face_count(), 2);
/// assert!(topology.same_as(&shared));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Topology {
    faces: Arc<[[u32; 3]]>,
}

impl Topology {
    /// Create a topology from a triangle index list.
    #[must_use]
    pub fn new(faces: Vec<[u32; 3]>) -> Self {
        Self {
            faces: faces.into(),
        }
    }

    /// The triangle index list.
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check whether two topologies describe the same index list.
    ///
    /// Shared lists compare by pointer; distinct allocations fall back to
    /// element-wise comparison.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.faces, &other.faces) || self.faces == other.faces
    }
}

/// One tracked sample of the face surface.
///
/// Samples are immutable once captured.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameSample {
    vertices: Vec<Point3<f64>>,
    topology: Topology,
    timestamp: f64,
}

impl FrameSample {
    /// Create a sample with a zero timestamp.
    #[must_use]
    pub const fn new(vertices: Vec<Point3<f64>>, topology: Topology) -> Self {
        Self {
            vertices,
            topology,
            timestamp: 0.0,
        }
    }

    /// Set the capture timestamp, in seconds since session start.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Tracked vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Shared topology of the session.
    #[must_use]
    pub const fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Number of tracked vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Capture timestamp in seconds.
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn topology_shared_by_pointer() {
        let a = Topology::new(vec![[0, 1, 2]]);
        let b = a.clone();
        assert!(a.same_as(&b));
    }

    #[test]
    fn topology_equal_by_value() {
        let a = Topology::new(vec![[0, 1, 2]]);
        let b = Topology::new(vec![[0, 1, 2]]);
        let c = Topology::new(vec![[0, 2, 1]]);
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
    }

    #[test]
    fn sample_accessors() {
        let topology = Topology::new(vec![[0, 1, 2]]);
        let sample = FrameSample::new(vec![Point3::origin(); 3], topology).with_timestamp(0.25);

        assert_eq!(sample.vertex_count(), 3);
        assert_eq!(sample.topology().face_count(), 1);
        assert_eq!(sample.timestamp(), 0.25);
    }
}
