//! Surface samples.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vertex in 3D space with an optional shading normal.
///
/// Positions are stored as `Point3<f64>` so that averaging many tracked
/// samples does not lose precision. Exporters narrow to `f32` only when the
/// file format requires it.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Vertex};
///
/// let v1 = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// let v2 = Vertex::from_coords(1.0, 2.0, 3.0);
///
/// assert_eq!(v1.position, v2.position);
/// assert!(v1.normal.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Averaged surface position.
    pub position: Point3<f64>,

    /// Unit shading normal, filled in by normal generation.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// A vertex at `position` with no normal.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// A vertex at `(x, y, z)`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Vertex;
    ///
    /// let v = Vertex::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(v.position.x, 1.0);
    /// assert_eq!(v.position.z, 3.0);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// A vertex carrying a precomputed shading normal.
    #[inline]
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: Some(normal),
        }
    }

    /// Return a copy of this vertex at a new position.
    ///
    /// The normal is dropped because it no longer describes the surface.
    #[inline]
    #[must_use]
    pub const fn moved_to(&self, position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn coords_set_position_only() {
        let v = Vertex::from_coords(1.0, 2.0, 3.0);
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(v.normal.is_none());
    }

    #[test]
    fn normal_is_kept() {
        let v = Vertex::with_normal(Point3::origin(), Vector3::z());
        assert_eq!(v.normal, Some(Vector3::z()));
    }

    #[test]
    fn moved_vertex_drops_normal() {
        let v = Vertex::with_normal(Point3::origin(), Vector3::z());
        let moved = v.moved_to(Point3::new(1.0, 0.0, 0.0));
        assert_eq!(moved.position.x, 1.0);
        assert!(moved.normal.is_none());
    }

    #[test]
    fn converts_from_point() {
        let v: Vertex = Point3::new(4.0, 5.0, 6.0).into();
        assert_eq!(v.position.y, 5.0);
    }
}
