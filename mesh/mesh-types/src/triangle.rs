//! Resolved triangles.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Produced by the bounds-checked face accessors on
/// [`IndexedMesh`](crate::IndexedMesh). Vertices keep the face's index order,
/// so the winding (and therefore the normal direction) is preserved.
///
/// # Example
///
/// ```
/// use mesh_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// assert!((tri.unit_normal().z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// Corner `a` of the face.
    pub v0: Point3<f64>,
    /// Corner `b` of the face.
    pub v1: Point3<f64>,
    /// Corner `c` of the face.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Triangle with corners in winding order.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Compute the (unnormalized) face normal `(v1 - v0) × (v2 - v0)`.
    ///
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    ///
    /// Degenerate (zero-area) triangles yield the zero vector rather than
    /// `NaN`, so they can be accumulated or written without special casing.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Point3, Triangle};
    ///
    /// let degen = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    /// );
    /// assert_eq!(degen.unit_normal().norm(), 0.0);
    /// ```
    #[must_use]
    pub fn unit_normal(&self) -> Vector3<f64> {
        let n = self.normal_unnormalized();
        let len = n.norm();
        if len > f64::EPSILON {
            n / len
        } else {
            Vector3::zeros()
        }
    }

    /// Surface area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Check whether the triangle has (numerically) zero area.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal_unnormalized().norm() <= f64::EPSILON
    }

    /// Vertices in winding order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn xy_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn unit_normal_follows_winding() {
        let tri = xy_triangle();
        assert_relative_eq!(tri.unit_normal(), Vector3::z(), epsilon = 1e-12);

        let flipped = Triangle::new(tri.v0, tri.v2, tri.v1);
        assert_relative_eq!(flipped.unit_normal(), -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_normal_is_zero() {
        let tri = Triangle::new(Point3::origin(), Point3::origin(), Point3::origin());
        assert!(tri.is_degenerate());
        assert_relative_eq!(tri.unit_normal().norm(), 0.0);
    }

    #[test]
    fn area_of_right_triangle() {
        assert_relative_eq!(xy_triangle().area(), 0.5, epsilon = 1e-12);
    }
}
