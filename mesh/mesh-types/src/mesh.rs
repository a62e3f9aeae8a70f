//! Indexed triangle mesh.

use crate::{MeshTopology, Triangle, Vertex};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// This is the value handed from stage to stage in the scan pipeline. It
/// stores vertices and faces separately, with faces referencing vertices by
/// index.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Vertex positions and normals
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
///
/// # Index Validity
///
/// Nothing prevents a face from referencing a vertex that does not exist.
/// Use [`resolve_face`](Self::resolve_face), [`valid_faces`](Self::valid_faces)
/// or [`MeshTopology::triangle`] to read geometry through a face.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology, Vertex};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(1.0, 0.0, 0.0),
///         Vertex::from_coords(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from bare positions and faces.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology, Point3};
    ///
    /// let mesh = IndexedMesh::from_positions(
    ///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
    ///     vec![[0, 1, 2]],
    /// );
    /// assert_eq!(mesh.vertex_count(), 3);
    /// ```
    #[must_use]
    pub fn from_positions(positions: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices: positions.into_iter().map(Vertex::new).collect(),
            faces,
        }
    }

    /// Iterate over vertex positions in index order.
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.vertices.iter().map(|v| &v.position)
    }

    /// Check whether every index of `face` refers to an existing vertex.
    #[inline]
    #[must_use]
    pub fn is_face_valid(&self, face: [u32; 3]) -> bool {
        let count = self.vertices.len();
        face.iter().all(|&i| (i as usize) < count)
    }

    /// Resolve a face's three vertex positions, in winding order.
    ///
    /// Returns `None` if any index is out of range.
    #[must_use]
    pub fn resolve_face(&self, face: [u32; 3]) -> Option<Triangle> {
        let [i0, i1, i2] = face;
        let v0 = self.vertices.get(i0 as usize)?.position;
        let v1 = self.vertices.get(i1 as usize)?.position;
        let v2 = self.vertices.get(i2 as usize)?.position;
        Some(Triangle::new(v0, v1, v2))
    }

    /// Iterate over the faces whose indices all resolve.
    pub fn valid_faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.faces
            .iter()
            .copied()
            .filter(|&face| self.is_face_valid(face))
    }

    /// Iterate over resolved triangles, silently omitting invalid faces.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().filter_map(|&face| self.resolve_face(face))
    }

    /// Count the faces that reference at least one missing vertex.
    #[must_use]
    pub fn invalid_face_count(&self) -> usize {
        self.faces
            .iter()
            .filter(|&&face| !self.is_face_valid(face))
            .count()
    }

    /// Build a new mesh by mapping every vertex position, keeping faces.
    ///
    /// Normals are dropped since moved vertices invalidate them.
    #[must_use]
    pub fn map_positions<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, &Point3<f64>) -> Point3<f64>,
    {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| v.moved_to(f(i, &v.position)))
            .collect();

        Self {
            vertices,
            faces: self.faces.clone(),
        }
    }

    /// Clear all vertex normals.
    pub fn clear_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = None;
        }
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        self.faces
            .get(face_index)
            .and_then(|&face| self.resolve_face(face))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn quad() -> IndexedMesh {
        IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 1.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn mesh_is_empty() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());

        let mut mesh2 = IndexedMesh::new();
        mesh2.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(mesh2.is_empty()); // no faces

        mesh2.faces.push([0, 0, 0]);
        assert!(!mesh2.is_empty());
    }

    #[test]
    fn resolve_face_checks_bounds() {
        let mesh = quad();
        assert!(mesh.resolve_face([0, 1, 2]).is_some());
        assert!(mesh.resolve_face([0, 1, 4]).is_none());
        assert!(mesh.resolve_face([u32::MAX, 1, 2]).is_none());
    }

    #[test]
    fn triangle_by_face_index() {
        let mesh = quad();
        let tri = mesh.triangle(1);
        assert!(tri.is_some());
        assert!(mesh.triangle(2).is_none());
    }

    #[test]
    fn invalid_faces_are_filtered() {
        let mut mesh = quad();
        mesh.faces.push([1, 2, 9]);

        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.valid_faces().count(), 2);
        assert_eq!(mesh.triangles().count(), 2);
        assert_eq!(mesh.invalid_face_count(), 1);
    }

    #[test]
    fn map_positions_keeps_faces() {
        let mut mesh = quad();
        mesh.vertices[0].normal = Some(Vector3::z());

        let moved = mesh.map_positions(|_, p| *p + Vector3::new(0.0, 0.0, 1.0));

        assert_eq!(moved.faces, mesh.faces);
        assert_eq!(moved.vertices[2].position.z, 1.0);
        assert!(moved.vertices[0].normal.is_none());
        // source untouched
        assert_eq!(mesh.vertices[2].position.z, 0.0);
    }

    #[test]
    fn from_positions_builds_vertices() {
        let mesh = IndexedMesh::from_positions(vec![Point3::new(1.0, 2.0, 3.0)], vec![]);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.positions().next(), Some(&Point3::new(1.0, 2.0, 3.0)));
    }
}
