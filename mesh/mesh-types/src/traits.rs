//! Read-only access to mesh connectivity.

use crate::{Triangle, Vertex};

/// Indexed access to a mesh's vertex buffer and face list.
///
/// Faces may hold indices that do not resolve (tracked topology can drift
/// from the vertex buffer). Implementations answer such lookups with `None`;
/// nothing here panics on bad data.
pub trait MeshTopology {
    /// Length of the vertex buffer.
    fn vertex_count(&self) -> usize;

    /// Length of the face list, counting faces that do not resolve.
    fn face_count(&self) -> usize;

    /// True when there is nothing to render or export.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex at `index`, if any.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Raw index triple of face `index`, unvalidated.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Positions of face `face_index`, or `None` when the face is missing or
    /// any corner is past the end of the vertex buffer.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;
}
