//! Uniform scaling.

use mesh_types::IndexedMesh;
use tracing::debug;

use crate::error::{ProcessError, ProcessResult};

/// Scale every vertex coordinate by `factor` about the origin.
///
/// Faces are unchanged. Typical use is converting tracked coordinates in
/// metres into millimetres for slicers (`factor = 1000.0`).
///
/// # Errors
///
/// Returns [`ProcessError::InvalidScale`] if `factor` is not greater than
/// zero, or is `NaN` or infinite.
///
/// # Example
///
/// ```
/// use mesh_process::scale_mesh;
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mesh = IndexedMesh::from_parts(vec![Vertex::from_coords(1.0, 2.0, 3.0)], vec![]);
/// let scaled = scale_mesh(&mesh, 2.0).unwrap();
/// assert_eq!(scaled.vertices[0].position.z, 6.0);
///
/// assert!(scale_mesh(&mesh, 0.0).is_err());
/// ```
pub fn scale_mesh(mesh: &IndexedMesh, factor: f64) -> ProcessResult<IndexedMesh> {
    if !(factor > 0.0 && factor.is_finite()) {
        return Err(ProcessError::InvalidScale { scale: factor });
    }

    debug!(factor, vertices = mesh.vertices.len(), "Scaling mesh");
    Ok(mesh.map_positions(|_, p| *p * factor))
}
