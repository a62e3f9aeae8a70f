//! Per-vertex normal generation.
//!
//! Untextured surfaces rendered without per-vertex normals look flat under
//! any lighting model, so a preview always runs this stage.
//!
//! # Algorithm
//!
//! ```text
//! n_face      = normalize((v1 - v0) × (v2 - v0))      // winding order
//! n_vertex[i] = normalize(sum of n_face over faces touching i)
//! ```
//!
//! Degenerate faces contribute the zero vector. A vertex whose accumulated
//! normal is zero (isolated, or only touched by degenerate faces) keeps the
//! zero vector. Faces with out-of-range indices are skipped entirely.

use mesh_types::IndexedMesh;
use nalgebra::Vector3;
use tracing::debug;

/// Compute the unit normal of every face.
///
/// Returns `None` for faces whose indices do not resolve.
#[must_use]
pub fn face_normals(mesh: &IndexedMesh) -> Vec<Option<Vector3<f64>>> {
    mesh.faces
        .iter()
        .map(|&face| mesh.resolve_face(face).map(|tri| tri.unit_normal()))
        .collect()
}

/// Compute one unit normal per vertex, in vertex order.
///
/// # Example
///
/// ```
/// use mesh_process::vertex_normals;
/// use mesh_types::{IndexedMesh, Vertex};
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
/// let normals = vertex_normals(&mesh);
/// assert!((normals[0].z - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn vertex_normals(mesh: &IndexedMesh) -> Vec<Vector3<f64>> {
    let mut accum = vec![Vector3::zeros(); mesh.vertices.len()];
    let mut skipped = 0_usize;

    for (&face, normal) in mesh.faces.iter().zip(face_normals(mesh)) {
        let Some(normal) = normal else {
            skipped += 1;
            continue;
        };
        for i in face {
            // resolve_face succeeded, so every index is in range
            if let Some(slot) = accum.get_mut(i as usize) {
                *slot += normal;
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, "Skipped faces with invalid indices during normal generation");
    }

    for n in &mut accum {
        let len = n.norm();
        if len > f64::EPSILON {
            *n /= len;
        } else {
            *n = Vector3::zeros();
        }
    }

    accum
}

/// Return a copy of `mesh` with [`vertex_normals`] stored on each vertex.
#[must_use]
pub fn with_vertex_normals(mesh: &IndexedMesh) -> IndexedMesh {
    let normals = vertex_normals(mesh);
    let mut result = mesh.clone();
    for (vertex, normal) in result.vertices.iter_mut().zip(normals) {
        vertex.normal = Some(normal);
    }
    result
}
