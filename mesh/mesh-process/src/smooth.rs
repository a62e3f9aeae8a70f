//! Laplacian mesh smoothing.
//!
//! Each pass moves every vertex to the centroid of its topological
//! neighbors:
//!
//! ```text
//! v_new[i] = mean(v_old[n] for n in N(i))      if N(i) is non-empty
//! v_new[i] = v_old[i]                          otherwise
//! ```
//!
//! All vertices of a pass read the previous pass's positions and write into
//! a fresh buffer, so the result does not depend on vertex order.
//!
//! The relaxation is lossy: repeated passes shrink the surface and round off
//! sharp features. That is the expected behavior of the filter, and the
//! iteration cap in [`SmoothParams`] keeps it within a useful range.

// Neighbor counts don't overflow f64 precision in practice
#![allow(clippy::cast_precision_loss)]

use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

use crate::adjacency::VertexAdjacency;
use crate::params::SmoothParams;

/// Result of Laplacian smoothing.
#[derive(Debug, Clone)]
pub struct SmoothResult {
    /// The smoothed mesh.
    pub mesh: IndexedMesh,

    /// Number of passes actually run (after clamping).
    pub iterations_performed: u32,

    /// Largest single-vertex displacement in any pass.
    pub max_displacement: f64,
}

impl SmoothResult {
    /// Returns true if any vertex moved noticeably.
    #[must_use]
    pub fn had_significant_change(&self) -> bool {
        self.max_displacement > 1e-10
    }
}

impl std::fmt::Display for SmoothResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Smoothing: {} iterations, max displacement: {:.6}",
            self.iterations_performed, self.max_displacement
        )
    }
}

/// Applies one Laplacian pass.
///
/// Neighbors whose index does not resolve to a vertex are ignored. A vertex
/// with no resolvable neighbor keeps its position.
///
/// # Returns
///
/// The smoothed mesh and the maximum vertex displacement of this pass.
#[must_use]
pub fn smooth_laplacian(mesh: &IndexedMesh, adjacency: &VertexAdjacency) -> (IndexedMesh, f64) {
    let mut max_displacement = 0.0_f64;

    let smoothed = mesh.map_positions(|i, position| {
        let Ok(idx) = u32::try_from(i) else {
            return *position;
        };

        let (sum, count) = adjacency
            .neighbors(idx)
            .filter_map(|n| mesh.vertices.get(n as usize))
            .fold((Vector3::zeros(), 0_usize), |(sum, count), v| {
                (sum + v.position.coords, count + 1)
            });

        if count == 0 {
            return *position;
        }

        let centroid = Point3::from(sum / count as f64);
        max_displacement = max_displacement.max((centroid - *position).norm());
        centroid
    });

    (smoothed, max_displacement)
}

/// Smooths a mesh with repeated Laplacian passes.
///
/// With zero iterations the input is returned unchanged, bit for bit.
/// Requests above [`MAX_SMOOTHING_ITERATIONS`](crate::MAX_SMOOTHING_ITERATIONS)
/// are clamped.
///
/// # Example
///
/// ```
/// use mesh_process::{smooth_mesh, SmoothParams, VertexAdjacency};
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
/// let adjacency = VertexAdjacency::build(&mesh.faces);
/// let result = smooth_mesh(&mesh, &adjacency, &SmoothParams::none());
/// assert_eq!(result.mesh, mesh);
/// ```
#[must_use]
pub fn smooth_mesh(
    mesh: &IndexedMesh,
    adjacency: &VertexAdjacency,
    params: &SmoothParams,
) -> SmoothResult {
    if params.is_clamped() {
        warn!(
            requested = params.iterations,
            applied = params.effective_iterations(),
            "Smoothing iterations clamped"
        );
    }
    let iterations = params.effective_iterations();

    debug!(
        vertices = mesh.vertices.len(),
        graph_vertices = adjacency.vertex_count(),
        edges = adjacency.edge_count(),
        "Smoothing mesh"
    );

    let mut current = mesh.clone();
    let mut max_displacement = 0.0_f64;

    for _ in 0..iterations {
        let (smoothed, iter_max) = smooth_laplacian(&current, adjacency);
        max_displacement = max_displacement.max(iter_max);
        current = smoothed;
    }

    if iterations > 0 {
        info!(iterations, max_displacement, "Smoothed mesh");
    }

    SmoothResult {
        mesh: current,
        iterations_performed: iterations,
        max_displacement,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::Vertex;

    fn tetrahedron() -> IndexedMesh {
        IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(3.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 3.0, 0.0),
                Vertex::from_coords(0.0, 0.0, 3.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
        )
    }

    fn make_plane_mesh(n: u32) -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        for i in 0..n {
            for j in 0..n {
                // checkerboard bumps
                let z = if (i + j) % 2 == 0 { 0.1 } else { -0.1 };
                mesh.vertices
                    .push(Vertex::from_coords(f64::from(i), f64::from(j), z));
            }
        }
        for i in 0..(n - 1) {
            for j in 0..(n - 1) {
                let idx = i * n + j;
                mesh.faces.push([idx, idx + 1, idx + n]);
                mesh.faces.push([idx + 1, idx + n + 1, idx + n]);
            }
        }
        mesh
    }

    #[test]
    fn zero_iterations_is_identity() {
        let mesh = tetrahedron();
        let adjacency = VertexAdjacency::build(&mesh.faces);

        let result = smooth_mesh(&mesh, &adjacency, &SmoothParams::none());

        assert_eq!(result.iterations_performed, 0);
        assert_eq!(result.max_displacement, 0.0);
        for (a, b) in mesh.vertices.iter().zip(&result.mesh.vertices) {
            assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
            assert_eq!(a.position.z.to_bits(), b.position.z.to_bits());
        }
    }

    #[test]
    fn tetrahedron_moves_to_centroid_of_others() {
        let mesh = tetrahedron();
        let adjacency = VertexAdjacency::build(&mesh.faces);

        let result = smooth_mesh(&mesh, &adjacency, &SmoothParams::new(1));

        for i in 0..4 {
            let others: Vector3<f64> = (0..4)
                .filter(|&j| j != i)
                .map(|j| mesh.vertices[j].position.coords)
                .sum();
            let expected = others / 3.0;
            let actual = result.mesh.vertices[i].position.coords;
            assert_relative_eq!(actual, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn update_is_simultaneous() {
        // Vertex 1 must see vertex 0's old position, not its smoothed one.
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let adjacency = VertexAdjacency::build(&mesh.faces);

        let (smoothed, _) = smooth_laplacian(&mesh, &adjacency);

        assert_relative_eq!(smoothed.vertices[0].position.x, 0.5);
        assert_relative_eq!(smoothed.vertices[0].position.y, 0.5);
        assert_relative_eq!(smoothed.vertices[1].position.x, 0.0);
        assert_relative_eq!(smoothed.vertices[1].position.y, 0.5);
        assert_relative_eq!(smoothed.vertices[2].position.x, 0.5);
        assert_relative_eq!(smoothed.vertices[2].position.y, 0.0);
    }

    #[test]
    fn isolated_vertex_is_unchanged() {
        let mut mesh = tetrahedron();
        mesh.vertices.push(Vertex::from_coords(7.0, 7.0, 7.0));
        let adjacency = VertexAdjacency::build(&mesh.faces);

        let result = smooth_mesh(&mesh, &adjacency, &SmoothParams::new(3));

        assert_eq!(result.mesh.vertices[4].position, mesh.vertices[4].position);
    }

    #[test]
    fn dangling_neighbors_are_ignored() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(2.0, 0.0, 0.0),
            ],
            vec![[0, 1, 42]],
        );
        let adjacency = VertexAdjacency::build(&mesh.faces);

        let (smoothed, _) = smooth_laplacian(&mesh, &adjacency);

        // Each vertex only sees the other valid one.
        assert_eq!(smoothed.vertices.len(), 2);
        assert_relative_eq!(smoothed.vertices[0].position.x, 2.0);
        assert_relative_eq!(smoothed.vertices[1].position.x, 0.0);
    }

    #[test]
    fn smoothing_reduces_bumps() {
        let mesh = make_plane_mesh(8);
        let adjacency = VertexAdjacency::build(&mesh.faces);
        let energy = |m: &IndexedMesh| m.vertices.iter().map(|v| v.position.z.powi(2)).sum::<f64>();

        let result = smooth_mesh(&mesh, &adjacency, &SmoothParams::new(4));

        assert!(energy(&result.mesh) < energy(&mesh));
        assert!(result.had_significant_change());
        assert_eq!(result.mesh.faces, mesh.faces);
    }

    #[test]
    fn iterations_are_clamped() {
        let mesh = tetrahedron();
        let adjacency = VertexAdjacency::build(&mesh.faces);

        let result = smooth_mesh(&mesh, &adjacency, &SmoothParams::new(25));

        assert_eq!(result.iterations_performed, crate::MAX_SMOOTHING_ITERATIONS);
    }

    #[test]
    fn result_display() {
        let result = SmoothResult {
            mesh: IndexedMesh::new(),
            iterations_performed: 3,
            max_displacement: 0.123_456,
        };
        let display = format!("{result}");
        assert!(display.contains('3'));
        assert!(display.contains("0.123456"));
    }
}
