//! Mesh processing stages for aggregated face scans.
//!
//! Every stage is a pure function from one mesh value to a new one:
//!
//! - [`VertexAdjacency`] - Vertex-to-neighbor graph derived from faces
//! - [`smooth_mesh`] - Iterative Laplacian relaxation
//! - [`scale_mesh`] - Uniform scaling about the origin
//! - [`vertex_normals`] - Per-vertex shading normals
//!
//! # Layer 0
//!
//! This is a Layer 0 crate: no I/O, no threads, no global state.
//!
//! # Example
//!
//! ```
//! use mesh_process::{scale_mesh, smooth_mesh, vertex_normals, SmoothParams, VertexAdjacency};
//! use mesh_types::{IndexedMesh, Vertex};
//!
//! let mesh = IndexedMesh::from_parts(
//!     vec![
//!         Vertex::from_coords(0.0, 0.0, 0.0),
//!         Vertex::from_coords(1.0, 0.0, 0.0),
//!         Vertex::from_coords(0.0, 1.0, 0.0),
//!         Vertex::from_coords(0.0, 0.0, 1.0),
//!     ],
//!     vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
//! );
//!
//! let adjacency = VertexAdjacency::build(&mesh.faces);
//! let smoothed = smooth_mesh(&mesh, &adjacency, &SmoothParams::new(1));
//! let scaled = scale_mesh(&smoothed.mesh, 1000.0).unwrap();
//! let normals = vertex_normals(&scaled);
//!
//! assert_eq!(normals.len(), 4);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod adjacency;
mod error;
mod normals;
mod params;
mod scale;
mod smooth;

pub use adjacency::VertexAdjacency;
pub use error::{ProcessError, ProcessResult};
pub use normals::{face_normals, vertex_normals, with_vertex_normals};
pub use params::{MAX_SMOOTHING_ITERATIONS, SmoothParams};
pub use scale::scale_mesh;
pub use smooth::{SmoothResult, smooth_laplacian, smooth_mesh};
