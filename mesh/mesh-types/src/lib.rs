//! Core mesh types for face scan processing.
//!
//! This crate provides the data model shared by every stage of the scan
//! pipeline:
//!
//! - [`Vertex`] - A point in 3D space with an optional shading normal
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with resolved vertex positions
//!
//! # Layer 0 Crate
//!
//! This crate has no I/O and no threading. It can be used from capture code,
//! processing workers, exporters and tests alike.
//!
//! # Index Safety
//!
//! Face indices in an [`IndexedMesh`] are **not** guaranteed to be smaller
//! than the vertex count. Tracked topology can drift from the vertex buffer,
//! so every consumer resolves faces through the bounds-checked accessors
//! ([`IndexedMesh::resolve_face`], [`MeshTopology::triangle`]) instead of
//! indexing the vertex array directly.
//!
//! # Coordinate System
//!
//! Right-handed. Face winding is **counter-clockwise (CCW) when viewed from
//! outside**, so normals computed by the right-hand rule point outward.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshTopology, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//! mesh.faces.push([0, 1, 7]); // dangling index
//!
//! assert_eq!(mesh.face_count(), 2);
//! assert_eq!(mesh.valid_faces().count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use mesh::IndexedMesh;
pub use traits::MeshTopology;
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
