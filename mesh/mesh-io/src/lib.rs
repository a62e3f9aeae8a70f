//! Byte-exact mesh export for face scans.
//!
//! Two output formats are supported:
//!
//! - **STL** - Binary only, `84 + 50 * n` bytes for `n` triangles
//! - **OBJ** - ASCII, vertices then 1-based faces
//!
//! Exporters encode into memory and return an [`ExportArtifact`]; writing to
//! disk is a separate, atomic step ([`ExportArtifact::persist_to`]), so a
//! cancelled or failed save never leaves a truncated file at the destination.
//!
//! # Invalid Faces
//!
//! Faces whose indices point past the vertex buffer are skipped by both
//! exporters and counted in [`ExportStats::triangles_skipped`]. The STL
//! count field always equals the number of records actually written.
//!
//! # Example
//!
//! ```
//! use mesh_io::{export_mesh, ExportOptions, MeshFormat};
//! use mesh_types::{IndexedMesh, Vertex};
//!
//! let mesh = IndexedMesh::from_parts(
//!     vec![
//!         Vertex::from_coords(0.0, 0.0, 0.0),
//!         Vertex::from_coords(1.0, 0.0, 0.0),
//!         Vertex::from_coords(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! );
//!
//! let stl = export_mesh(&mesh, MeshFormat::Stl, &ExportOptions::default()).unwrap();
//! assert_eq!(stl.bytes().len(), 134);
//! assert_eq!(stl.file_name(), "face_scan.stl");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod artifact;
mod error;
mod format;
mod obj;
mod stl;

pub use artifact::{ExportArtifact, ExportStats};
pub use error::{IoError, IoResult};
pub use format::MeshFormat;
pub use obj::{
    DEFAULT_OBJECT_NAME, export_obj, load_obj, read_obj, sanitize_object_name, save_obj, write_obj,
};
pub use stl::{
    DEFAULT_STL_HEADER, HEADER_SIZE, TRIANGLE_SIZE, export_stl, read_stl_binary, save_stl,
    stl_file_size, stl_record_normal, write_stl_binary,
};

use std::path::Path;

use mesh_types::IndexedMesh;

/// Naming options shared by the exporters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportOptions {
    /// OBJ object name and file stem for every artifact.
    pub object_name: String,
    /// Free text for the 80-byte STL header.
    pub stl_header: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            object_name: "face_scan".to_string(),
            stl_header: DEFAULT_STL_HEADER.to_string(),
        }
    }
}

impl ExportOptions {
    /// Set the object name.
    #[must_use]
    pub fn with_object_name(mut self, name: impl Into<String>) -> Self {
        self.object_name = name.into();
        self
    }

    /// Set the STL header text.
    #[must_use]
    pub fn with_stl_header(mut self, header: impl Into<String>) -> Self {
        self.stl_header = header.into();
        self
    }
}

/// Encode a mesh in the given format.
///
/// # Errors
///
/// Returns an error if encoding fails (see [`write_stl_binary`] and
/// [`write_obj`]).
pub fn export_mesh(
    mesh: &IndexedMesh,
    format: MeshFormat,
    options: &ExportOptions,
) -> IoResult<ExportArtifact> {
    match format {
        MeshFormat::Stl => export_stl(mesh, &options.object_name, &options.stl_header),
        MeshFormat::Obj => export_obj(mesh, &options.object_name),
    }
}

/// Save a mesh to a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be written
pub fn save_mesh<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<ExportStats> {
    let path = path.as_ref();
    match MeshFormat::require_from_path(path)? {
        MeshFormat::Stl => save_stl(mesh, path),
        MeshFormat::Obj => save_obj(mesh, path),
    }
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if the format is unknown, or the file cannot be read or
/// parsed.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    match MeshFormat::require_from_path(path)? {
        MeshFormat::Stl => read_stl_binary(std::io::BufReader::new(std::fs::File::open(path)?)),
        MeshFormat::Obj => load_obj(path),
    }
}
