//! Wavefront OBJ export.
//!
//! Layout, one record per line:
//!
//! ```text
//! # <comment header>
//! o <name>
//! v x y z        (one per vertex, original order)
//! f a b c        (one per valid face, 1-based indices)
//! ```
//!
//! Coordinates use Rust's shortest round-trip float formatting, so parsing
//! a `v` line gives back the exact `f64` that was written. Faces that
//! reference a missing vertex are skipped, as in STL export.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, MeshTopology, Vertex};
use tracing::{debug, info, warn};

use crate::artifact::{ExportArtifact, ExportStats, write_atomic};
use crate::error::{IoError, IoResult};
use crate::format::MeshFormat;

/// Object name used when the caller's name is empty after sanitizing.
pub const DEFAULT_OBJECT_NAME: &str = "mesh";

/// Make `name` usable on a single `o` line.
///
/// Whitespace runs become `_`; an empty result falls back to
/// [`DEFAULT_OBJECT_NAME`].
#[must_use]
pub fn sanitize_object_name(name: &str) -> String {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        DEFAULT_OBJECT_NAME.to_string()
    } else {
        joined
    }
}

/// Write a mesh as ASCII OBJ.
///
/// Stored vertex normals are not written.
///
/// # Errors
///
/// Returns an error if writing fails.
///
/// # Example
///
/// ```
/// use mesh_io::write_obj;
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
/// let mut out = Vec::new();
/// write_obj(&mesh, "face", &mut out).unwrap();
/// let text = String::from_utf8(out).unwrap();
///
/// assert!(text.contains("o face\n"));
/// assert!(text.ends_with("f 1 2 3\n"));
/// ```
pub fn write_obj<W: Write>(mesh: &IndexedMesh, name: &str, mut writer: W) -> IoResult<ExportStats> {
    writeln!(writer, "# face scan mesh")?;
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    )?;
    writeln!(writer, "o {}", sanitize_object_name(name))?;

    for v in &mesh.vertices {
        let p = v.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    let mut written = 0_usize;
    let mut skipped = 0_usize;
    for (face_index, &face) in mesh.faces.iter().enumerate() {
        if !mesh.is_face_valid(face) {
            debug!(face_index, ?face, "Skipping OBJ face with out-of-range index");
            skipped += 1;
            continue;
        }
        let [a, b, c] = face.map(|i| u64::from(i) + 1);
        writeln!(writer, "f {a} {b} {c}")?;
        written += 1;
    }
    writer.flush()?;

    if skipped > 0 {
        warn!(
            skipped,
            written,
            vertex_count = mesh.vertex_count(),
            "Omitted OBJ faces referencing missing vertices"
        );
    }

    Ok(ExportStats {
        vertices_written: mesh.vertex_count(),
        triangles_written: written,
        triangles_skipped: skipped,
    })
}

/// Export a mesh as an in-memory OBJ artifact.
///
/// `name` is used both for the `o` line and the file stem.
///
/// # Errors
///
/// See [`write_obj`].
pub fn export_obj(mesh: &IndexedMesh, name: &str) -> IoResult<ExportArtifact> {
    let mut bytes = Vec::new();
    let stats = write_obj(mesh, name, &mut bytes)?;

    info!(
        vertices = stats.vertices_written,
        triangles = stats.triangles_written,
        skipped = stats.triangles_skipped,
        bytes = bytes.len(),
        "Exported OBJ"
    );

    Ok(ExportArtifact::new(MeshFormat::Obj, name, bytes, stats))
}

/// Save a mesh as OBJ at `path`, atomically.
///
/// The object name is the file stem.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_obj<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<ExportStats> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_OBJECT_NAME);
    write_atomic(path, |writer| write_obj(mesh, name, writer))
}

/// Parse an OBJ stream.
///
/// Reads `v` and `f` records and ignores everything else. Face tokens may
/// carry `/vt/vn` suffixes and may use negative (relative) indices. Polygons
/// with more than three corners are fan-triangulated.
///
/// # Errors
///
/// Returns an error if a `v` or `f` line is malformed or a face index is
/// zero or points before the first vertex.
pub fn read_obj<R: Read>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();

    for (line_no, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coord = || -> IoResult<f64> {
                    let token = tokens.next().ok_or_else(|| {
                        IoError::invalid_content(format!("line {}: short vertex", line_no + 1))
                    })?;
                    Ok(token.parse()?)
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                mesh.vertices.push(Vertex::from_coords(x, y, z));
            }
            Some("f") => {
                let corners = tokens
                    .map(|t| resolve_obj_index(t, mesh.vertices.len(), line_no + 1))
                    .collect::<IoResult<Vec<u32>>>()?;
                if corners.len() < 3 {
                    return Err(IoError::invalid_content(format!(
                        "line {}: face with {} corners",
                        line_no + 1,
                        corners.len()
                    )));
                }
                for pair in corners[1..].windows(2) {
                    mesh.faces.push([corners[0], pair[0], pair[1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Convert one face token to a 0-based index.
fn resolve_obj_index(token: &str, vertex_count: usize, line: usize) -> IoResult<u32> {
    let raw: i64 = token.split('/').next().unwrap_or(token).parse()?;

    let index = match raw {
        0 => None,
        r if r > 0 => u32::try_from(r - 1).ok(),
        r => i64::try_from(vertex_count)
            .ok()
            .map(|n| n + r)
            .filter(|&i| i >= 0)
            .and_then(|i| u32::try_from(i).ok()),
    };

    index.ok_or_else(|| IoError::invalid_content(format!("line {line}: bad face index {raw}")))
}

/// Read an OBJ file from disk.
///
/// # Errors
///
/// See [`read_obj`].
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let file = std::fs::File::open(path)?;
    read_obj(file)
}
