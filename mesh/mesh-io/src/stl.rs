//! Binary STL (Stereolithography) export.
//!
//! # Binary Format
//!
//! All values little-endian:
//!
//! ```text
//! UINT8[80]    – Header, ASCII text padded with spaces
//! UINT32       – Number of triangle records that follow
//! foreach triangle
//!     REAL32[3] – Unit face normal
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (always 0)
//! end
//! ```
//!
//! A file holding `n` records is exactly `84 + 50 * n` bytes long.
//!
//! # Invalid Faces
//!
//! Faces that reference a vertex past the end of the vertex buffer are
//! skipped. The count field always equals the number of records actually
//! written, so the declared size and the byte length never disagree.

use std::io::{Read, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, MeshTopology, Point3, Triangle, Vector3, Vertex};
use tracing::{debug, info, warn};

use crate::artifact::{ExportArtifact, ExportStats, write_atomic};
use crate::error::{IoError, IoResult};
use crate::format::MeshFormat;

/// STL binary header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL (normal + 3 vertices + attribute).
pub const TRIANGLE_SIZE: usize = 50;

/// Upper bound on faces reserved up front when decoding; the header count is
/// untrusted until the records are actually read.
const MAX_PREALLOC_FACES: usize = 1 << 16;

/// Header text used when the caller does not provide one.
pub const DEFAULT_STL_HEADER: &str = "Binary STL exported by face-scan mesh-io";

/// Exact byte length of a binary STL holding `triangles` records.
///
/// # Example
///
/// ```
/// assert_eq!(mesh_io::stl_file_size(1), 134);
/// ```
#[must_use]
pub const fn stl_file_size(triangles: usize) -> usize {
    HEADER_SIZE + 4 + TRIANGLE_SIZE * triangles
}

/// Build the 80-byte header from free text.
///
/// Non-ASCII characters are replaced by `?`, the text is truncated to 80
/// bytes and padded with spaces. Text starting with `solid` gets a
/// `binary ` prefix, since readers take that prefix to mean ASCII STL.
fn header_bytes(text: &str) -> [u8; HEADER_SIZE] {
    let starts_with_solid = text
        .trim_start()
        .as_bytes()
        .get(..5)
        .is_some_and(|b| b.eq_ignore_ascii_case(b"solid"));
    let text = if starts_with_solid {
        format!("binary {}", text.trim_start())
    } else {
        text.to_string()
    };

    let mut header = [b' '; HEADER_SIZE];
    for (slot, c) in header.iter_mut().zip(text.chars()) {
        *slot = if c.is_ascii() && !c.is_ascii_control() {
            c as u8
        } else {
            b'?'
        };
    }
    header
}

/// Write a mesh as binary STL.
///
/// Face normals are recomputed from each triangle's winding; stored vertex
/// normals are ignored.
///
/// # Errors
///
/// Returns an error if writing fails, or if more than `u32::MAX` triangles
/// would be written.
///
/// # Example
///
/// ```
/// use mesh_io::write_stl_binary;
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(1.0, 0.0, 0.0),
///         Vertex::from_coords(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2], [0, 1, 5]],
/// );
///
/// let mut bytes = Vec::new();
/// let stats = write_stl_binary(&mesh, "face", &mut bytes).unwrap();
///
/// assert_eq!(stats.triangles_written, 1);
/// assert_eq!(stats.triangles_skipped, 1);
/// assert_eq!(bytes.len(), 134);
/// ```
pub fn write_stl_binary<W: Write>(
    mesh: &IndexedMesh,
    header_text: &str,
    mut writer: W,
) -> IoResult<ExportStats> {
    // Count first so the header matches the records exactly.
    let valid = mesh.valid_faces().count();
    let face_count = u32::try_from(valid).map_err(|_| IoError::TooManyTriangles { count: valid })?;

    writer.write_all(&header_bytes(header_text))?;
    writer.write_all(&face_count.to_le_bytes())?;

    let mut written = 0_usize;
    let mut skipped = 0_usize;

    for (face_index, &face) in mesh.faces.iter().enumerate() {
        let Some(tri) = mesh.resolve_face(face) else {
            debug!(face_index, ?face, "Skipping STL face with out-of-range index");
            skipped += 1;
            continue;
        };

        write_triangle_record(&mut writer, &tri)?;
        written += 1;
    }
    writer.flush()?;

    debug_assert_eq!(written, valid);

    if skipped > 0 {
        warn!(
            skipped,
            written,
            vertex_count = mesh.vertex_count(),
            "Omitted STL faces referencing missing vertices"
        );
    }

    Ok(ExportStats {
        vertices_written: mesh.vertex_count(),
        triangles_written: written,
        triangles_skipped: skipped,
    })
}

/// Write one 50-byte triangle record.
fn write_triangle_record<W: Write>(writer: &mut W, tri: &Triangle) -> IoResult<()> {
    let n = tri.unit_normal();
    write_vec3(writer, n.x, n.y, n.z)?;
    for v in tri.vertices() {
        write_vec3(writer, v.x, v.y, v.z)?;
    }
    writer.write_all(&0u16.to_le_bytes())?;
    Ok(())
}

/// Write three coordinates as little-endian f32.
fn write_vec3<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> IoResult<()> {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: f64 to f32 is intentional for STL format
    {
        writer.write_all(&(x as f32).to_le_bytes())?;
        writer.write_all(&(y as f32).to_le_bytes())?;
        writer.write_all(&(z as f32).to_le_bytes())?;
    }
    Ok(())
}

/// Export a mesh as an in-memory binary STL artifact.
///
/// `name` becomes the suggested file stem.
///
/// # Errors
///
/// See [`write_stl_binary`].
pub fn export_stl(mesh: &IndexedMesh, name: &str, header_text: &str) -> IoResult<ExportArtifact> {
    let mut bytes = Vec::with_capacity(stl_file_size(mesh.face_count()));
    let stats = write_stl_binary(mesh, header_text, &mut bytes)?;

    info!(
        triangles = stats.triangles_written,
        skipped = stats.triangles_skipped,
        bytes = bytes.len(),
        "Exported binary STL"
    );

    Ok(ExportArtifact::new(MeshFormat::Stl, name, bytes, stats))
}

/// Save a mesh as binary STL at `path`.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failed save never leaves a partial file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<ExportStats> {
    write_atomic(path.as_ref(), |writer| {
        write_stl_binary(mesh, DEFAULT_STL_HEADER, writer)
    })
}

/// Decode a binary STL.
///
/// Each record contributes three new vertices (STL stores no shared
/// topology). Stored normals are ignored.
///
/// # Errors
///
/// - [`IoError::UnexpectedEof`] if the header is truncated
/// - [`IoError::InvalidFaceCount`] if fewer records follow than declared
/// - [`IoError::InvalidContent`] if bytes remain after the declared records
pub fn read_stl_binary<R: Read>(mut reader: R) -> IoResult<IndexedMesh> {
    let mut header = [0u8; HEADER_SIZE + 4];
    read_full(&mut reader, &mut header).and_then(|n| {
        if n < header.len() {
            Err(IoError::UnexpectedEof { position: n as u64 })
        } else {
            Ok(())
        }
    })?;

    let face_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    let reserve = (face_count as usize).min(MAX_PREALLOC_FACES);
    let mut mesh = IndexedMesh::with_capacity(reserve * 3, reserve);

    let mut record = [0u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        if read_full(&mut reader, &mut record)? < TRIANGLE_SIZE {
            return Err(IoError::InvalidFaceCount {
                expected: face_count,
                got: i,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
        let base_idx = mesh.vertices.len() as u32;
        mesh.vertices.push(read_vertex(&record[12..24]));
        mesh.vertices.push(read_vertex(&record[24..36]));
        mesh.vertices.push(read_vertex(&record[36..48]));
        mesh.faces.push([base_idx, base_idx + 1, base_idx + 2]);
    }

    let mut trailing = [0u8; 1];
    if read_full(&mut reader, &mut trailing)? > 0 {
        return Err(IoError::invalid_content(format!(
            "data after the {face_count} declared STL records"
        )));
    }

    Ok(mesh)
}

/// Read until `buf` is full or the reader is exhausted.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> IoResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Read a vertex from 12 bytes (3 f32s).
fn read_vertex(buf: &[u8]) -> Vertex {
    Vertex::new(read_point(buf))
}

fn read_point(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

/// Read the stored normal of record `index` from a binary STL buffer.
///
/// Returns `None` if the buffer is too short.
#[must_use]
pub fn stl_record_normal(bytes: &[u8], index: usize) -> Option<Vector3<f64>> {
    let start = HEADER_SIZE + 4 + index.checked_mul(TRIANGLE_SIZE)?;
    let buf = bytes.get(start..start + 12)?;
    Some(read_point(buf).coords)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_triangle() -> IndexedMesh {
        IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    fn count_field(bytes: &[u8]) -> u32 {
        u32::from_le_bytes(bytes[80..84].try_into().unwrap())
    }

    #[test]
    fn single_triangle_layout() {
        let mut bytes = Vec::new();
        let stats = write_stl_binary(&create_test_triangle(), "test", &mut bytes).unwrap();

        assert_eq!(bytes.len(), 134);
        assert_eq!(count_field(&bytes), 1);
        assert_eq!(stats.triangles_written, 1);
        assert_eq!(stats.triangles_skipped, 0);

        // normal
        assert_eq!(&bytes[84..88], &0.0f32.to_le_bytes());
        assert_eq!(&bytes[92..96], &1.0f32.to_le_bytes());
        // second vertex x
        assert_eq!(&bytes[108..112], &1.0f32.to_le_bytes());
        // attribute
        assert_eq!(&bytes[132..134], &[0, 0]);
    }

    #[test]
    fn header_is_space_padded() {
        let mut bytes = Vec::new();
        write_stl_binary(&create_test_triangle(), "abc", &mut bytes).unwrap();

        assert_eq!(&bytes[..3], b"abc");
        assert!(bytes[3..80].iter().all(|&b| b == b' '));
    }

    #[test]
    fn header_is_truncated_and_sanitized() {
        let long = "x".repeat(200);
        let header = header_bytes(&long);
        assert!(header.iter().all(|&b| b == b'x'));

        let header = header_bytes("é\n");
        assert_eq!(&header[..2], b"??");
    }

    #[test]
    fn out_of_range_face_is_skipped() {
        let mut mesh = create_test_triangle();
        mesh.faces[0] = [0, 1, 5];

        let mut bytes = Vec::new();
        let stats = write_stl_binary(&mesh, "", &mut bytes).unwrap();

        assert_eq!(stats.triangles_written, 0);
        assert_eq!(stats.triangles_skipped, 1);
        assert_eq!(count_field(&bytes), 0);
        assert_eq!(bytes.len(), stl_file_size(0));
    }

    #[test]
    fn count_matches_records_with_mixed_faces() {
        let mut mesh = create_test_triangle();
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, 0.0));
        mesh.faces = vec![[0, 1, 2], [1, 3, 2], [3, 4, 2], [u32::MAX, 0, 1]];

        let mut bytes = Vec::new();
        let stats = write_stl_binary(&mesh, "", &mut bytes).unwrap();

        assert_eq!(stats.triangles_written, 2);
        assert_eq!(stats.triangles_skipped, 2);
        assert_eq!(count_field(&bytes) as usize, stats.triangles_written);
        assert_eq!(bytes.len(), stl_file_size(stats.triangles_written));
    }

    #[test]
    fn degenerate_triangle_has_zero_normal() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(2.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let artifact = export_stl(&mesh, "degenerate", "").unwrap();
        let n = stl_record_normal(artifact.bytes(), 0).unwrap();
        assert_eq!(n, Vector3::zeros());
    }

    #[test]
    fn stored_vertex_normals_are_ignored() {
        let mut mesh = create_test_triangle();
        for v in &mut mesh.vertices {
            v.normal = Some(-Vector3::z());
        }
        let artifact = export_stl(&mesh, "t", "").unwrap();
        let n = stl_record_normal(artifact.bytes(), 0).unwrap();
        assert_relative_eq!(n, Vector3::z());
    }

    #[test]
    fn read_back_binary() {
        let mut bytes = Vec::new();
        write_stl_binary(&create_test_triangle(), "", &mut bytes).unwrap();

        let mesh = read_stl_binary(&bytes[..]).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices[1].position, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn read_rejects_short_record_list() {
        let mut bytes = Vec::new();
        write_stl_binary(&create_test_triangle(), "", &mut bytes).unwrap();
        bytes[80..84].copy_from_slice(&2u32.to_le_bytes());

        let err = read_stl_binary(&bytes[..]).unwrap_err();
        assert!(matches!(err, IoError::InvalidFaceCount { expected: 2, got: 1 }));
    }

    #[test]
    fn read_rejects_trailing_bytes() {
        let mut bytes = Vec::new();
        write_stl_binary(&create_test_triangle(), "", &mut bytes).unwrap();
        bytes.push(0);

        assert!(matches!(
            read_stl_binary(&bytes[..]),
            Err(IoError::InvalidContent { .. })
        ));
    }

    #[test]
    fn read_rejects_truncated_header() {
        let bytes = [b' '; 40];
        assert!(matches!(
            read_stl_binary(&bytes[..]),
            Err(IoError::UnexpectedEof { position: 40 })
        ));
    }

    #[test]
    fn huge_declared_count_is_an_error() {
        let mut bytes = vec![b' '; HEADER_SIZE];
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());

        let err = read_stl_binary(&bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            IoError::InvalidFaceCount {
                expected: u32::MAX,
                got: 0
            }
        ));
    }

    #[test]
    fn header_never_starts_with_solid() {
        for text in ["solid face", "  SOLID", "Solid"] {
            let mut bytes = Vec::new();
            write_stl_binary(&create_test_triangle(), text, &mut bytes).unwrap();
            assert!(!bytes[..5].eq_ignore_ascii_case(b"solid"));
            assert!(!bytes.trim_ascii_start()[..5].eq_ignore_ascii_case(b"solid"));
            assert_eq!(bytes.len(), 134);
        }

        let header = header_bytes("solid face");
        assert_eq!(&header[..17], b"binary solid face");
    }

    #[test]
    fn save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.stl");

        let stats = save_stl(&create_test_triangle(), &path).unwrap();
        assert_eq!(stats.triangles_written, 1);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 134);
        assert!(bytes.starts_with(DEFAULT_STL_HEADER.as_bytes()));
    }
}
