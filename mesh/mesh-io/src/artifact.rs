//! In-memory export results and atomic persistence.

use std::fmt;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::IoResult;
use crate::format::MeshFormat;

/// Counts reported by an exporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportStats {
    /// Vertices written (STL repeats vertices per record; this counts the
    /// source mesh's vertex buffer).
    pub vertices_written: usize,
    /// Triangles written to the output.
    pub triangles_written: usize,
    /// Faces omitted because they referenced a missing vertex.
    pub triangles_skipped: usize,
}

impl ExportStats {
    /// Whether any face was omitted.
    #[must_use]
    pub const fn has_skipped(&self) -> bool {
        self.triangles_skipped > 0
    }
}

impl fmt::Display for ExportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} triangles ({} skipped)",
            self.vertices_written, self.triangles_written, self.triangles_skipped
        )
    }
}

/// A fully encoded mesh file held in memory.
///
/// Encoding never touches the filesystem; use [`persist_to`](Self::persist_to)
/// or [`persist_in`](Self::persist_in) to write it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    format: MeshFormat,
    file_name: String,
    bytes: Vec<u8>,
    stats: ExportStats,
}

impl ExportArtifact {
    pub(crate) fn new(format: MeshFormat, stem: &str, bytes: Vec<u8>, stats: ExportStats) -> Self {
        Self {
            format,
            file_name: format.file_name(stem),
            bytes,
            stats,
        }
    }

    /// Format of the encoded bytes.
    #[must_use]
    pub const fn format(&self) -> MeshFormat {
        self.format
    }

    /// Suggested file name, stem plus the format's extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Encoded file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the artifact, returning the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Export counts.
    #[must_use]
    pub const fn stats(&self) -> ExportStats {
        self.stats
    }

    /// Write the artifact to `path`, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Io`](crate::IoError::Io) if the file cannot be
    /// created or written. No partial file is left behind.
    pub fn persist_to<P: AsRef<Path>>(&self, path: P) -> IoResult<PathBuf> {
        let path = path.as_ref();
        write_atomic(path, |writer| {
            writer.write_all(&self.bytes)?;
            Ok(())
        })?;
        info!(
            path = %path.display(),
            format = %self.format,
            bytes = self.bytes.len(),
            "Persisted mesh artifact"
        );
        Ok(path.to_path_buf())
    }

    /// Write the artifact into `dir` under its suggested file name.
    ///
    /// # Errors
    ///
    /// See [`persist_to`](Self::persist_to).
    pub fn persist_in<P: AsRef<Path>>(&self, dir: P) -> IoResult<PathBuf> {
        self.persist_to(dir.as_ref().join(&self.file_name))
    }
}

/// Run `write` against a temporary file next to `path`, then rename it into
/// place.
///
/// If `write` or the rename fails, the temporary file is removed and `path`
/// is left untouched.
pub(crate) fn write_atomic<T, F>(path: &Path, write: F) -> IoResult<T>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> IoResult<T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    debug!(tmp = %tmp.path().display(), target = %path.display(), "Writing temporary file");

    let value = {
        let mut writer = BufWriter::new(&mut tmp);
        let value = write(&mut writer)?;
        writer.flush()?;
        value
    };

    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::IoError;

    fn artifact() -> ExportArtifact {
        ExportArtifact::new(
            MeshFormat::Obj,
            "face",
            b"o face\n".to_vec(),
            ExportStats::default(),
        )
    }

    #[test]
    fn persist_in_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact().persist_in(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("face.obj"));
        assert_eq!(std::fs::read(&path).unwrap(), b"o face\n");
    }

    #[test]
    fn persist_in_stays_inside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("out");
        std::fs::create_dir(&inner).unwrap();

        for stem in ["../x", "a/b"] {
            let artifact = ExportArtifact::new(
                MeshFormat::Stl,
                stem,
                b"x".to_vec(),
                ExportStats::default(),
            );
            let path = artifact.persist_in(&inner).unwrap();
            assert_eq!(path.parent(), Some(inner.as_path()));
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn persist_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.obj");
        std::fs::write(&path, b"old contents that are longer").unwrap();

        artifact().persist_to(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"o face\n");
    }

    #[test]
    fn persist_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = artifact().persist_in(&missing).unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
        assert!(!missing.exists());
    }

    #[test]
    fn failed_write_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stl");

        let result: IoResult<()> =
            write_atomic(&path, |_| Err(IoError::invalid_content("boom")));
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn stats_display() {
        let stats = ExportStats {
            vertices_written: 4,
            triangles_written: 2,
            triangles_skipped: 1,
        };
        assert!(stats.has_skipped());
        assert_eq!(stats.to_string(), "4 vertices, 2 triangles (1 skipped)");
    }
}
