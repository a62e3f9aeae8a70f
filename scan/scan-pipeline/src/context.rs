//! Where artifacts are written.

use std::path::{Path, PathBuf};

use mesh_io::MeshFormat;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output location for a pipeline run.
///
/// Built once by the caller and passed into each run; nothing in this crate
/// keeps a global output location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExportContext {
    output_dir: PathBuf,
    base_name: String,
}

impl ExportContext {
    /// Creates a context writing `<output_dir>/<base_name>.<ext>`.
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }

    /// Destination directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File stem shared by all artifacts.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Destination path for an artifact of the given format.
    #[must_use]
    pub fn path_for(&self, format: MeshFormat) -> PathBuf {
        self.output_dir.join(format.file_name(&self.base_name))
    }

    /// Create the output directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be created.
    pub fn create_output_dir(&self) -> std::io::Result<()> {
        debug!(dir = %self.output_dir.display(), "Creating output directory");
        std::fs::create_dir_all(&self.output_dir)
    }
}
