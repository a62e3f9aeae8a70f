//! Output format selection.

use std::fmt;
use std::path::Path;

use crate::error::{IoError, IoResult};
use crate::obj::sanitize_object_name;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeshFormat {
    /// Binary STL (Stereolithography).
    Stl,
    /// Wavefront OBJ, ASCII.
    Obj,
}

impl MeshFormat {
    /// Every supported format, in export order.
    pub const ALL: [Self; 2] = [Self::Stl, Self::Obj];

    /// Detect format from file extension (case-insensitive).
    ///
    /// Returns `None` if the extension is missing or not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Like [`from_path`](Self::from_path), but reports the offending
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownFormat`] if the extension is not recognized.
    pub fn require_from_path<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        Self::from_path(path).ok_or_else(|| IoError::UnknownFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }

    /// Canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }

    /// File name for an artifact with the given stem.
    ///
    /// The stem is reduced to a single path component: whitespace and path
    /// separators become `_`, so the name can never leave its directory.
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        let stem: String = sanitize_object_name(stem)
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        format!("{stem}.{}", self.extension())
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stl => write!(f, "STL"),
            Self::Obj => write!(f, "OBJ"),
        }
    }
}
