//! Export and read-back errors.

use thiserror::Error;

/// Result alias for this crate.
pub type IoResult<T> = Result<T, IoError>;

/// Failures while encoding, writing or decoding a mesh file.
///
/// Out-of-range face indices are not errors: exporters skip those faces and
/// report the count in [`ExportStats`](crate::ExportStats).
#[derive(Debug, Error)]
pub enum IoError {
    /// The path's extension names no supported format.
    #[error("unsupported mesh extension: .{extension}")]
    UnknownFormat {
        /// Extension as found on the path.
        extension: String,
    },

    /// Decoded bytes do not form a valid file.
    #[error("malformed mesh file: {message}")]
    InvalidContent {
        /// What was wrong.
        message: String,
    },

    /// Input ended inside the STL header.
    #[error("truncated STL header: {position} bytes")]
    UnexpectedEof {
        /// Bytes read before the input ended.
        position: u64,
    },

    /// Declared face count disagrees with the records present.
    #[error("invalid face count: header declares {expected}, file holds {got}")]
    InvalidFaceCount {
        /// Count declared in the header.
        expected: u32,
        /// Number of complete records found.
        got: u32,
    },

    /// Mesh has more triangles than the binary STL count field can hold.
    #[error("too many triangles for binary STL: {count}")]
    TooManyTriangles {
        /// Number of triangles that would be written.
        count: usize,
    },

    /// The underlying reader, writer or file failed.
    #[error("mesh file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// An OBJ coordinate is not a number.
    #[error("bad OBJ coordinate: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// An OBJ face index is not an integer.
    #[error("bad OBJ face index: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

impl IoError {
    /// Shorthand for [`IoError::InvalidContent`].
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
