//! Error types.

use thiserror::Error;

/// Errors produced while ingesting mesh data.
///
/// All of these are recoverable: the offending face is dropped from the
/// draw set and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// A face needs at least three vertices to triangulate.
    #[error("face has {count} vertices, at least 3 required")]
    FaceTooSmall {
        /// Number of vertices the face supplied.
        count: usize,
    },
    /// A uv or normal index stream does not match the vertex stream length.
    #[error("{stream} index stream has {found} entries for a face with {expected} vertices")]
    IndexStreamMismatch {
        /// Which stream mismatched ("uv" or "normal").
        stream: &'static str,
        /// Vertex count of the face.
        expected: usize,
        /// Length of the mismatched stream.
        found: usize,
    },
    /// Face indices are 1-based; 0 is only valid as the leading
    /// "derive a flat normal" sentinel in the normal stream.
    #[error("{stream} index 0 is invalid, face indices are 1-based")]
    ZeroIndex {
        /// Which stream carried the zero index.
        stream: &'static str,
    },
    /// An index does not fit the 16-bit index range.
    #[error("{stream} index {index} exceeds the 16-bit index limit")]
    IndexOverflow {
        /// Which stream carried the oversized index.
        stream: &'static str,
        /// The offending 1-based index.
        index: u32,
    },
}

/// Errors from GPU resource creation and draw submission.
///
/// These abort only the affected operation; nothing here is fatal to the
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    /// GPU buffer creation was attempted without a render state attached.
    #[error("no render state attached")]
    MissingRenderState,
    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Failed to create a GPU resource.
    #[error("resource creation failed: {0}")]
    ResourceCreationFailed(String),
    /// The triangulated geometry emits more corners than a 16-bit index
    /// buffer can address.
    #[error("geometry exceeds the 16-bit index capacity: {corners} triangle corners")]
    IndexCapacityExceeded {
        /// Total triangle corners the geometry would emit.
        corners: usize,
    },
}
