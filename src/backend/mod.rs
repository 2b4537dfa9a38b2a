//! GPU backend abstraction layer.
//!
//! The geometry pipeline never talks to a graphics API directly. All
//! allocation, uploads, and draw submission go through the [`GpuBackend`]
//! trait, and buffer ownership is carried by [`GpuBuffer`] handles. The
//! built-in [`DummyBackend`] backs buffers with plain byte vectors so the
//! whole pipeline runs headless.

pub mod dummy;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::GraphicsError;
use crate::mesh::VertexLayout;
use crate::types::BufferDescriptor;

pub use dummy::DummyBackend;

/// Handle to a GPU buffer resource.
///
/// The handle owns the underlying allocation; dropping the last clone
/// releases it synchronously.
#[derive(Clone)]
pub enum GpuBuffer {
    /// Dummy backend buffer, backed by host memory.
    Dummy {
        /// Byte storage standing in for the GPU allocation.
        storage: Arc<Mutex<Vec<u8>>>,
    },
}

impl GpuBuffer {
    /// Size of the allocation in bytes.
    pub fn size(&self) -> u64 {
        match self {
            Self::Dummy { storage } => storage.lock().len() as u64,
        }
    }
}

impl fmt::Debug for GpuBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dummy { storage } => f
                .debug_struct("GpuBuffer::Dummy")
                .field("size", &storage.lock().len())
                .finish(),
        }
    }
}

/// An indexed triangle-list draw submission.
///
/// Describes one draw call: which buffers to bind, how the interleaved
/// vertex data is laid out, and which slice of the index buffer to draw.
#[derive(Debug)]
pub struct IndexedDraw<'a> {
    /// Interleaved vertex buffer to bind.
    pub vertex_buffer: &'a GpuBuffer,
    /// 16-bit index buffer to bind.
    pub index_buffer: &'a GpuBuffer,
    /// Attribute layout of the vertex buffer.
    pub layout: &'a VertexLayout,
    /// Number of indices to draw.
    pub index_count: u32,
    /// Offset into the index buffer, in indices.
    pub first_index: u32,
}

/// GPU backend trait for abstracting different graphics APIs.
pub trait GpuBackend: Send + Sync + 'static {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Create a buffer resource.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, GraphicsError>;

    /// Write data into a buffer at the given byte offset.
    ///
    /// This is a sub-range replace over the existing allocation, never a
    /// reallocation.
    fn write_buffer(
        &self,
        buffer: &GpuBuffer,
        offset: u64,
        data: &[u8],
    ) -> Result<(), GraphicsError>;

    /// Read data back from a buffer.
    fn read_buffer(&self, buffer: &GpuBuffer, offset: u64, size: u64) -> Vec<u8>;

    /// Submit an indexed triangle-list draw.
    fn draw_indexed(&self, draw: &IndexedDraw<'_>) -> Result<(), GraphicsError>;
}

/// Create the default backend.
pub fn create_backend() -> Arc<dyn GpuBackend> {
    log::info!("Using dummy backend");
    Arc::new(DummyBackend::new())
}
