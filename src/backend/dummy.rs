//! Dummy GPU backend for testing and development.
//!
//! This backend performs no real GPU work but keeps every buffer's bytes
//! in host memory, so uploads can be read back and asserted on without
//! GPU hardware.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::GraphicsError;
use crate::types::BufferDescriptor;

use super::{GpuBackend, GpuBuffer, IndexedDraw};

/// Largest buffer the dummy backend will allocate.
const MAX_BUFFER_SIZE: u64 = 1 << 30;

/// Dummy GPU backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    draw_calls: AtomicU64,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of draws submitted so far.
    pub fn draw_call_count(&self) -> u64 {
        self.draw_calls.load(Ordering::Relaxed)
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy"
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, GraphicsError> {
        if descriptor.size == 0 {
            return Err(GraphicsError::InvalidParameter(
                "buffer size cannot be zero".to_string(),
            ));
        }
        if descriptor.size > MAX_BUFFER_SIZE {
            return Err(GraphicsError::InvalidParameter(format!(
                "buffer size {} exceeds maximum {}",
                descriptor.size, MAX_BUFFER_SIZE
            )));
        }
        log::trace!(
            "DummyBackend: creating buffer {:?} (size: {})",
            descriptor.label,
            descriptor.size
        );
        Ok(GpuBuffer::Dummy {
            storage: Arc::new(Mutex::new(vec![0u8; descriptor.size as usize])),
        })
    }

    fn write_buffer(
        &self,
        buffer: &GpuBuffer,
        offset: u64,
        data: &[u8],
    ) -> Result<(), GraphicsError> {
        let GpuBuffer::Dummy { storage } = buffer;
        let mut bytes = storage.lock();
        let end = offset as usize + data.len();
        if end > bytes.len() {
            return Err(GraphicsError::InvalidParameter(format!(
                "write of {} bytes at offset {} overflows buffer of {} bytes",
                data.len(),
                offset,
                bytes.len()
            )));
        }
        log::trace!(
            "DummyBackend: write_buffer offset={} len={}",
            offset,
            data.len()
        );
        bytes[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn read_buffer(&self, buffer: &GpuBuffer, offset: u64, size: u64) -> Vec<u8> {
        let GpuBuffer::Dummy { storage } = buffer;
        let bytes = storage.lock();
        let end = offset as usize + size as usize;
        if end > bytes.len() {
            log::warn!(
                "DummyBackend: read of {} bytes at offset {} overflows buffer of {} bytes",
                size,
                offset,
                bytes.len()
            );
            return vec![0u8; size as usize];
        }
        bytes[offset as usize..end].to_vec()
    }

    fn draw_indexed(&self, draw: &IndexedDraw<'_>) -> Result<(), GraphicsError> {
        let index_bytes = (draw.first_index as u64 + draw.index_count as u64) * 2;
        if index_bytes > draw.index_buffer.size() {
            return Err(GraphicsError::InvalidParameter(format!(
                "draw of {} indices from {} overflows index buffer of {} bytes",
                draw.index_count,
                draw.first_index,
                draw.index_buffer.size()
            )));
        }
        log::trace!(
            "DummyBackend: draw_indexed count={} first={} stride={}",
            draw.index_count,
            draw.first_index,
            draw.layout.stride()
        );
        self.draw_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

static_assertions::assert_impl_all!(DummyBackend: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BufferUsage;

    fn make_buffer(backend: &DummyBackend, size: u64) -> GpuBuffer {
        backend
            .create_buffer(&BufferDescriptor::new(size, BufferUsage::VERTEX))
            .unwrap()
    }

    #[test]
    fn test_write_and_read_back() {
        let backend = DummyBackend::new();
        let buffer = make_buffer(&backend, 8);
        backend.write_buffer(&buffer, 2, &[1, 2, 3]).unwrap();
        assert_eq!(backend.read_buffer(&buffer, 0, 8), [0, 0, 1, 2, 3, 0, 0, 0]);
    }

    #[test]
    fn test_write_overflow_rejected() {
        let backend = DummyBackend::new();
        let buffer = make_buffer(&backend, 4);
        assert!(backend.write_buffer(&buffer, 2, &[0u8; 4]).is_err());
    }

    #[test]
    fn test_zero_size_buffer_rejected() {
        let backend = DummyBackend::new();
        let result = backend.create_buffer(&BufferDescriptor::new(0, BufferUsage::VERTEX));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_overflow_returns_zeroes() {
        let backend = DummyBackend::new();
        let buffer = make_buffer(&backend, 4);
        backend.write_buffer(&buffer, 0, &[9, 9, 9, 9]).unwrap();
        assert_eq!(backend.read_buffer(&buffer, 2, 4), [0, 0, 0, 0]);
    }
}
