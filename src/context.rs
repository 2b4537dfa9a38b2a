//! Render context and GPU resource lifecycle.
//!
//! There is no global graphics-context singleton. Every GPU-touching call
//! takes a [`RenderContext`], which carries the backend handle for the
//! thread that owns command submission.

use std::sync::Arc;

use crate::backend::{self, GpuBackend};
use crate::error::GraphicsError;

/// Explicit handle to the GPU command stream.
///
/// All buffer allocation, population, and draw calls must run on the
/// thread owning this context.
#[derive(Clone)]
pub struct RenderContext {
    backend: Arc<dyn GpuBackend>,
}

impl RenderContext {
    /// Create a context over the given backend.
    pub fn new(backend: Arc<dyn GpuBackend>) -> Self {
        Self { backend }
    }

    /// Create a context over the default backend.
    pub fn with_default_backend() -> Self {
        Self::new(backend::create_backend())
    }

    /// Get the backend.
    pub fn backend(&self) -> &dyn GpuBackend {
        self.backend.as_ref()
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// Two-phase lifecycle for objects owning GPU resources.
///
/// Objects are constructed and populated first (possibly on a loader
/// thread), then an external scheduler calls [`initialize_gpu`] on the
/// render thread. [`shutdown_gpu`] releases the resources and returns the
/// object to its pre-initialization state.
///
/// [`initialize_gpu`]: GpuResource::initialize_gpu
/// [`shutdown_gpu`]: GpuResource::shutdown_gpu
pub trait GpuResource {
    /// Whether CPU-side population of this resource may happen off the
    /// render thread before initialization.
    fn supports_off_render_thread_initialization(&self) -> bool {
        false
    }

    /// Create and populate the GPU-side resources.
    fn initialize_gpu(&mut self, ctx: &RenderContext) -> Result<(), GraphicsError>;

    /// Release the GPU-side resources.
    fn shutdown_gpu(&mut self, ctx: &RenderContext);
}

static_assertions::assert_impl_all!(RenderContext: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_backend_name() {
        let ctx = RenderContext::with_default_backend();
        assert_eq!(ctx.backend().name(), "Dummy");
    }

    #[test]
    fn test_context_debug() {
        let ctx = RenderContext::with_default_backend();
        assert!(format!("{:?}", ctx).contains("Dummy"));
    }
}
