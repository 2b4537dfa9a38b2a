//! # Vireo
//!
//! Minimal retained-mode scene-graph rendering library built around
//! deferred GPU geometry synchronization.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`VertexPool`] / [`FaceSet`] - polygon-soup mesh storage with
//!   separate vertex/normal/uv index streams and smooth-normal averaging
//! - [`GeometryBuffer`] - fan triangulation, attribute interleaving, and
//!   lazy upload into GPU vertex/index buffers
//! - [`RenderStateBinding`] - the shader-state boundary that determines
//!   the interleave layout
//! - [`GpuBackend`] - graphics API abstraction, with a [`DummyBackend`]
//!   for headless use
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use glam::{Mat4, Vec3};
//! use vireo::{
//!     BasicRenderState, GeometryBuffer, GpuResource, RenderContext, VertexPool,
//! };
//!
//! let mut pool = VertexPool::new();
//! pool.append_vertex(Vec3::new(0.0, 0.0, 0.0));
//! pool.append_vertex(Vec3::new(1.0, 0.0, 0.0));
//! pool.append_vertex(Vec3::new(0.0, 1.0, 0.0));
//!
//! let mut geometry = GeometryBuffer::new(pool.into_shared());
//! geometry.set_render_state(Arc::new(BasicRenderState::new()));
//! geometry.add_face(&[1, 2, 3], &[], &[]).unwrap();
//!
//! let ctx = RenderContext::with_default_backend();
//! geometry.initialize_gpu(&ctx).unwrap();
//! geometry
//!     .draw(&ctx, &Mat4::IDENTITY, &Mat4::IDENTITY, &Mat4::IDENTITY)
//!     .unwrap();
//! ```

pub mod backend;
pub mod context;
pub mod error;
pub mod mesh;
pub mod render_state;
pub mod scene;
pub mod types;

// Re-export main types for convenience
pub use backend::{create_backend, DummyBackend, GpuBackend, GpuBuffer, IndexedDraw};
pub use context::{GpuResource, RenderContext};
pub use error::{GraphicsError, MeshError};
pub use mesh::{
    Face, FaceSet, GeometryBuffer, SharedGeometryBuffer, SharedVertexPool, SyncState,
    VertexAttribute, VertexAttributeFormat, VertexLayout, VertexPool,
};
pub use render_state::{BasicRenderState, RenderStateBinding};
pub use scene::DrawableList;
pub use types::{BufferDescriptor, BufferUsage, Texture, TextureFormat, TextureTarget};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library.
///
/// This only emits a log line; nothing requires calling it.
pub fn init() {
    log::info!("Vireo v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_dummy_backend() {
        let backend = DummyBackend::new();
        assert_eq!(backend.name(), "Dummy");
    }
}
