//! Draw-call submission for a scene traversal.
//!
//! Traversal and culling live outside this library; whatever walks the
//! scene graph deposits the geometry it wants rendered into a
//! [`DrawableList`] together with the accumulated model transform, then
//! replays the list on the render thread.

use glam::Mat4;

use crate::context::RenderContext;
use crate::error::GraphicsError;
use crate::mesh::SharedGeometryBuffer;

struct DrawableEntry {
    geometry: SharedGeometryBuffer,
    transform: Mat4,
}

/// An ordered list of geometry to draw this frame.
#[derive(Default)]
pub struct DrawableList {
    entries: Vec<DrawableEntry>,
}

impl DrawableList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a geometry with its model transform.
    pub fn add(&mut self, geometry: SharedGeometryBuffer, transform: Mat4) {
        self.entries.push(DrawableEntry {
            geometry,
            transform,
        });
    }

    /// Number of queued drawables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Draw every queued geometry with the given camera matrices.
    pub fn draw(
        &self,
        ctx: &RenderContext,
        perspective: &Mat4,
        view: &Mat4,
    ) -> Result<(), GraphicsError> {
        for entry in &self.entries {
            entry
                .geometry
                .read()
                .draw(ctx, perspective, view, &entry.transform)?;
        }
        Ok(())
    }

    /// Clear the list for the next frame.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec3;

    use super::*;
    use crate::backend::DummyBackend;
    use crate::context::GpuResource;
    use crate::render_state::BasicRenderState;
    use crate::{GeometryBuffer, VertexPool};

    fn shared_triangle(ctx: &RenderContext) -> SharedGeometryBuffer {
        let mut pool = VertexPool::new();
        pool.append_vertex(Vec3::ZERO);
        pool.append_vertex(Vec3::X);
        pool.append_vertex(Vec3::Y);
        let mut geometry = GeometryBuffer::new(pool.into_shared());
        geometry.set_render_state(Arc::new(BasicRenderState::new()));
        geometry.add_face(&[1, 2, 3], &[], &[]).unwrap();
        geometry.initialize_gpu(ctx).unwrap();
        geometry.into_shared()
    }

    #[test]
    fn test_draw_list_submits_each_entry() {
        let backend = Arc::new(DummyBackend::new());
        let ctx = RenderContext::new(backend.clone());
        let geometry = shared_triangle(&ctx);

        let mut list = DrawableList::new();
        list.add(geometry.clone(), Mat4::IDENTITY);
        list.add(geometry, Mat4::from_translation(Vec3::X));
        assert_eq!(list.len(), 2);

        list.draw(&ctx, &Mat4::IDENTITY, &Mat4::IDENTITY).unwrap();
        assert_eq!(backend.draw_call_count(), 2);

        list.reset();
        assert!(list.is_empty());
    }
}
