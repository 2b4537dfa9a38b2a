//! Render state binding boundary.
//!
//! Shader compilation and uniform binding live outside this library. The
//! geometry pipeline only needs a few facts from whatever render state a
//! drawable is bound to: where its vertex attributes go, whether a texture
//! is bound (and of what target), and a gate around draw submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Mat4;

use crate::types::Texture;

/// The accessors the geometry pipeline consumes from a render state.
///
/// Implementations own shader programs, uniforms, and texture uploads;
/// the geometry core never manages their lifecycle.
pub trait RenderStateBinding: Send + Sync {
    /// Shader slot of the position attribute.
    fn attribute_position(&self) -> u32;

    /// Shader slot of the normal attribute.
    fn attribute_normal(&self) -> u32;

    /// Shader slot of the texture-coordinate attribute.
    fn attribute_uv(&self) -> u32;

    /// Whether a texture is bound.
    fn has_texture(&self) -> bool;

    /// The bound texture, queried for its target to size uv attributes.
    fn texture(&self) -> Option<&Texture>;

    /// Prepare the state for drawing with the given matrices.
    ///
    /// Returns false to veto the draw (e.g. the program failed to link).
    fn enable(&self, perspective: &Mat4, view: &Mat4, model: &Mat4) -> bool;

    /// Undo [`enable`](RenderStateBinding::enable) after the draw.
    fn disable(&self);
}

/// A minimal render state with fixed attribute slots.
///
/// Suitable for tests and for consumers whose shaders use a known layout:
/// position at slot 0, normal at 1, uv at 2. `enable` always succeeds.
#[derive(Debug, Default)]
pub struct BasicRenderState {
    position_slot: u32,
    normal_slot: u32,
    uv_slot: u32,
    texture: Option<Arc<Texture>>,
    enabled: AtomicBool,
}

impl BasicRenderState {
    /// Create a render state with slots 0/1/2 and no texture.
    pub fn new() -> Self {
        Self {
            position_slot: 0,
            normal_slot: 1,
            uv_slot: 2,
            texture: None,
            enabled: AtomicBool::new(false),
        }
    }

    /// Override the attribute slot locations.
    pub fn with_slots(mut self, position: u32, normal: u32, uv: u32) -> Self {
        self.position_slot = position;
        self.normal_slot = normal;
        self.uv_slot = uv;
        self
    }

    /// Bind a texture.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Whether the state is currently enabled (between enable/disable).
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

impl RenderStateBinding for BasicRenderState {
    fn attribute_position(&self) -> u32 {
        self.position_slot
    }

    fn attribute_normal(&self) -> u32 {
        self.normal_slot
    }

    fn attribute_uv(&self) -> u32 {
        self.uv_slot
    }

    fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    fn texture(&self) -> Option<&Texture> {
        self.texture.as_deref()
    }

    fn enable(&self, _perspective: &Mat4, _view: &Mat4, _model: &Mat4) -> bool {
        self.enabled.store(true, Ordering::Relaxed);
        true
    }

    fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }
}

static_assertions::assert_impl_all!(BasicRenderState: Send, Sync);
