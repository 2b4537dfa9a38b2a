//! GPU geometry buffer synchronization.
//!
//! [`GeometryBuffer`] owns a shared [`VertexPool`] reference and a
//! [`FaceSet`], and on demand fan-triangulates every face, interleaves
//! per-corner attributes into a single byte buffer, and uploads it plus a
//! generated 16-bit index buffer to GPU memory. Geometry mutation after
//! upload requires an explicit re-[`synchronize`]; the existing GPU
//! handles are reused when the data still fits.
//!
//! [`synchronize`]: GeometryBuffer::synchronize

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::RwLock;

use crate::backend::{GpuBuffer, IndexedDraw};
use crate::context::{GpuResource, RenderContext};
use crate::error::{GraphicsError, MeshError};
use crate::render_state::RenderStateBinding;
use crate::types::{BufferDescriptor, BufferUsage};

use super::face::{Face, FaceSet};
use super::layout::{VertexAttribute, VertexAttributeFormat, VertexLayout};
use super::vertex_pool::SharedVertexPool;

const POSITION_SIZE: u32 = 12;
const NORMAL_SIZE: u32 = 12;
const INDEX_SIZE: u32 = 2;
const CORNERS_PER_TRIANGLE: usize = 3;

/// Most triangle corners a 16-bit index buffer can address.
const MAX_CORNERS: usize = u16::MAX as usize + 1;

/// Synchronization state of a geometry buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncState {
    /// No GPU buffers exist.
    #[default]
    Empty,
    /// GPU buffers are allocated but hold no geometry yet.
    Allocated,
    /// GPU buffers hold the current geometry.
    Populated,
}

#[derive(Debug)]
struct GpuBuffers {
    vertex: GpuBuffer,
    index: GpuBuffer,
}

/// Retained geometry with lazily-created GPU buffers.
///
/// Faces may be arbitrary n-gons; they are fan-triangulated at
/// synchronization time, which assumes convex planar polygons (non-convex
/// input renders incorrectly). Every triangle corner becomes a fresh
/// buffer entry with a sequential index; nothing is deduplicated.
pub struct GeometryBuffer {
    pool: SharedVertexPool,
    faces: FaceSet,
    render_state: Option<Arc<dyn RenderStateBinding>>,
    gpu: Option<GpuBuffers>,
    state: SyncState,
    range_start: u32,
    range_length: u32,
    label: Option<String>,
}

impl std::fmt::Debug for GeometryBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryBuffer")
            .field("pool", &self.pool)
            .field("faces", &self.faces)
            .field("render_state", &self.render_state.as_ref().map(|_| "..."))
            .field("gpu", &self.gpu)
            .field("state", &self.state)
            .field("range_start", &self.range_start)
            .field("range_length", &self.range_length)
            .field("label", &self.label)
            .finish()
    }
}

/// Reference-counted shared handle to a [`GeometryBuffer`].
pub type SharedGeometryBuffer = Arc<RwLock<GeometryBuffer>>;

impl GeometryBuffer {
    /// Create an empty geometry buffer over a shared vertex pool.
    pub fn new(pool: SharedVertexPool) -> Self {
        Self {
            pool,
            faces: FaceSet::new(),
            render_state: None,
            gpu: None,
            state: SyncState::Empty,
            range_start: 0,
            range_length: 0,
            label: None,
        }
    }

    /// Set a debug label, also used for the GPU buffer labels.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Wrap this geometry in a shared reference-counted handle.
    pub fn into_shared(self) -> SharedGeometryBuffer {
        Arc::new(RwLock::new(self))
    }

    /// The shared vertex pool this geometry reads from.
    pub fn vertex_pool(&self) -> &SharedVertexPool {
        &self.pool
    }

    /// Attach the render state whose attribute slots and texture binding
    /// determine the interleave layout.
    pub fn set_render_state(&mut self, render_state: Arc<dyn RenderStateBinding>) {
        self.render_state = Some(render_state);
    }

    /// The attached render state, if any.
    pub fn render_state(&self) -> Option<&Arc<dyn RenderStateBinding>> {
        self.render_state.as_ref()
    }

    /// Validate and store one polygon; see [`FaceSet::add_face`].
    ///
    /// Rejected faces are logged and skipped; processing continues.
    pub fn add_face(
        &mut self,
        vertices: &[u32],
        uvs: &[u32],
        normals: &[u32],
    ) -> Result<(), MeshError> {
        let mut pool = self.pool.write();
        let result = self.faces.add_face(&mut pool, vertices, uvs, normals);
        if let Err(err) = &result {
            log::error!("Rejected face: {err}");
        }
        result
    }

    /// Number of stored faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Get a stored face by index.
    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.face(index)
    }

    /// Total triangles the stored faces emit.
    pub fn triangle_count(&self) -> usize {
        self.faces.triangle_count()
    }

    /// Total corners across the stored faces.
    pub fn vertex_count(&self) -> usize {
        self.faces.vertex_count()
    }

    /// Current synchronization state.
    pub fn sync_state(&self) -> SyncState {
        self.state
    }

    /// The GPU vertex buffer, once allocated.
    pub fn vertex_buffer(&self) -> Option<&GpuBuffer> {
        self.gpu.as_ref().map(|gpu| &gpu.vertex)
    }

    /// The GPU index buffer, once allocated.
    pub fn index_buffer(&self) -> Option<&GpuBuffer> {
        self.gpu.as_ref().map(|gpu| &gpu.index)
    }

    /// Restrict drawing to `length` indices starting at `start`.
    ///
    /// A length of 0 restores the full range.
    pub fn set_render_range(&mut self, start: u32, length: u32) {
        self.range_start = start;
        self.range_length = length;
    }

    /// Number of float components per texture coordinate: 3 for a bound
    /// cube map, 2 for a bound 2D texture, 0 with no texture.
    pub fn uv_len(&self) -> u32 {
        let Some(render_state) = &self.render_state else {
            return 0;
        };
        if !render_state.has_texture() {
            return 0;
        }
        match render_state.texture().map(|texture| texture.target()) {
            Some(target) => target.uv_len(),
            None => 0,
        }
    }

    /// Byte stride of one interleaved vertex: position + normal +
    /// texture coordinate when a texture is bound.
    pub fn vertex_stride(&self) -> u32 {
        POSITION_SIZE + NORMAL_SIZE + self.uv_len() * 4
    }

    /// Create the GPU buffer pair sized for the current triangle count.
    ///
    /// Does nothing if buffers already exist or no faces are stored.
    ///
    /// # Errors
    ///
    /// Fails recoverably (state stays [`SyncState::Empty`]) when no render
    /// state is attached or the geometry exceeds 16-bit index capacity.
    pub fn allocate(&mut self, ctx: &RenderContext) -> Result<(), GraphicsError> {
        if self.gpu.is_some() {
            return Ok(());
        }
        if self.render_state.is_none() {
            log::error!("Unable to allocate geometry buffers: no render state attached");
            return Err(GraphicsError::MissingRenderState);
        }
        let corners = self.faces.triangle_count() * CORNERS_PER_TRIANGLE;
        if corners == 0 {
            log::warn!("Geometry has no triangles, skipping buffer allocation");
            return Ok(());
        }
        if corners > MAX_CORNERS {
            return Err(GraphicsError::IndexCapacityExceeded { corners });
        }

        let vertex_size = self.vertex_stride() as u64 * corners as u64;
        let index_size = INDEX_SIZE as u64 * corners as u64;
        let label = self.label.as_deref().unwrap_or("geometry");

        let vertex = ctx.backend().create_buffer(
            &BufferDescriptor::new(vertex_size, BufferUsage::VERTEX | BufferUsage::COPY_DST)
                .with_label(format!("{label}.vertex")),
        )?;
        let index = ctx.backend().create_buffer(
            &BufferDescriptor::new(index_size, BufferUsage::INDEX | BufferUsage::COPY_DST)
                .with_label(format!("{label}.index")),
        )?;
        log::trace!(
            "Allocated geometry buffers: {} vertex bytes, {} index bytes",
            vertex_size,
            index_size
        );

        self.gpu = Some(GpuBuffers { vertex, index });
        self.state = SyncState::Allocated;
        Ok(())
    }

    /// Triangulate, interleave, and upload the current geometry.
    ///
    /// Allocates first when still [`SyncState::Empty`]. Re-synchronizing
    /// after vertex or face mutation replaces the buffer contents in
    /// place; the buffers are only recreated when the geometry no longer
    /// fits them.
    pub fn synchronize(&mut self, ctx: &RenderContext) -> Result<(), GraphicsError> {
        let corners = self.faces.triangle_count() * CORNERS_PER_TRIANGLE;
        if let Some(gpu) = &self.gpu {
            let vertex_needed = self.vertex_stride() as u64 * corners as u64;
            let index_needed = INDEX_SIZE as u64 * corners as u64;
            if gpu.vertex.size() < vertex_needed || gpu.index.size() < index_needed {
                log::trace!("Geometry outgrew its GPU buffers, reallocating");
                self.gpu = None;
                self.state = SyncState::Empty;
            }
        }
        if self.gpu.is_none() {
            self.allocate(ctx)?;
        }
        let Some(gpu) = &self.gpu else {
            log::warn!("Geometry buffers not allocated, nothing to synchronize");
            return Ok(());
        };

        let uv_len = self.uv_len() as usize;
        let stride = self.vertex_stride() as usize;
        let mut vertex_data = Vec::with_capacity(stride * corners);
        let mut indices: Vec<u16> = Vec::with_capacity(corners);

        let pool = self.pool.read();
        for face in self.faces.faces() {
            if face.len() < 3 {
                continue;
            }
            for i in 1..=face.len() - 2 {
                for corner in [0, i, i + 1] {
                    let position = pool.vertex(face.vertex_indices()[corner] as usize);
                    let normal = face
                        .normal_index(corner)
                        .map(|n| pool.normal(n as usize))
                        .unwrap_or(Vec3::ZERO);
                    push_floats(&mut vertex_data, &position.to_array());
                    push_floats(&mut vertex_data, &normal.to_array());
                    if uv_len > 0 {
                        let uv = face
                            .uv_index(corner)
                            .map(|u| pool.uv(u as usize))
                            .unwrap_or(Vec3::ZERO);
                        push_floats(&mut vertex_data, &uv.to_array()[..uv_len]);
                    }
                    indices.push(indices.len() as u16);
                }
            }
        }
        drop(pool);

        ctx.backend().write_buffer(&gpu.vertex, 0, &vertex_data)?;
        ctx.backend()
            .write_buffer(&gpu.index, 0, bytemuck::cast_slice(&indices))?;
        log::trace!(
            "Synchronized geometry: {} triangles, {} vertex bytes",
            indices.len() / CORNERS_PER_TRIANGLE,
            vertex_data.len()
        );
        self.state = SyncState::Populated;
        Ok(())
    }

    /// Submit an indexed draw of the synchronized geometry.
    ///
    /// A no-op with a warning when the geometry is not populated; the
    /// draw is also skipped when the render state vetoes it or the
    /// configured render range does not fit.
    pub fn draw(
        &self,
        ctx: &RenderContext,
        perspective: &Mat4,
        view: &Mat4,
        model: &Mat4,
    ) -> Result<(), GraphicsError> {
        if self.state != SyncState::Populated {
            log::warn!("Geometry not populated, skipping draw");
            return Ok(());
        }
        let (Some(gpu), Some(render_state)) = (&self.gpu, &self.render_state) else {
            log::warn!("Geometry has no GPU buffers or render state, skipping draw");
            return Ok(());
        };
        if !render_state.enable(perspective, view, model) {
            return Ok(());
        }

        let uv_len = self.uv_len();
        let mut layout = VertexLayout::new(self.vertex_stride())
            .with_attribute(VertexAttribute::new(
                render_state.attribute_position(),
                VertexAttributeFormat::Float3,
                0,
            ))
            .with_attribute(VertexAttribute::new(
                render_state.attribute_normal(),
                VertexAttributeFormat::Float3,
                POSITION_SIZE,
            ));
        if uv_len > 0 {
            let format = if uv_len == 3 {
                VertexAttributeFormat::Float3
            } else {
                VertexAttributeFormat::Float2
            };
            layout = layout.with_attribute(VertexAttribute::new(
                render_state.attribute_uv(),
                format,
                POSITION_SIZE + NORMAL_SIZE,
            ));
        }

        let max_indices = (self.faces.triangle_count() * CORNERS_PER_TRIANGLE) as u32;
        let (first_index, index_count) = if self.range_length == 0 {
            (0, max_indices)
        } else if self.range_start + self.range_length <= max_indices {
            (self.range_start, self.range_length)
        } else {
            log::warn!(
                "Invalid geometry range ({}-{}). Max geometry length {}",
                self.range_start,
                self.range_start + self.range_length,
                max_indices
            );
            render_state.disable();
            return Ok(());
        };

        let result = ctx.backend().draw_indexed(&IndexedDraw {
            vertex_buffer: &gpu.vertex,
            index_buffer: &gpu.index,
            layout: &layout,
            index_count,
            first_index,
        });
        render_state.disable();
        result
    }
}

impl GpuResource for GeometryBuffer {
    fn supports_off_render_thread_initialization(&self) -> bool {
        true
    }

    fn initialize_gpu(&mut self, ctx: &RenderContext) -> Result<(), GraphicsError> {
        self.allocate(ctx)?;
        self.synchronize(ctx)
    }

    fn shutdown_gpu(&mut self, _ctx: &RenderContext) {
        self.gpu = None;
        self.state = SyncState::Empty;
    }
}

fn push_floats(buffer: &mut Vec<u8>, floats: &[f32]) {
    buffer.extend_from_slice(bytemuck::cast_slice(floats));
}

static_assertions::assert_impl_all!(GeometryBuffer: Send, Sync);
