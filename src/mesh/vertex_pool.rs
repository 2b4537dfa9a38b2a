//! Flat per-vertex attribute storage.

use std::sync::Arc;

use glam::{Vec3, Vec4};
use parking_lot::RwLock;

/// Contributions shorter than this are ignored by normal accumulation.
const MIN_CONTRIBUTION_LENGTH: f32 = 1.0e-5;

/// One normal slot: the averaged normal plus the accumulation state
/// behind it.
///
/// `sum` keeps the raw contribution total so the running average stays
/// exactly `normalize(sum / count)` regardless of accumulation order.
#[derive(Debug, Clone, Copy, Default)]
struct NormalSlot {
    normal: Vec3,
    sum: Vec3,
    count: f32,
}

impl NormalSlot {
    fn seeded(normal: Vec3) -> Self {
        Self {
            normal,
            sum: normal,
            count: 1.0,
        }
    }
}

/// Flat storage of raw per-vertex attributes, independent of topology.
///
/// Positions, normals, texture coordinates, and colors live in four
/// index-aligned containers. Writes beyond the current extent grow the
/// container; reads beyond it return a zero sentinel rather than failing,
/// which keeps the triangulation loop branch-free against malformed input.
///
/// Texture coordinates are stored as [`Vec3`]; the third component is only
/// meaningful for cube-map texturing.
#[derive(Debug, Clone, Default)]
pub struct VertexPool {
    vertices: Vec<Vec3>,
    normals: Vec<NormalSlot>,
    uvs: Vec<Vec3>,
    colors: Vec<Vec4>,
}

/// Reference-counted shared handle to a [`VertexPool`].
///
/// Several face sets or geometry buffers may share one pool (a model with
/// multiple material groups); the longest-lived holder determines when the
/// pool is destroyed.
pub type SharedVertexPool = Arc<RwLock<VertexPool>>;

impl VertexPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap this pool in a shared reference-counted handle.
    pub fn into_shared(self) -> SharedVertexPool {
        Arc::new(RwLock::new(self))
    }

    /// Number of stored vertex positions.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of stored normals.
    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    /// Number of stored texture coordinates.
    pub fn uv_count(&self) -> usize {
        self.uvs.len()
    }

    /// Number of stored colors.
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Get a vertex position, or the zero vector when out of range.
    pub fn vertex(&self, index: usize) -> Vec3 {
        self.vertices.get(index).copied().unwrap_or(Vec3::ZERO)
    }

    /// Get a normal, or the zero vector when out of range.
    pub fn normal(&self, index: usize) -> Vec3 {
        self.normals
            .get(index)
            .map(|slot| slot.normal)
            .unwrap_or(Vec3::ZERO)
    }

    /// Get a texture coordinate, or the zero vector when out of range.
    pub fn uv(&self, index: usize) -> Vec3 {
        self.uvs.get(index).copied().unwrap_or(Vec3::ZERO)
    }

    /// Get a color, or the zero color when out of range.
    pub fn color(&self, index: usize) -> Vec4 {
        self.colors.get(index).copied().unwrap_or(Vec4::ZERO)
    }

    /// Write a vertex position, growing the container if needed.
    pub fn set_vertex(&mut self, index: usize, value: Vec3) {
        grow_to(&mut self.vertices, index);
        self.vertices[index] = value;
    }

    /// Write a normal, growing the container if needed.
    ///
    /// The slot's accumulation count restarts at one contribution.
    pub fn set_normal(&mut self, index: usize, value: Vec3) {
        grow_to(&mut self.normals, index);
        self.normals[index] = NormalSlot::seeded(value);
    }

    /// Write a texture coordinate, growing the container if needed.
    pub fn set_uv(&mut self, index: usize, value: Vec3) {
        grow_to(&mut self.uvs, index);
        self.uvs[index] = value;
    }

    /// Write a color, growing the container if needed.
    pub fn set_color(&mut self, index: usize, value: Vec4) {
        grow_to(&mut self.colors, index);
        self.colors[index] = value;
    }

    /// Append a vertex position, returning its 0-based index.
    pub fn append_vertex(&mut self, value: Vec3) -> usize {
        self.vertices.push(value);
        self.vertices.len() - 1
    }

    /// Append a normal, returning its 0-based index.
    pub fn append_normal(&mut self, value: Vec3) -> usize {
        self.normals.push(NormalSlot::seeded(value));
        self.normals.len() - 1
    }

    /// Append a texture coordinate, returning its 0-based index.
    pub fn append_uv(&mut self, value: Vec3) -> usize {
        self.uvs.push(value);
        self.uvs.len() - 1
    }

    /// Append a color, returning its 0-based index.
    pub fn append_color(&mut self, value: Vec4) -> usize {
        self.colors.push(value);
        self.colors.len() - 1
    }

    /// Grow normal storage to hold at least `count` entries without
    /// touching existing ones.
    ///
    /// Called before deriving flat normals so per-vertex accumulation
    /// lands at valid indices.
    pub fn set_normal_count(&mut self, count: usize) {
        if self.normals.len() < count {
            self.normals.resize(count, NormalSlot::default());
        }
    }

    /// Fold a contribution into the running average at a normal slot,
    /// growing storage if needed.
    ///
    /// After k contributions the slot holds `normalize(sum / k)`; the
    /// result does not depend on contribution order. Near-zero
    /// contributions are skipped so degenerate faces can never poison an
    /// accumulated normal with NaN.
    pub fn add_normal(&mut self, index: usize, contribution: Vec3) {
        if contribution.length() <= MIN_CONTRIBUTION_LENGTH {
            return;
        }
        grow_to(&mut self.normals, index);
        let slot = &mut self.normals[index];
        slot.sum += contribution;
        slot.count += 1.0;
        slot.normal = (slot.sum / slot.count).normalize_or_zero();
    }
}

fn grow_to<T: Clone + Default>(container: &mut Vec<T>, index: usize) {
    if container.len() <= index {
        container.resize(index + 1, T::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1.0e-5;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!(
            (a - b).length() < EPSILON,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn test_append_returns_indices() {
        let mut pool = VertexPool::new();
        assert_eq!(pool.append_vertex(Vec3::X), 0);
        assert_eq!(pool.append_vertex(Vec3::Y), 1);
        assert_eq!(pool.append_uv(Vec3::ZERO), 0);
        assert_eq!(pool.append_color(Vec4::ONE), 0);
        assert_eq!(pool.vertex_count(), 2);
    }

    #[test]
    fn test_set_grows_container() {
        let mut pool = VertexPool::new();
        pool.set_vertex(4, Vec3::ONE);
        assert_eq!(pool.vertex_count(), 5);
        assert_eq!(pool.vertex(4), Vec3::ONE);
        assert_eq!(pool.vertex(2), Vec3::ZERO);
    }

    #[test]
    fn test_out_of_range_returns_zero_sentinel() {
        let pool = VertexPool::new();
        assert_eq!(pool.vertex(100), Vec3::ZERO);
        assert_eq!(pool.normal(100), Vec3::ZERO);
        assert_eq!(pool.uv(100), Vec3::ZERO);
        assert_eq!(pool.color(100), Vec4::ZERO);
    }

    #[test]
    fn test_set_normal_roundtrip_preserves_value() {
        let mut pool = VertexPool::new();
        pool.set_normal(0, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(pool.normal(0), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_add_normal_averages_and_normalizes() {
        let mut pool = VertexPool::new();
        pool.add_normal(0, Vec3::Z);
        assert_vec3_near(pool.normal(0), Vec3::Z);

        pool.add_normal(0, Vec3::X);
        let expected = (Vec3::Z + Vec3::X).normalize();
        assert_vec3_near(pool.normal(0), expected);
    }

    #[test]
    fn test_add_normal_order_independent() {
        let contributions = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];

        let mut forward = VertexPool::new();
        for c in contributions {
            forward.add_normal(0, c);
        }
        let mut reverse = VertexPool::new();
        for c in contributions.iter().rev() {
            reverse.add_normal(0, *c);
        }

        assert_vec3_near(forward.normal(0), reverse.normal(0));
        assert_vec3_near(
            forward.normal(0),
            (contributions.iter().sum::<Vec3>() / 3.0).normalize(),
        );
    }

    #[test]
    fn test_add_normal_skips_zero_contribution() {
        let mut pool = VertexPool::new();
        pool.add_normal(0, Vec3::Z);
        pool.add_normal(0, Vec3::ZERO);
        assert_vec3_near(pool.normal(0), Vec3::Z);
        assert!(pool.normal(0).is_finite());
    }

    #[test]
    fn test_set_normal_count_grows_without_overwrite() {
        let mut pool = VertexPool::new();
        pool.set_normal(0, Vec3::Y);
        pool.set_normal_count(4);
        assert_eq!(pool.normal_count(), 4);
        assert_eq!(pool.normal(0), Vec3::Y);
        pool.set_normal_count(2);
        assert_eq!(pool.normal_count(), 4);
    }
}
