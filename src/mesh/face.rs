//! Face records and the validated face set.

#[cfg(test)]
use glam::Vec3;

use crate::error::MeshError;

use super::vertex_pool::VertexPool;

/// Smallest cross-product length accepted as a usable flat normal.
const MIN_NORMAL_LENGTH: f32 = 1.0e-5;

/// Indices above this cannot be addressed by a 16-bit index buffer.
const MAX_EXTERNAL_INDEX: u32 = u16::MAX as u32 - 1;

/// One input polygon: parallel vertex/uv/normal index lists into a
/// [`VertexPool`], stored 0-based.
///
/// An empty uv list means the face carries no texture coordinates. The
/// normal list always matches the vertex list by the time a face is
/// stored; when the input supplied none, the face shares its vertex
/// indices (the pool slots then hold derived flat normals).
#[derive(Debug, Clone, Default)]
pub struct Face {
    vertices: Vec<u16>,
    uvs: Vec<u16>,
    normals: Vec<u16>,
}

impl Face {
    /// Number of vertices (= corners) in the polygon.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the face has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of triangles a fan over this face emits.
    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }

    /// The 0-based vertex indices.
    pub fn vertex_indices(&self) -> &[u16] {
        &self.vertices
    }

    /// The 0-based uv indices; empty when the face has no texture
    /// coordinates.
    pub fn uv_indices(&self) -> &[u16] {
        &self.uvs
    }

    /// The 0-based normal indices.
    pub fn normal_indices(&self) -> &[u16] {
        &self.normals
    }

    /// The uv index for one corner, if the face carries uvs.
    pub fn uv_index(&self, corner: usize) -> Option<u16> {
        self.uvs.get(corner).copied()
    }

    /// The normal index for one corner.
    pub fn normal_index(&self, corner: usize) -> Option<u16> {
        self.normals.get(corner).copied()
    }
}

/// Validated polygon storage with running vertex/triangle counters.
///
/// Counters advance only after a face passes validation, so a rejected
/// face can never inflate the GPU buffer sizes computed from them.
#[derive(Debug, Clone, Default)]
pub struct FaceSet {
    faces: Vec<Face>,
    vertex_count: usize,
    triangle_count: usize,
}

impl FaceSet {
    /// Create an empty face set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether no faces are stored.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// The stored faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get a face by index.
    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    /// Total corners across all stored faces.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Total triangles a fan over all stored faces emits.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Validate and store one polygon.
    ///
    /// Indices are 1-based on input and converted to 0-based storage. An
    /// empty uv list means no texture coordinates; an empty normal list,
    /// or one whose first entry is the 0 sentinel, means "derive a flat
    /// normal": the face normal is computed from the first three vertices
    /// and folded into the pool's per-vertex normal slots, skipping
    /// degenerate (near-zero) normals so existing accumulations stay
    /// intact.
    ///
    /// # Errors
    ///
    /// Rejects faces with fewer than three vertices, mismatched index
    /// stream lengths, zero indices, or indices beyond the 16-bit range.
    /// A rejected face is not stored and leaves the counters untouched.
    pub fn add_face(
        &mut self,
        pool: &mut VertexPool,
        vertices: &[u32],
        uvs: &[u32],
        normals: &[u32],
    ) -> Result<(), MeshError> {
        if vertices.len() < 3 {
            return Err(MeshError::FaceTooSmall {
                count: vertices.len(),
            });
        }
        if !uvs.is_empty() && uvs.len() != vertices.len() {
            return Err(MeshError::IndexStreamMismatch {
                stream: "uv",
                expected: vertices.len(),
                found: uvs.len(),
            });
        }
        // A leading 0 is the "no normal given" sentinel.
        let explicit_normals = normals.first().is_some_and(|&first| first != 0);
        if explicit_normals && normals.len() != vertices.len() {
            return Err(MeshError::IndexStreamMismatch {
                stream: "normal",
                expected: vertices.len(),
                found: normals.len(),
            });
        }

        let mut face = Face {
            vertices: convert_indices("vertex", vertices)?,
            uvs: convert_indices("uv", uvs)?,
            normals: Vec::new(),
        };
        if explicit_normals {
            face.normals = convert_indices("normal", normals)?;
        } else {
            Self::derive_flat_normal(pool, &mut face);
        }

        self.vertex_count += face.len();
        self.triangle_count += face.triangle_count();
        self.faces.push(face);
        Ok(())
    }

    /// Compute one flat normal for the face and accumulate it at every
    /// corner's vertex slot; the face then shares its vertex indices for
    /// normals.
    fn derive_flat_normal(pool: &mut VertexPool, face: &mut Face) {
        pool.set_normal_count(pool.vertex_count());
        let anchor = pool.vertex(face.vertices[0] as usize);
        let edge_a = pool.vertex(face.vertices[1] as usize) - anchor;
        let edge_b = pool.vertex(face.vertices[2] as usize) - anchor;
        let normal = edge_a.cross(edge_b).normalize_or_zero();
        if normal.length() > MIN_NORMAL_LENGTH {
            for &index in &face.vertices {
                pool.add_normal(index as usize, normal);
            }
        }
        face.normals = face.vertices.clone();
    }
}

/// Convert a 1-based external index stream to 0-based u16 storage.
fn convert_indices(stream: &'static str, source: &[u32]) -> Result<Vec<u16>, MeshError> {
    let mut target = Vec::with_capacity(source.len());
    for &value in source {
        if value == 0 {
            return Err(MeshError::ZeroIndex { stream });
        }
        if value > MAX_EXTERNAL_INDEX {
            return Err(MeshError::IndexOverflow { stream, index: value });
        }
        target.push((value - 1) as u16);
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1.0e-5;

    fn triangle_pool() -> VertexPool {
        let mut pool = VertexPool::new();
        pool.append_vertex(Vec3::new(0.0, 0.0, 0.0));
        pool.append_vertex(Vec3::new(1.0, 0.0, 0.0));
        pool.append_vertex(Vec3::new(0.0, 1.0, 0.0));
        pool
    }

    #[test]
    fn test_add_face_stores_zero_based_indices() {
        let mut pool = triangle_pool();
        let mut faces = FaceSet::new();
        faces
            .add_face(&mut pool, &[1, 2, 3], &[], &[1, 2, 3])
            .unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces.face(0).unwrap().vertex_indices(), &[0, 1, 2]);
        assert_eq!(faces.vertex_count(), 3);
        assert_eq!(faces.triangle_count(), 1);
    }

    #[test]
    fn test_face_too_small_rejected_counters_untouched() {
        let mut pool = triangle_pool();
        let mut faces = FaceSet::new();
        for vertices in [&[][..], &[1][..], &[1, 2][..]] {
            let result = faces.add_face(&mut pool, vertices, &[], &[]);
            assert_eq!(
                result,
                Err(MeshError::FaceTooSmall {
                    count: vertices.len()
                })
            );
        }
        assert_eq!(faces.len(), 0);
        assert_eq!(faces.vertex_count(), 0);
        assert_eq!(faces.triangle_count(), 0);
    }

    #[test]
    fn test_uv_stream_mismatch_rejected() {
        let mut pool = triangle_pool();
        let mut faces = FaceSet::new();
        let result = faces.add_face(&mut pool, &[1, 2, 3], &[1, 2], &[]);
        assert_eq!(
            result,
            Err(MeshError::IndexStreamMismatch {
                stream: "uv",
                expected: 3,
                found: 2,
            })
        );
        assert!(faces.is_empty());
    }

    #[test]
    fn test_index_overflow_rejected_not_truncated() {
        let mut pool = triangle_pool();
        let mut faces = FaceSet::new();
        let result = faces.add_face(&mut pool, &[1, 2, 70000], &[], &[]);
        assert!(matches!(
            result,
            Err(MeshError::IndexOverflow {
                stream: "vertex",
                index: 70000,
            })
        ));
        assert!(faces.is_empty());
        assert_eq!(faces.triangle_count(), 0);
    }

    #[test]
    fn test_zero_vertex_index_rejected() {
        let mut pool = triangle_pool();
        let mut faces = FaceSet::new();
        let result = faces.add_face(&mut pool, &[1, 0, 3], &[], &[]);
        assert_eq!(result, Err(MeshError::ZeroIndex { stream: "vertex" }));
    }

    #[test]
    fn test_derived_flat_normal_accumulates_at_each_vertex() {
        let mut pool = triangle_pool();
        let mut faces = FaceSet::new();
        faces.add_face(&mut pool, &[1, 2, 3], &[], &[]).unwrap();

        let face = faces.face(0).unwrap();
        assert_eq!(face.normal_indices(), face.vertex_indices());
        for i in 0..3 {
            let normal = pool.normal(i);
            assert!((normal - Vec3::Z).length() < EPSILON, "slot {i}: {normal:?}");
        }
    }

    #[test]
    fn test_leading_zero_normal_sentinel_means_derive() {
        let mut pool = triangle_pool();
        let mut faces = FaceSet::new();
        faces.add_face(&mut pool, &[1, 2, 3], &[], &[0]).unwrap();
        assert_eq!(
            faces.face(0).unwrap().normal_indices(),
            faces.face(0).unwrap().vertex_indices()
        );
        assert!((pool.normal(0) - Vec3::Z).length() < EPSILON);
    }

    #[test]
    fn test_degenerate_face_does_not_corrupt_normals() {
        let mut pool = VertexPool::new();
        // Three collinear points.
        pool.append_vertex(Vec3::new(0.0, 0.0, 0.0));
        pool.append_vertex(Vec3::new(1.0, 0.0, 0.0));
        pool.append_vertex(Vec3::new(2.0, 0.0, 0.0));
        pool.set_normal(0, Vec3::Z);

        let mut faces = FaceSet::new();
        faces.add_face(&mut pool, &[1, 2, 3], &[], &[]).unwrap();

        // The degenerate contribution is skipped, the face still stored.
        assert_eq!(faces.len(), 1);
        assert_eq!(pool.normal(0), Vec3::Z);
        assert!(pool.normal(1).is_finite());
    }

    #[test]
    fn test_quad_counters() {
        let mut pool = triangle_pool();
        pool.append_vertex(Vec3::new(1.0, 1.0, 0.0));
        let mut faces = FaceSet::new();
        faces.add_face(&mut pool, &[1, 2, 4, 3], &[], &[]).unwrap();
        assert_eq!(faces.vertex_count(), 4);
        assert_eq!(faces.triangle_count(), 2);
    }
}
