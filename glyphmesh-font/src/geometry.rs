//! Face-normal computation and mesh flattening.
//!
//! Glyph meshes arrive as lists of triangles; the atlas needs them as one
//! flat interleaved vertex stream. Each triangle is flat-shaded: its three
//! vertices share the face normal `(p1 − p0) × (p2 − p0)`.
//!
//! The cross product is **not** normalized — the emitted normals are
//! area-weighted. Lighting backends normalize in the shader (see the
//! `mesh.wgsl` shader in `glyphmesh-render`).

use bytemuck::{Pod, Zeroable};
use glyphmesh_core::{GlyphMesh, MeshError, Point3};

/// One interleaved vertex of the shared glyph buffer: 24 bytes,
/// position at byte offset 0, normal at byte offset 12.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Area-weighted face normal of a triangle: `(p1 − p0) × (p2 − p0)`.
///
/// Degenerate triangles yield the zero vector.
pub fn face_normal(p0: Point3, p1: Point3, p2: Point3) -> [f32; 3] {
    let e1 = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
    let e2 = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
    [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ]
}

/// Flatten a glyph mesh into a flat-shaded vertex stream.
///
/// Emits 3 vertices per triangle, in input order. Pure; the only failure
/// is a triangle that does not expose exactly 3 points.
pub fn build_vertex_stream(mesh: &GlyphMesh) -> Result<Vec<MeshVertex>, MeshError> {
    let mut stream = Vec::with_capacity(mesh.len() * 3);
    for triangle in mesh {
        let [p0, p1, p2] = match triangle.as_slice() {
            &[p0, p1, p2] => [p0, p1, p2],
            other => {
                return Err(MeshError::MalformedTriangle {
                    points: other.len(),
                })
            }
        };
        let normal = face_normal(p0, p1, p2);
        for position in [p0, p1, p2] {
            stream.push(MeshVertex { position, normal });
        }
    }
    Ok(stream)
}

/// Zero-copy view of a vertex stream as raw floats, in the
/// [`VERTEX_STRIDE_FLOATS`](glyphmesh_core::VERTEX_STRIDE_FLOATS) layout.
pub fn vertex_floats(stream: &[MeshVertex]) -> &[f32] {
    bytemuck::cast_slice(stream)
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glyphmesh_core::VERTEX_STRIDE_FLOATS;

    #[test]
    fn test_face_normal_unit_triangle() {
        let n = face_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_face_normal_is_area_weighted() {
        // Doubling the edge lengths quadruples the cross product.
        let n = face_normal([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_face_normal_winding() {
        let n = face_normal([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_degenerate_triangle_zero_normal() {
        let n = face_normal([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        assert_eq!(n, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_stream_shares_face_normal() {
        let mesh = vec![vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]];
        let stream = build_vertex_stream(&mesh).unwrap();
        assert_eq!(stream.len(), 3);
        for vertex in &stream {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
        assert_eq!(stream[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(stream[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(stream[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_empty_mesh_empty_stream() {
        let stream = build_vertex_stream(&Vec::new()).unwrap();
        assert!(stream.is_empty());
    }

    #[test]
    fn test_malformed_triangle_rejected() {
        let mesh = vec![vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]];
        let err = build_vertex_stream(&mesh).unwrap_err();
        assert_eq!(err, MeshError::MalformedTriangle { points: 2 });

        let mesh = vec![vec![[0.0; 3]; 4]];
        let err = build_vertex_stream(&mesh).unwrap_err();
        assert_eq!(err, MeshError::MalformedTriangle { points: 4 });
    }

    #[test]
    fn test_float_view_matches_stride() {
        let mesh = vec![
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]],
        ];
        let stream = build_vertex_stream(&mesh).unwrap();
        let floats = vertex_floats(&stream);
        assert_eq!(floats.len(), stream.len() * VERTEX_STRIDE_FLOATS);
        // Vertex 1 starts at float offset 6: position then normal.
        assert_eq!(&floats[6..9], &[1.0, 0.0, 0.0]);
        assert_eq!(&floats[9..12], &[0.0, 0.0, 1.0]);
    }
}
