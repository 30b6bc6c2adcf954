//! Backend trait seams — the two capability sets the rendering host must
//! provide.
//!
//! The glyph atlas and text renderer never talk to a graphics API
//! directly. They drive two small traits: [`MeshBackend`] (immutable
//! vertex buffer upload + ranged draws) and [`TransformStack`]
//! (push/pop matrix stack with a `apply` latch). A real GPU backend and a
//! recording test backend both live in `glyphmesh-render`.

/// Floats per vertex in the shared buffer: position `(x, y, z)` at offset
/// 0, face normal `(nx, ny, nz)` at offset 3.
pub const VERTEX_STRIDE_FLOATS: usize = 6;

/// Opaque handle to a backend-owned vertex buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Vertex buffer and draw-call capability of a rendering host.
///
/// Vertex layout contract: stride of [`VERTEX_STRIDE_FLOATS`] floats,
/// position at float offset 0, normal at float offset 3. Normals are
/// area-weighted face normals and are **not** unit length; backends that
/// light geometry should normalize them in the shader.
pub trait MeshBackend {
    /// Upload `data` once as immutable static vertex data.
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle;

    /// Make `handle` the active vertex buffer for subsequent draws.
    /// Implementations may elide redundant binds.
    fn bind_buffer(&mut self, handle: BufferHandle);

    /// Draw `vertex_count` vertices from the bound buffer as a triangle
    /// list, starting at vertex index `start`. A zero-count draw is a
    /// no-op.
    fn draw_triangles(&mut self, start: u32, vertex_count: u32);

    /// Set the flat RGBA color applied to subsequent draws.
    fn set_color(&mut self, rgba: [f32; 4]);
}

/// Hierarchical transform stack driven by the text renderer.
///
/// Mirrors the classic immediate-mode matrix stack: `push`/`pop` save and
/// restore, the mutators post-multiply the top matrix, and [`apply`]
/// latches the current top as the model transform for subsequent draws.
///
/// [`apply`]: TransformStack::apply
pub trait TransformStack {
    fn push(&mut self);
    fn pop(&mut self);
    fn translate(&mut self, v: [f32; 3]);
    /// Rotate around `axis` by `radians`. `axis` need not be unit length.
    fn rotate(&mut self, axis: [f32; 3], radians: f32);
    fn scale(&mut self, v: [f32; 3]);
    /// Latch the current transform for subsequent draw calls.
    fn apply(&mut self);
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Both seams must stay object-safe: the atlas takes `&mut dyn
    // MeshBackend` and the renderer is generic over both.
    fn _object_safe(_: &mut dyn MeshBackend, _: &mut dyn TransformStack) {}

    #[test]
    fn test_buffer_handle_identity() {
        let a = BufferHandle(0);
        let b = BufferHandle(0);
        let c = BufferHandle(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
