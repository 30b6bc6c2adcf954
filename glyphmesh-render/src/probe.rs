//! Recording backend — implements both seams over a [`MatrixStack`] and
//! logs every operation.
//!
//! Used by the renderer tests to assert exact cumulative translations per
//! draw call, and handy for demos and bring-up before a GPU backend is
//! connected.

use glyphmesh_core::{BufferHandle, MeshBackend, TransformStack};
use nalgebra::Matrix4;

use crate::transform::MatrixStack;

/// One recorded draw: buffer range, flat color, and the model transform
/// latched at the preceding `apply`.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall {
    pub buffer: BufferHandle,
    pub start: u32,
    pub vertex_count: u32,
    pub color: [f32; 4],
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
}

impl DrawCall {
    /// Cumulative translation of the model transform.
    pub fn translation(&self) -> [f32; 3] {
        [self.model[3][0], self.model[3][1], self.model[3][2]]
    }
}

/// Backend that retains uploaded buffers and records draws instead of
/// touching a GPU.
#[derive(Default)]
pub struct RecordingBackend {
    stack: MatrixStack,
    latched: Option<Matrix4<f32>>,
    color: [f32; 4],
    bound: Option<BufferHandle>,
    bind_count: u32,
    buffers: Vec<Vec<f32>>,
    /// Every draw issued, whitespace (zero-count) draws included.
    pub draws: Vec<DrawCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Float data of an uploaded buffer.
    pub fn buffer_floats(&self, handle: BufferHandle) -> Option<&[f32]> {
        self.buffers.get(handle.0 as usize).map(Vec::as_slice)
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of effective (non-redundant) binds.
    pub fn bind_count(&self) -> u32 {
        self.bind_count
    }

    pub fn bound(&self) -> Option<BufferHandle> {
        self.bound
    }

    /// Draws that produced geometry (skips whitespace draws).
    pub fn glyph_draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.draws.iter().filter(|d| d.vertex_count > 0)
    }

    /// Current save-depth of the underlying matrix stack.
    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }
}

impl MeshBackend for RecordingBackend {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle {
        self.buffers.push(data.to_vec());
        BufferHandle((self.buffers.len() - 1) as u32)
    }

    fn bind_buffer(&mut self, handle: BufferHandle) {
        if self.bound != Some(handle) {
            self.bound = Some(handle);
            self.bind_count += 1;
        }
    }

    fn draw_triangles(&mut self, start: u32, vertex_count: u32) {
        let Some(buffer) = self.bound else {
            log::warn!("draw with no bound buffer ignored");
            return;
        };
        let model = self.latched.unwrap_or_else(Matrix4::identity);
        self.draws.push(DrawCall {
            buffer,
            start,
            vertex_count,
            color: self.color,
            model: model.into(),
        });
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        self.color = rgba;
    }
}

impl TransformStack for RecordingBackend {
    fn push(&mut self) {
        self.stack.push();
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    fn translate(&mut self, v: [f32; 3]) {
        self.stack.translate(v);
    }

    fn rotate(&mut self, axis: [f32; 3], radians: f32) {
        self.stack.rotate(axis, radians);
    }

    fn scale(&mut self, v: [f32; 3]) {
        self.stack.scale(v);
    }

    fn apply(&mut self) {
        self.latched = Some(*self.stack.current());
    }
}

// ===================================================================
// Tests
// ===================================================================
