//! Hierarchical matrix stack backing the [`TransformStack`] seam.
//!
//! [`TransformStack`]: glyphmesh_core::TransformStack

use nalgebra::{Matrix4, Unit, Vector3};

/// Classic push/pop matrix stack. The bottom matrix is never popped, so
/// [`MatrixStack::current`] always has a value.
///
/// Mutators post-multiply the top matrix: a translate after a scale moves
/// in the scaled space, matching immediate-mode transform semantics.
pub struct MatrixStack {
    stack: Vec<Matrix4<f32>>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Matrix4::identity()],
        }
    }

    /// The current (top) transform.
    pub fn current(&self) -> &Matrix4<f32> {
        // Invariant: the stack is never empty (pop keeps the bottom).
        &self.stack[self.stack.len() - 1]
    }

    /// The current transform as a column-major array.
    pub fn current_array(&self) -> [[f32; 4]; 4] {
        (*self.current()).into()
    }

    /// Translation component of the current transform.
    pub fn translation(&self) -> [f32; 3] {
        let m = self.current();
        [m[(0, 3)], m[(1, 3)], m[(2, 3)]]
    }

    /// Number of saved transforms, including the bottom identity.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self) {
        self.stack.push(*self.current());
    }

    /// Restore the previously pushed transform. Popping the bottom matrix
    /// is ignored (and logged) rather than panicking.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            log::warn!("matrix stack underflow: pop ignored");
        }
    }

    pub fn translate(&mut self, v: [f32; 3]) {
        let t = Matrix4::new_translation(&Vector3::from(v));
        self.post_multiply(t);
    }

    /// Rotate around `axis` by `radians`. A zero-length axis is ignored.
    pub fn rotate(&mut self, axis: [f32; 3], radians: f32) {
        match Unit::try_new(Vector3::from(axis), 1.0e-9) {
            Some(axis) => self.post_multiply(Matrix4::from_axis_angle(&axis, radians)),
            None => log::warn!("rotation around zero-length axis ignored"),
        }
    }

    pub fn scale(&mut self, v: [f32; 3]) {
        let s = Matrix4::new_nonuniform_scaling(&Vector3::from(v));
        self.post_multiply(s);
    }

    fn post_multiply(&mut self, m: Matrix4<f32>) {
        let top = self.stack.len() - 1;
        self.stack[top] *= m;
    }
}

// ===================================================================
// Tests
// ===================================================================
