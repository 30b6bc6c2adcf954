//! # glyphmesh-render
//!
//! Draws laid-out mesh text through the backend seams, and provides two
//! backends: a recording probe for tests and bring-up, and a `wgpu`
//! reference implementation.
//!
//! ## Architecture
//!
//! ```text
//! Text (body + presentation state)
//!     │  set_body ──► glyphmesh-layout (wholesale recompute)
//!     ▼
//! draw_text ──► TransformStack ops + GlyphAtlas::draw_glyph
//!     │
//!     ├──► RecordingBackend (MatrixStack + draw log)
//!     └──► WgpuMeshBackend  (GpuContext + MeshPipeline)
//! ```
//!
//! - **`renderer`** — the per-line/per-glyph draw walk: kerning,
//!   justification, centering, line spacing.
//! - **`text`** — the user-facing `Text` object.
//! - **`transform`** — nalgebra-backed matrix stack.
//! - **`probe`** — recording backend for exact-position assertions.
//! - **`context`**, **`gpu`**, **`pipelines`** — wgpu reference backend.

pub mod context;
pub mod gpu;
pub mod pipelines;
pub mod probe;
pub mod renderer;
pub mod text;
pub mod transform;

// Re-exports for ergonomic use.
pub use context::{GpuContext, GpuError};
pub use gpu::{CameraUniform, FrameStats, WgpuMeshBackend};
pub use probe::{DrawCall, RecordingBackend};
pub use renderer::{draw_text, RenderError, TextStyle};
pub use text::Text;
pub use transform::MatrixStack;
