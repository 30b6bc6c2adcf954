//! # glyphmesh-core
//!
//! Shared data model and backend seams for the glyphmesh workspace.
//! Text is rendered as real 3D triangle meshes: each font ships one
//! already-triangulated mesh per glyph, and the higher-level crates pack
//! those meshes into a single shared vertex buffer.
//!
//! ## Architecture
//!
//! ```text
//! FontData (symbol → kerning + triangle mesh, serde-loadable)
//!     │
//!     ▼
//! glyphmesh-font   ──► GlyphAtlas (one shared vertex buffer)
//!     │                     │
//!     ▼                     ▼
//! glyphmesh-layout ──► glyphmesh-render ──► MeshBackend / TransformStack
//! ```
//!
//! - **`mesh`** — glyph mesh source data and the font asset format.
//! - **`backend`** — the two trait seams every renderer implements:
//!   buffer creation/draw and the transform stack.

pub mod backend;
pub mod mesh;

// Re-exports for ergonomic use.
pub use backend::{BufferHandle, MeshBackend, TransformStack, VERTEX_STRIDE_FLOATS};
pub use mesh::{FontData, GlyphDef, GlyphMesh, MeshError, Point3};
