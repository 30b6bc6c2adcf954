//! # glyphmesh-font
//!
//! Glyph atlas construction for 3D mesh text. Builds one shared vertex
//! buffer per font from already-triangulated glyph meshes, and lazily
//! materializes atlases through a font library.
//!
//! ## Architecture
//!
//! ```text
//! FontData ──► FontLibrary::get_or_build (once per font)
//!                  │
//!                  ▼
//!             GlyphAtlas ── symbol → (start, vertex_count, kerning)
//!                  │
//!                  ▼
//!          MeshBackend::create_vertex_buffer (one upload)
//! ```
//!
//! - **`geometry`** — face-normal computation and mesh flattening.
//! - **`atlas`** — shared-buffer packing and per-glyph draw ranges.
//! - **`fonts`** — lazy build-once font cache.

pub mod atlas;
pub mod fonts;
pub mod geometry;

use glyphmesh_core::MeshError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("unknown font: {0:?}")]
    UnknownFont(String),
    #[error("unknown symbol: {0:?}")]
    UnknownSymbol(char),
    #[error("invalid font data: {0}")]
    InvalidData(#[from] serde_json::Error),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

// Re-exports for ergonomic use.
pub use atlas::{GlyphAtlas, GlyphEntry};
pub use fonts::FontLibrary;
pub use geometry::{build_vertex_stream, vertex_floats, MeshVertex};
