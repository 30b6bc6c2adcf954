//! # glyphmesh-layout
//!
//! Line layout for mesh text: per-line advance widths, whitespace counts,
//! and the overall bounding box, derived from a glyph atlas and a
//! multi-line body string.
//!
//! Layout is recomputed wholesale whenever the body changes — never
//! partially patched — and the same advance formula drives both
//! measurement here and drawing in `glyphmesh-render`, so the two passes
//! cannot drift apart.

pub mod engine;

// Re-exports for ergonomic use.
pub use engine::{compute_layout, glyph_advance, LayoutError, LayoutParams, TextLayout};
