//! Glyph atlas — one shared vertex buffer per font.
//!
//! Every glyph of a font lives in a single immutable vertex buffer; the
//! atlas maps each symbol to a contiguous `(start, vertex_count)` range
//! inside it. Drawing a glyph is one bind plus one ranged draw, and all
//! text instances of a font share the same buffer.
//!
//! Packing invariants (asserted by the tests):
//!
//! - ranges are non-overlapping and contiguous in definition order;
//! - `start` values are strictly increasing and gap-free;
//! - Σ `vertex_count` == buffer length / 6 floats.

use rustc_hash::FxHashMap;

use glyphmesh_core::{BufferHandle, FontData, GlyphDef, MeshBackend};

use crate::geometry::{self, MeshVertex};
use crate::FontError;

/// A glyph's range in the shared buffer, plus its advance width.
/// Immutable after atlas construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphEntry {
    /// Horizontal advance in font units, before spacing adjustments.
    pub kerning_width: f32,
    /// First vertex of the glyph in the shared buffer.
    pub start: u32,
    /// Number of vertices; `0` marks a whitespace glyph.
    pub vertex_count: u32,
}

impl GlyphEntry {
    pub fn is_whitespace(&self) -> bool {
        self.vertex_count == 0
    }
}

/// Shared vertex buffer + symbol lookup table for one font.
///
/// Built once from [`FontData`], then read-only. Many `Text` instances
/// share one atlas (via `Arc` handed out by the font library).
#[derive(Debug)]
pub struct GlyphAtlas {
    entries: FxHashMap<char, GlyphEntry>,
    buffer: BufferHandle,
    vertex_total: u32,
}

impl GlyphAtlas {
    /// Build the atlas: flatten every glyph mesh, assign buffer ranges in
    /// definition order, and upload the finished buffer once as immutable
    /// static data.
    ///
    /// Construction either fully succeeds or nothing is uploaded: all
    /// geometry is validated before the backend sees any data. Duplicate
    /// symbols in `data` resolve to the last definition at the first
    /// definition's position, so the offsets of other glyphs are stable.
    pub fn build(data: FontData, backend: &mut dyn MeshBackend) -> Result<Self, FontError> {
        // Dedup pass: last definition wins, first position kept.
        let mut defs: Vec<GlyphDef> = Vec::with_capacity(data.len());
        let mut index: FxHashMap<char, usize> = FxHashMap::default();
        for def in data {
            match index.get(&def.symbol) {
                Some(&i) => defs[i] = def,
                None => {
                    index.insert(def.symbol, defs.len());
                    defs.push(def);
                }
            }
        }

        let mut entries = FxHashMap::default();
        let mut stream: Vec<MeshVertex> = Vec::new();
        let mut cursor: u32 = 0;
        for def in defs {
            let vertices = geometry::build_vertex_stream(&def.mesh)?;
            entries.insert(
                def.symbol,
                GlyphEntry {
                    kerning_width: def.kerning_width,
                    start: cursor,
                    vertex_count: vertices.len() as u32,
                },
            );
            cursor += vertices.len() as u32;
            stream.extend_from_slice(&vertices);
        }

        let buffer = backend.create_vertex_buffer(geometry::vertex_floats(&stream));
        log::debug!(
            "glyph atlas built: {} glyphs, {} vertices",
            entries.len(),
            cursor,
        );

        Ok(Self {
            entries,
            buffer,
            vertex_total: cursor,
        })
    }

    /// Bind the shared buffer and draw one glyph's vertex range.
    pub fn draw_glyph(&self, symbol: char, backend: &mut dyn MeshBackend) -> Result<(), FontError> {
        let entry = self.entry(symbol).ok_or(FontError::UnknownSymbol(symbol))?;
        backend.bind_buffer(self.buffer);
        backend.draw_triangles(entry.start, entry.vertex_count);
        Ok(())
    }

    /// Whether `symbol` is a whitespace glyph (advance only, no geometry).
    pub fn is_whitespace(&self, symbol: char) -> Result<bool, FontError> {
        self.entry(symbol)
            .map(|e| e.is_whitespace())
            .ok_or(FontError::UnknownSymbol(symbol))
    }

    /// The glyph's advance width in font units.
    pub fn kerning(&self, symbol: char) -> Result<f32, FontError> {
        self.entry(symbol)
            .map(|e| e.kerning_width)
            .ok_or(FontError::UnknownSymbol(symbol))
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.entries.contains_key(&symbol)
    }

    pub fn entry(&self, symbol: char) -> Option<GlyphEntry> {
        self.entries.get(&symbol).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (char, GlyphEntry)> + '_ {
        self.entries.iter().map(|(&s, &e)| (s, e))
    }

    pub fn glyph_count(&self) -> usize {
        self.entries.len()
    }

    /// Total vertices in the shared buffer.
    pub fn vertex_total(&self) -> u32 {
        self.vertex_total
    }

    /// Handle of the shared buffer held by the backend.
    pub fn buffer_handle(&self) -> BufferHandle {
        self.buffer
    }
}

// ===================================================================
// Tests
// ===================================================================
