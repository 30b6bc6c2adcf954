//! Glyph mesh source data and the font asset format.
//!
//! A font arrives as a set of glyph definitions: one kerning width and one
//! triangulated mesh per symbol. Whitespace glyphs carry an empty mesh and
//! only contribute horizontal advance. `FontData` preserves insertion order
//! so that atlas construction is deterministic and tests can assert exact
//! buffer offsets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = [f32; 3];

/// A glyph mesh: a list of triangles, each a list of 3D points.
///
/// Every triangle must contain exactly 3 points; this is validated when
/// the vertex stream is built, not at deserialization time.
pub type GlyphMesh = Vec<Vec<Point3>>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    #[error("malformed triangle: has {points} points, expected 3")]
    MalformedTriangle { points: usize },
}

/// One glyph in a font asset: symbol, advance width, and triangle mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphDef {
    /// The renderable character this definition covers.
    pub symbol: char,
    /// Horizontal advance attributed to the glyph, before spacing
    /// adjustments (in font units).
    pub kerning_width: f32,
    /// Triangulated glyph geometry. Empty for whitespace glyphs.
    #[serde(default)]
    pub mesh: GlyphMesh,
}

impl GlyphDef {
    /// Number of vertices this glyph contributes to the shared buffer.
    pub fn vertex_count(&self) -> usize {
        self.mesh.len() * 3
    }

    /// Whitespace glyphs have geometry-free meshes.
    pub fn is_whitespace(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// A complete font asset: an insertion-ordered collection of glyph
/// definitions.
///
/// Order matters — it determines the layout of the shared vertex buffer
/// built from this data. [`FontData::insert`] is last-write-wins: redefining
/// a symbol replaces its definition in place, keeping its position in the
/// ordering. Buffer offsets still depend on every mesh's size, so a
/// redefinition with a different triangle count shifts the ranges packed
/// after it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FontData {
    glyphs: Vec<GlyphDef>,
}

impl FontData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a font asset from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the font asset to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Add or replace a glyph definition. Replacement keeps the glyph's
    /// original position in the ordering.
    pub fn insert(&mut self, symbol: char, kerning_width: f32, mesh: GlyphMesh) {
        let def = GlyphDef {
            symbol,
            kerning_width,
            mesh,
        };
        match self.glyphs.iter_mut().find(|g| g.symbol == symbol) {
            Some(existing) => *existing = def,
            None => self.glyphs.push(def),
        }
    }

    /// Add a whitespace glyph: advance only, no geometry.
    pub fn insert_whitespace(&mut self, symbol: char, kerning_width: f32) {
        self.insert(symbol, kerning_width, Vec::new());
    }

    /// Look up a glyph definition by symbol.
    ///
    /// When the data contains duplicate definitions (possible after
    /// deserialization), the last one wins, matching atlas construction.
    pub fn glyph(&self, symbol: char) -> Option<&GlyphDef> {
        self.glyphs.iter().rev().find(|g| g.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphDef> {
        self.glyphs.iter()
    }

    /// Total number of vertices across all glyph meshes.
    pub fn vertex_total(&self) -> usize {
        self.glyphs.iter().map(GlyphDef::vertex_count).sum()
    }
}

impl IntoIterator for FontData {
    type Item = GlyphDef;
    type IntoIter = std::vec::IntoIter<GlyphDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.glyphs.into_iter()
    }
}

impl FromIterator<GlyphDef> for FontData {
    fn from_iter<T: IntoIterator<Item = GlyphDef>>(iter: T) -> Self {
        let mut data = FontData::new();
        for def in iter {
            data.insert(def.symbol, def.kerning_width, def.mesh);
        }
        data
    }
}

// ===================================================================
// Tests
// ===================================================================
