//! The draw walk: turns a measured layout into per-glyph draw calls with
//! kerning, justification, centering, and line-spacing transforms.
//!
//! Measurement and drawing share `glyphmesh_layout::glyph_advance`, so a
//! body always draws exactly as wide as it measured.

use thiserror::Error;

use glyphmesh_core::{MeshBackend, TransformStack};
use glyphmesh_font::{FontError, GlyphAtlas};
use glyphmesh_layout::{glyph_advance, LayoutError, LayoutParams, TextLayout};

const X_AXIS: [f32; 3] = [1.0, 0.0, 0.0];
const Z_AXIS: [f32; 3] = [0.0, 0.0, 1.0];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Presentation state of one text instance. None of it affects layout —
/// it only shapes the transforms emitted at draw time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// World-space anchor of the text block.
    pub position: [f32; 3],
    /// Z-X-Z euler rotation in radians, applied in that order.
    pub rotation: Option<[f32; 3]>,
    /// Uniform glyph size.
    pub size: f32,
    /// Flat RGBA color.
    pub color: [f32; 4],
    /// Extra translation applied after scaling.
    pub offset: Option<[f32; 3]>,
    /// Center each line within the block width.
    pub centered: bool,
    /// Distribute each line's width deficit across its whitespace glyphs.
    pub justified: bool,
    /// Shift the whole block left by half its width.
    pub center_to_origin: bool,
    /// Horizontal squeeze factor on the X scale.
    pub condensation: f32,
    /// Extrusion scale factor on the Z axis.
    pub depth: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: None,
            size: 1.0,
            color: [1.0, 0.75, 0.0, 1.0],
            offset: None,
            centered: false,
            justified: false,
            center_to_origin: false,
            condensation: 1.0,
            depth: 1.0,
        }
    }
}

/// Draw one laid-out body with the given presentation state.
///
/// Per line, the horizontal start offset is `(width − line_width) / 2`
/// when centered, else 0. Per glyph: latch the transform, draw, then
/// advance. Justification adds `(width − line_width) / whitespace_count`
/// after each whitespace glyph; a line without whitespace glyphs gets no
/// boost and simply stays short.
pub fn draw_text<B>(
    atlas: &GlyphAtlas,
    layout: &TextLayout,
    style: &TextStyle,
    params: &LayoutParams,
    backend: &mut B,
) -> Result<(), RenderError>
where
    B: MeshBackend + TransformStack,
{
    backend.push();
    backend.set_color(style.color);
    backend.translate(style.position);
    if let Some(rot) = style.rotation {
        if rot[0] != 0.0 {
            backend.rotate(Z_AXIS, rot[0]);
        }
        if rot[1] != 0.0 {
            backend.rotate(X_AXIS, rot[1]);
        }
        if rot[2] != 0.0 {
            backend.rotate(Z_AXIS, rot[2]);
        }
    }
    backend.scale([
        style.size * style.condensation,
        style.size,
        style.size * style.depth,
    ]);
    if let Some(offset) = style.offset {
        backend.translate(offset);
    }
    if style.center_to_origin {
        backend.translate([-layout.width / 2.0, 0.0, 0.0]);
    }

    for (i, line) in layout.lines.iter().enumerate() {
        backend.push();
        if style.centered {
            backend.translate([(layout.width - layout.line_widths[i]) / 2.0, 0.0, 0.0]);
        }
        for symbol in line.chars() {
            backend.apply();
            atlas.draw_glyph(symbol, &mut *backend)?;
            if style.justified
                && atlas.is_whitespace(symbol)?
                && layout.whitespace_counts[i] > 0
            {
                // The count guard keeps the division defined even if the
                // counts ever disagree with the glyphs.
                backend.translate([
                    (layout.width - layout.line_widths[i]) / layout.whitespace_counts[i] as f32,
                    0.0,
                    0.0,
                ]);
            }
            backend.translate([glyph_advance(atlas, symbol, params)?, 0.0, 0.0]);
        }
        backend.pop();
        backend.translate([0.0, -params.line_spacing, 0.0]);
    }

    backend.pop();
    Ok(())
}

// ===================================================================
// Tests
// ===================================================================
