//! Layout engine — measures a multi-line body against a glyph atlas.

use thiserror::Error;

use glyphmesh_font::{FontError, GlyphAtlas};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Font(#[from] FontError),
}

/// Spacing parameters shared by measurement and drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    /// Multiplier on each glyph's kerning width.
    pub kerning: f32,
    /// Extra advance added after every glyph.
    pub letter_spacing: f32,
    /// Vertical advance between lines.
    pub line_spacing: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            kerning: 1.0,
            letter_spacing: 0.0,
            line_spacing: 0.8,
        }
    }
}

/// Measured layout of one body string: derived, per-`Text` state.
///
/// `line_widths` and `whitespace_counts` run parallel to `lines`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub line_widths: Vec<f32>,
    pub whitespace_counts: Vec<usize>,
    /// Maximum line width.
    pub width: f32,
    /// `line_count × line_spacing`.
    pub height: f32,
}

impl TextLayout {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Horizontal advance of one glyph under `params`.
///
/// The single source of truth for glyph advance: both [`compute_layout`]
/// and the renderer's draw pass use it.
pub fn glyph_advance(
    atlas: &GlyphAtlas,
    symbol: char,
    params: &LayoutParams,
) -> Result<f32, LayoutError> {
    Ok(atlas.kerning(symbol)? * params.kerning + params.letter_spacing)
}

/// Measure `body` against `atlas`.
///
/// The body splits on `\n`; empty lines are zero-width. Any glyph absent
/// from the atlas fails the whole computation — there is no fallback
/// glyph and no silent skip.
pub fn compute_layout(
    atlas: &GlyphAtlas,
    body: &str,
    params: &LayoutParams,
) -> Result<TextLayout, LayoutError> {
    let lines: Vec<String> = body.split('\n').map(str::to_string).collect();
    let mut line_widths = Vec::with_capacity(lines.len());
    let mut whitespace_counts = Vec::with_capacity(lines.len());
    let mut width = 0.0f32;

    for line in &lines {
        let mut line_width = 0.0f32;
        let mut whitespace_count = 0usize;
        for symbol in line.chars() {
            line_width += glyph_advance(atlas, symbol, params)?;
            if atlas.is_whitespace(symbol)? {
                whitespace_count += 1;
            }
        }
        if line_width > width {
            width = line_width;
        }
        line_widths.push(line_width);
        whitespace_counts.push(whitespace_count);
    }

    let height = lines.len() as f32 * params.line_spacing;
    log::trace!(
        "layout: {} lines, width {width}, height {height}",
        lines.len(),
    );

    Ok(TextLayout {
        lines,
        line_widths,
        whitespace_counts,
        width,
        height,
    })
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glyphmesh_core::{BufferHandle, FontData, MeshBackend};

    struct NullBackend;

    impl MeshBackend for NullBackend {
        fn create_vertex_buffer(&mut self, _data: &[f32]) -> BufferHandle {
            BufferHandle(0)
        }
        fn bind_buffer(&mut self, _handle: BufferHandle) {}
        fn draw_triangles(&mut self, _start: u32, _vertex_count: u32) {}
        fn set_color(&mut self, _rgba: [f32; 4]) {}
    }

    fn tri() -> Vec<[f32; 3]> {
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    /// `a` (kerning 1.0, 1 triangle), ` ` (0.5, whitespace),
    /// `b` (0.8, 1 triangle).
    fn sample_atlas() -> GlyphAtlas {
        let mut data = FontData::new();
        data.insert('a', 1.0, vec![tri()]);
        data.insert_whitespace(' ', 0.5);
        data.insert('b', 0.8, vec![tri()]);
        GlyphAtlas::build(data, &mut NullBackend).unwrap()
    }

    #[test]
    fn test_single_line_with_whitespace() {
        let atlas = sample_atlas();
        let layout = compute_layout(&atlas, "a a", &LayoutParams::default()).unwrap();

        assert_eq!(layout.lines, vec!["a a".to_string()]);
        assert_eq!(layout.line_widths, vec![2.5]);
        assert_eq!(layout.whitespace_counts, vec![1]);
        assert_eq!(layout.width, 2.5);
    }

    #[test]
    fn test_two_lines_width_and_height() {
        let atlas = sample_atlas();
        let params = LayoutParams {
            line_spacing: 0.8,
            ..Default::default()
        };
        let layout = compute_layout(&atlas, "a\nab", &params).unwrap();

        assert_eq!(layout.line_count(), 2);
        assert_eq!(layout.line_widths, vec![1.0, 1.8]);
        assert_eq!(layout.width, 1.8, "width is the max line width");
        assert_eq!(layout.height, 2.0 * 0.8);
    }

    #[test]
    fn test_kerning_and_letter_spacing() {
        let atlas = sample_atlas();
        let params = LayoutParams {
            kerning: 2.0,
            letter_spacing: 0.1,
            ..Default::default()
        };
        let layout = compute_layout(&atlas, "ab", &params).unwrap();

        // (1.0*2 + 0.1) + (0.8*2 + 0.1)
        assert!((layout.line_widths[0] - 3.8).abs() < 1e-6);
    }

    #[test]
    fn test_empty_lines_are_zero_width() {
        let atlas = sample_atlas();
        let params = LayoutParams::default();
        let layout = compute_layout(&atlas, "a\n\nb", &params).unwrap();

        assert_eq!(layout.line_widths, vec![1.0, 0.0, 0.8]);
        assert_eq!(layout.whitespace_counts, vec![0, 0, 0]);
        assert_eq!(layout.height, 3.0 * params.line_spacing);
    }

    #[test]
    fn test_empty_body_is_one_empty_line() {
        let atlas = sample_atlas();
        let layout = compute_layout(&atlas, "", &LayoutParams::default()).unwrap();
        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.width, 0.0);
    }

    #[test]
    fn test_unknown_symbol_propagates() {
        let atlas = sample_atlas();
        let err = compute_layout(&atlas, "ax", &LayoutParams::default()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Font(FontError::UnknownSymbol('x'))
        ));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let atlas = sample_atlas();
        let params = LayoutParams {
            kerning: 1.3,
            letter_spacing: 0.07,
            line_spacing: 0.9,
        };
        let first = compute_layout(&atlas, "a b\nab a", &params).unwrap();
        let second = compute_layout(&atlas, "a b\nab a", &params).unwrap();
        assert_eq!(first, second, "bit-identical on repeated computation");
    }

    #[test]
    fn test_advance_matches_layout_accumulation() {
        let atlas = sample_atlas();
        let params = LayoutParams {
            kerning: 1.5,
            letter_spacing: 0.2,
            ..Default::default()
        };
        let layout = compute_layout(&atlas, "a b", &params).unwrap();
        let by_hand: f32 = "a b"
            .chars()
            .map(|s| glyph_advance(&atlas, s, &params).unwrap())
            .sum();
        assert_eq!(layout.line_widths[0], by_hand);
    }
}
