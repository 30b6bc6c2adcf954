//! The user-facing `Text` object: a shared glyph atlas, an owned layout,
//! and mutable presentation state.

use std::sync::Arc;

use glyphmesh_core::{MeshBackend, TransformStack};
use glyphmesh_font::{FontLibrary, GlyphAtlas};
use glyphmesh_layout::{compute_layout, LayoutParams, TextLayout};

use crate::renderer::{draw_text, RenderError, TextStyle};

/// One renderable text instance.
///
/// The atlas is shared and read-only — many `Text`s of the same font hold
/// the same `Arc`. The layout is owned per instance and recomputed
/// wholesale whenever the body (or the spacing parameters) change; it is
/// never partially patched. Presentation state ([`TextStyle`]) affects
/// rendering only.
#[derive(Debug)]
pub struct Text {
    atlas: Arc<GlyphAtlas>,
    layout: TextLayout,
    body: String,
    /// Spacing parameters used for both measurement and drawing.
    /// Call [`Text::relayout`] after changing them.
    pub params: LayoutParams,
    /// Mutable presentation state; takes effect on the next draw.
    pub style: TextStyle,
}

impl Text {
    /// Resolve the font through `library` (building its atlas on first
    /// use) and lay out `body`.
    pub fn new(
        library: &mut FontLibrary,
        font_name: &str,
        body: &str,
        backend: &mut dyn MeshBackend,
    ) -> Result<Self, RenderError> {
        let atlas = library.get_or_build(font_name, backend)?;
        let params = LayoutParams::default();
        let layout = compute_layout(&atlas, body, &params)?;
        Ok(Self {
            atlas,
            layout,
            body: body.to_string(),
            params,
            style: TextStyle::default(),
        })
    }

    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.style.position = position;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.style.size = size;
        self
    }

    /// Replace the body and recompute the layout.
    ///
    /// On error (a glyph missing from the atlas) the previous body and
    /// layout stay in place.
    pub fn set_body(&mut self, body: &str) -> Result<(), RenderError> {
        let layout = compute_layout(&self.atlas, body, &self.params)?;
        self.layout = layout;
        self.body.clear();
        self.body.push_str(body);
        Ok(())
    }

    /// Recompute the layout with the current [`Text::params`].
    pub fn relayout(&mut self) -> Result<(), RenderError> {
        self.layout = compute_layout(&self.atlas, &self.body, &self.params)?;
        Ok(())
    }

    /// Draw with the current presentation state.
    pub fn draw<B>(&self, backend: &mut B) -> Result<(), RenderError>
    where
        B: MeshBackend + TransformStack,
    {
        draw_text(&self.atlas, &self.layout, &self.style, &self.params, backend)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    pub fn atlas(&self) -> &Arc<GlyphAtlas> {
        &self.atlas
    }

    /// Bounding width of the current layout.
    pub fn width(&self) -> f32 {
        self.layout.width
    }

    /// Bounding height of the current layout.
    pub fn height(&self) -> f32 {
        self.layout.height
    }
}

// ===================================================================
// Tests
// ===================================================================
