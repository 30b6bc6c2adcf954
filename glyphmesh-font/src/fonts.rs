//! Font library — lazy build-once cache of glyph atlases.
//!
//! Raw font data is cheap to hold; atlases cost a buffer upload. The
//! library keeps registered [`FontData`] untouched until a font is first
//! requested, builds the atlas once, drops the raw data, and hands out
//! shared `Arc` references from then on. The transition is one-way:
//! *unloaded → loading → cached*.
//!
//! Single-threaded by contract: a rendering loop owns the library. If a
//! multi-threaded host ever shares it, the check-build-cache sequence is
//! not atomic and needs an external lock around [`FontLibrary::get_or_build`].

use std::sync::Arc;

use rustc_hash::FxHashMap;

use glyphmesh_core::{FontData, MeshBackend};

use crate::atlas::GlyphAtlas;
use crate::FontError;

/// Name-keyed font cache with at-most-once atlas construction.
#[derive(Default)]
pub struct FontLibrary {
    /// Registered raw data, pending first use.
    raw: FxHashMap<String, FontData>,
    /// Materialized atlases, shared with every `Text` using the font.
    atlases: FxHashMap<String, Arc<GlyphAtlas>>,
    /// Number of atlas builds performed (probe for cache tests).
    builds: usize,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw font data under `name`. Silent overwrite: the last
    /// registration wins. Re-registering a name whose atlas is already
    /// cached has no effect on that atlas — caches are never rebuilt.
    pub fn register(&mut self, name: impl Into<String>, data: FontData) {
        let name = name.into();
        if self.raw.insert(name.clone(), data).is_some() {
            log::debug!("font {name:?}: raw data replaced by re-registration");
        }
    }

    /// Parse the JSON font asset format and register it under `name`.
    pub fn register_json(&mut self, name: impl Into<String>, json: &str) -> Result<(), FontError> {
        let data = FontData::from_json(json)?;
        self.register(name, data);
        Ok(())
    }

    /// Return the cached atlas for `name`, building it on first use.
    ///
    /// Construction happens at most once per name for the life of the
    /// library; later calls are O(1) lookups returning the same `Arc`.
    /// Fails with [`FontError::UnknownFont`] when neither a cached atlas
    /// nor raw data exists. A failed build is fatal for the font: the raw
    /// data is consumed and no atlas is published.
    pub fn get_or_build(
        &mut self,
        name: &str,
        backend: &mut dyn MeshBackend,
    ) -> Result<Arc<GlyphAtlas>, FontError> {
        if let Some(atlas) = self.atlases.get(name) {
            return Ok(Arc::clone(atlas));
        }

        let data = self
            .raw
            .remove(name)
            .ok_or_else(|| FontError::UnknownFont(name.to_string()))?;
        let atlas = Arc::new(GlyphAtlas::build(data, backend)?);
        self.builds += 1;
        log::info!(
            "font {name:?} materialized: {} glyphs, {} vertices",
            atlas.glyph_count(),
            atlas.vertex_total(),
        );
        self.atlases.insert(name.to_string(), Arc::clone(&atlas));
        Ok(atlas)
    }

    /// Whether `name` is known, either as raw data or as a cached atlas.
    pub fn is_registered(&self, name: &str) -> bool {
        self.raw.contains_key(name) || self.atlases.contains_key(name)
    }

    /// Whether `name` has already been materialized.
    pub fn is_cached(&self, name: &str) -> bool {
        self.atlases.contains_key(name)
    }

    /// Number of atlas builds performed so far.
    pub fn build_count(&self) -> usize {
        self.builds
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StubBackend;

    fn sample_font() -> FontData {
        let mut data = FontData::new();
        data.insert(
            'a',
            1.0,
            vec![vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]],
        );
        data.insert_whitespace(' ', 0.5);
        data
    }

    #[test]
    fn test_get_or_build_caches_identity() {
        let mut library = FontLibrary::new();
        let mut backend = StubBackend::default();
        library.register("sans", sample_font());

        let first = library.get_or_build("sans", &mut backend).unwrap();
        let second = library.get_or_build("sans", &mut backend).unwrap();

        assert!(Arc::ptr_eq(&first, &second), "same atlas instance");
        assert_eq!(library.build_count(), 1, "built exactly once");
        assert_eq!(backend.buffers.len(), 1, "one upload total");
    }

    #[test]
    fn test_unknown_font_errors() {
        let mut library = FontLibrary::new();
        let mut backend = StubBackend::default();
        let err = library.get_or_build("missing", &mut backend).unwrap_err();
        assert!(matches!(err, FontError::UnknownFont(name) if name == "missing"));
    }

    #[test]
    fn test_register_overwrites_silently() {
        let mut library = FontLibrary::new();
        let mut backend = StubBackend::default();

        let mut first = FontData::new();
        first.insert_whitespace('a', 1.0);
        let mut second = FontData::new();
        second.insert_whitespace('a', 2.0);

        library.register("sans", first);
        library.register("sans", second);

        let atlas = library.get_or_build("sans", &mut backend).unwrap();
        assert!((atlas.kerning('a').unwrap() - 2.0).abs() < f32::EPSILON);
        assert_eq!(library.build_count(), 1);
    }

    #[test]
    fn test_raw_data_released_after_build() {
        let mut library = FontLibrary::new();
        let mut backend = StubBackend::default();
        library.register("sans", sample_font());

        assert!(library.is_registered("sans"));
        assert!(!library.is_cached("sans"));

        library.get_or_build("sans", &mut backend).unwrap();
        assert!(library.is_cached("sans"));
        assert!(library.raw.is_empty(), "raw data dropped after build");
    }

    #[test]
    fn test_failed_build_publishes_nothing() {
        let mut library = FontLibrary::new();
        let mut backend = StubBackend::default();

        let mut data = FontData::new();
        data.insert('x', 1.0, vec![vec![[0.0; 3]]]); // malformed: 1 point
        library.register("broken", data);

        let err = library.get_or_build("broken", &mut backend).unwrap_err();
        assert!(matches!(err, FontError::Mesh(_)));
        assert!(!library.is_cached("broken"));
        assert_eq!(library.build_count(), 0);
        assert!(backend.buffers.is_empty());
    }

    #[test]
    fn test_register_json() {
        let mut library = FontLibrary::new();
        let mut backend = StubBackend::default();

        let json = r#"{"glyphs":[
            {"symbol":"a","kerning_width":1.0,
             "mesh":[[[0,0,0],[1,0,0],[0,1,0]]]},
            {"symbol":" ","kerning_width":0.5}
        ]}"#;
        library.register_json("sans", json).unwrap();

        let atlas = library.get_or_build("sans", &mut backend).unwrap();
        assert_eq!(atlas.glyph_count(), 2);
        assert!(atlas.is_whitespace(' ').unwrap());
    }

    #[test]
    fn test_register_json_rejects_garbage() {
        let mut library = FontLibrary::new();
        let err = library.register_json("sans", "not json").unwrap_err();
        assert!(matches!(err, FontError::InvalidData(_)));
        assert!(!library.is_registered("sans"));
    }
}
