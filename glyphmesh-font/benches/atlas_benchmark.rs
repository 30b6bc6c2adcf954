//! Atlas construction benchmark: packing a full ASCII font into one
//! shared vertex buffer.

use criterion::{criterion_group, criterion_main, Criterion};

use glyphmesh_core::{BufferHandle, FontData, MeshBackend};
use glyphmesh_font::GlyphAtlas;

/// Backend that discards uploads — we measure packing, not the GPU.
struct NullBackend;

impl MeshBackend for NullBackend {
    fn create_vertex_buffer(&mut self, _data: &[f32]) -> BufferHandle {
        BufferHandle(0)
    }
    fn bind_buffer(&mut self, _handle: BufferHandle) {}
    fn draw_triangles(&mut self, _start: u32, _vertex_count: u32) {}
    fn set_color(&mut self, _rgba: [f32; 4]) {}
}

fn ascii_font(triangles_per_glyph: usize) -> FontData {
    let mut data = FontData::new();
    for code in 33u8..127 {
        let mesh = (0..triangles_per_glyph)
            .map(|i| {
                let z = i as f32 * 0.1;
                vec![[0.0, 0.0, z], [1.0, 0.0, z], [0.0, 1.0, z]]
            })
            .collect();
        data.insert(code as char, 0.6, mesh);
    }
    data.insert_whitespace(' ', 0.5);
    data
}

fn bench_atlas_build(c: &mut Criterion) {
    let font = ascii_font(64);
    c.bench_function("atlas_build_ascii_64tri", |b| {
        b.iter(|| {
            let atlas = GlyphAtlas::build(font.clone(), &mut NullBackend).unwrap();
            std::hint::black_box(atlas.vertex_total())
        })
    });
}

criterion_group!(benches, bench_atlas_build);
criterion_main!(benches);
