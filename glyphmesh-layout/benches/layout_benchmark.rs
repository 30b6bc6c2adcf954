//! Layout benchmark: measuring a paragraph against an ASCII atlas.

use criterion::{criterion_group, criterion_main, Criterion};

use glyphmesh_core::{BufferHandle, FontData, MeshBackend};
use glyphmesh_font::GlyphAtlas;
use glyphmesh_layout::{compute_layout, LayoutParams};

struct NullBackend;

impl MeshBackend for NullBackend {
    fn create_vertex_buffer(&mut self, _data: &[f32]) -> BufferHandle {
        BufferHandle(0)
    }
    fn bind_buffer(&mut self, _handle: BufferHandle) {}
    fn draw_triangles(&mut self, _start: u32, _vertex_count: u32) {}
    fn set_color(&mut self, _rgba: [f32; 4]) {}
}

fn ascii_atlas() -> GlyphAtlas {
    let mut data = FontData::new();
    for code in 33u8..127 {
        data.insert(
            code as char,
            0.6,
            vec![vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]],
        );
    }
    data.insert_whitespace(' ', 0.5);
    GlyphAtlas::build(data, &mut NullBackend).unwrap()
}

fn bench_compute_layout(c: &mut Criterion) {
    let atlas = ascii_atlas();
    let params = LayoutParams::default();
    let body = "the quick brown fox jumps over the lazy dog\n"
        .repeat(50)
        .trim_end()
        .to_string();

    c.bench_function("layout_50_lines", |b| {
        b.iter(|| {
            let layout = compute_layout(&atlas, &body, &params).unwrap();
            std::hint::black_box(layout.width)
        })
    });
}

criterion_group!(benches, bench_compute_layout);
criterion_main!(benches);
