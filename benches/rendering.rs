//! Benchmarks for markdown subset rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use notedown::render::render;

fn bench_render(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/sample_note.md");

    c.bench_function("render_sample_note", |b| b.iter(|| render(black_box(md))));

    let large = md.repeat(100);
    c.bench_function("render_large_note", |b| {
        b.iter(|| render(black_box(&large)))
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
