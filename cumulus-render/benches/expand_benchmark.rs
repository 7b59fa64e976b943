//! Benchmarks the CPU reference expander. This is the arithmetic the
//! compute shader performs per point, so it doubles as a rough upper
//! bound on single-threaded expansion cost.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use cumulus_render::expand::expand_points;
use cumulus_render::vertex::{FrameUniforms, SpriteVertex};

fn source(n: usize) -> Vec<SpriteVertex> {
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            SpriteVertex::new(
                [t * 2.0 - 1.0, (t * 37.0).sin(), t * 10.0],
                [t, 1.0 - t, 0.5],
            )
        })
        .collect()
}

fn bench_expand(c: &mut Criterion) {
    let frame = FrameUniforms::new(
        glam::Mat4::perspective_rh(1.0, 1.6, 0.1, 100.0).to_cols_array_2d(),
        0.01,
    );

    let mut group = c.benchmark_group("expand_points");
    for n in [1_000usize, 100_000, 1_000_000] {
        let points = source(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| expand_points(&frame, points));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_expand);
criterion_main!(benches);
