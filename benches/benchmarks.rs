// benches/benchmarks.rs -- Expression evaluation and storage benchmarks.
//
//   cargo bench
//
// The expression group compares a fused three-operand expression against
// the same arithmetic written as a hand loop over the raw buffers and as a
// chain of whole-image temporaries. The storage group measures the cost of
// building and filling images on either side of the inline threshold.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use piv_image::grid::generate_cartesian_grid;
use piv_image::storage::INLINE_CAPACITY;
use piv_image::{Image, Size, GF};

// ============================================================
// Helpers
// ============================================================

/// Smooth synthetic float image.
fn make_scene(w: u32, h: u32, phase: f32) -> Image<GF> {
    let mut img = Image::new(w, h);
    img.apply(|i, _| {
        let (x, y) = ((i as u32 % w) as f32, (i as u32 / w) as f32);
        GF((x * 0.05 + phase).sin() * (y * 0.03).cos() * 100.0)
    });
    img
}

// ============================================================
// Expression evaluation
// ============================================================

fn bench_expression(c: &mut Criterion) {
    let mut group = c.benchmark_group("expression");
    for &side in &[32u32, 256, 1024] {
        let a = make_scene(side, side, 0.0);
        let b = make_scene(side, side, 0.5);
        let k = make_scene(side, side, 1.0);
        let mut out: Image<GF> = Image::new(side, side);

        group.bench_with_input(BenchmarkId::new("fused", side), &side, |bench, _| {
            bench.iter(|| {
                out.assign((&a - &b) * &k + 1.0f32).map(|_| ()).unwrap();
            })
        });

        group.bench_with_input(BenchmarkId::new("manual_loop", side), &side, |bench, _| {
            bench.iter(|| {
                let dst = out.data_mut();
                for (i, px) in dst.iter_mut().enumerate() {
                    *px = GF((a[i].0 - b[i].0) * k[i].0 + 1.0);
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("temporaries", side), &side, |bench, _| {
            bench.iter(|| {
                let diff = Image::from_expression(&a - &b).unwrap();
                let prod = Image::from_expression(&diff * &k).unwrap();
                black_box(Image::from_expression(&prod + 1.0f32).unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("update_in_place", side), &side, |bench, _| {
            let mut acc = a.clone();
            bench.iter(|| acc.update(|acc| acc * 0.5f32 + &b).unwrap())
        });
    }
    group.finish();
}

// ============================================================
// Storage
// ============================================================

fn bench_storage(c: &mut Criterion) {
    let inline_side = (INLINE_CAPACITY as f64).sqrt() as u32;
    let mut group = c.benchmark_group("storage");
    group.bench_function(BenchmarkId::new("filled_inline", inline_side), |bench| {
        bench.iter(|| black_box(Image::filled(inline_side, inline_side, GF(1.0))))
    });
    group.bench_function(BenchmarkId::new("filled_heap", inline_side + 1), |bench| {
        bench.iter(|| black_box(Image::filled(inline_side + 1, inline_side + 1, GF(1.0))))
    });
    group.bench_function("resize_across_threshold", |bench| {
        let mut img: Image<GF> = Image::default();
        bench.iter(|| {
            img.resize_filled(inline_side + 1, inline_side, GF(0.0));
            img.resize_filled(inline_side, inline_side, GF(0.0));
        })
    });
    group.finish();
}

// ============================================================
// Grid
// ============================================================

fn bench_grid(c: &mut Criterion) {
    c.bench_function("grid_2048x2048_w32_o50", |bench| {
        bench.iter(|| {
            generate_cartesian_grid(Size::new(2048, 2048), Size::new(32, 32), 0.5)
                .map(|rects| rects.len())
        })
    });
}

criterion_group!(benches, bench_expression, bench_storage, bench_grid);
criterion_main!(benches);
