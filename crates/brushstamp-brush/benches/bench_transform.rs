use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use brushstamp_brush::{transform_mask, transform_pixmap, Brush, TransformParams};
use brushstamp_image::Image;

fn round_mask(size: usize) -> Image<u8, 1> {
    let r = size as f64 / 2.0;
    Image::from_fn([size, size].into(), |x, y, _| {
        let (dx, dy) = (x as f64 + 0.5 - r, y as f64 + 0.5 - r);
        (255.0 * (1.0 - (dx * dx + dy * dy).sqrt() / r).clamp(0.0, 1.0)) as u8
    })
    .unwrap()
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("BrushTransform");

    for size in [16usize, 64, 256].iter() {
        let mask = round_mask(*size);
        let pixmap = Image::<u8, 3>::from_fn(mask.size(), |x, y, ch| {
            mask.as_slice()[y * size + x] / (ch as u8 + 1)
        })
        .unwrap();

        for (name, hardness) in [("hard", 1.0), ("soft", 0.5)] {
            let params = TransformParams::new(1.5, 0.3, 0.2, hardness);
            group.throughput(criterion::Throughput::Elements((size * size) as u64));

            let parameter_string = format!("{}x{}_{}", size, size, name);

            group.bench_with_input(
                BenchmarkId::new("transform_mask", &parameter_string),
                &(&mask, params),
                |b, i| {
                    let (src, p) = (i.0, i.1);
                    b.iter(|| {
                        black_box(transform_mask(
                            black_box(src),
                            p.scale,
                            p.aspect_ratio,
                            p.angle,
                            p.hardness,
                        ))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new("transform_pixmap", &parameter_string),
                &(&pixmap, params),
                |b, i| {
                    let (src, p) = (i.0, i.1);
                    b.iter(|| {
                        black_box(transform_pixmap(
                            black_box(src),
                            p.scale,
                            p.aspect_ratio,
                            p.angle,
                            p.hardness,
                        ))
                    })
                },
            );
        }

        let brush = Brush::new(mask.clone());
        let params = TransformParams::new(1.5, 0.3, 0.2, 1.0);
        group.bench_with_input(
            BenchmarkId::new("brush_cached", format!("{}x{}", size, size)),
            &params,
            |b, p| b.iter(|| black_box(brush.transform_mask(black_box(p)))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
