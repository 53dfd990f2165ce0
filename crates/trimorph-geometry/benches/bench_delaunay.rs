use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use trimorph_geometry::{triangulate, Point2};

fn random_points(count: usize) -> Vec<Point2> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| [rng.random_range(0.0..300.0), rng.random_range(0.0..300.0)])
        .collect()
}

fn bench_delaunay(c: &mut Criterion) {
    let mut group = c.benchmark_group("Delaunay");

    for num_points in [16, 64, 256].iter() {
        let points = random_points(*num_points);

        group.bench_with_input(
            BenchmarkId::new("triangulate", num_points),
            &points,
            |b, points| b.iter(|| triangulate(black_box(points)).unwrap()),
        );

        let tri = triangulate(&points).unwrap();
        group.bench_with_input(BenchmarkId::new("locate", num_points), &tri, |b, tri| {
            b.iter(|| {
                let mut hits = 0;
                for y in (0..300).step_by(10) {
                    for x in (0..300).step_by(10) {
                        if tri.locate(black_box([x as f64, y as f64])).is_some() {
                            hits += 1;
                        }
                    }
                }
                hits
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_delaunay);
criterion_main!(benches);
