//! Search benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use spotfinder::{build_region, GeoPoint, MemorySpatialStore, ShapeKind, Spot, SpotFinder};
use std::hint::black_box;

fn random_store(size: usize) -> MemorySpatialStore {
    let mut rng = StdRng::seed_from_u64(42);
    let store = MemorySpatialStore::new();
    for i in 0..size {
        let lat = 38.70 + rng.gen_range(0.0..0.05);
        let lon = -9.16 + rng.gen_range(0.0..0.05);
        let mut spot = Spot::new(i.to_string(), format!("spot {}", i), GeoPoint::new(lat, lon).unwrap());
        if rng.gen_bool(0.7) {
            spot.rating = Some(rng.gen_range(0.0..5.0));
        }
        store.insert_spot(&spot);
    }
    store
}

fn bench_build_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build Region");
    let center = GeoPoint::new(38.7223, -9.1393).unwrap();

    for shape in [ShapeKind::Circle, ShapeKind::Square] {
        group.bench_function(shape.as_str(), |b| {
            b.iter(|| black_box(build_region(&center, 500.0, shape).unwrap()))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Search");

    for size in [100, 1000, 10000].iter() {
        let finder = SpotFinder::new(random_store(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(finder.search(38.7223, -9.1393, 1500.0, "circle").unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_region, bench_search);
criterion_main!(benches);
