use criterion::{criterion_group, criterion_main, Criterion};
use mazes_gl::{
    generators,
    grid_dimensions::GridDimensions,
    units::{Height, PathsCount, Width},
};
use rand::{rngs::SmallRng, SeedableRng};

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    let dims = GridDimensions::new(Width(32), Height(32)).unwrap();
    let mut rng = SmallRng::seed_from_u64(32);
    c.bench_function("recursive_backtracker_maze_32", move |b| {
        b.iter(|| generators::recursive_backtracker(dims, &mut rng))
    });
}

fn bench_recursive_backtracker_maze_256(c: &mut Criterion) {
    let dims = GridDimensions::new(Width(256), Height(256)).unwrap();
    let mut rng = SmallRng::seed_from_u64(256);
    c.bench_function("recursive_backtracker_maze_256", move |b| {
        b.iter(|| generators::recursive_backtracker(dims, &mut rng))
    });
}

fn bench_field_32_paths_4(c: &mut Criterion) {
    let dims = GridDimensions::new(Width(32), Height(32)).unwrap();
    let mut rng = SmallRng::seed_from_u64(4);
    c.bench_function("field_32_paths_4", move |b| {
        b.iter(|| generators::generate_field(dims, PathsCount(4), &mut rng).unwrap())
    });
}

fn bench_field_32_paths_64(c: &mut Criterion) {
    let dims = GridDimensions::new(Width(32), Height(32)).unwrap();
    let mut rng = SmallRng::seed_from_u64(64);
    c.bench_function("field_32_paths_64", move |b| {
        b.iter(|| generators::generate_field(dims, PathsCount(64), &mut rng).unwrap())
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_256,
    bench_field_32_paths_4,
    bench_field_32_paths_64
);
criterion_main!(benches);
