use criterion::{criterion_group, criterion_main, Criterion};
use mazes_gl::{
    buffers::{DataBuffer, IndexBuffer},
    generators,
    grid_dimensions::GridDimensions,
    instances::MazeInstances,
    primitives,
    units::{Height, Width},
};
use rand::{rngs::SmallRng, SeedableRng};

fn bench_float_triples_4096(c: &mut Criterion) {
    let mut buffer = DataBuffer::new(4096 * 12);
    c.bench_function("float_triples_4096", move |b| {
        b.iter(|| {
            buffer.clear();
            for i in 0..4096 {
                let v = i as f32;
                buffer.write_float32_triple(v, v + 0.5, -v);
            }
            buffer.slice_f32(None, None).iter().sum::<f32>()
        })
    });
}

fn bench_encode_cuboids_256(c: &mut Criterion) {
    let cube = primitives::cuboid(1., 1., 1.);
    let mut vertices = DataBuffer::new(0);
    let mut indices = IndexBuffer::new(0);
    c.bench_function("encode_cuboids_256", move |b| {
        b.iter(|| {
            vertices.reserve_and_clear(cube.vertex_bytes() * 256);
            indices.reserve_and_clear(cube.index_bytes() * 256);
            for _ in 0..256 {
                primitives::encode_primitive(&cube, [200, 100, 50, 255], &mut vertices, &mut indices)
                    .unwrap();
            }
        })
    });
}

fn bench_maze_instances_64(c: &mut Criterion) {
    let dims = GridDimensions::new(Width(64), Height(64)).unwrap();
    let grid = generators::recursive_backtracker(dims, &mut SmallRng::seed_from_u64(64));
    let mut instances = MazeInstances::new();
    c.bench_function("maze_instances_64", move |b| {
        b.iter(|| instances.encode(&grid).unwrap())
    });
}

criterion_group!(
    benches,
    bench_float_triples_4096,
    bench_encode_cuboids_256,
    bench_maze_instances_64
);
criterion_main!(benches);
