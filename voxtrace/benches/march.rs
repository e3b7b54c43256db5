//! Ray-march throughput across the three store representations.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use euclid::{point3, vec3};
use rand::Rng as _;
use rand::SeedableRng as _;
use rand_xoshiro::Xoshiro256Plus;

use voxtrace::math::{normalize_or_zero, Cube, FreePoint, FreeVector, GridSize, Rgb8};
use voxtrace::raycast::Ray;
use voxtrace::store::{BrickTree, DenseGrid, SparseOctree, VoxelStore};

const SIDE: i32 = 64;
const RAYS: usize = 256;

/// A terrain-ish scene: a solid floor slab plus scattered columns, leaving
/// plenty of empty space for the hierarchical stores to skip.
fn populate(store: &mut dyn VoxelStore) {
    let mut rng = Xoshiro256Plus::seed_from_u64(7);
    for x in 0..SIDE {
        for z in 0..SIDE {
            for y in 0..4 {
                store.insert(Cube::new(x, y, z), Rgb8::new(200, 200, 200));
            }
        }
    }
    for _ in 0..200 {
        let (x, z) = (rng.gen_range(0..SIDE), rng.gen_range(0..SIDE));
        let height = rng.gen_range(4..24);
        for y in 4..height {
            store.insert(Cube::new(x, y, z), Rgb8::new(120, 90, 60));
        }
    }
}

/// A fixed batch of primary-ray-like rays from above the scene.
fn ray_batch() -> Vec<Ray> {
    let mut rng = Xoshiro256Plus::seed_from_u64(99);
    let origin: FreePoint = point3(32.5, 40.0, -8.0);
    (0..RAYS)
        .map(|_| {
            let target: FreePoint = point3(
                rng.gen_range(0.0..f64::from(SIDE)),
                rng.gen_range(0.0..12.0),
                rng.gen_range(0.0..f64::from(SIDE)),
            );
            let direction: FreeVector = normalize_or_zero(target - origin);
            Ray::new(origin, direction, 200.0)
        })
        .collect()
}

fn march_batch(store: &dyn VoxelStore, rays: &[Ray]) -> usize {
    rays.iter()
        .filter(|&&ray| store.march_ray(ray).is_some())
        .count()
}

fn bench_march(c: &mut Criterion) {
    let size = GridSize::new(SIDE as u32, SIDE as u32, SIDE as u32);
    let mut dense = DenseGrid::new(size);
    let mut octree = SparseOctree::new(size);
    let mut bricks = BrickTree::new(size);
    populate(&mut dense);
    populate(&mut octree);
    populate(&mut bricks);

    let rays = ray_batch();
    let stores: [(&str, &dyn VoxelStore); 3] = [
        ("dense", &dense),
        ("octree", &octree),
        ("bricks", &bricks),
    ];

    let mut group = c.benchmark_group("march_ray");
    for (name, store) in stores {
        // All backends must agree before we time them.
        assert_eq!(march_batch(store, &rays), march_batch(&dense, &rays));
        group.bench_with_input(BenchmarkId::from_parameter(name), &rays, |b, rays| {
            b.iter(|| march_batch(store, rays));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_march);
criterion_main!(benches);
