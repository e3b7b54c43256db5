//! Cross-representation tests: every store must march rays identically.

use euclid::{point3, vec3};
use pretty_assertions::assert_eq;
use rand::Rng as _;
use rand::SeedableRng as _;
use rand_xoshiro::Xoshiro256Plus;

use super::*;
use crate::math::{FreeCoordinate, FreePoint, FreeVector, GridSize};

const RED: Rgb8 = Rgb8::new(255, 0, 0);

/// Builds all three store kinds over a 16³ region holding the same scene.
fn all_three(scene: &[(Cube, Rgb8)]) -> (DenseGrid, SparseOctree, BrickTree) {
    let size = GridSize::new(16, 16, 16);
    let mut dense = DenseGrid::new(size);
    let mut octree = SparseOctree::new(size);
    let mut bricks = BrickTree::new(size);
    for &(cube, color) in scene {
        assert!(dense.insert(cube, color));
        assert!(octree.insert(cube, color));
        assert!(bricks.insert(cube, color));
    }
    (dense, octree, bricks)
}

#[track_caller]
fn for_each_store(
    scene: &[(Cube, Rgb8)],
    mut check: impl FnMut(&str, &dyn Fn(Ray) -> Option<RayHit>),
) {
    let (dense, octree, bricks) = all_three(scene);
    check("DenseGrid", &|ray| dense.march_ray(ray));
    check("SparseOctree", &|ray| octree.march_ray(ray));
    check("BrickTree", &|ray| bricks.march_ray(ray));
}

/// Direct hit on a single voxel along the main diagonal.
#[test]
fn single_voxel_direct_hit() {
    let diagonal: FreeVector = vec3(1.0, 1.0, 1.0).normalize();
    let expected_t = 9.0 * FreeCoordinate::sqrt(3.0);

    for_each_store(&[(Cube::new(10, 10, 10), RED)], |name, march| {
        let hit = march(Ray::new(point3(1.0, 1.0, 1.0), diagonal, 100.0))
            .unwrap_or_else(|| panic!("{name}: expected a hit"));
        assert_eq!(hit.cube, Cube::new(10, 10, 10), "{name}");
        assert_eq!(hit.color, RED, "{name}");
        // Equal crossings resolve Z, then Y, then X, so the diagonal cell is
        // finally entered through its -X face.
        assert_eq!(hit.face, Face7::NX, "{name}");
        assert!(
            (hit.t_distance - expected_t).abs() < 1e-9,
            "{name}: t = {}, expected ≈ {expected_t}",
            hit.t_distance,
        );
        assert!((hit.position - point3(10.0, 10.0, 10.0)).length() < 1e-9, "{name}");
    });
}

/// The same scene, pointed away from: a clean miss.
#[test]
fn single_voxel_clear_miss() {
    let diagonal: FreeVector = vec3(-1.0, -1.0, -1.0).normalize();
    for_each_store(&[(Cube::new(10, 10, 10), RED)], |name, march| {
        assert_eq!(march(Ray::new(point3(1.0, 1.0, 1.0), diagonal, 100.0)), None, "{name}");
    });
}

/// A voxel past `t_max` is not hit.
#[test]
fn t_max_cutoff() {
    for_each_store(&[(Cube::new(15, 0, 0), Rgb8::WHITE)], |name, march| {
        assert_eq!(
            march(Ray::new(point3(0.0, 0.5, 0.5), vec3(1.0, 0.0, 0.0), 10.0)),
            None,
            "{name}: voxel sits at t ≈ 15, beyond t_max = 10"
        );
        // With a longer leash the same ray connects.
        let hit = march(Ray::new(point3(0.0, 0.5, 0.5), vec3(1.0, 0.0, 0.0), 100.0))
            .unwrap_or_else(|| panic!("{name}: expected a hit at t = 15"));
        assert_eq!(hit.t_distance, 15.0, "{name}");
    });
}

/// An axis-parallel ray returns the nearest voxel of a row.
#[test]
fn axis_parallel_row() {
    let scene: Vec<(Cube, Rgb8)> = (5..=10)
        .map(|i| (Cube::new(i, 0, 0), Rgb8::new(i as u8 * 10, 0, 0)))
        .collect();

    for_each_store(&scene, |name, march| {
        let hit = march(Ray::new(point3(0.0, 0.5, 0.5), vec3(1.0, 0.0, 0.0), 100.0))
            .unwrap_or_else(|| panic!("{name}: expected a hit"));
        assert_eq!(hit.cube, Cube::new(5, 0, 0), "{name}");
        assert_eq!(hit.face, Face7::NX, "{name}");
        assert_eq!(hit.t_distance, 5.0, "{name}");
        assert_eq!(hit.color, Rgb8::new(50, 0, 0), "{name}");
    });
}

/// A ray that begins inside an occupied voxel hits it at t = 0 with no
/// defined entry face.
#[test]
fn origin_inside_voxel() {
    for_each_store(&[(Cube::new(3, 3, 3), RED)], |name, march| {
        let hit = march(Ray::new(point3(3.5, 3.25, 3.75), vec3(0.0, 1.0, 0.0), 100.0))
            .unwrap_or_else(|| panic!("{name}: expected a hit"));
        assert_eq!(hit.cube, Cube::new(3, 3, 3), "{name}");
        assert_eq!(hit.t_distance, 0.0, "{name}");
        assert_eq!(hit.face, Face7::Within, "{name}");
    });
}

/// Rays originating outside the stored region still hit correctly.
#[test]
fn origin_far_outside_region() {
    for_each_store(&[(Cube::new(0, 8, 8), RED)], |name, march| {
        let hit = march(Ray::new(point3(-40.0, 8.5, 8.5), vec3(1.0, 0.0, 0.0), 100.0))
            .unwrap_or_else(|| panic!("{name}: expected a hit"));
        assert_eq!(hit.cube, Cube::new(0, 8, 8), "{name}");
        assert_eq!(hit.t_distance, 40.0, "{name}");
        assert_eq!(hit.face, Face7::NX, "{name}");
    });
}

/// All three representations march identically over randomized scenes and
/// rays: same hit/miss, same cell, same color, same face, and parameters
/// equal to within numerical tolerance.
#[test]
fn representations_are_equivalent() {
    let mut rng = Xoshiro256Plus::seed_from_u64(0xCA5CADE);

    let scene: Vec<(Cube, Rgb8)> = (0..250)
        .map(|_| {
            (
                Cube::new(
                    rng.gen_range(0..16),
                    rng.gen_range(0..16),
                    rng.gen_range(0..16),
                ),
                Rgb8::new(rng.gen(), rng.gen(), rng.gen()),
            )
        })
        .collect();
    // Deduplicate by cell, keeping the last write, the same thing the
    // stores themselves do on overwrite.
    let mut colors = std::collections::HashMap::new();
    for &(cube, color) in &scene {
        colors.insert(cube, color);
    }
    let scene: Vec<(Cube, Rgb8)> = colors.into_iter().collect();

    let (dense, octree, bricks) = all_three(&scene);

    let mut hits = 0;
    for i in 0..400 {
        let origin: FreePoint = point3(
            rng.gen_range(-8.0..24.0),
            rng.gen_range(-8.0..24.0),
            rng.gen_range(-8.0..24.0),
        );
        let raw: FreeVector = vec3(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if raw.length() < 0.1 {
            continue;
        }
        let ray = Ray::new(origin, raw.normalize(), 100.0);

        let reference = dense.march_ray(ray);
        if let Some(hit) = &reference {
            // Normals are axis-aligned unit vectors (or zero for rays
            // starting inside a voxel) and never face away from the ray.
            let normal = hit.normal_vector();
            assert!(normal.square_length() == 1.0 || normal == FreeVector::zero());
            assert!(normal.dot(ray.direction) <= 0.0, "normal faces away: {hit:?}");
        }
        for (name, candidate) in [
            ("SparseOctree", octree.march_ray(ray)),
            ("BrickTree", bricks.march_ray(ray)),
        ] {
            match (&reference, &candidate) {
                (None, None) => {}
                (Some(expected), Some(actual)) => {
                    assert_eq!(actual.cube, expected.cube, "{name}, ray {i}: {ray:?}");
                    assert_eq!(actual.color, expected.color, "{name}, ray {i}");
                    assert_eq!(actual.face, expected.face, "{name}, ray {i}");
                    assert!(
                        (actual.t_distance - expected.t_distance).abs() < 1e-6,
                        "{name}, ray {i}: t {} vs {}",
                        actual.t_distance,
                        expected.t_distance,
                    );
                    assert!(
                        (actual.position - expected.position).length() < 1e-6,
                        "{name}, ray {i}"
                    );
                }
                _ => panic!(
                    "{name}, ray {i}: {ray:?}\ndense:     {reference:?}\ncandidate: {candidate:?}"
                ),
            }
        }
        if reference.is_some() {
            hits += 1;
        }
    }
    // The scene is dense enough that a healthy share of rays must connect;
    // guards against vacuously passing on all-miss behavior.
    assert!(hits > 50, "only {hits} rays hit; scene or rays are broken");
}

#[test]
fn edit_by_ray() {
    let mut grid = DenseGrid::new(GridSize::new(16, 16, 16));
    grid.insert(Cube::new(8, 8, 8), RED);
    let ray = Ray::new(point3(8.5, 8.5, 0.5), vec3(0.0, 0.0, 1.0), 100.0);

    // Building attaches to the struck face, on the ray's side.
    let placed = place_at_hit(&mut grid, ray, Rgb8::WHITE).unwrap();
    assert_eq!(placed, Cube::new(8, 8, 7));
    assert_eq!(grid.get(placed), Some(Rgb8::WHITE));

    // Digging removes the nearest voxel first.
    let dug = erase_first_hit(&mut grid, ray).unwrap();
    assert_eq!(dug.cube, Cube::new(8, 8, 7));
    assert_eq!(grid.get(Cube::new(8, 8, 7)), None);
    assert_eq!(grid.get(Cube::new(8, 8, 8)), Some(RED));

    // A miss edits nothing.
    let miss = Ray::new(point3(8.5, 8.5, 0.5), vec3(0.0, 0.0, -1.0), 100.0);
    assert_eq!(erase_first_hit(&mut grid, miss), None);
    assert_eq!(place_at_hit(&mut grid, miss, Rgb8::WHITE), None);

    // Placing against a face that fronts onto space outside the store fails.
    let mut edge = DenseGrid::new(GridSize::new(16, 16, 16));
    edge.insert(Cube::new(0, 8, 8), RED);
    let from_outside = Ray::new(point3(-4.0, 8.5, 8.5), vec3(1.0, 0.0, 0.0), 100.0);
    assert_eq!(place_at_hit(&mut edge, from_outside, Rgb8::WHITE), None);
}

/// Erasure is visible to subsequent marches in every representation.
#[test]
fn erase_reopens_the_path() {
    let scene = [
        (Cube::new(4, 8, 8), Rgb8::new(1, 1, 1)),
        (Cube::new(9, 8, 8), Rgb8::new(2, 2, 2)),
    ];
    let (mut dense, mut octree, mut bricks) = all_three(&scene);
    let ray = Ray::new(point3(-1.0, 8.5, 8.5), vec3(1.0, 0.0, 0.0), 100.0);

    assert_eq!(dense.march_ray(ray).unwrap().cube, Cube::new(4, 8, 8));
    dense.erase(Cube::new(4, 8, 8));
    octree.erase(Cube::new(4, 8, 8));
    bricks.erase(Cube::new(4, 8, 8));

    for (name, hit) in [
        ("DenseGrid", dense.march_ray(ray)),
        ("SparseOctree", octree.march_ray(ray)),
        ("BrickTree", bricks.march_ray(ray)),
    ] {
        let hit = hit.unwrap_or_else(|| panic!("{name}: expected hit on the voxel behind"));
        assert_eq!(hit.cube, Cube::new(9, 8, 8), "{name}");
        assert_eq!(hit.color, Rgb8::new(2, 2, 2), "{name}");
    }
}
