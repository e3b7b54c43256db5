//! End-to-end frame rendering over a small lit room scene.

use euclid::point3;
use voxtrace::light::Light;
use voxtrace::math::{Cube, GridSize, Radiance, Rgb8};
use voxtrace::store::{BrickTree, DenseGrid, SparseOctree, VoxelStore};
use voxtrace_render::{render, Camera, Framebuffer, RenderOptions, ShadingMode};

const GROUND: Rgb8 = Rgb8::WHITE;
const SLAB: Rgb8 = Rgb8::new(30, 30, 30);

/// A 32×32 white floor with a 3×3 gray slab floating over its middle and a
/// bright light just above the slab: a scene with large, unambiguous lit
/// and hard-shadowed regions.
fn build_scene(store: &mut dyn VoxelStore) -> Vec<Light> {
    for x in 0..32 {
        for z in 0..32 {
            assert!(store.insert(Cube::new(x, 0, z), GROUND));
        }
    }
    for x in 15..18 {
        for z in 15..18 {
            assert!(store.insert(Cube::new(x, 8, z), SLAB));
        }
    }
    vec![Light::new(
        point3(16.0, 14.0, 16.0),
        Radiance::new(300.0, 300.0, 300.0),
    )]
}

/// A camera east of the slab, looking down and west across the shadow zone.
fn scene_camera() -> Camera {
    let mut camera = Camera::new();
    camera.position = point3(24.5, 10.0, 16.5);
    camera.look_speed = 1.0;
    camera.update_rotation_fps(-std::f64::consts::FRAC_PI_2, 0.8);
    camera
}

fn options() -> RenderOptions {
    RenderOptions {
        ambient_floor: 0.02,
        background: Rgb8::new(0, 0, 40),
        ..RenderOptions::default()
    }
}

/// Counts pixels that are brightly lit ground and pixels that are ground in
/// full shadow (exactly the ambient floor over white).
fn classify(framebuffer: &Framebuffer) -> (usize, usize) {
    let shadow_value = (255.0 * 0.02) as u8;
    let mut bright = 0;
    let mut shadowed = 0;
    for y in 0..framebuffer.height() {
        for x in 0..framebuffer.width() {
            let [r, g, b, alpha] = framebuffer.pixel(x, y);
            assert_eq!(alpha, 0, "core rendering never writes alpha");
            if r >= 200 && g >= 200 && b >= 200 {
                bright += 1;
            } else if [r, g, b] == [shadow_value; 3] {
                shadowed += 1;
            }
        }
    }
    (bright, shadowed)
}

#[test]
fn frame_has_lit_and_shadowed_regions() {
    let mut store = BrickTree::new(GridSize::new(32, 32, 32));
    let lights = build_scene(&mut store);
    let camera = scene_camera();

    let mut framebuffer = Framebuffer::new(96, 96);
    render(&mut store, &lights, &camera, &options(), &mut framebuffer);

    let (bright, shadowed) = classify(&framebuffer);
    assert!(bright > 20, "expected plenty of lit ground, found {bright}");
    assert!(
        shadowed > 20,
        "expected a visible hard shadow, found {shadowed} shadowed pixels"
    );
}

/// All three store backends produce bit-identical frames.
#[test]
fn backends_agree_on_the_whole_frame() {
    let mut dense = DenseGrid::new(GridSize::new(32, 32, 32));
    let mut octree = SparseOctree::new(GridSize::new(32, 32, 32));
    let mut bricks = BrickTree::new(GridSize::new(32, 32, 32));
    let lights = build_scene(&mut dense);
    build_scene(&mut octree);
    build_scene(&mut bricks);

    let camera = scene_camera();
    let options = options();

    let mut reference = Framebuffer::new(96, 96);
    render(&mut dense, &lights, &camera, &options, &mut reference);

    let mut image = Framebuffer::new(96, 96);
    render(&mut octree, &lights, &camera, &options, &mut image);
    assert_eq!(image.data(), reference.data(), "SparseOctree differs");

    render(&mut bricks, &lights, &camera, &options, &mut image);
    assert_eq!(image.data(), reference.data(), "BrickTree differs");
}

/// Per-voxel (cached) shading also produces both lit and shadowed regions,
/// and successive frames of a static scene are identical.
#[test]
fn per_voxel_mode_is_stable_across_frames() {
    let mut store = DenseGrid::new(GridSize::new(32, 32, 32));
    let lights = build_scene(&mut store);
    let camera = scene_camera();
    let options = RenderOptions {
        mode: ShadingMode::PerVoxel,
        ..options()
    };

    let mut first = Framebuffer::new(96, 96);
    render(&mut store, &lights, &camera, &options, &mut first);
    let (bright, shadowed) = classify(&first);
    assert!(bright > 20, "expected lit ground, found {bright}");
    assert!(shadowed > 20, "expected shadow, found {shadowed}");

    let mut second = Framebuffer::new(96, 96);
    render(&mut store, &lights, &camera, &options, &mut second);
    assert_eq!(first.data(), second.data());
}
