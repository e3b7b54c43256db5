//! The per-frame render dispatcher.

use rayon::prelude::*;

use voxtrace::light::Light;
use voxtrace::math::{FreeCoordinate, Rgb8};
use voxtrace::store::VoxelStore;

use crate::camera::{Camera, CameraRayBasis};
use crate::framebuffer::{Framebuffer, BYTES_PER_PIXEL};
use crate::shading::{compose, shade_hit, ShadingMode};

/// Frame-wide rendering configuration.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Shading granularity.
    pub mode: ShadingMode,
    /// Minimum brightness even in complete shadow.
    pub ambient_floor: FreeCoordinate,
    /// Color written to pixels whose primary ray hits nothing.
    pub background: Rgb8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: ShadingMode::PerPixel,
            ambient_floor: 0.05,
            background: Rgb8::BLACK,
        }
    }
}

/// Renders one frame: fills `framebuffer` with the scene seen by `camera`.
///
/// One primary ray is cast per pixel; hits are shaded with direct
/// illumination and hard shadows (see [`crate::shading`]). Rows of the
/// image are traced in parallel; workers share the store read-only and own
/// disjoint row slices, and all of them are joined before this returns;
/// no rendering state outlives the call.
///
/// The store is borrowed mutably only for the between-frames cache clear;
/// scene edits must likewise happen between calls.
pub fn render<S: VoxelStore + Sync>(
    store: &mut S,
    lights: &[Light],
    camera: &Camera,
    options: &RenderOptions,
    framebuffer: &mut Framebuffer,
) {
    if options.mode == ShadingMode::PerVoxel {
        store.clear_shading_cache();
    }
    framebuffer.fill(options.background);

    let basis = CameraRayBasis::new(camera, framebuffer.width(), framebuffer.height());
    let width = framebuffer.width();
    let render_distance = camera.render_distance;
    let store: &S = store;

    framebuffer
        .data
        .par_chunks_mut(width as usize * BYTES_PER_PIXEL)
        .enumerate()
        .for_each(|(row, raster_row)| {
            for column in 0..width {
                let ray = basis.pixel_ray(column, row as u32);
                let Some(hit) = store.march_ray(ray) else {
                    continue;
                };
                let intensity = shade_hit(store, lights, &hit, options.mode, render_distance);
                let color = compose(intensity, options.ambient_floor, hit.color);
                let offset = column as usize * BYTES_PER_PIXEL;
                raster_row[offset..offset + BYTES_PER_PIXEL]
                    .copy_from_slice(&[color.r, color.g, color.b, 0]);
            }
        });
}
