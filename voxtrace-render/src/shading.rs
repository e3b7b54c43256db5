//! Direct illumination with hard shadows.
//!
//! Shading answers, for a primary-ray hit, how much light reaches that
//! point: each scene light contributes its attenuated color if a shadow ray
//! from the hit to the light is unobstructed, and nothing otherwise.
//!
//! Two interchangeable granularities exist. Per-pixel shading fires shadow
//! rays from the exact hit point; per-voxel shading computes one record per
//! voxel (visibility from the voxel's center, offset toward the light so
//! the shadow ray starts outside the voxel itself) and memoizes it in the
//! store's [`ShadingCache`](voxtrace::light::ShadingCache) for the rest of
//! the frame. The cached record
//! depends only on the voxel and the lights, never on which face a primary
//! ray happened to strike, so workers racing to fill an entry all write the
//! same value.

use voxtrace::light::{Light, VoxelShade};
use voxtrace::math::{normalize_or_zero, Cube, FreeCoordinate, FreeVector, Radiance, Rgb8};
use voxtrace::raycast::{Ray, RayHit, VOXEL_RAY_DELTA};
use voxtrace::store::VoxelStore;

/// Which shading granularity the renderer uses.
#[allow(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ShadingMode {
    /// Shadow rays per pixel from the exact hit point. Slower, sharper.
    #[default]
    PerPixel,
    /// One cached shading record per voxel per frame.
    PerVoxel,
}

/// Below this distance, attenuation stops increasing: the clamped
/// inverse-square law `1 / max(d², d_min²)`, which keeps lights from
/// blowing out surfaces they sit directly on.
pub const MIN_LIGHT_DISTANCE: FreeCoordinate = 8.0;

fn attenuation(distance: FreeCoordinate) -> FreeCoordinate {
    (distance * distance)
        .max(MIN_LIGHT_DISTANCE * MIN_LIGHT_DISTANCE)
        .recip()
}

fn sign_or_zero(c: FreeCoordinate) -> FreeCoordinate {
    if c == 0.0 {
        0.0
    } else {
        c.signum()
    }
}

/// Computes the incoming light intensity for a primary hit, in the given
/// mode. `t_max` bounds shadow-ray length (normally the camera's render
/// distance).
pub fn shade_hit<S: VoxelStore + ?Sized>(
    store: &S,
    lights: &[Light],
    hit: &RayHit,
    mode: ShadingMode,
    t_max: FreeCoordinate,
) -> Radiance {
    match mode {
        ShadingMode::PerPixel => pixel_shading(store, lights, hit, t_max),
        ShadingMode::PerVoxel => voxel_shading(store, lights, hit, t_max),
    }
}

/// Per-pixel direct lighting: one shadow ray per light from the hit point,
/// offset off the surface along the hit normal.
pub fn pixel_shading<S: VoxelStore + ?Sized>(
    store: &S,
    lights: &[Light],
    hit: &RayHit,
    t_max: FreeCoordinate,
) -> Radiance {
    let normal = hit.normal_vector();
    let mut intensity = Radiance::zero();
    for light in lights {
        let to_light = light.position - hit.position;
        let distance = to_light.length();
        let direction = normalize_or_zero(to_light);

        let shadow = Ray::new(
            hit.position + normal * VOXEL_RAY_DELTA,
            direction,
            distance.min(t_max),
        );
        if store.march_ray(shadow).is_none() {
            let brightness = normal.dot(direction).max(0.0);
            intensity += light.color * (brightness * attenuation(distance));
        }
    }
    intensity
}

/// Per-voxel direct lighting: the cached whole-voxel record combined with
/// the actual hit normal. Stores without a cache compute the record each
/// time.
pub fn voxel_shading<S: VoxelStore + ?Sized>(
    store: &S,
    lights: &[Light],
    hit: &RayHit,
    t_max: FreeCoordinate,
) -> Radiance {
    let shade = match store.shading_cache() {
        Some(cache) => {
            cache.get_or_compute(hit.cube, || compute_voxel_shade(store, lights, hit.cube, t_max))
        }
        None => compute_voxel_shade(store, lights, hit.cube, t_max),
    };
    let brightness = hit.normal_vector().dot(shade.direction).max(0.0);
    shade.light * brightness
}

/// Visibility and summed radiance for a whole voxel.
///
/// Shadow rays originate at the voxel's corner facing each light: the
/// center offset componentwise by `sign(light_dir) · (√3/2 + ε)`, which is
/// outside the voxel for any light direction and depends only on
/// (voxel, light), so concurrent computations of the same entry agree.
pub fn compute_voxel_shade<S: VoxelStore + ?Sized>(
    store: &S,
    lights: &[Light],
    cube: Cube,
    t_max: FreeCoordinate,
) -> VoxelShade {
    let center = cube.center();
    let corner_reach = FreeCoordinate::sqrt(3.0) / 2.0 + VOXEL_RAY_DELTA;

    let mut intensity = Radiance::zero();
    let mut direction_sum = FreeVector::zero();
    for light in lights {
        let to_light = light.position - center;
        let distance = to_light.length();
        let light_dir = normalize_or_zero(to_light);

        let origin = center + light_dir.map(sign_or_zero) * corner_reach;
        let shadow = Ray::new(origin, light_dir, distance.min(t_max));
        if store.march_ray(shadow).is_none() {
            intensity += light.color * attenuation(distance);
            direction_sum += light_dir;
        }
    }

    VoxelShade {
        light: intensity,
        direction: normalize_or_zero(direction_sum),
    }
}

/// Applies the ambient floor to an intensity and multiplies it into the
/// surface color, clamped to bytes.
pub fn compose(intensity: Radiance, ambient_floor: FreeCoordinate, surface: Rgb8) -> Rgb8 {
    surface.scale_by(intensity.map(|c| c.max(ambient_floor)))
}
