//! Point lights and the per-voxel shading cache.

use once_cell::sync::OnceCell;

use crate::math::{Cube, FreePoint, FreeVector, GridAab, GridSize, Radiance};

/// A point light.
///
/// Scenes keep lights in a plain ordered list; duplicates are legal and
/// simply contribute twice.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    /// World-space position of the light.
    pub position: FreePoint,

    /// Color and intensity; components may exceed 1.0 for bright lights.
    pub color: Radiance,
}

impl Light {
    /// Constructs a light from convertible types.
    #[inline]
    pub fn new(position: impl Into<FreePoint>, color: impl Into<Radiance>) -> Self {
        Self {
            position: position.into(),
            color: color.into(),
        }
    }
}

/// Cached direct-lighting information for one voxel: what a voxel receives
/// from every unoccluded light in the scene, independent of which face a
/// primary ray happens to strike.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelShade {
    /// Summed attenuated radiance from all visible lights.
    pub light: Radiance,

    /// Normalized mean direction toward the visible lights, or zero if all
    /// lights are occluded.
    pub direction: FreeVector,
}

/// A per-voxel memo of [`VoxelShade`] records, valid for one frame.
///
/// Render workers racing to fill the same entry is expected: each cell is
/// written at most once per frame, later computations of the same entry
/// produce an equal value, and readers never observe a partially written
/// record. [`clear()`](Self::clear) must be called between frames (and after
/// any scene edit) to discard the memo.
#[derive(Debug)]
pub struct ShadingCache {
    bounds: GridAab,
    cells: Box<[OnceCell<VoxelShade>]>,
}

impl ShadingCache {
    /// Creates a cache covering `(0, 0, 0)` up to `size`, with every entry
    /// unfilled.
    pub fn new(size: GridSize) -> Self {
        let bounds = GridAab::from_lower_size([0, 0, 0], size);
        let cells = core::iter::repeat_with(OnceCell::new)
            .take(bounds.volume())
            .collect();
        Self { bounds, cells }
    }

    /// Returns the cached shade for `cube`, filling the entry with
    /// `compute()` if it is unfilled. Cubes outside the cache bounds are
    /// computed directly and not cached.
    pub fn get_or_compute(
        &self,
        cube: Cube,
        compute: impl FnOnce() -> VoxelShade,
    ) -> VoxelShade {
        match self.bounds.index(cube) {
            Some(index) => *self.cells[index].get_or_init(compute),
            None => compute(),
        }
    }

    /// Returns the cached shade for `cube` if that entry has been filled.
    pub fn get(&self, cube: Cube) -> Option<VoxelShade> {
        self.cells[self.bounds.index(cube)?].get().copied()
    }

    /// Discards every cached entry.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::GridSize;
    use euclid::vec3;

    fn shade(value: f64) -> VoxelShade {
        VoxelShade {
            light: Radiance::new(value, value, value),
            direction: vec3(0.0, 1.0, 0.0),
        }
    }

    #[test]
    fn compute_happens_once() {
        let cache = ShadingCache::new(GridSize::new(4, 4, 4));
        let cube = Cube::new(1, 2, 3);
        assert_eq!(cache.get(cube), None);

        let mut computations = 0;
        for _ in 0..3 {
            let result = cache.get_or_compute(cube, || {
                computations += 1;
                shade(2.0)
            });
            assert_eq!(result, shade(2.0));
        }
        assert_eq!(computations, 1);
        assert_eq!(cache.get(cube), Some(shade(2.0)));
    }

    #[test]
    fn clear_discards_entries() {
        let mut cache = ShadingCache::new(GridSize::new(2, 2, 2));
        let cube = Cube::new(0, 0, 0);
        cache.get_or_compute(cube, || shade(1.0));
        cache.clear();
        assert_eq!(cache.get(cube), None);
        // A new computation can produce a different value after clearing.
        assert_eq!(cache.get_or_compute(cube, || shade(3.0)), shade(3.0));
    }

    #[test]
    fn out_of_bounds_is_computed_not_cached() {
        let cache = ShadingCache::new(GridSize::new(2, 2, 2));
        let outside = Cube::new(5, 5, 5);
        assert_eq!(cache.get_or_compute(outside, || shade(1.0)), shade(1.0));
        assert_eq!(cache.get(outside), None);
    }
}
