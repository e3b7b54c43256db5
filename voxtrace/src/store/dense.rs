use crate::bits::BitSet;
use crate::light::ShadingCache;
use crate::math::{Cube, Face7, GridAab, GridSize, Rgb8};
use crate::raycast::{Ray, RayHit};
use crate::store::{march_unit_cells, VoxelStore};

/// Voxel storage as a flat X·Y·Z array: a presence bit and a color per cell.
///
/// The simplest possible store, and the reference for what the hierarchical
/// stores must compute. It also carries the per-voxel [`ShadingCache`],
/// since its linear indexing is exactly what the cache needs.
#[derive(Debug)]
pub struct DenseGrid {
    bounds: GridAab,
    presence: BitSet,
    colors: Box<[Rgb8]>,
    shading: ShadingCache,
}

impl DenseGrid {
    /// Creates an empty grid spanning `(0, 0, 0)` up to `size`.
    pub fn new(size: GridSize) -> Self {
        let bounds = GridAab::from_lower_size([0, 0, 0], size);
        let volume = bounds.volume();
        Self {
            bounds,
            presence: BitSet::new(volume),
            colors: vec![Rgb8::BLACK; volume].into_boxed_slice(),
            shading: ShadingCache::new(size),
        }
    }

    /// Returns the color of `cube` if it is present, [`None`] if absent or
    /// out of bounds.
    #[inline]
    pub fn get(&self, cube: Cube) -> Option<Rgb8> {
        let index = self.bounds.index(cube)?;
        self.presence.get(index).then(|| self.colors[index])
    }

    /// The number of voxels present.
    pub fn len(&self) -> usize {
        self.presence.count_ones()
    }

    /// Whether no voxels are present.
    pub fn is_empty(&self) -> bool {
        !self.presence.any()
    }
}

impl VoxelStore for DenseGrid {
    fn bounds(&self) -> GridAab {
        self.bounds
    }

    fn march_ray(&self, ray: Ray) -> Option<RayHit> {
        march_unit_cells(ray, Face7::Within, |cube| self.get(cube))
    }

    fn insert(&mut self, cube: Cube, color: Rgb8) -> bool {
        match self.bounds.index(cube) {
            Some(index) => {
                self.presence.set(index);
                self.colors[index] = color;
                true
            }
            None => false,
        }
    }

    fn erase(&mut self, cube: Cube) {
        if let Some(index) = self.bounds.index(cube) {
            self.presence.put(index, false);
            self.colors[index] = Rgb8::BLACK;
        }
    }

    fn clear_shading_cache(&mut self) {
        self.shading.clear();
    }

    fn shading_cache(&self) -> Option<&ShadingCache> {
        Some(&self.shading)
    }
}
