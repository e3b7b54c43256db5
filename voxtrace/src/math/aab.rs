use core::fmt;

use crate::math::{
    Axis, Cube, FreeCoordinate, GridCoordinate, GridPoint, GridSize, GridVector, Octant,
};
use crate::raycast::Ray;

/// An axis-aligned box of grid cubes: the half-open ranges
/// `[lower, upper)` on each axis.
///
/// Every box has `upper > lower` on every axis; empty boxes are not
/// representable, which keeps subdivision and traversal free of empty-range
/// special cases.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct GridAab {
    lower: GridPoint,
    upper: GridPoint,
}

impl GridAab {
    /// Constructs a [`GridAab`] from inclusive lower bounds and exclusive
    /// upper bounds.
    ///
    /// Panics if `upper` is not greater than `lower` on every axis.
    #[track_caller]
    #[inline]
    pub fn from_lower_upper(lower: impl Into<GridPoint>, upper: impl Into<GridPoint>) -> Self {
        let (lower, upper) = (lower.into(), upper.into());
        assert!(
            lower.x < upper.x && lower.y < upper.y && lower.z < upper.z,
            "GridAab::from_lower_upper requires upper > lower, but got {lower:?} .. {upper:?}",
        );
        Self { lower, upper }
    }

    /// Constructs a [`GridAab`] from an inclusive lower corner and a size.
    ///
    /// Panics if any size component is zero or the upper corner would
    /// overflow.
    #[track_caller]
    #[inline]
    pub fn from_lower_size(lower: impl Into<GridPoint>, size: GridSize) -> Self {
        let lower = lower.into();
        let upper = GridPoint::new(
            lower.x + size.width as GridCoordinate,
            lower.y + size.height as GridCoordinate,
            lower.z + size.depth as GridCoordinate,
        );
        Self::from_lower_upper(lower, upper)
    }

    /// Constructs a [`GridAab`] of one cube.
    #[inline]
    pub fn single_cube(cube: Cube) -> Self {
        let lower = cube.lower_bounds();
        Self {
            lower,
            upper: lower + GridVector::new(1, 1, 1),
        }
    }

    /// Returns the corner with the most negative coordinates (inclusive).
    #[inline]
    pub fn lower_bounds(&self) -> GridPoint {
        self.lower
    }

    /// Returns the corner with the most positive coordinates (exclusive).
    #[inline]
    pub fn upper_bounds(&self) -> GridPoint {
        self.upper
    }

    /// Size of the box in each dimension; equivalent to
    /// `self.upper_bounds() - self.lower_bounds()`.
    #[inline]
    pub fn size(&self) -> GridSize {
        GridSize::new(
            (self.upper.x - self.lower.x) as u32,
            (self.upper.y - self.lower.y) as u32,
            (self.upper.z - self.lower.z) as u32,
        )
    }

    /// The extent of the box along the X axis; for cube-shaped boxes (see
    /// [`is_cube()`](Self::is_cube)), the side length.
    #[inline]
    pub fn size_scalar(&self) -> GridCoordinate {
        self.upper.x - self.lower.x
    }

    /// Whether all three dimensions are equal.
    #[inline]
    pub fn is_cube(&self) -> bool {
        let size = self.size();
        size.width == size.height && size.height == size.depth
    }

    /// The number of cubes the box contains.
    #[inline]
    pub fn volume(&self) -> usize {
        let size = self.size();
        size.width as usize * size.height as usize * size.depth as usize
    }

    /// The center point of the box in grid coordinates, rounded toward the
    /// lower corner. Exact for boxes of even size, such as octree nodes.
    #[inline]
    pub fn center(&self) -> GridPoint {
        (self.lower.to_vector() + self.upper.to_vector())
            .map(|c| c.div_euclid(2))
            .to_point()
    }

    /// Returns whether the box includes the given cube, under the half-open
    /// `[lower, upper)` convention.
    #[inline]
    pub fn contains_cube(&self, cube: Cube) -> bool {
        let Cube { x, y, z } = cube;
        x >= self.lower.x
            && y >= self.lower.y
            && z >= self.lower.z
            && x < self.upper.x
            && y < self.upper.y
            && z < self.upper.z
    }

    /// Returns the linear index of `cube` within this box, in the layout
    /// `(z · height + y) · width + x` relative to the lower corner, or
    /// [`None`] if the cube is outside the box.
    #[inline]
    pub fn index(&self, cube: Cube) -> Option<usize> {
        if !self.contains_cube(cube) {
            return None;
        }
        let rel = cube.lower_bounds() - self.lower;
        let size = self.size();
        Some(
            (rel.z as usize * size.height as usize + rel.y as usize) * size.width as usize
                + rel.x as usize,
        )
    }

    /// Subdivides the box into its eight octants, in ascending
    /// [`Octant`] linear-index order (000, 001, 010, … 111).
    ///
    /// Panics if the box is not a cube of even side length.
    #[track_caller]
    pub fn octants(&self) -> [GridAab; 8] {
        assert!(
            self.is_cube() && self.size_scalar() % 2 == 0,
            "GridAab::octants() requires an even-sided cube, but got {self:?}",
        );
        let mid = self.center();
        core::array::from_fn(|i| {
            let relative = Octant::from_zmaj_index(i as u8).to_01();
            let pick = |low, mid, high, r| match r {
                0 => (low, mid),
                _ => (mid, high),
            };
            let (lx, ux) = pick(self.lower.x, mid.x, self.upper.x, relative.x);
            let (ly, uy) = pick(self.lower.y, mid.y, self.upper.y, relative.y);
            let (lz, uz) = pick(self.lower.z, mid.z, self.upper.z, relative.z);
            GridAab::from_lower_upper([lx, ly, lz], [ux, uy, uz])
        })
    }

    /// Returns which octant of this box the given cube lies toward, relative
    /// to [`center()`](Self::center).
    #[inline]
    pub fn octant_of(&self, cube: Cube) -> Octant {
        Octant::from_cube(cube, self.center())
    }

    /// Ray–box intersection by the slab method.
    ///
    /// Returns the parameter interval `(t_entry, t_exit)` over which the ray
    /// is inside the box, clipped to `0 ..= ray.t_max`, or [`None`] if the
    /// ray misses the box within that interval. A ray parallel to an axis
    /// must have its origin within the box's half-open range on that axis or
    /// the result is a miss.
    pub fn ray_intersection(&self, ray: Ray) -> Option<(FreeCoordinate, FreeCoordinate)> {
        let mut t_min: FreeCoordinate = 0.0;
        let mut t_max: FreeCoordinate = ray.t_max;
        for axis in Axis::ALL {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let low = FreeCoordinate::from(self.lower[axis]);
            let high = FreeCoordinate::from(self.upper[axis]);

            if dir == 0.0 {
                if origin < low || origin >= high {
                    return None;
                }
                continue;
            }

            let inv = dir.recip();
            let mut t0 = (low - origin) * inv;
            let mut t1 = (high - origin) * inv;
            if inv < 0.0 {
                core::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }
        Some((t_min, t_max))
    }
}

impl fmt::Debug for GridAab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { lower, upper } = self;
        write!(
            f,
            "GridAab({:?}..{:?}, {:?}..{:?}, {:?}..{:?})",
            lower.x, upper.x, lower.y, upper.y, lower.z, upper.z
        )
    }
}
