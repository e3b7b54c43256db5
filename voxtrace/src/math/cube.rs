use core::fmt;

use crate::math::{FreeCoordinate, FreePoint, GridCoordinate, GridPoint, GridVector};

/// A unit cube on the integer lattice, identified by its most negative
/// corner.
///
/// In continuous space a cube covers a half-open interval on each axis:
/// the lower coordinate belongs to the cube, the upper one to its
/// neighbor.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[allow(missing_docs, clippy::exhaustive_structs)]
pub struct Cube {
    pub x: GridCoordinate,
    pub y: GridCoordinate,
    pub z: GridCoordinate,
}

impl Cube {
    /// The cube whose lower corner is the coordinate origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Constructs the cube with the given lower-corner coordinates.
    #[inline]
    pub const fn new(x: GridCoordinate, y: GridCoordinate, z: GridCoordinate) -> Self {
        Self { x, y, z }
    }

    /// The cube enclosing the given point.
    ///
    /// A point with an integer coordinate belongs to the cube extending
    /// positively from it, per the half-open convention.
    ///
    /// Returns [`None`] if a coordinate is outside the numeric range of
    /// [`GridCoordinate`], infinite, or NaN.
    ///
    /// ```
    /// use voxtrace::math::{Cube, FreePoint};
    ///
    /// assert_eq!(
    ///     Cube::containing(FreePoint::new(1.0, 1.5, -2.5)),
    ///     Some(Cube::new(1, 1, -3)),
    /// );
    /// ```
    #[inline]
    pub fn containing(point: FreePoint) -> Option<Self> {
        const MIN_INCLUSIVE: FreeCoordinate = GridCoordinate::MIN as FreeCoordinate;
        const MAX_EXCLUSIVE: FreeCoordinate = GridCoordinate::MAX as FreeCoordinate + 1.0;

        let FreePoint { x, y, z, .. } = point;
        if (MIN_INCLUSIVE <= x)
            & (MIN_INCLUSIVE <= y)
            & (MIN_INCLUSIVE <= z)
            & (x < MAX_EXCLUSIVE)
            & (y < MAX_EXCLUSIVE)
            & (z < MAX_EXCLUSIVE)
        {
            Some(Self {
                x: x.floor() as GridCoordinate,
                y: y.floor() as GridCoordinate,
                z: z.floor() as GridCoordinate,
            })
        } else {
            None
        }
    }

    /// The corner with the most negative coordinates.
    #[inline]
    pub fn lower_bounds(self) -> GridPoint {
        self.into()
    }

    /// The point at the middle of the cube.
    #[inline]
    pub fn center(self) -> FreePoint {
        let Self { x, y, z } = self;
        FreePoint::new(
            FreeCoordinate::from(x) + 0.5,
            FreeCoordinate::from(y) + 0.5,
            FreeCoordinate::from(z) + 0.5,
        )
    }

    /// Translates the cube by `v`, wrapping on coordinate overflow.
    #[must_use]
    #[inline]
    pub fn wrapping_add(self, v: GridVector) -> Self {
        Self {
            x: self.x.wrapping_add(v.x),
            y: self.y.wrapping_add(v.y),
            z: self.z.wrapping_add(v.z),
        }
    }
}

impl fmt::Debug for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { x, y, z } = self;
        write!(f, "({x}, {y}, {z})")
    }
}

impl From<GridPoint> for Cube {
    #[inline]
    fn from(point: GridPoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: point.z,
        }
    }
}

impl From<Cube> for GridPoint {
    #[inline]
    fn from(cube: Cube) -> Self {
        let Cube { x, y, z } = cube;
        Self::new(x, y, z)
    }
}

impl From<[GridCoordinate; 3]> for Cube {
    #[inline]
    fn from([x, y, z]: [GridCoordinate; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Cube> for [GridCoordinate; 3] {
    #[inline]
    fn from(cube: Cube) -> Self {
        [cube.x, cube.y, cube.z]
    }
}
