use crate::math::{Cube, GridCoordinate, GridPoint, GridVector};

/// Identifies one of the eight octants of a cube-shaped region, or
/// equivalently an element of a 2×2×2 volume.
///
/// The discriminants are the z-major linear index `(x << 2) | (y << 1) | z`
/// of the relative coordinates `(x, y, z) ∈ {0, 1}³`, which is also the order
/// in which [`GridAab::octants()`](crate::math::GridAab::octants) produces
/// child boxes.
#[allow(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Octant {
    /// The -X, -Y, -Z octant.
    Nnn = 0,
    /// The -X, -Y, +Z octant.
    Nnp = 1,
    /// The -X, +Y, -Z octant.
    Npn = 2,
    /// The -X, +Y, +Z octant.
    Npp = 3,
    /// The +X, -Y, -Z octant.
    Pnn = 4,
    /// The +X, -Y, +Z octant.
    Pnp = 5,
    /// The +X, +Y, -Z octant.
    Ppn = 6,
    /// The +X, +Y, +Z octant.
    Ppp = 7,
}

impl Octant {
    /// All values of the enum, in linear index order.
    pub const ALL: [Self; 8] = [
        Self::Nnn,
        Self::Nnp,
        Self::Npn,
        Self::Npp,
        Self::Pnn,
        Self::Pnp,
        Self::Ppn,
        Self::Ppp,
    ];

    /// The inverse of [`Octant::index()`].
    ///
    /// Panics if `index` is out of the range `0..8`.
    #[inline]
    pub fn from_zmaj_index(index: u8) -> Self {
        match index {
            0 => Self::Nnn,
            1 => Self::Nnp,
            2 => Self::Npn,
            3 => Self::Npp,
            4 => Self::Pnn,
            5 => Self::Pnp,
            6 => Self::Ppn,
            7 => Self::Ppp,
            _ => panic!("Octant::from_zmaj_index({index}) is out of bounds"),
        }
    }

    /// Given the low corner of an octant in the volume (0..2)³, return which
    /// octant it is, or [`None`] if a coordinate is not 0 or 1.
    #[inline]
    pub fn from_01(corner: GridVector) -> Option<Self> {
        match <[GridCoordinate; 3]>::from(corner) {
            [x @ (0 | 1), y @ (0 | 1), z @ (0 | 1)] => Some(Self::from_zmaj_index(
                ((x as u8) << 2) | ((y as u8) << 1) | (z as u8),
            )),
            _ => None,
        }
    }

    /// Returns which octant of the volume centered on `center` the given cube
    /// lies toward. Cubes on a center plane count as positive.
    #[inline]
    pub fn from_cube(cube: Cube, center: GridPoint) -> Self {
        Self::from_zmaj_index(
            (u8::from(cube.x >= center.x) << 2)
                | (u8::from(cube.y >= center.y) << 1)
                | u8::from(cube.z >= center.z),
        )
    }

    /// The z-major linear index, `(x << 2) | (y << 1) | z`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns this octant of the volume (0..2)³ expressed as a translation
    /// vector from the origin; each coordinate is either 0 or 1.
    #[inline]
    #[must_use]
    pub fn to_01(self) -> GridVector {
        let i = self as GridCoordinate;
        GridVector::new((i >> 2) & 1, (i >> 1) & 1, i & 1)
    }
}
