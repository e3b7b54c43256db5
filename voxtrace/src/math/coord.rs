//! Scalar and vector types for grid and world coordinates.

use euclid::{Point3D, Size3D, Vector3D};

use crate::math::Cube;

/// Integer coordinates aligned to the voxel lattice.
pub type GridCoordinate = i32;

/// Integer positions on the voxel lattice.
pub type GridPoint = Point3D<GridCoordinate, Cube>;

/// Integer displacements between lattice positions.
pub type GridVector = Vector3D<GridCoordinate, Cube>;

/// Sizes of grid-aligned regions.
pub type GridSize = Size3D<u32, Cube>;

/// Continuous coordinates, for rays, hit points and cameras.
///
/// `f64` carries more than 32 bits of mantissa, so every [`GridCoordinate`]
/// converts exactly; the infallible `From<GridCoordinate>` conversion is used
/// throughout.
pub type FreeCoordinate = f64;

/// Continuous positions in world space.
pub type FreePoint = Point3D<FreeCoordinate, Cube>;

/// Continuous directions and displacements in world space.
pub type FreeVector = Vector3D<FreeCoordinate, Cube>;

/// Normalizes `v`, or returns the zero vector if `v` has zero or non-finite
/// length.
///
/// ```
/// use voxtrace::math::{normalize_or_zero, FreeVector};
///
/// assert_eq!(
///     normalize_or_zero(FreeVector::new(0.0, 4.0, 0.0)),
///     FreeVector::new(0.0, 1.0, 0.0),
/// );
/// assert_eq!(normalize_or_zero(FreeVector::zero()), FreeVector::zero());
/// ```
#[inline]
pub fn normalize_or_zero(v: FreeVector) -> FreeVector {
    let length = v.length();
    if length.is_finite() && length > 0.0 {
        v / length
    } else {
        FreeVector::zero()
    }
}
