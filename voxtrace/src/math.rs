//! Mathematical foundation for [`voxtrace`](crate).
//!
//! Coordinates come in two kinds: integer coordinates locked to the unit-cube
//! grid ([`GridCoordinate`], [`GridPoint`], [`GridAab`], [`Cube`]) and free
//! floating-point coordinates that interact with it ([`FreeCoordinate`],
//! [`FreePoint`], [`FreeVector`]). The conversion from grid to free
//! coordinates is exact; the reverse goes through [`Cube::containing()`].

mod aab;
pub use aab::GridAab;

mod axis;
pub use axis::Axis;

mod color;
pub use color::{Intensity, Radiance, Rgb8};

mod coord;
pub use coord::{
    normalize_or_zero, FreeCoordinate, FreePoint, FreeVector, GridCoordinate, GridPoint, GridSize,
    GridVector,
};

mod cube;
pub use cube::Cube;

mod face;
pub use face::Face7;

mod matrix;
pub use matrix::Matrix3;

mod octant;
pub use octant::Octant;
