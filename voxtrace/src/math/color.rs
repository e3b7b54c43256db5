use core::fmt;

use euclid::Vector3D;

use crate::math::FreeCoordinate;

/// Unit-of-measure tag for light intensity vectors ([`Radiance`]).
#[allow(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Intensity {}

/// An RGB light intensity.
///
/// Unlike a [`Rgb8`] surface color, components are unbounded above; a bright
/// light encodes its intensity as a magnitude well over 1.
pub type Radiance = Vector3D<FreeCoordinate, Intensity>;

/// An opaque voxel surface color: an RGB byte triple.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[allow(missing_docs, clippy::exhaustive_structs)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// Black; also the color of erased voxels.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct a color from components.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiplies this color componentwise by an intensity and clamps the
    /// result back to bytes.
    ///
    /// ```
    /// use voxtrace::math::{Radiance, Rgb8};
    ///
    /// let surface = Rgb8::new(200, 100, 0);
    /// assert_eq!(
    ///     surface.scale_by(Radiance::new(0.5, 10.0, 10.0)),
    ///     Rgb8::new(100, 255, 0),
    /// );
    /// ```
    #[must_use]
    pub fn scale_by(self, intensity: Radiance) -> Self {
        let scale = |intensity: FreeCoordinate, component: u8| -> u8 {
            (intensity * FreeCoordinate::from(component)).clamp(0.0, 255.0) as u8
        };
        Self {
            r: scale(intensity.x, self.r),
            g: scale(intensity.y, self.g),
            b: scale(intensity.z, self.b),
        }
    }
}

impl fmt::Debug for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { r, g, b } = self;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl From<[u8; 3]> for Rgb8 {
    #[inline]
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb8> for [u8; 3] {
    #[inline]
    fn from(color: Rgb8) -> Self {
        [color.r, color.g, color.b]
    }
}
