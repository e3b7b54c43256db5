use euclid::Vector3D;

use crate::math::Axis;

/// One of the six faces of a cube — equivalently, an axis-aligned unit
/// vector — plus [`Within`](Face7::Within) for “no face”.
///
/// There is no separate six-variant type because every consumer here must
/// handle the seventh case anyway: `Within` is what a ray march reports
/// when the ray began inside the cube it hit.
#[allow(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Face7 {
    /// The interior of a cube rather than any of its surfaces.
    Within = 0,
    /// The face with outward normal `(-1, 0, 0)`.
    NX,
    /// The face with outward normal `(0, -1, 0)`; the underside.
    NY,
    /// The face with outward normal `(0, 0, -1)`.
    NZ,
    /// The face with outward normal `(1, 0, 0)`.
    PX,
    /// The face with outward normal `(0, 1, 0)`; the top.
    PY,
    /// The face with outward normal `(0, 0, 1)`.
    PZ,
}

impl Face7 {
    /// Every value, [`Within`](Self::Within) first.
    pub const ALL: [Face7; 7] = [
        Face7::Within,
        Face7::NX,
        Face7::NY,
        Face7::NZ,
        Face7::PX,
        Face7::PY,
        Face7::PZ,
    ];

    /// The axis this face's normal lies along, or [`None`] for
    /// [`Face7::Within`].
    #[inline]
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Face7::Within => None,
            Face7::NX | Face7::PX => Some(Axis::X),
            Face7::NY | Face7::PY => Some(Axis::Y),
            Face7::NZ | Face7::PZ => Some(Axis::Z),
        }
    }

    /// Whether the normal's nonzero coordinate is positive;
    /// `false` for [`Face7::Within`].
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Face7::PX | Face7::PY | Face7::PZ)
    }

    /// Whether the normal's nonzero coordinate is negative;
    /// `false` for [`Face7::Within`].
    #[inline]
    pub const fn is_negative(self) -> bool {
        matches!(self, Face7::NX | Face7::NY | Face7::NZ)
    }

    /// The face on the other side of the cube;
    /// [`Within`](Self::Within) maps to itself.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Face7 {
        match self {
            Face7::Within => Face7::Within,
            Face7::NX => Face7::PX,
            Face7::NY => Face7::PY,
            Face7::NZ => Face7::PZ,
            Face7::PX => Face7::NX,
            Face7::PY => Face7::NY,
            Face7::PZ => Face7::NZ,
        }
    }

    /// The outward unit normal, or the zero vector for
    /// [`Within`](Self::Within).
    ///
    /// ```
    /// use voxtrace::math::Face7;
    ///
    /// assert_eq!(Face7::PY.normal_vector::<f64, ()>().y, 1.0);
    /// ```
    #[inline]
    pub fn normal_vector<S, U>(self) -> Vector3D<S, U>
    where
        S: euclid::num::Zero + euclid::num::One + core::ops::Neg<Output = S>,
    {
        match self {
            Face7::Within => Vector3D::new(S::zero(), S::zero(), S::zero()),
            Face7::NX => Vector3D::new(-S::one(), S::zero(), S::zero()),
            Face7::NY => Vector3D::new(S::zero(), -S::one(), S::zero()),
            Face7::NZ => Vector3D::new(S::zero(), S::zero(), -S::one()),
            Face7::PX => Vector3D::new(S::one(), S::zero(), S::zero()),
            Face7::PY => Vector3D::new(S::zero(), S::one(), S::zero()),
            Face7::PZ => Vector3D::new(S::zero(), S::zero(), S::one()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FreeVector;

    #[test]
    fn axis_and_signs() {
        for face in Face7::ALL {
            let normal: FreeVector = face.normal_vector();
            match face.axis() {
                None => {
                    assert_eq!(face, Face7::Within);
                    assert_eq!(normal, FreeVector::zero());
                }
                Some(axis) => {
                    assert_eq!(normal[axis].abs(), 1.0);
                    assert_eq!(normal[axis] > 0.0, face.is_positive());
                    assert_eq!(normal[axis] < 0.0, face.is_negative());
                }
            }
        }
    }

    #[test]
    fn opposite_is_involution() {
        for face in Face7::ALL {
            assert_eq!(face.opposite().opposite(), face);
            let n1: FreeVector = face.normal_vector();
            let n2: FreeVector = face.opposite().normal_vector();
            assert_eq!(n1, -n2);
        }
    }
}
