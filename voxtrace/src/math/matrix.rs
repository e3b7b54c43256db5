use core::ops;

use crate::math::{FreeCoordinate, FreeVector};

/// A 3×3 matrix of [`FreeCoordinate`]s, stored in column-major order.
///
/// `euclid` has no plain 3×3 matrix type, and the only uses here are camera
/// basis rotations, so this carries exactly the operations those need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3(pub [FreeCoordinate; 9]);

impl Matrix3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self([1., 0., 0., 0., 1., 0., 0., 0., 1.]);

    /// Builds a matrix from column vectors.
    #[inline]
    pub fn from_columns(c0: FreeVector, c1: FreeVector, c2: FreeVector) -> Self {
        Self([c0.x, c0.y, c0.z, c1.x, c1.y, c1.z, c2.x, c2.y, c2.z])
    }

    /// Rotation about the X axis.
    ///
    /// ```text
    /// [1    0    0]
    /// [0  cos -sin]
    /// [0  sin  cos]
    /// ```
    #[inline]
    pub fn rotation_x(angle: FreeCoordinate) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self([1., 0., 0., 0., cos, sin, 0., -sin, cos])
    }

    /// Rotation about the Y axis.
    ///
    /// ```text
    /// [ cos  0  sin]
    /// [   0  1    0]
    /// [-sin  0  cos]
    /// ```
    #[inline]
    pub fn rotation_y(angle: FreeCoordinate) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self([cos, 0., -sin, 0., 1., 0., sin, 0., cos])
    }

    /// Rotation about the Z axis.
    ///
    /// ```text
    /// [cos -sin  0]
    /// [sin  cos  0]
    /// [  0    0  1]
    /// ```
    #[inline]
    pub fn rotation_z(angle: FreeCoordinate) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self([cos, sin, 0., -sin, cos, 0., 0., 0., 1.])
    }

    /// Intrinsic rotation about the X, then Y, then Z body axes;
    /// equal to `rotation_x(x) * rotation_y(y) * rotation_z(z)`.
    pub fn rotation_xyz(x: FreeCoordinate, y: FreeCoordinate, z: FreeCoordinate) -> Self {
        let (sin_x, cos_x) = x.sin_cos();
        let (sin_y, cos_y) = y.sin_cos();
        let (sin_z, cos_z) = z.sin_cos();

        Self([
            cos_y * cos_z,
            sin_x * sin_y * cos_z + cos_x * sin_z,
            -cos_x * sin_y * cos_z + sin_x * sin_z,
            -cos_y * sin_z,
            cos_x * cos_z - sin_x * sin_y * sin_z,
            sin_x * cos_z + cos_x * sin_y * sin_z,
            sin_y,
            -sin_x * cos_y,
            cos_x * cos_y,
        ])
    }

    /// The element at the given row and column, 0-indexed; equivalent to
    /// `self.0[col * 3 + row]`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> FreeCoordinate {
        self.0[col * 3 + row]
    }

    /// The given column as a vector.
    #[inline]
    pub fn column(&self, col: usize) -> FreeVector {
        FreeVector::new(self.at(0, col), self.at(1, col), self.at(2, col))
    }

    /// The determinant; 1 for any proper rotation.
    pub fn determinant(&self) -> FreeCoordinate {
        let m = &self.0;
        m[0] * m[4] * m[8] + m[3] * m[7] * m[2] + m[6] * m[1] * m[5]
            - m[6] * m[4] * m[2]
            - m[3] * m[1] * m[8]
            - m[0] * m[7] * m[5]
    }

    /// Applies the matrix to a vector.
    #[inline]
    pub fn transform_vector(&self, v: FreeVector) -> FreeVector {
        let m = &self.0;
        FreeVector::new(
            m[0] * v.x + m[3] * v.y + m[6] * v.z,
            m[1] * v.x + m[4] * v.y + m[7] * v.z,
            m[2] * v.x + m[5] * v.y + m[8] * v.z,
        )
    }
}

impl ops::Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [0.0; 9];
        for col in 0..3 {
            for row in 0..3 {
                out[col * 3 + row] = (0..3).map(|k| self.at(row, k) * rhs.at(k, col)).sum();
            }
        }
        Self(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;
    use euclid::vec3;

    #[track_caller]
    fn assert_vec_eq(a: FreeVector, b: FreeVector) {
        assert!((a - b).length() < 1e-12, "{a:?} != {b:?}");
    }

    #[test]
    fn identity() {
        let v = vec3(1.0, 2.0, 3.0);
        assert_eq!(Matrix3::IDENTITY.transform_vector(v), v);
        assert_eq!(Matrix3::IDENTITY.determinant(), 1.0);
    }

    #[test]
    fn quarter_turns() {
        // Right-handed: +Z rotated a quarter turn about Y lands on +X.
        assert_vec_eq(
            Matrix3::rotation_y(FRAC_PI_2).transform_vector(vec3(0.0, 0.0, 1.0)),
            vec3(1.0, 0.0, 0.0),
        );
        // +Y rotated about X lands on +Z.
        assert_vec_eq(
            Matrix3::rotation_x(FRAC_PI_2).transform_vector(vec3(0.0, 1.0, 0.0)),
            vec3(0.0, 0.0, 1.0),
        );
        // +X rotated about Z lands on +Y.
        assert_vec_eq(
            Matrix3::rotation_z(FRAC_PI_2).transform_vector(vec3(1.0, 0.0, 0.0)),
            vec3(0.0, 1.0, 0.0),
        );
    }

    #[test]
    fn composition_matches_xyz() {
        let (x, y, z) = (0.3, -0.7, 1.1);
        let composed = Matrix3::rotation_x(x) * Matrix3::rotation_y(y) * Matrix3::rotation_z(z);
        let direct = Matrix3::rotation_xyz(x, y, z);
        for i in 0..9 {
            assert!(
                (composed.0[i] - direct.0[i]).abs() < 1e-12,
                "element {i}: {composed:?} vs {direct:?}"
            );
        }
    }

    #[test]
    fn rotations_preserve_determinant() {
        let m = Matrix3::rotation_xyz(0.5, 0.25, -1.0);
        assert!((m.determinant() - 1.0).abs() < 1e-12);
    }
}
