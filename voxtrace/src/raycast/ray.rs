use crate::math::{FreeCoordinate, FreePoint, FreeVector};

/// A bounded ray: a line segment from `origin` extending in `direction` up to
/// the parameter `t_max`.
///
/// The parameter `t` is measured in multiples of `direction`; when
/// `direction` is unit length (the usual case for primary and shadow rays),
/// `t` is Euclidean distance.
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The sole endpoint of the ray.
    pub origin: FreePoint,

    /// The direction in which the ray extends.
    pub direction: FreeVector,

    /// Upper bound on the ray parameter; marches terminate past this.
    pub t_max: FreeCoordinate,
}

impl Ray {
    /// Constructs a [`Ray`] from convertible types (e.g. tuples or 3-element
    /// arrays). Other than the use of [`Into`], this is equivalent to a
    /// struct literal.
    #[inline]
    pub fn new(
        origin: impl Into<FreePoint>,
        direction: impl Into<FreeVector>,
        t_max: FreeCoordinate,
    ) -> Self {
        Self {
            origin: origin.into(),
            direction: direction.into(),
            t_max,
        }
    }

    /// The point at parameter `t`: `origin + direction · t`.
    #[inline]
    pub fn point_at(&self, t: FreeCoordinate) -> FreePoint {
        self.origin + self.direction * t
    }

    /// Returns the ray with its origin translated by `offset`; direction and
    /// bound are unchanged.
    #[must_use]
    #[inline]
    pub fn translate(self, offset: FreeVector) -> Self {
        Self {
            origin: self.origin + offset,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::{point3, vec3};

    #[test]
    fn point_at() {
        let ray = Ray::new(point3(1.0, 2.0, 3.0), vec3(0.0, -1.0, 0.0), 10.0);
        assert_eq!(ray.point_at(0.0), ray.origin);
        assert_eq!(ray.point_at(2.5), point3(1.0, -0.5, 3.0));
    }

    #[test]
    fn translate() {
        let ray = Ray::new(point3(1.0, 2.0, 3.0), vec3(1.0, 0.0, 0.0), 10.0);
        let moved = ray.translate(vec3(-1.0, -2.0, -3.0));
        assert_eq!(moved.origin, point3(0.0, 0.0, 0.0));
        assert_eq!(moved.direction, ray.direction);
        assert_eq!(moved.t_max, ray.t_max);
    }
}
