//! Incremental traversal of the unit-cube grid along rays.
//!
//! The walker here is the classic 3D DDA from “A Fast Voxel Traversal
//! Algorithm for Ray Tracing” by John Amanatides and Andrew Woo, 1987
//! <http://www.cse.yorku.ca/~amana/research/grid.pdf>, extended with the
//! operations the hierarchical stores need: rescaling a step to jump an
//! entire node-sized box ([`Raycaster::scale_to_box()`]) and restarting the
//! walk partway along the ray ([`Raycaster::fast_forward()`]).
//!
//! The foundation is the parameterized representation of the ray,
//! `origin + t * direction`, except that `t` itself is not stored; instead
//! `t_max` tracks, per axis, the `t` at which the ray next crosses a grid
//! plane perpendicular to that axis. The least of those components names the
//! next cube boundary crossed.

use euclid::Vector3D;

use crate::math::{
    Axis, Cube, Face7, FreeCoordinate, FreePoint, FreeVector, GridAab, GridCoordinate, GridPoint,
    GridVector, Rgb8,
};

mod ray;
pub use ray::Ray;


/// All ray-marched position data is ambiguous where a hit lies exactly on the
/// shared face of two neighboring voxels. Callers that need a point clearly on
/// one side of a hit face displace along the normal by this distance, as in
/// `position + normal * VOXEL_RAY_DELTA` for the empty side.
pub const VOXEL_RAY_DELTA: FreeCoordinate = 0.05;

/// Ray direction components smaller than this are treated as exactly zero;
/// the corresponding planes are never crossed.
const DIRECTION_EPSILON: FreeCoordinate = 1e-9;

/// Vector unit type for units of `t` (ray-length).
enum Tc {}

/// The result of marching a ray into a voxel store: the first occupied cell
/// the ray meets.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct RayHit {
    /// The occupied cell.
    pub cube: Cube,

    /// Ray parameter at which the cell was entered; 0 if the ray began
    /// inside it.
    pub t_distance: FreeCoordinate,

    /// Color of the struck voxel.
    pub color: Rgb8,

    /// The point where the ray crossed into the cell,
    /// equal to `ray.origin + ray.direction * t_distance`.
    pub position: FreePoint,

    /// The face of `cube` through which the ray entered, or
    /// [`Face7::Within`] if the ray began inside the cell.
    pub face: Face7,
}

impl RayHit {
    /// Constructs a hit record. `position` is derived from the ray and
    /// parameter.
    #[inline]
    pub fn new(ray: &Ray, t_distance: FreeCoordinate, cube: Cube, color: Rgb8, face: Face7) -> Self {
        Self {
            cube,
            t_distance,
            color,
            position: ray.point_at(t_distance),
            face,
        }
    }

    /// The surface normal of the struck face: one of the six axis-aligned
    /// unit vectors, or zero when the ray began inside the cell.
    #[inline]
    pub fn normal_vector(&self) -> FreeVector {
        self.face.normal_vector()
    }

    /// The empty cell immediately in front of the struck face, found by
    /// displacing the hit position off the shared face; this is where an
    /// editor would place a new voxel against the surface.
    ///
    /// Returns [`None`] for [`Face7::Within`] hits, which have no front side.
    pub fn cube_in_front(&self) -> Option<Cube> {
        if self.face == Face7::Within {
            return None;
        }
        Cube::containing(self.position + self.normal_vector() * VOXEL_RAY_DELTA)
    }
}

/// Mutable state of a grid traversal: the cube the walk is in, and per-axis
/// bookkeeping for choosing the next plane crossing.
///
/// A fresh `Raycaster` reports the cube containing the ray origin; each
/// [`step()`](Self::step) crosses into the next cube along the ray. The
/// walk itself is infinite — bounding it against `t_max` is the caller's
/// loop condition.
#[derive(Clone, Debug, PartialEq)]
pub struct Raycaster {
    /// Cube the walk is in.
    cube: GridPoint,

    /// Which way `cube` moves when stepping; signum of the direction
    /// components. Invariant over the whole walk.
    step: GridVector,

    /// Cube increment applied by the next [`step()`](Self::step) on each
    /// axis. Equal to `step` for unit walking; enlarged by
    /// [`scale_to_box()`](Self::scale_to_box).
    jump: GridVector,

    /// Change in `t` per unit cube step along each axis: the reciprocal of
    /// the absolute direction components. Invariant over the whole walk.
    unit_t_delta: Vector3D<FreeCoordinate, Tc>,

    /// Change in `t` applied to `t_max` when stepping; starts equal to
    /// `unit_t_delta` and is enlarged while box-jumping.
    t_delta: Vector3D<FreeCoordinate, Tc>,

    /// Per axis, the `t` at which the ray crosses the next plane
    /// perpendicular to that axis. Infinite for axes the ray is parallel to.
    t_max: Vector3D<FreeCoordinate, Tc>,

    /// The `t` at which the walk entered `cube`.
    t_distance: FreeCoordinate,

    /// The face of `cube` crossed by the last step.
    last_face: Face7,
}

impl Raycaster {
    /// Construct a walker positioned at the cube containing `ray.origin`.
    pub fn new(ray: &Ray) -> Self {
        let cube: GridPoint = ray.origin.map(|c| c.floor() as GridCoordinate);

        let mut step = GridVector::zero();
        let mut unit_t_delta: Vector3D<FreeCoordinate, Tc> = Vector3D::zero();
        let mut t_max: Vector3D<FreeCoordinate, Tc> = Vector3D::zero();
        for axis in Axis::ALL {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let fract = origin - origin.floor();
            if dir.abs() < DIRECTION_EPSILON {
                step[axis] = 0;
                unit_t_delta[axis] = FreeCoordinate::INFINITY;
                t_max[axis] = FreeCoordinate::INFINITY;
            } else {
                let inv = dir.abs().recip();
                unit_t_delta[axis] = inv;
                if dir > 0.0 {
                    step[axis] = 1;
                    t_max[axis] = inv * (1.0 - fract);
                } else {
                    step[axis] = -1;
                    t_max[axis] = inv * fract;
                }
            }
        }

        Self {
            cube,
            step,
            jump: step,
            unit_t_delta,
            t_delta: unit_t_delta,
            t_max,
            t_distance: 0.0,
            last_face: Face7::Within,
        }
    }

    /// Replaces the face the walk is considered to have entered through.
    ///
    /// Used when a walk is restarted in a sub-grid (a brick's local frame):
    /// the first cell of the local walk was really entered through a face the
    /// enclosing walk crossed.
    #[must_use]
    #[inline]
    pub fn with_entry_face(mut self, face: Face7) -> Self {
        self.last_face = face;
        self
    }

    /// The cube the walk is currently in.
    #[inline]
    pub fn cube(&self) -> Cube {
        Cube::from(self.cube)
    }

    /// The `t` at which the walk entered the current cube; 0 until the first
    /// step.
    #[inline]
    pub fn t_distance(&self) -> FreeCoordinate {
        self.t_distance
    }

    /// The face of the current cube crossed by the last step, or
    /// [`Face7::Within`] before the first step.
    #[inline]
    pub fn last_face(&self) -> Face7 {
        self.last_face
    }

    /// Builds the [`RayHit`] for the current cube.
    #[inline]
    pub fn hit(&self, ray: &Ray, color: Rgb8) -> RayHit {
        RayHit::new(ray, self.t_distance, self.cube(), color, self.last_face)
    }

    /// Crosses into the next cube along the ray: the axis with the nearest
    /// plane crossing is chosen (ties prefer Z, then Y, then X, so that equal
    /// crossings resolve in a fixed staircase order), `cube` moves by `jump`
    /// on that axis, and `t_distance` advances to the crossing.
    pub fn step(&mut self) {
        let axis: Axis = if self.t_max.x < self.t_max.y {
            if self.t_max.x < self.t_max.z {
                Axis::X
            } else {
                Axis::Z
            }
        } else if self.t_max.y < self.t_max.z {
            Axis::Y
        } else {
            Axis::Z
        };

        self.cube[axis] = self.cube[axis].saturating_add(self.jump[axis]);
        self.t_distance = self.t_max[axis];
        self.t_max[axis] += self.t_delta[axis];

        const FACE_TABLE: [[Face7; 2]; 3] = [
            [Face7::PX, Face7::NX],
            [Face7::PY, Face7::NY],
            [Face7::PZ, Face7::NZ],
        ];
        self.last_face = FACE_TABLE[axis.index()][usize::from(self.step[axis] > 0)];
    }

    /// Reconfigures the walk so that the next [`step()`](Self::step) jumps
    /// from anywhere inside `aab` to the first cube outside it along the ray:
    /// each axis's `t_max` is re-aimed at the `t` where the ray exits the
    /// box on that axis, `t_delta` is scaled to the box size, and `jump` is
    /// set to land exactly one cube past the box boundary.
    ///
    /// Axes the ray is parallel to keep an infinite `t_max` and do not move.
    pub fn scale_to_box(&mut self, aab: GridAab, ray: &Ray) {
        let low = aab.lower_bounds();
        let high = aab.upper_bounds();
        let size = FreeCoordinate::from(aab.size_scalar());

        self.t_delta = self.unit_t_delta * size;

        for axis in Axis::ALL {
            match self.step[axis].cmp(&0) {
                core::cmp::Ordering::Greater => {
                    self.t_max[axis] = (FreeCoordinate::from(high[axis]) - ray.origin[axis])
                        * self.unit_t_delta[axis];
                    self.jump[axis] = high[axis] - self.cube[axis];
                }
                core::cmp::Ordering::Less => {
                    self.t_max[axis] = (ray.origin[axis] - FreeCoordinate::from(low[axis]))
                        * self.unit_t_delta[axis];
                    self.jump[axis] = low[axis] - self.cube[axis] - 1;
                }
                core::cmp::Ordering::Equal => {
                    self.t_max[axis] = FreeCoordinate::INFINITY;
                    self.jump[axis] = 0;
                }
            }
        }
    }

    /// Restores exact unit-grid state for the current `t_distance` after a
    /// scaled step.
    ///
    /// A step taken after [`scale_to_box()`](Self::scale_to_box) moves only
    /// the crossed axis; the other coordinates still hold the cells where
    /// those axes last stepped, which may be several planes behind. This
    /// re-derives them from the ray, counting only planes crossed strictly
    /// before the current parameter so that crossings tied with it stay
    /// pending and resolve in the normal step order. Afterward, `jump` and
    /// `t_delta` are back to unit-walk values.
    pub fn resynchronize(&mut self, ray: &Ray) {
        let t = self.t_distance;
        let crossed = self.last_face.axis();
        let position = ray.point_at(t);

        for axis in Axis::ALL {
            let step = self.step[axis];
            if step == 0 {
                self.t_max[axis] = FreeCoordinate::INFINITY;
                self.jump[axis] = 0;
                continue;
            }
            let origin = ray.origin[axis];
            let inv = self.unit_t_delta[axis];

            if Some(axis) != crossed {
                let estimate = position[axis].floor() as GridCoordinate;
                self.cube[axis] = if step > 0 {
                    // Greatest cell entered strictly before t. The entering
                    // plane of cell c is at coordinate c.
                    let mut cell = estimate.saturating_add(2);
                    while cell > self.cube[axis]
                        && (FreeCoordinate::from(cell) - origin) * inv >= t
                    {
                        cell -= 1;
                    }
                    cell.max(self.cube[axis])
                } else {
                    // Least cell entered strictly before t. The entering
                    // plane of cell c is at coordinate c + 1.
                    let mut cell = estimate.saturating_sub(2);
                    while cell < self.cube[axis]
                        && (origin - FreeCoordinate::from(cell + 1)) * inv >= t
                    {
                        cell += 1;
                    }
                    cell.min(self.cube[axis])
                };
            }

            self.t_max[axis] = if step > 0 {
                (FreeCoordinate::from(self.cube[axis] + 1) - origin) * inv
            } else {
                (origin - FreeCoordinate::from(self.cube[axis])) * inv
            };
            self.jump[axis] = step;
        }

        self.t_delta = self.unit_t_delta;
    }

    /// Advances the walk to parameter `t`, as if stepping there one cube at
    /// a time, in constant time.
    ///
    /// The restart point is backed off half a cube along the ray so that it
    /// cannot land exactly on a boundary plane; the walk reaches `t` after at
    /// most a couple of ordinary steps.
    pub fn fast_forward(&mut self, t: FreeCoordinate, ray: &Ray) {
        if t <= self.t_distance {
            return;
        }
        let mut t_start = t - 0.5 / ray.direction.length();
        if !t_start.is_finite() {
            t_start = t;
        }
        let t_start = t_start.max(0.0);
        if t_start <= self.t_distance {
            return;
        }

        let advanced = Ray {
            origin: ray.point_at(t_start),
            ..*ray
        };
        let mut restarted = Raycaster::new(&advanced);
        restarted.t_max = restarted.t_max.map(|plane_t| plane_t + t_start);
        restarted.t_distance = t_start;
        restarted.last_face = self.last_face;
        *self = restarted;
    }
}
