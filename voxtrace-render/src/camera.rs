//! The movable pinhole camera and primary-ray generation.

use core::f64::consts::FRAC_PI_2;

use voxtrace::math::{normalize_or_zero, FreeCoordinate, FreePoint, FreeVector, Matrix3};
use voxtrace::raycast::Ray;

/// Pitch is clamped just short of straight up/down so the forward vector
/// never becomes parallel to world-up.
pub const PITCH_LIMIT: FreeCoordinate = FRAC_PI_2 * 0.99;

/// A first-person pinhole camera: a position, an orthonormal basis, and the
/// projection parameters that turn pixels into rays.
///
/// Two rotation styles are supported: [`update_rotation_fps()`] integrates
/// mouse deltas into clamped pitch and yaw (no roll), and
/// [`update_rotation_free()`] composes arbitrary body-axis rotations onto
/// the current basis (roll permitted).
///
/// [`update_rotation_fps()`]: Self::update_rotation_fps
/// [`update_rotation_free()`]: Self::update_rotation_free
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// World-space position of the eye.
    pub position: FreePoint,

    forward: FreeVector,
    right: FreeVector,
    up: FreeVector,
    world_up: FreeVector,
    pitch: FreeCoordinate,
    yaw: FreeCoordinate,

    /// Vertical field of view in radians.
    pub fov: FreeCoordinate,
    /// Width over height of the output image.
    pub aspect: FreeCoordinate,
    /// Hard bound on primary (and derived shadow) ray length.
    pub render_distance: FreeCoordinate,
    /// Movement speed in cubes per second.
    pub move_speed: FreeCoordinate,
    /// Rotation per unit of mouse movement, in radians.
    pub look_speed: FreeCoordinate,
}

impl Camera {
    /// A camera at the origin looking along +Z with 90° vertical field of
    /// view.
    pub fn new() -> Self {
        let mut camera = Self {
            position: FreePoint::origin(),
            forward: FreeVector::new(0.0, 0.0, 1.0),
            right: FreeVector::new(1.0, 0.0, 0.0),
            up: FreeVector::new(0.0, 1.0, 0.0),
            world_up: FreeVector::new(0.0, 1.0, 0.0),
            pitch: 0.0,
            yaw: 0.0,
            fov: FRAC_PI_2,
            aspect: 1.0,
            render_distance: 100.0,
            move_speed: 10.0,
            look_speed: 0.01,
        };
        camera.refresh_fps_basis();
        camera
    }

    /// The direction the camera looks along.
    #[inline]
    pub fn forward(&self) -> FreeVector {
        self.forward
    }

    /// The camera-space +X direction on screen.
    #[inline]
    pub fn right(&self) -> FreeVector {
        self.right
    }

    /// The camera-space +Y direction on screen.
    #[inline]
    pub fn up(&self) -> FreeVector {
        self.up
    }

    /// Current pitch in radians, in `[-PITCH_LIMIT, PITCH_LIMIT]`.
    #[inline]
    pub fn pitch(&self) -> FreeCoordinate {
        self.pitch
    }

    /// Current yaw in radians (unbounded).
    #[inline]
    pub fn yaw(&self) -> FreeCoordinate {
        self.yaw
    }

    /// Applies mouse movement `(dx, dy)`, scaled by `look_speed`, to yaw and
    /// pitch, then rebuilds the basis. Pitch is clamped to
    /// [`PITCH_LIMIT`] before the basis is recomputed.
    pub fn update_rotation_fps(&mut self, dx: FreeCoordinate, dy: FreeCoordinate) {
        self.pitch = (self.pitch + dy * self.look_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw += dx * self.look_speed;
        self.refresh_fps_basis();
    }

    fn refresh_fps_basis(&mut self) {
        let forward = (Matrix3::rotation_y(self.yaw) * Matrix3::rotation_x(self.pitch))
            .transform_vector(FreeVector::new(0.0, 0.0, 1.0));
        let right = forward.cross(self.world_up);
        let up = right.cross(forward);
        self.forward = normalize_or_zero(forward);
        self.right = normalize_or_zero(right);
        self.up = normalize_or_zero(up);
    }

    /// Rotates the basis by intrinsic X→Y→Z body-axis angles
    /// `(rx, ry, rz) · dt`; roll is permitted and pitch/yaw are not
    /// tracked in this mode.
    pub fn update_rotation_free(
        &mut self,
        rx: FreeCoordinate,
        ry: FreeCoordinate,
        rz: FreeCoordinate,
        dt: FreeCoordinate,
    ) {
        let rotation = Matrix3::rotation_xyz(rx * dt, ry * dt, rz * dt);
        let basis = Matrix3::from_columns(self.right, self.up, self.forward) * rotation;
        self.right = normalize_or_zero(basis.column(0));
        self.up = normalize_or_zero(basis.column(1));
        self.forward = normalize_or_zero(basis.column(2));
    }

    /// Moves along the ground plane and world-up: the desired motion
    /// `(dx, dy, dz)` is normalized (or zero), scaled by `move_speed · dt`,
    /// and applied as lateral/vertical/horizontal-forward displacement. The
    /// forward component ignores pitch, FPS-style.
    pub fn update_position_fps(
        &mut self,
        dx: FreeCoordinate,
        dy: FreeCoordinate,
        dz: FreeCoordinate,
        dt: FreeCoordinate,
    ) {
        let delta = normalize_or_zero(FreeVector::new(dx, dy, dz)) * (self.move_speed * dt);
        let forward_horizontal =
            normalize_or_zero(FreeVector::new(self.forward.x, 0.0, self.forward.z));
        self.position +=
            forward_horizontal * delta.z + self.world_up * delta.y + self.right * delta.x;
    }

    /// Moves along the camera's own basis vectors (fly-style).
    pub fn update_position_free(
        &mut self,
        dx: FreeCoordinate,
        dy: FreeCoordinate,
        dz: FreeCoordinate,
        dt: FreeCoordinate,
    ) {
        let delta = normalize_or_zero(FreeVector::new(dx, dy, dz)) * (self.move_speed * dt);
        self.position += self.forward * delta.z + self.up * delta.y + self.right * delta.x;
    }

    /// Adjusts movement speed from a scroll-wheel delta; speed never goes
    /// negative.
    pub fn handle_scroll(&mut self, delta: FreeCoordinate) {
        self.move_speed = (self.move_speed + delta).max(0.0);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything needed to turn a pixel coordinate into a world-space ray,
/// precomputed once per frame: the per-NDC-unit screen-space derivatives of
/// the ray direction, and the half-resolution offsets.
#[derive(Clone, Copy, Debug)]
pub struct CameraRayBasis {
    origin: FreePoint,
    forward: FreeVector,
    dr_dx: FreeVector,
    du_dy: FreeVector,
    half_width: FreeCoordinate,
    half_height: FreeCoordinate,
    t_max: FreeCoordinate,
}

impl CameraRayBasis {
    /// Captures the camera state for an image of the given dimensions.
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let scale = (camera.fov / 2.0).tan();
        Self {
            origin: camera.position,
            forward: camera.forward(),
            dr_dx: camera.right() * (scale * camera.aspect),
            du_dy: camera.up() * scale,
            half_width: FreeCoordinate::from(width) / 2.0,
            half_height: FreeCoordinate::from(height) / 2.0,
            t_max: camera.render_distance,
        }
    }

    /// The primary ray through the center of the pixel at
    /// `(column, row)`, with rows numbered from the top of the image.
    pub fn pixel_ray(&self, column: u32, row: u32) -> Ray {
        let x = FreeCoordinate::from(column) + 0.5;
        let y = FreeCoordinate::from(row) + 0.5;
        let ndc_x = (x - self.half_width) / self.half_width;
        let ndc_y = -((y - self.half_height) / self.half_height);
        let direction = normalize_or_zero(self.forward + self.dr_dx * ndc_x + self.du_dy * ndc_y);
        Ray::new(self.origin, direction, self.t_max)
    }
}
