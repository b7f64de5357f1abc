//! Orbit/fly camera that produces per-pixel ray directions.
//!
//! # Coordinate System
//!
//! Uses a **right-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive toward the viewer (the camera looks along -Z)
//!
//! # Orientation
//!
//! Orientation is stored as an orthonormal basis (X, Y, Z) rather than
//! Euler angles. Orbiting rotates the basis directly, which lets the camera
//! keep its distance to the reference point without accumulating angle wrap.
//!
//! # Ray Matrix
//!
//! The ray matrix maps a pixel-space point `(x + 0.5, y + 0.5, 0, 1)` to a
//! world-space ray direction in one multiply. It is a pure function of the
//! basis and the [`Projection`], so there is no cached copy to go stale:
//!
//! ```text
//! RayMatrix = View * Projection * BiasInverse * Viewport
//! ```

use crate::math::{Mat4, Vec3};

/// Vertical field of view.
pub const FOV_Y_DEGREES: f32 = 45.0;
/// Base distance for a single pan step.
pub const PAN_STEP: f32 = 0.125;
/// Orbit angle per pixel of mouse movement, in degrees.
pub const ORBIT_SENSITIVITY: f32 = 0.25;
/// Fraction of the current distance covered by one dolly step.
pub const DOLLY_FACTOR: f32 = 0.1;
pub const MIN_DOLLY_DISTANCE: f32 = 0.05;
pub const MAX_DOLLY_DISTANCE: f32 = 500.0;
/// Offset applied along Z when `look` does not orbit around the reference.
const LOOK_NUDGE: f32 = 0.05;

/// Direction of a single pan step, relative to the camera's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

/// Step-size modifiers for [`Camera::pan`]. Both may be held at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanModifiers {
    /// Halves the step.
    pub precise: bool,
    /// Doubles the step.
    pub fast: bool,
}

impl PanModifiers {
    fn step(&self) -> f32 {
        let mut distance = PAN_STEP;
        if self.precise {
            distance *= 0.5;
        }
        if self.fast {
            distance *= 2.0;
        }
        distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DollyDirection {
    /// Toward the reference point.
    In,
    /// Away from the reference point.
    Out,
}

/// Orthonormal camera basis. Columns of the view rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl Default for Basis {
    fn default() -> Self {
        Self {
            x: Vec3::X,
            y: Vec3::UP,
            z: Vec3::Z,
        }
    }
}

impl Basis {
    /// Returns true if every axis has unit length and the axes are pairwise
    /// perpendicular, within `epsilon`.
    pub fn is_orthonormal(&self, epsilon: f32) -> bool {
        let unit = |v: Vec3| (v.magnitude() - 1.0).abs() <= epsilon;
        unit(self.x)
            && unit(self.y)
            && unit(self.z)
            && self.x.dot(self.y).abs() <= epsilon
            && self.y.dot(self.z).abs() <= epsilon
            && self.z.dot(self.x).abs() <= epsilon
    }

    /// View rotation with the basis vectors as columns.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_basis(self.x, self.y, self.z)
    }
}

/// Perspective and viewport-scale parameters for the current image size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    aspect_ratio: f32,
    inv_width: f32,
    inv_height: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Projection {
    /// Builds the parameters for a `width` x `height` image.
    ///
    /// Zero dimensions are treated as one pixel so the matrix stays finite.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        Self {
            aspect_ratio: width / height,
            inv_width: 1.0 / width,
            inv_height: 1.0 / height,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Inverse perspective: maps normalized device x/y in `[-1, 1]` onto a
    /// view-space direction on the `z = -1` plane.
    pub fn matrix(&self) -> Mat4 {
        let tan_y = (FOV_Y_DEGREES.to_radians() * 0.5).tan();
        let mut m = Mat4::identity();
        m.set(0, 0, tan_y * self.aspect_ratio);
        m.set(1, 1, tan_y);
        m.set(2, 2, 0.0);
        m.set(2, 3, -1.0);
        m
    }

    /// Maps pixel coordinates onto `[0, 1]`.
    pub fn viewport_matrix(&self) -> Mat4 {
        Mat4::scaling(self.inv_width, self.inv_height, 1.0)
    }
}

/// Composes `View * Projection * BiasInverse * Viewport`.
pub fn compute_ray_matrix(basis: &Basis, projection: &Projection) -> Mat4 {
    basis.view_matrix() * projection.matrix() * Mat4::bias_inverse() * projection.viewport_matrix()
}

/// Camera with an orthonormal basis, a position and a reference point.
#[derive(Debug, Clone)]
pub struct Camera {
    basis: Basis,
    position: Vec3,
    reference: Vec3,
    projection: Projection,
}

impl Default for Camera {
    /// Five units back from the origin, looking down -Z.
    fn default() -> Self {
        Self {
            basis: Basis::default(),
            position: Vec3::new(0.0, 0.0, 5.0),
            reference: Vec3::ZERO,
            projection: Projection::default(),
        }
    }
}

impl Camera {
    /// Creates a camera at `position` orbiting `reference`.
    pub fn looking_at(position: Vec3, reference: Vec3) -> Self {
        let mut camera = Self::default();
        camera.look(position, reference, true);
        camera
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Points the camera from `position` at `reference`.
    ///
    /// With `rotate_around_reference` unset the camera becomes a free-look
    /// camera: the reference collapses onto the position and the position is
    /// nudged back along Z so the view vector never has zero length.
    ///
    /// Degenerate inputs keep the previous axis: coincident points keep Z,
    /// and looking straight along world up keeps X.
    pub fn look(&mut self, position: Vec3, reference: Vec3, rotate_around_reference: bool) {
        self.position = position;
        self.reference = reference;

        let z = (position - reference).normalize();
        if z != Vec3::ZERO {
            self.basis.z = z;
        }
        let x = Vec3::UP.cross(self.basis.z).normalize();
        if x != Vec3::ZERO {
            self.basis.x = x;
        }
        self.basis.y = self.basis.z.cross(self.basis.x);

        if !rotate_around_reference {
            self.reference = self.position;
            self.position += self.basis.z * LOOK_NUDGE;
        }
    }

    /// Updates the projection for a new image size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.projection = Projection::new(width, height);
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Translates the camera and its reference point by one step.
    ///
    /// Forward is the heading projected onto the ground plane, so flying
    /// forward never changes altitude. Returns whether the camera moved.
    pub fn pan(&mut self, direction: PanDirection, modifiers: PanModifiers) -> bool {
        let distance = modifiers.step();

        let up = Vec3::UP;
        let right = self.basis.x;
        let forward = up.cross(right);

        let movement = match direction {
            PanDirection::Forward => forward,
            PanDirection::Back => -forward,
            PanDirection::Left => -right,
            PanDirection::Right => right,
            PanDirection::Up => up,
            PanDirection::Down => -up,
        } * distance;

        self.reference += movement;
        self.position += movement;

        movement != Vec3::ZERO
    }

    /// Orbits around the reference point by mouse deltas in pixels.
    ///
    /// `dy` tilts about the camera's X axis and `dx` turns about world up.
    /// If the tilt carries Y below the horizon the camera has passed a pole:
    /// Z snaps to straight up or down and Y is rebuilt from Z and X, so the
    /// basis never flips upside down.
    pub fn orbit(&mut self, dx: i32, dy: i32) -> bool {
        if dx == 0 && dy == 0 {
            return false;
        }

        let horizontal = dx as f32 * ORBIT_SENSITIVITY;
        let vertical = dy as f32 * ORBIT_SENSITIVITY;

        let radius = (self.position - self.reference).magnitude();
        let Basis { mut x, mut y, mut z } = self.basis;

        y = y.rotate(vertical, x);
        z = z.rotate(vertical, x);

        if y.y < 0.0 {
            z = if z.y > 0.0 { Vec3::UP } else { Vec3::DOWN };
            y = z.cross(x);
        }

        x = x.rotate(horizontal, Vec3::UP);
        y = y.rotate(horizontal, Vec3::UP);
        z = z.rotate(horizontal, Vec3::UP);

        self.basis = Basis { x, y, z };
        self.position = self.reference + z * radius;
        true
    }

    /// Moves toward or away from the reference by [`DOLLY_FACTOR`] of the
    /// current distance.
    ///
    /// A step that would leave the open range
    /// ([`MIN_DOLLY_DISTANCE`], [`MAX_DOLLY_DISTANCE`]) is refused and
    /// returns false.
    pub fn dolly(&mut self, direction: DollyDirection) -> bool {
        let offset = self.position - self.reference;
        let factor = match direction {
            DollyDirection::In => 1.0 - DOLLY_FACTOR,
            DollyDirection::Out => 1.0 + DOLLY_FACTOR,
        };

        let distance = offset.magnitude() * factor;
        if distance <= MIN_DOLLY_DISTANCE || distance >= MAX_DOLLY_DISTANCE {
            return false;
        }

        self.position = self.reference + offset * factor;
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn reference(&self) -> Vec3 {
        self.reference
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Distance from the position to the reference point.
    pub fn distance(&self) -> f32 {
        (self.position - self.reference).magnitude()
    }

    /// Returns the composite pixel-to-ray matrix for the current state.
    pub fn ray_matrix(&self) -> Mat4 {
        compute_ray_matrix(&self.basis, &self.projection)
    }
}

// =============================================================================
// Tests
// =============================================================================
