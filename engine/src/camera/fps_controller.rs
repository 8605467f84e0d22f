//! FPS Camera Module
//!
//! First-person yaw/pitch camera used while the player is on foot. Mouse
//! deltas rotate it directly with no smoothing; it is the viewpoint the
//! grab and placement raycasts are issued from.
//!
//! Coordinate system:
//! - +X = right
//! - +Y = up
//! - -Z = forward (at yaw = 0, pitch = 0)

use glam::{Quat, Vec3};

use super::viewpoint::Viewpoint;

/// Pitch limit: 89 degrees in radians
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// First-person camera.
///
/// ## Usage
/// ```rust,ignore
/// let mut camera = FpsCamera::with_position(Vec3::new(0.0, 1.7, 0.0));
/// camera.apply_mouse_delta(mouse_dx, mouse_dy);
/// let ray = view_ray(&camera);
/// ```
#[derive(Clone, Debug)]
pub struct FpsCamera {
    /// Eye position in world space
    pub position: Vec3,
    /// Horizontal angle (radians), unrestricted
    pub yaw: f32,
    /// Vertical angle (radians), clamped to the pitch limit
    pub pitch: f32,
    /// Mouse sensitivity in radians per pixel
    pub sensitivity: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.002,
        }
    }
}

impl FpsCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the pitch (radians), clamped to the limit.
    #[inline]
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Rotate from a raw mouse delta in pixels.
    ///
    /// Positive `dx` looks right, positive `dy` looks down.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.set_pitch(self.pitch - dy * self.sensitivity);
    }

    /// Point the camera at a world position.
    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        let distance = to_target.length();

        if distance > 0.001 {
            self.yaw = to_target.x.atan2(-to_target.z);
            self.set_pitch((to_target.y / distance).asin());
        }
    }

    /// Orientation as a quaternion (identity looks down -Z).
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Horizontal forward, ignoring pitch. Used for walking.
    pub fn flat_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }
}

impl Viewpoint for FpsCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }
}
