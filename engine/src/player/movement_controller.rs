//! Foot Controller
//!
//! Camera-relative walking for the on-foot player. Owns the FPS camera the
//! player looks through; moving the controller moves the eye.
//!
//! # Physics Model
//!
//! - Walk speed: 5.0 m/s
//! - Sprint speed: 10.0 m/s
//! - Acceleration: 50.0 m/s^2
//! - Deceleration: 30.0 m/s^2
//!
//! Disabling the controller zeroes its velocity, so handing control to the
//! vehicle never leaves the player drifting.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut foot = FootController::new(FpsCamera::with_position(eye));
//! foot.apply_look(dx, dy);
//! foot.update(delta_time, &movement_keys);
//! ```

use glam::Vec3;

use super::{MovementController, Switchable};
use crate::camera::FpsCamera;
use crate::input::MovementKeys;

/// Walk speed in meters per second
pub const WALK_SPEED: f32 = 5.0;

/// Sprint speed in meters per second
pub const SPRINT_SPEED: f32 = 10.0;

/// Acceleration in meters per second squared
pub const ACCELERATION: f32 = 50.0;

/// Deceleration in meters per second squared
pub const DECELERATION: f32 = 30.0;

/// On-foot movement controller.
#[derive(Debug, Clone)]
pub struct FootController {
    /// Eye camera; its position is the player position
    pub camera: FpsCamera,
    /// Current horizontal velocity (meters/second)
    velocity: Vec3,
    walk_speed: f32,
    sprint_speed: f32,
    acceleration: f32,
    deceleration: f32,
    enabled: bool,
}

impl FootController {
    /// Create an enabled controller looking through `camera`.
    pub fn new(camera: FpsCamera) -> Self {
        Self {
            camera,
            velocity: Vec3::ZERO,
            walk_speed: WALK_SPEED,
            sprint_speed: SPRINT_SPEED,
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            enabled: true,
        }
    }

    pub fn with_speeds(mut self, walk_speed: f32, sprint_speed: f32) -> Self {
        self.walk_speed = walk_speed;
        self.sprint_speed = sprint_speed;
        self
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn position(&self) -> Vec3 {
        self.camera.position
    }

    fn target_velocity(&self, input: &MovementKeys) -> Vec3 {
        let forward = self.camera.flat_forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let dir = (forward * input.forward_axis() as f32 + right * input.right_axis() as f32)
            .normalize_or_zero();
        let speed = if input.is_sprinting() {
            self.sprint_speed
        } else {
            self.walk_speed
        };
        dir * speed
    }
}

impl Switchable for FootController {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.velocity = Vec3::ZERO;
        }
    }
}

impl MovementController for FootController {
    fn apply_look(&mut self, dx: f32, dy: f32) {
        if self.enabled {
            self.camera.apply_mouse_delta(dx, dy);
        }
    }

    fn update(&mut self, dt: f32, input: &MovementKeys) {
        if !self.enabled {
            return;
        }
        let dt = dt.clamp(0.0, 0.1);
        let target = self.target_velocity(input);

        if target.length_squared() > 0.001 {
            let diff = target - self.velocity;
            let step = self.acceleration * dt;
            if diff.length() <= step {
                self.velocity = target;
            } else {
                self.velocity += diff.normalize() * step;
            }
        } else {
            let speed = self.velocity.length();
            let step = self.deceleration * dt;
            self.velocity = if speed <= step {
                Vec3::ZERO
            } else {
                self.velocity.normalize() * (speed - step)
            };
        }

        self.camera.position += self.velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(forward: bool, right: bool, sprint: bool) -> MovementKeys {
        MovementKeys {
            forward,
            right,
            sprint,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_input_no_movement() {
        let mut foot = FootController::new(FpsCamera::new());
        foot.update(0.016, &MovementKeys::default());
        assert_eq!(foot.velocity(), Vec3::ZERO);
        assert_eq!(foot.position(), Vec3::ZERO);
    }

    #[test]
    fn test_forward_accelerates_to_walk_speed() {
        let mut foot = FootController::new(FpsCamera::new());
        foot.update(0.016, &keys(true, false, false));
        assert!(foot.speed() > 0.0 && foot.speed() < WALK_SPEED);

        for _ in 0..100 {
            foot.update(0.016, &keys(true, false, false));
        }
        assert!((foot.speed() - WALK_SPEED).abs() < 0.1);
        assert!(foot.position().z < 0.0);
    }

    #[test]
    fn test_sprint_and_strafe() {
        let mut foot = FootController::new(FpsCamera::new());
        for _ in 0..100 {
            foot.update(0.016, &keys(false, true, true));
        }
        assert!((foot.speed() - SPRINT_SPEED).abs() < 0.1);
        assert!(foot.velocity().x > 0.0);
    }

    #[test]
    fn test_deceleration_stops() {
        let mut foot = FootController::new(FpsCamera::new());
        for _ in 0..100 {
            foot.update(0.016, &keys(true, false, false));
        }
        for _ in 0..100 {
            foot.update(0.016, &MovementKeys::default());
        }
        assert_eq!(foot.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_disabled_controller_freezes() {
        let mut foot = FootController::new(FpsCamera::new());
        for _ in 0..10 {
            foot.update(0.016, &keys(true, false, false));
        }
        foot.set_enabled(false);
        assert_eq!(foot.velocity(), Vec3::ZERO);

        let before = foot.position();
        foot.update(0.016, &keys(true, false, false));
        foot.apply_look(100.0, 0.0);
        assert_eq!(foot.position(), before);
        assert_eq!(foot.camera.yaw, 0.0);
    }
}
