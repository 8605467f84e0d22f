//! Vehicle Helm
//!
//! A steerable platform plus the look camera the player uses while at the
//! helm.
//!
//! # Steering
//!
//! - W/S add thrust along the platform forward
//! - A/D alone turn in place at `rotation_speed`
//! - A/D with W turn at `turn_speed`; with S the turn is reversed
//! - Velocity decays by `inertia` every 1/60 s and snaps to zero below
//!   `stop_threshold`
//!
//! A disabled helm ignores input but keeps coasting on its residual
//! velocity until inertia stops it.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::{MovementController, Switchable};
use crate::camera::{LookCamera, LookTuning};
use crate::input::MovementKeys;
use crate::physics::Transform;

/// Reference frame rate the inertia factor is expressed at.
const INERTIA_REFERENCE_HZ: f32 = 60.0;

/// Vehicle tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Thrust acceleration (meters/second^2)
    pub move_speed: f32,
    /// In-place turn rate (degrees/second)
    pub rotation_speed: f32,
    /// Turn rate while thrusting (degrees/second)
    pub turn_speed: f32,
    /// Velocity retained per reference frame, in `[0, 1]`
    pub inertia: f32,
    /// Speed below which the platform stops (meters/second)
    pub stop_threshold: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotation_speed: 90.0,
            turn_speed: 45.0,
            inertia: 0.99,
            stop_threshold: 0.01,
        }
    }
}

/// The moving platform itself.
#[derive(Debug, Clone)]
pub struct VehiclePlatform {
    pub tuning: VehicleTuning,
    /// World pose of the platform
    pub transform: Transform,
    velocity: Vec3,
}

impl VehiclePlatform {
    pub fn new(tuning: VehicleTuning, transform: Transform) -> Self {
        Self {
            tuning,
            transform,
            velocity: Vec3::ZERO,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Apply one frame of thrust and turn input, then integrate.
    pub fn update(&mut self, dt: f32, input: &MovementKeys) {
        let forward = self.transform.forward();
        let t = self.tuning;

        if input.forward {
            self.velocity += forward * t.move_speed * dt;
        } else if input.backward {
            self.velocity -= forward * t.move_speed * dt;
        }

        // Degrees; positive turns right (clockwise seen from above)
        let turn = match (input.left, input.right, input.forward, input.backward) {
            (true, _, false, false) => -t.rotation_speed,
            (false, true, false, false) => t.rotation_speed,
            (true, _, true, _) => -t.turn_speed,
            (false, true, true, _) => t.turn_speed,
            (true, _, false, true) => t.turn_speed,
            (false, true, false, true) => -t.turn_speed,
            _ => 0.0,
        };
        if turn != 0.0 {
            let yaw = Quat::from_rotation_y(-(turn * dt).to_radians());
            self.transform.rotation = (yaw * self.transform.rotation).normalize();
        }

        self.coast(dt);
    }

    /// Integrate residual velocity without input.
    pub fn coast(&mut self, dt: f32) {
        self.transform.position += self.velocity * dt;
        self.velocity *= self.tuning.inertia.powf(dt * INERTIA_REFERENCE_HZ);
        if self.velocity.length() < self.tuning.stop_threshold {
            self.velocity = Vec3::ZERO;
        }
    }
}

/// Helm: platform steering plus vehicle look camera, switched as one unit.
#[derive(Debug, Clone)]
pub struct VehicleHelm {
    pub platform: VehiclePlatform,
    pub look: LookCamera,
    /// Eye position in the platform's local space
    pub seat_offset: Vec3,
    enabled: bool,
}

impl VehicleHelm {
    /// Create a disabled helm.
    pub fn new(platform: VehiclePlatform, look: LookTuning) -> Self {
        let mut helm = Self {
            platform,
            look: LookCamera::new(look),
            seat_offset: Vec3::new(0.0, 1.7, 0.0),
            enabled: false,
        };
        helm.sync_eye();
        helm
    }

    pub fn with_seat_offset(mut self, seat_offset: Vec3) -> Self {
        self.seat_offset = seat_offset;
        self.sync_eye();
        self
    }

    fn sync_eye(&mut self) {
        self.look.position = self.platform.transform.transform_point(self.seat_offset);
    }
}

impl Switchable for VehicleHelm {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.look.set_enabled(enabled);
    }
}

impl MovementController for VehicleHelm {
    fn apply_look(&mut self, dx: f32, dy: f32) {
        self.look.apply_mouse_delta(dx, dy);
    }

    fn update(&mut self, dt: f32, input: &MovementKeys) {
        if self.enabled {
            self.platform.update(dt, input);
        } else {
            self.platform.coast(dt);
        }
        self.sync_eye();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn helm() -> VehicleHelm {
        let platform = VehiclePlatform::new(VehicleTuning::default(), Transform::IDENTITY);
        VehicleHelm::new(platform, LookTuning::default())
    }

    fn keys(forward: bool, backward: bool, left: bool, right: bool) -> MovementKeys {
        MovementKeys {
            forward,
            backward,
            left,
            right,
            sprint: false,
        }
    }

    fn heading_degrees(platform: &VehiclePlatform) -> f32 {
        let f = platform.transform.forward();
        f.x.atan2(-f.z).to_degrees()
    }

    #[test]
    fn test_thrust_moves_forward() {
        let mut platform = VehiclePlatform::new(VehicleTuning::default(), Transform::IDENTITY);
        for _ in 0..60 {
            platform.update(DT, &keys(true, false, false, false));
        }
        assert!(platform.velocity().z < 0.0);
        assert!(platform.transform.position.z < 0.0);
    }

    #[test]
    fn test_turn_in_place_rate() {
        let mut platform = VehiclePlatform::new(VehicleTuning::default(), Transform::IDENTITY);
        for _ in 0..60 {
            platform.update(DT, &keys(false, false, false, true));
        }
        assert!((heading_degrees(&platform) - 90.0).abs() < 0.5);
        assert_eq!(platform.transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_turn_reverses_when_backing() {
        let mut forward = VehiclePlatform::new(VehicleTuning::default(), Transform::IDENTITY);
        let mut backward = VehiclePlatform::new(VehicleTuning::default(), Transform::IDENTITY);
        for _ in 0..30 {
            forward.update(DT, &keys(true, false, false, true));
            backward.update(DT, &keys(false, true, false, true));
        }
        assert!(heading_degrees(&forward) > 0.0);
        assert!(heading_degrees(&backward) < 0.0);
        assert!((heading_degrees(&forward) - 22.5).abs() < 0.5);
    }

    #[test]
    fn test_inertia_eventually_stops() {
        let mut platform = VehiclePlatform::new(VehicleTuning::default(), Transform::IDENTITY);
        for _ in 0..30 {
            platform.update(DT, &keys(true, false, false, false));
        }
        for _ in 0..2000 {
            platform.coast(DT);
        }
        assert_eq!(platform.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_helm_starts_disabled_and_ignores_input() {
        let mut helm = helm();
        assert!(!helm.is_enabled());
        assert!(!helm.look.is_enabled());
        helm.update(DT, &keys(true, false, false, false));
        assert_eq!(helm.platform.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_disabled_helm_coasts() {
        let mut helm = helm();
        helm.set_enabled(true);
        for _ in 0..30 {
            helm.update(DT, &keys(true, false, false, false));
        }
        let speed = helm.platform.velocity().length();
        helm.set_enabled(false);
        helm.update(DT, &keys(true, false, false, false));
        assert!(helm.platform.velocity().length() < speed);
        assert!(!helm.look.is_enabled());
    }

    #[test]
    fn test_eye_follows_platform() {
        let mut helm = helm();
        helm.set_enabled(true);
        for _ in 0..60 {
            helm.update(DT, &keys(true, false, false, false));
        }
        let expected = helm.platform.transform.position + Vec3::new(0.0, 1.7, 0.0);
        assert!((helm.look.position - expected).length() < 1e-4);
    }
}
