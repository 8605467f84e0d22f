//! Vehicle look camera.
//!
//! Mouse look used while the player is at the helm: pitch is clamped to a
//! configurable angle and can be inverted, yaw turns freely. The camera
//! only responds while enabled; the control arbiter flips it together with
//! the foot controller.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::viewpoint::Viewpoint;

/// Look tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookTuning {
    /// Degrees of rotation per pixel of mouse movement
    pub sensitivity: f32,
    /// Maximum pitch above or below the horizon (degrees)
    pub max_look_angle: f32,
    pub invert_y: bool,
}

impl Default for LookTuning {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            max_look_angle: 80.0,
            invert_y: false,
        }
    }
}

/// Pitch-clamped look camera for vehicle mode.
#[derive(Debug, Clone)]
pub struct LookCamera {
    pub tuning: LookTuning,
    /// Eye position, usually following the seat on the vehicle
    pub position: Vec3,
    /// Degrees, positive turns right
    yaw: f32,
    /// Degrees, positive looks up
    pitch: f32,
    enabled: bool,
}

impl LookCamera {
    /// Create a disabled look camera.
    pub fn new(tuning: LookTuning) -> Self {
        Self {
            tuning,
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Rotate from a raw mouse delta. Ignored while disabled.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        let dy = dy * self.tuning.sensitivity;
        let limit = self.tuning.max_look_angle;
        self.pitch = (self.pitch + if self.tuning.invert_y { dy } else { -dy }).clamp(-limit, limit);
        self.yaw += dx * self.tuning.sensitivity;
    }

    /// Align the camera with an existing view, e.g. when taking the helm.
    pub fn align_with(&mut self, view: &impl Viewpoint) {
        let forward = view.forward();
        self.position = view.position();
        self.yaw = forward.x.atan2(-forward.z).to_degrees();
        let limit = self.tuning.max_look_angle;
        self.pitch = forward.y.clamp(-1.0, 1.0).asin().to_degrees().clamp(-limit, limit);
    }
}

impl Viewpoint for LookCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), -yaw.cos() * pitch.cos()).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewFrame;

    fn enabled_camera(tuning: LookTuning) -> LookCamera {
        let mut camera = LookCamera::new(tuning);
        camera.set_enabled(true);
        camera
    }

    #[test]
    fn test_starts_disabled_and_ignores_input() {
        let mut camera = LookCamera::new(LookTuning::default());
        assert!(!camera.is_enabled());
        camera.apply_mouse_delta(100.0, 100.0);
        assert_eq!(camera.yaw(), 0.0);
        assert_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn test_pitch_clamped_to_max_look_angle() {
        let mut camera = enabled_camera(LookTuning::default());
        camera.apply_mouse_delta(0.0, -100000.0);
        assert_eq!(camera.pitch(), 80.0);
        camera.apply_mouse_delta(0.0, 100000.0);
        assert_eq!(camera.pitch(), -80.0);
    }

    #[test]
    fn test_invert_y() {
        let mut normal = enabled_camera(LookTuning::default());
        let mut inverted = enabled_camera(LookTuning {
            invert_y: true,
            ..Default::default()
        });
        normal.apply_mouse_delta(0.0, 10.0);
        inverted.apply_mouse_delta(0.0, 10.0);
        assert!(normal.pitch() < 0.0);
        assert!(inverted.pitch() > 0.0);
    }

    #[test]
    fn test_align_with_view() {
        let mut camera = LookCamera::new(LookTuning::default());
        let view = ViewFrame::new(Vec3::new(1.0, 2.0, 3.0), Vec3::X);
        camera.align_with(&view);
        assert_eq!(camera.position(), view.position);
        assert!((camera.forward() - Vec3::X).length() < 1e-4);
    }
}
