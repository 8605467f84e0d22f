//! Player Module
//!
//! Movement controllers the control arbiter switches between.
//!
//! # Components
//!
//! - [`FootController`] - Camera-relative walking with acceleration and deceleration
//! - [`VehicleHelm`] - Steerable platform with inertia plus the vehicle look camera
//!
//! Both implement [`MovementController`]: they can be switched on and off
//! at any time and must tolerate being disabled mid-motion.

pub mod movement_controller;
pub mod vehicle;

pub use movement_controller::{
    ACCELERATION, DECELERATION, FootController, SPRINT_SPEED, WALK_SPEED,
};
pub use vehicle::{VehicleHelm, VehiclePlatform, VehicleTuning};

use crate::input::MovementKeys;

/// Anything that can be switched on and off by the control arbiter.
pub trait Switchable {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

/// A per-frame movement controller.
pub trait MovementController: Switchable {
    /// Mouse look delta in pixels. Ignored while disabled.
    fn apply_look(&mut self, dx: f32, dy: f32);

    /// Advance one frame with the held movement keys.
    fn update(&mut self, dt: f32, input: &MovementKeys);
}
