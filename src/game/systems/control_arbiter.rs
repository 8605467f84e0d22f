//! Control Arbiter - exclusive switch between foot and vehicle control.
//!
//! Exactly one movement controller is enabled at any time. Interacting while
//! at the helm always returns to foot control; interacting on foot enters
//! vehicle control only when the view ray finds a steering device within
//! reach.

use tracing::{debug, info};

use crate::camera::{ViewFrame, Viewpoint, view_ray};
use crate::game::config::InteractionConfig;
use crate::input::MovementKeys;
use crate::physics::{LayerMask, RaycastQuery};
use crate::player::{FootController, MovementController, VehicleHelm};

/// Which controller receives per-frame input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    #[default]
    Foot,
    Vehicle,
}

#[derive(Debug)]
pub struct ControlArbiter<F, V> {
    foot: F,
    vehicle: V,
    mode: ControlMode,
    steering_mask: LayerMask,
    steering_distance: f32,
}

impl<F: MovementController, V: MovementController> ControlArbiter<F, V> {
    /// Wire both controllers; foot control starts enabled.
    pub fn new(mut foot: F, mut vehicle: V, config: &InteractionConfig) -> Self {
        vehicle.set_enabled(false);
        foot.set_enabled(true);
        Self {
            foot,
            vehicle,
            mode: ControlMode::Foot,
            steering_mask: LayerMask::from(config.layers.steering),
            steering_distance: config.control.steering_detection_distance,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn is_vehicle_active(&self) -> bool {
        self.mode == ControlMode::Vehicle
    }

    pub fn foot(&self) -> &F {
        &self.foot
    }

    pub fn foot_mut(&mut self) -> &mut F {
        &mut self.foot
    }

    pub fn vehicle(&self) -> &V {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut V {
        &mut self.vehicle
    }

    fn switch_to(&mut self, mode: ControlMode) {
        // Disable first so both are never enabled together
        match mode {
            ControlMode::Foot => {
                self.vehicle.set_enabled(false);
                self.foot.set_enabled(true);
            }
            ControlMode::Vehicle => {
                self.foot.set_enabled(false);
                self.vehicle.set_enabled(true);
            }
        }
        self.mode = mode;
        info!(?mode, "control mode switched");
    }

    /// Handle one interact press. Returns the new mode if it changed.
    pub fn handle_interact(
        &mut self,
        world: &impl RaycastQuery,
        view: &impl Viewpoint,
    ) -> Option<ControlMode> {
        if self.is_vehicle_active() {
            self.switch_to(ControlMode::Foot);
            return Some(ControlMode::Foot);
        }

        match world.raycast(view_ray(view), self.steering_distance, self.steering_mask) {
            Some(hit) => {
                debug!(entity = ?hit.entity, "steering device in reach");
                self.switch_to(ControlMode::Vehicle);
                Some(ControlMode::Vehicle)
            }
            None => {
                debug!("no steering device in reach");
                None
            }
        }
    }

    /// Dispatch look and movement to the active controller. The inactive
    /// one still ticks with no input so it can settle.
    pub fn update(&mut self, dt: f32, keys: &MovementKeys, look_delta: (f32, f32)) {
        let idle = MovementKeys::default();
        let (dx, dy) = look_delta;
        match self.mode {
            ControlMode::Foot => {
                self.foot.apply_look(dx, dy);
                self.foot.update(dt, keys);
                self.vehicle.update(dt, &idle);
            }
            ControlMode::Vehicle => {
                self.vehicle.apply_look(dx, dy);
                self.vehicle.update(dt, keys);
                self.foot.update(dt, &idle);
            }
        }
    }
}

impl ControlArbiter<FootController, VehicleHelm> {
    /// Viewpoint of whichever camera is live.
    pub fn view(&self) -> ViewFrame {
        match self.mode {
            ControlMode::Foot => ViewFrame::capture(&self.foot.camera),
            ControlMode::Vehicle => ViewFrame::capture(&self.vehicle.look),
        }
    }
}
