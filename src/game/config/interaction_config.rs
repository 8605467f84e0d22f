//! Interaction Configuration
//!
//! Every tunable of the grab, placement and control systems in one place.
//! All sections deserialize with `#[serde(default)]`, so a JSON file only
//! needs the fields it wants to override:
//!
//! ```json
//! { "grab": { "max_grab_distance": 10.0 }, "layers": { "platform": 9 } }
//! ```

use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::LookTuning;
use crate::game::systems::pull_task::Ease;
use crate::physics::{Constraints, LAYER_COUNT, Layer, LayerMask};
use crate::player::VehicleTuning;

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{field} layer {layer} is outside 0..{max}")]
    InvalidLayer {
        field: &'static str,
        layer: u8,
        max: u8,
    },
}

/// Pose of the hand relative to the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandAnchor {
    /// Offset along the view right, up and forward axes (meters)
    pub offset: Vec3,
    /// Rotation applied on top of the view orientation
    pub rotation: Quat,
}

impl Default for HandAnchor {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.35, -0.3, 0.6),
            rotation: Quat::IDENTITY,
        }
    }
}

/// Grab, hold and throw tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Grab raycast range (meters)
    pub max_grab_distance: f32,
    /// Distance in front of the viewpoint a body is held at without a hand
    pub hold_distance: f32,
    /// Pull interpolation length (seconds)
    pub pull_duration: f32,
    pub pull_ease: Ease,
    /// Interpolate rotation toward the hold orientation while pulling
    pub align_rotation_on_attach: bool,
    /// Throw speed along the view forward (meters/second)
    pub throw_force: f32,
    /// Extra throw speed along world up (meters/second)
    pub throw_upward_force: f32,
    pub held_drag: f32,
    pub held_angular_drag: f32,
    /// Constraints applied while pulled or held
    pub held_constraints: Constraints,
    /// Desired follow velocity per meter of offset
    pub follow_gain: f32,
    /// Blend factor from current toward desired follow velocity per tick
    pub follow_blend: f32,
    /// Layers the grab raycast considers
    pub grab_mask: LayerMask,
    /// Fixed hand pose. Without one, bodies follow a point at `hold_distance`.
    pub hand: Option<HandAnchor>,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            max_grab_distance: 8.0,
            hold_distance: 3.0,
            pull_duration: 0.25,
            pull_ease: Ease::OutCubic,
            align_rotation_on_attach: true,
            throw_force: 15.0,
            throw_upward_force: 5.0,
            held_drag: 10.0,
            held_angular_drag: 10.0,
            held_constraints: Constraints::NONE,
            follow_gain: 12.0,
            follow_blend: 0.5,
            grab_mask: LayerMask::ALL,
            hand: None,
        }
    }
}

/// Platform detection tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Platform raycast range (meters)
    pub detection_distance: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            detection_distance: 5.0,
        }
    }
}

/// Control arbitration and vehicle tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Steering device raycast range (meters)
    pub steering_detection_distance: f32,
    pub vehicle: VehicleTuning,
    pub look: LookTuning,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            steering_detection_distance: 2.0,
            vehicle: VehicleTuning::default(),
            look: LookTuning::default(),
        }
    }
}

/// Collision layer assignments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Layer carried clones are moved onto
    pub grab: Layer,
    pub platform: Layer,
    pub steering: Layer,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            grab: Layer(6),
            platform: Layer(7),
            steering: Layer(8),
        }
    }
}

/// Root configuration for the interaction core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub grab: GrabConfig,
    pub placement: PlacementConfig,
    pub control: ControlConfig,
    pub layers: LayerConfig,
}

impl InteractionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("grab.max_grab_distance", self.grab.max_grab_distance)?;
        positive("grab.hold_distance", self.grab.hold_distance)?;
        positive("placement.detection_distance", self.placement.detection_distance)?;
        positive(
            "control.steering_detection_distance",
            self.control.steering_detection_distance,
        )?;
        in_range("grab.pull_duration", self.grab.pull_duration, 0.0, f32::MAX)?;
        in_range("grab.follow_blend", self.grab.follow_blend, 0.0, 1.0)?;
        in_range("grab.follow_gain", self.grab.follow_gain, 0.0, f32::MAX)?;
        in_range("grab.held_drag", self.grab.held_drag, 0.0, f32::MAX)?;
        in_range("grab.held_angular_drag", self.grab.held_angular_drag, 0.0, f32::MAX)?;
        in_range("control.vehicle.inertia", self.control.vehicle.inertia, 0.0, 1.0)?;
        in_range(
            "control.look.max_look_angle",
            self.control.look.max_look_angle,
            0.0,
            90.0,
        )?;
        layer("layers.grab", self.layers.grab)?;
        layer("layers.platform", self.layers.platform)?;
        layer("layers.steering", self.layers.steering)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn layer(field: &'static str, layer: Layer) -> Result<(), ConfigError> {
    if layer.0 < LAYER_COUNT {
        Ok(())
    } else {
        Err(ConfigError::InvalidLayer {
            field,
            layer: layer.0,
            max: LAYER_COUNT,
        })
    }
}
