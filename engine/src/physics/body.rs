//! Rigid body record for carriable objects.
//!
//! The simulation that integrates these bodies lives outside this crate;
//! here we only keep the flags the interaction systems override and the
//! velocities they write.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifies which grab controller currently owns a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct HolderId(pub u32);

/// Axis freeze flags (position then rotation, one bit per axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(pub u8);

impl Constraints {
    pub const NONE: Constraints = Constraints(0);
    pub const FREEZE_POSITION_X: Constraints = Constraints(1 << 0);
    pub const FREEZE_POSITION_Y: Constraints = Constraints(1 << 1);
    pub const FREEZE_POSITION_Z: Constraints = Constraints(1 << 2);
    pub const FREEZE_ROTATION_X: Constraints = Constraints(1 << 3);
    pub const FREEZE_ROTATION_Y: Constraints = Constraints(1 << 4);
    pub const FREEZE_ROTATION_Z: Constraints = Constraints(1 << 5);
    pub const FREEZE_POSITION: Constraints = Constraints(0b000_111);
    pub const FREEZE_ROTATION: Constraints = Constraints(0b111_000);
    pub const FREEZE_ALL: Constraints = Constraints(0b111_111);

    #[inline]
    pub fn contains(self, other: Constraints) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Constraints {
    type Output = Constraints;

    fn bitor(self, rhs: Self) -> Self::Output {
        Constraints(self.0 | rhs.0)
    }
}

/// The physics-mutable flags a grab overrides and later restores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyFlags {
    pub use_gravity: bool,
    pub is_kinematic: bool,
    pub linear_drag: f32,
    pub angular_drag: f32,
    #[serde(default)]
    pub constraints: Constraints,
}

impl Default for BodyFlags {
    fn default() -> Self {
        Self {
            use_gravity: true,
            is_kinematic: false,
            linear_drag: 0.0,
            angular_drag: 0.05,
            constraints: Constraints::NONE,
        }
    }
}

impl BodyFlags {
    /// Flags for a floating dynamic body (non-kinematic, no gravity).
    pub fn floating() -> Self {
        Self {
            use_gravity: false,
            ..Self::default()
        }
    }

    /// Configuration forced onto a body while it is pulled or held.
    pub fn held(linear_drag: f32, angular_drag: f32, constraints: Constraints) -> Self {
        Self {
            use_gravity: false,
            is_kinematic: true,
            linear_drag,
            angular_drag,
            constraints,
        }
    }
}

/// Physics body of a carriable object.
#[derive(Debug, Clone, PartialEq)]
pub struct CarriableBody {
    pub flags: BodyFlags,
    /// Linear velocity (meters/second)
    pub linear_velocity: Vec3,
    /// Angular velocity (radians/second)
    pub angular_velocity: Vec3,
    holder: Option<HolderId>,
}

impl Default for CarriableBody {
    fn default() -> Self {
        Self::new(BodyFlags::default())
    }
}

impl CarriableBody {
    pub fn new(flags: BodyFlags) -> Self {
        Self {
            flags,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            holder: None,
        }
    }

    pub fn is_kinematic(&self) -> bool {
        self.flags.is_kinematic
    }

    /// Controller currently holding this body, if any.
    pub fn holder(&self) -> Option<HolderId> {
        self.holder
    }

    /// Claim the body for `holder`. Fails if another holder owns it.
    pub fn claim(&mut self, holder: HolderId) -> bool {
        match self.holder {
            Some(current) if current != holder => false,
            _ => {
                self.holder = Some(holder);
                true
            }
        }
    }

    /// Release the claim if `holder` owns it.
    pub fn unclaim(&mut self, holder: HolderId) {
        if self.holder == Some(holder) {
            self.holder = None;
        }
    }
}
