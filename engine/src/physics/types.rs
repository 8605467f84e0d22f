//! Physics type re-exports from glam plus the small value types shared
//! by the scene and the interaction systems.

pub use glam::{Quat, Vec3};

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

/// Number of collision layers. A [`LayerMask`] is one bit per layer.
pub const LAYER_COUNT: u8 = 32;

const_assert!(LAYER_COUNT as u32 <= u32::BITS);

/// Handle of a scene object. Ids are never reused, so a handle to a
/// despawned object stays detectably stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Pose of an object relative to its parent (or the world for roots).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local -Z axis in parent space.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transform a point from this transform's local space into its parent space.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }

    /// Compose `self` (parent) with `child` (expressed in parent space).
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// Express a world-space transform relative to `self`.
    ///
    /// Inverse of [`Transform::mul_transform`] for non-zero scale.
    pub fn relative(&self, world: &Transform) -> Transform {
        let inv_rot = self.rotation.inverse();
        let safe_scale = self.scale.map(|s| if s.abs() < 1e-6 { 1.0 } else { s });
        Transform {
            position: (inv_rot * (world.position - self.position)) / safe_scale,
            rotation: (inv_rot * world.rotation).normalize(),
            scale: world.scale / safe_scale,
        }
    }
}

/// A single collision layer index (0..32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Layer(pub u8);

impl Layer {
    pub const DEFAULT: Layer = Layer(0);

    /// Bit for this layer; out-of-range indices map to an empty mask.
    #[inline]
    pub fn bit(self) -> u32 {
        if self.0 < LAYER_COUNT { 1u32 << self.0 } else { 0 }
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Bit set of collision layers used to filter raycasts and projectile hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub fn from_layers(layers: &[Layer]) -> Self {
        LayerMask(layers.iter().fold(0, |acc, l| acc | l.bit()))
    }

    #[inline]
    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    pub fn with(self, layer: Layer) -> Self {
        LayerMask(self.0 | layer.bit())
    }

    pub fn without(self, layer: Layer) -> Self {
        LayerMask(self.0 & !layer.bit())
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        LayerMask(layer.bit())
    }
}
