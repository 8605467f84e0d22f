//! Physics module
//!
//! The interaction core does not simulate rigid bodies itself; an external
//! simulation integrates them. This module holds the data the core reads
//! and overrides, and the ray queries it issues.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! # Submodules
//!
//! - [`types`] - Math types re-exported from glam, `Transform`, collision layers
//! - [`collision`] - Rays, box colliders, ray-AABB tests and the `RaycastQuery` seam
//! - [`body`] - Carriable body flags, constraints and holder claims
//! - [`ballistics`] - Straight-flight projectiles with lifetime

pub mod ballistics;
pub mod body;
pub mod collision;
pub mod types;

pub use ballistics::{FlightParams, Projectile, ProjectileState};
pub use body::{BodyFlags, CarriableBody, Constraints, HolderId};
pub use collision::{
    Collider, Ray, RayHit, RaycastQuery, aabb_surface_normal, ray_aabb_intersect,
};
pub use types::{EntityId, LAYER_COUNT, Layer, LayerMask, Quat, Transform, Vec3};
