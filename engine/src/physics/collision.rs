//! Collision detection module
//!
//! Ray queries against box colliders. Colliders are axis-aligned boxes in
//! their owner's local space; world bounds ignore rotation and use the
//! owner's world position and scale, which is the approximation the scene
//! raycast works with.
//!
//! # Ray-AABB Intersection
//!
//! The slab method is used for ray-AABB intersection, which finds the
//! intersection points by computing entry and exit times for each axis.
//!
//! # Example
//!
//! ```ignore
//! use skiff_engine::physics::collision::ray_aabb_intersect;
//! use glam::Vec3;
//!
//! let origin = Vec3::new(0.0, 0.0, -5.0);
//! let direction = Vec3::new(0.0, 0.0, 1.0);
//! let aabb_min = Vec3::new(-1.0, -1.0, -1.0);
//! let aabb_max = Vec3::new(1.0, 1.0, 1.0);
//!
//! if let Some(t) = ray_aabb_intersect(origin, direction, aabb_min, aabb_max) {
//!     let hit_point = origin + direction * t;
//! }
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::types::{EntityId, LayerMask};

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Result of a successful scene raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entity owning the collider that was hit
    pub entity: EntityId,
    /// Index of the collider on that entity
    pub collider_index: usize,
    /// World-space position where the collision occurred
    pub point: Vec3,
    /// Surface normal at the hit point (normalized)
    pub normal: Vec3,
    /// Distance from ray origin to hit point
    pub distance: f32,
}

/// Box collider attached to a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Box center in the owner's local space
    #[serde(default)]
    pub center: Vec3,
    /// Half size of the box in the owner's local space
    pub half_extents: Vec3,
    /// Disabled colliders are invisible to queries
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Trigger volumes are skipped by raycasts
    #[serde(default)]
    pub is_trigger: bool,
}

fn default_true() -> bool {
    true
}

impl Collider {
    pub fn cube(half_size: f32) -> Self {
        Self::with_half_extents(Vec3::splat(half_size))
    }

    pub fn with_half_extents(half_extents: Vec3) -> Self {
        Self {
            center: Vec3::ZERO,
            half_extents,
            enabled: true,
            is_trigger: false,
        }
    }

    pub fn at(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    pub fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// World-space bounds given the owner's world position and scale.
    pub fn world_bounds(&self, world_center: Vec3, world_scale: Vec3) -> (Vec3, Vec3) {
        let half = self.half_extents * world_scale.abs();
        (world_center - half, world_center + half)
    }
}

/// Read-only raycast seam between interaction systems and the world.
///
/// The scene implements it; tests may stand in their own geometry.
pub trait RaycastQuery {
    /// Nearest hit along `ray` within `max_distance` on any layer in `mask`.
    /// Triggers, disabled colliders and inactive objects are ignored.
    fn raycast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit>;
}

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// The slab method works by finding the intersection of the ray with each pair of
/// axis-aligned planes that make up the AABB. If the ray enters and exits the AABB
/// at valid times (t_enter < t_exit and t_exit > 0), there is an intersection.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero direction components become huge inverse values
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (aabb_max.x - ray_origin.x) * inv_dir.x;

    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (aabb_max.y - ray_origin.y) * inv_dir.y;

    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (aabb_max.z - ray_origin.z) * inv_dir.z;

    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Computes the surface normal for a point on an AABB surface.
///
/// Determines which face of the AABB the point is on and returns the outward normal.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let local = point - center;

    let normalized = local / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.x && abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_aabb_from_front() {
        let t = ray_aabb_intersect(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let t = ray_aabb_intersect(
            Vec3::new(5.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_ray_starts_inside_aabb() {
        let t = ray_aabb_intersect(Vec3::ZERO, Vec3::X, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!((t.unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_aabb_behind_origin() {
        let t = ray_aabb_intersect(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_surface_normal_faces() {
        let min = Vec3::splat(-1.0);
        let max = Vec3::splat(1.0);
        assert_eq!(aabb_surface_normal(Vec3::new(1.0, 0.2, 0.1), min, max), Vec3::X);
        assert_eq!(aabb_surface_normal(Vec3::new(0.1, -1.0, 0.3), min, max), -Vec3::Y);
    }

    #[test]
    fn test_collider_world_bounds_follow_scale() {
        let collider = Collider::cube(0.5);
        let (min, max) = collider.world_bounds(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(2.0));
        assert_eq!(min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(ray.direction, -Vec3::Z);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }
}
