//! Mounted shooter.
//!
//! A gun mounted on a scene object (typically the vehicle) fires only while
//! the player is at the helm. It aims where the view ray lands, or at the
//! far end of its range when the ray hits nothing, and refuses targets
//! outside a horizontal arc around the gun's forward axis.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::camera::{Viewpoint, view_ray};
use crate::game::scene::Scene;
use crate::physics::{EntityId, FlightParams, LayerMask, Projectile, RaycastQuery, Transform};

/// Weapon parameters carried by a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    /// Projectile speed (meters/second)
    pub bullet_speed: f32,
    /// Aim raycast range (meters)
    pub max_distance: f32,
    /// Projectile lifetime (seconds)
    pub max_lifetime: f32,
    pub damage: f32,
    /// Layers fired projectiles may hit
    pub hit_mask: LayerMask,
    /// Half-width of the firing arc (degrees)
    pub max_horizontal_angle: f32,
    pub use_angle_restrictions: bool,
    /// Projectile spawn point in the gun's local space
    pub muzzle_offset: Vec3,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            bullet_speed: 20.0,
            max_distance: 100.0,
            max_lifetime: 5.0,
            damage: 3.0,
            hit_mask: LayerMask::ALL,
            max_horizontal_angle: 45.0,
            use_angle_restrictions: true,
            muzzle_offset: Vec3::ZERO,
        }
    }
}

/// Why a shot was not fired.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FireError {
    #[error("shooting requires vehicle control")]
    NotInVehicleMode,
    #[error("target is {angle:.1} degrees off the gun axis (limit {limit:.1})")]
    OutsideArc { angle: f32, limit: f32 },
    #[error("entity has no shooter")]
    NoShooter,
    #[error("shooter entity no longer exists")]
    ShooterMissing,
}

/// Horizontal angle (degrees) between the gun forward and `target_dir`,
/// measured in the plane perpendicular to the gun's up axis.
pub fn horizontal_angle(gun: &Transform, target_dir: Vec3) -> f32 {
    let up = gun.up();
    let flat_forward = (gun.forward() - up * gun.forward().dot(up)).normalize_or_zero();
    let flat_target = (target_dir - up * target_dir.dot(up)).normalize_or_zero();
    if flat_forward == Vec3::ZERO || flat_target == Vec3::ZERO {
        return 0.0;
    }
    let sin = flat_forward.cross(flat_target).dot(up).abs();
    sin.atan2(flat_forward.dot(flat_target)).to_degrees()
}

impl ShooterConfig {
    /// Aim from `view` and build the projectile a gun at `gun` would fire.
    pub fn fire(
        &self,
        gun: &Transform,
        view: &impl Viewpoint,
        world: &impl RaycastQuery,
        vehicle_active: bool,
    ) -> Result<Projectile, FireError> {
        if !vehicle_active {
            return Err(FireError::NotInVehicleMode);
        }

        let ray = view_ray(view);
        let target = world
            .raycast(ray, self.max_distance, LayerMask::ALL)
            .map(|hit| hit.point)
            .unwrap_or_else(|| ray.at(self.max_distance));

        let spawn = gun.transform_point(self.muzzle_offset);
        let direction = (target - spawn).normalize_or_zero();

        if self.use_angle_restrictions {
            let angle = horizontal_angle(gun, direction);
            if angle > self.max_horizontal_angle {
                debug!(angle, limit = self.max_horizontal_angle, "target outside firing arc");
                return Err(FireError::OutsideArc {
                    angle,
                    limit: self.max_horizontal_angle,
                });
            }
        }

        let flight = FlightParams {
            speed: self.bullet_speed,
            max_lifetime: self.max_lifetime,
            target,
        };
        Ok(Projectile::spawn(spawn, flight, self.damage, self.hit_mask))
    }
}

/// Fire the shooter mounted on `gun_entity`.
pub fn fire_mounted(
    scene: &Scene,
    gun_entity: EntityId,
    view: &impl Viewpoint,
    vehicle_active: bool,
) -> Result<Projectile, FireError> {
    let object = scene.get(gun_entity).ok_or(FireError::ShooterMissing)?;
    let config = object.shooter.ok_or(FireError::NoShooter)?;
    let gun = scene
        .world_transform(gun_entity)
        .ok_or(FireError::ShooterMissing)?;
    config.fire(&gun, view, scene, vehicle_active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewFrame;
    use crate::game::scene::SceneObject;
    use crate::physics::Collider;
    use glam::Quat;

    #[test]
    fn test_refuses_outside_vehicle_mode() {
        let scene = Scene::new();
        let view = ViewFrame::new(Vec3::ZERO, -Vec3::Z);
        let result = ShooterConfig::default().fire(&Transform::IDENTITY, &view, &scene, false);
        assert_eq!(result.unwrap_err(), FireError::NotInVehicleMode);
    }

    #[test]
    fn test_aims_at_view_hit_point() {
        let mut scene = Scene::new();
        scene.spawn(
            SceneObject::new("target")
                .at(Vec3::new(0.0, 0.0, -10.0))
                .with_collider(Collider::cube(1.0)),
        );
        let view = ViewFrame::new(Vec3::ZERO, -Vec3::Z);
        let projectile = ShooterConfig::default()
            .fire(&Transform::IDENTITY, &view, &scene, true)
            .unwrap();
        assert!((projectile.target - Vec3::new(0.0, 0.0, -9.0)).length() < 1e-4);
        assert_eq!(projectile.damage, 3.0);
        assert!((projectile.velocity.length() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_aims_at_max_range_without_hit() {
        let scene = Scene::new();
        let view = ViewFrame::new(Vec3::ZERO, -Vec3::Z);
        let projectile = ShooterConfig::default()
            .fire(&Transform::IDENTITY, &view, &scene, true)
            .unwrap();
        assert!((projectile.target - Vec3::new(0.0, 0.0, -100.0)).length() < 1e-3);
    }

    #[test]
    fn test_rejects_target_outside_arc() {
        let scene = Scene::new();
        // Gun faces -Z; the view looks along +X
        let view = ViewFrame::new(Vec3::ZERO, Vec3::X);
        let err = ShooterConfig::default()
            .fire(&Transform::IDENTITY, &view, &scene, true)
            .unwrap_err();
        assert!(matches!(err, FireError::OutsideArc { angle, .. } if (angle - 90.0).abs() < 1e-3));

        let unrestricted = ShooterConfig {
            use_angle_restrictions: false,
            ..Default::default()
        };
        assert!(unrestricted.fire(&Transform::IDENTITY, &view, &scene, true).is_ok());
    }

    #[test]
    fn test_horizontal_angle_ignores_elevation() {
        let gun = Transform::IDENTITY;
        let up_and_ahead = Vec3::new(0.0, 1.0, -1.0).normalize();
        assert_eq!(horizontal_angle(&gun, up_and_ahead), 0.0);
        assert_eq!(horizontal_angle(&gun, Vec3::new(0.0, -0.3, -2.0)), 0.0);

        let turned = Transform::IDENTITY.with_rotation(Quat::from_rotation_y(30f32.to_radians()));
        assert!((horizontal_angle(&turned, -Vec3::Z) - 30.0).abs() < 1e-3);
        assert!((horizontal_angle(&gun, Vec3::Z) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_fire_mounted_requires_shooter() {
        let mut scene = Scene::new();
        let plain = scene.spawn(SceneObject::new("plain"));
        let view = ViewFrame::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(
            fire_mounted(&scene, plain, &view, true).unwrap_err(),
            FireError::NoShooter
        );
        assert_eq!(
            fire_mounted(&scene, EntityId(99), &view, true).unwrap_err(),
            FireError::ShooterMissing
        );

        let gun = scene.spawn(SceneObject::new("gun").with_shooter(ShooterConfig::default()));
        assert!(fire_mounted(&scene, gun, &view, true).is_ok());
    }
}
