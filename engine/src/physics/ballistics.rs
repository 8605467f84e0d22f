//! Straight-flight projectiles for the combat collaborators.
//!
//! A projectile is configured by its shooter (damage, hit layers, flight
//! parameters) and then propels itself toward a target point until its
//! lifetime runs out. Collision sweeps happen in the projectile system,
//! which owns the scene access.
//!
//! # Example
//!
//! ```ignore
//! use skiff_engine::physics::ballistics::{FlightParams, Projectile};
//! use skiff_engine::physics::LayerMask;
//! use glam::Vec3;
//!
//! let flight = FlightParams { speed: 20.0, max_lifetime: 5.0, target: Vec3::new(0.0, 0.0, -40.0) };
//! let mut projectile = Projectile::spawn(Vec3::ZERO, flight, 3.0, LayerMask::ALL);
//! let state = projectile.integrate(1.0 / 60.0);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::types::LayerMask;

/// Flight parameters handed over by the shooter at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightParams {
    /// Travel speed (meters/second)
    pub speed: f32,
    /// Seconds before the projectile self-destructs
    pub max_lifetime: f32,
    /// World point the projectile flies toward
    pub target: Vec3,
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    /// Current position in world space (meters)
    pub position: Vec3,
    /// Current velocity vector (meters/second)
    pub velocity: Vec3,
    /// Point the shooter aimed at
    pub target: Vec3,
    /// Damage applied to a subject on hit
    pub damage: f32,
    /// Layers this projectile is allowed to hit
    pub hit_mask: LayerMask,
    /// Remaining lifetime in seconds
    pub lifetime_remaining: f32,
    /// Whether the projectile is still being simulated
    pub active: bool,
    /// Total distance traveled since spawn (meters)
    pub distance_traveled: f32,
}

impl Projectile {
    /// Spawn a projectile heading from `position` toward `flight.target`.
    ///
    /// A target equal to the spawn point leaves the projectile at rest; it
    /// still expires after its lifetime.
    pub fn spawn(position: Vec3, flight: FlightParams, damage: f32, hit_mask: LayerMask) -> Self {
        let direction = (flight.target - position).normalize_or_zero();
        Self {
            position,
            velocity: direction * flight.speed.max(0.0),
            target: flight.target,
            damage: damage.max(0.0),
            hit_mask,
            lifetime_remaining: flight.max_lifetime.max(0.0),
            active: true,
            distance_traveled: 0.0,
        }
    }

    /// Advance the projectile by `dt` seconds.
    ///
    /// Returns [`ProjectileState::Expired`] once the lifetime has run out,
    /// otherwise [`ProjectileState::Flying`].
    pub fn integrate(&mut self, dt: f32) -> ProjectileState {
        if !self.active {
            return ProjectileState::Expired;
        }

        let displacement = self.velocity * dt;
        self.position += displacement;
        self.distance_traveled += displacement.length();

        self.lifetime_remaining -= dt;
        if self.lifetime_remaining <= 0.0 {
            self.active = false;
            return ProjectileState::Expired;
        }

        ProjectileState::Flying
    }
}

/// The current state of a projectile in the simulation.
#[derive(Debug, Clone, Copy, Default)]
pub enum ProjectileState {
    /// Projectile is still flying through the air
    #[default]
    Flying,
    /// Projectile has hit something
    Hit {
        /// Position where the hit occurred (meters)
        position: Vec3,
        /// Surface normal at the hit point (normalized)
        normal: Vec3,
    },
    /// Projectile has exceeded its lifetime
    Expired,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(target: Vec3) -> FlightParams {
        FlightParams {
            speed: 10.0,
            max_lifetime: 1.0,
            target,
        }
    }

    #[test]
    fn test_projectile_state_default() {
        let state = ProjectileState::default();
        assert!(matches!(state, ProjectileState::Flying));
    }

    #[test]
    fn test_projectile_spawn_aims_at_target() {
        let p = Projectile::spawn(Vec3::ZERO, flight(Vec3::new(0.0, 0.0, -20.0)), 3.0, LayerMask::ALL);
        assert!(p.active);
        assert!((p.velocity - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-5);
        assert_eq!(p.damage, 3.0);
    }

    #[test]
    fn test_negative_damage_is_clamped() {
        let p = Projectile::spawn(Vec3::ZERO, flight(Vec3::X), -2.0, LayerMask::ALL);
        assert_eq!(p.damage, 0.0);
    }

    #[test]
    fn test_projectile_expires_after_lifetime() {
        let mut p = Projectile::spawn(Vec3::ZERO, flight(Vec3::new(100.0, 0.0, 0.0)), 1.0, LayerMask::ALL);

        let dt = 0.1;
        let mut expired_at = None;
        for i in 0..20 {
            if matches!(p.integrate(dt), ProjectileState::Expired) {
                expired_at = Some(i);
                break;
            }
        }

        // 1 second of flight at 0.1s steps
        let frame = expired_at.expect("projectile should expire");
        assert!((9..=10).contains(&frame), "expired at frame {}", frame);
        assert!(!p.active);
        assert!((p.distance_traveled - 10.0).abs() < 1.01);
    }

    #[test]
    fn test_inactive_projectile_stays_expired() {
        let mut p = Projectile::spawn(Vec3::ZERO, flight(Vec3::X), 1.0, LayerMask::ALL);
        p.active = false;
        let before = p.position;
        assert!(matches!(p.integrate(0.1), ProjectileState::Expired));
        assert_eq!(p.position, before);
    }
}
