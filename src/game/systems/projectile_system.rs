//! Projectile lifecycle management system.
//!
//! Owns the active projectiles, advances them each frame, sweeps the scene
//! along each step for hits on the projectile's hit mask and applies damage
//! to the subject that was struck.

use glam::Vec3;
use tracing::{debug, info};

use crate::game::scene::Scene;
use crate::game::subject::DamageOutcome;
use crate::physics::{EntityId, Projectile, ProjectileState, Ray, RaycastQuery};

/// Something that happened to a projectile during [`ProjectileSystem::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileEvent {
    /// Struck a collider and was removed
    Hit {
        entity: EntityId,
        position: Vec3,
        normal: Vec3,
        /// Object whose subject took the damage, if any
        subject: Option<EntityId>,
        damage: Option<DamageOutcome>,
    },
    /// Lifetime ran out
    Expired { position: Vec3 },
}

/// Manages the full lifecycle of fired projectiles.
#[derive(Debug, Clone)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
    /// Maximum number of simultaneously active projectiles.
    pub max_projectiles: usize,
}

impl Default for ProjectileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self {
            projectiles: Vec::new(),
            max_projectiles: 32,
        }
    }

    /// Add a projectile configured by a shooter.
    ///
    /// Returns `true` if the projectile was added.
    pub fn fire(&mut self, projectile: Projectile) -> bool {
        if self.projectiles.len() >= self.max_projectiles {
            debug!("projectile limit reached");
            return false;
        }
        self.projectiles.push(projectile);
        true
    }

    /// Advance every projectile by `dt`, resolving hits and expiry.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) -> Vec<ProjectileEvent> {
        let mut events = Vec::new();
        let mut i = 0;
        while i < self.projectiles.len() {
            let projectile = &mut self.projectiles[i];
            let prev_pos = projectile.position;
            let state = projectile.integrate(dt);
            let step = projectile.position - prev_pos;
            let mask = projectile.hit_mask;
            let damage = projectile.damage;

            let hit = if step.length_squared() > 0.0 {
                scene.raycast(Ray::new(prev_pos, step), step.length(), mask)
            } else {
                None
            };

            match (hit, state) {
                (Some(hit), _) => {
                    let subject = scene.find_in_ancestors(hit.entity, |o| o.subject.is_some());
                    let outcome = subject.and_then(|s| scene.apply_damage(s, damage));
                    info!(entity = ?hit.entity, ?subject, ?outcome, "projectile hit");
                    events.push(ProjectileEvent::Hit {
                        entity: hit.entity,
                        position: hit.point,
                        normal: hit.normal,
                        subject,
                        damage: outcome,
                    });
                    self.projectiles.swap_remove(i);
                }
                (None, ProjectileState::Expired) => {
                    events.push(ProjectileEvent::Expired { position: prev_pos + step });
                    self.projectiles.swap_remove(i);
                }
                (None, _) => i += 1,
            }
        }
        events
    }

    /// Remove all projectiles.
    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    /// Number of currently active projectiles.
    pub fn active_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }
}
