//! Player Session
//!
//! `PlayerRig` holds one player's interaction systems together and runs
//! them in a fixed order each frame:
//!
//! 1. Interact (control mode switch)
//! 2. Movement and look for the active controller
//! 3. Use (placement before grab)
//! 4. Throw
//! 5. Fire
//! 6. Hold follow / pull advance
//! 7. Projectiles
//!
//! Release and throw requests are therefore always resolved before the
//! body is moved toward the hand in the same frame.

use thiserror::Error;
use tracing::{debug, warn};

use crate::camera::{FpsCamera, ViewFrame};
use crate::game::config::{ConfigError, InteractionConfig};
use crate::game::scene::Scene;
use crate::game::subject::ArchetypeLibrary;
use crate::game::systems::{
    ControlArbiter, ControlMode, FireError, GrabController, GrabError, PlatformSystem,
    ProjectileEvent, ProjectileSystem, UseOutcome, fire_mounted,
};
use crate::input::{FrameInput, InputAction};
use crate::physics::{EntityId, HolderId, Transform};
use crate::player::{FootController, VehicleHelm, VehiclePlatform};

/// A collaborator the rig cannot run without was not provided.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no foot controller provided")]
    MissingFootController,
    #[error("no vehicle helm provided")]
    MissingVehicleHelm,
    #[error("no subject archetypes provided")]
    MissingArchetypes,
    #[error("invalid interaction config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// What the rig did during one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub control_switch: Option<ControlMode>,
    pub used: Option<UseOutcome>,
    pub thrown: Option<Result<EntityId, GrabError>>,
    pub fired: Option<Result<(), FireError>>,
    pub projectile_events: Vec<ProjectileEvent>,
}

/// One player's grab, platform, control and combat systems.
#[derive(Debug)]
pub struct PlayerRig {
    // === Interaction ===
    pub grab: GrabController,
    pub platforms: PlatformSystem,

    // === Control ===
    pub control: ControlArbiter<FootController, VehicleHelm>,
    /// Scene object mirroring the vehicle platform pose
    pub vehicle_entity: Option<EntityId>,

    // === Combat ===
    /// Scene object carrying the mounted shooter
    pub gun_entity: Option<EntityId>,
    pub projectiles: ProjectileSystem,
}

impl PlayerRig {
    pub fn builder() -> PlayerRigBuilder {
        PlayerRigBuilder::default()
    }

    /// Current viewpoint of the live camera.
    pub fn view(&self) -> ViewFrame {
        self.control.view()
    }

    /// Run one frame of interaction against `scene`.
    pub fn update(&mut self, scene: &mut Scene, input: &FrameInput, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();

        if input.just_pressed(InputAction::Interact) {
            let view = self.view();
            report.control_switch = self.control.handle_interact(scene, &view);
            if report.control_switch == Some(ControlMode::Vehicle) {
                self.control.vehicle_mut().look.align_with(&view);
            }
        }

        self.control.update(dt, &input.movement, input.look_delta);
        self.sync_vehicle_entity(scene);
        let view = self.view();

        if input.just_pressed(InputAction::Use) {
            report.used = Some(self.grab.handle_use(scene, &self.platforms, &view));
        }

        if input.just_pressed(InputAction::Throw) {
            report.thrown = Some(self.grab.request_throw(scene, &view));
        }

        if input.just_pressed(InputAction::Fire) {
            report.fired = Some(self.fire(scene, &view));
        }

        self.grab.tick(scene, &view, dt);
        report.projectile_events = self.projectiles.update(scene, dt);
        report
    }

    fn fire(&mut self, scene: &Scene, view: &ViewFrame) -> Result<(), FireError> {
        let gun = self.gun_entity.ok_or(FireError::NoShooter)?;
        let projectile = fire_mounted(scene, gun, view, self.control.is_vehicle_active())
            .inspect_err(|err| debug!(%err, "shot refused"))?;
        self.projectiles.fire(projectile);
        Ok(())
    }

    fn sync_vehicle_entity(&mut self, scene: &mut Scene) {
        let Some(entity) = self.vehicle_entity else {
            return;
        };
        let pose = self.control.vehicle().platform.transform;
        if !scene.set_world_transform(entity, pose) {
            warn!(?entity, "vehicle entity disappeared; no longer synced");
            self.vehicle_entity = None;
        }
    }
}

/// Explicit wiring for [`PlayerRig`]. Every required collaborator must be
/// provided before [`build`](Self::build).
#[derive(Debug, Default)]
pub struct PlayerRigBuilder {
    config: InteractionConfig,
    holder: HolderId,
    foot: Option<FootController>,
    helm: Option<VehicleHelm>,
    archetypes: Option<ArchetypeLibrary>,
    vehicle_entity: Option<EntityId>,
    gun_entity: Option<EntityId>,
}

impl PlayerRigBuilder {
    pub fn config(mut self, config: InteractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn holder(mut self, holder: HolderId) -> Self {
        self.holder = holder;
        self
    }

    pub fn foot(mut self, foot: FootController) -> Self {
        self.foot = Some(foot);
        self
    }

    /// Foot controller looking through a fresh camera at `camera`.
    pub fn foot_camera(self, camera: FpsCamera) -> Self {
        self.foot(FootController::new(camera))
    }

    pub fn helm(mut self, helm: VehicleHelm) -> Self {
        self.helm = Some(helm);
        self
    }

    /// Helm for a platform at `pose`, tuned from the control config.
    pub fn vehicle_at(self, pose: Transform) -> Self {
        let control = self.config.control;
        let platform = VehiclePlatform::new(control.vehicle, pose);
        self.helm(VehicleHelm::new(platform, control.look))
    }

    pub fn archetypes(mut self, archetypes: ArchetypeLibrary) -> Self {
        self.archetypes = Some(archetypes);
        self
    }

    pub fn vehicle_entity(mut self, entity: EntityId) -> Self {
        self.vehicle_entity = Some(entity);
        self
    }

    pub fn gun_entity(mut self, entity: EntityId) -> Self {
        self.gun_entity = Some(entity);
        self
    }

    pub fn build(self) -> Result<PlayerRig, SetupError> {
        self.config.validate()?;
        let foot = self.foot.ok_or(SetupError::MissingFootController)?;
        let helm = self.helm.ok_or(SetupError::MissingVehicleHelm)?;
        let archetypes = self.archetypes.ok_or(SetupError::MissingArchetypes)?;

        Ok(PlayerRig {
            grab: GrabController::new(self.holder, &self.config),
            platforms: PlatformSystem::new(archetypes, self.config.layers.grab),
            control: ControlArbiter::new(foot, helm, &self.config),
            vehicle_entity: self.vehicle_entity,
            gun_entity: self.gun_entity,
            projectiles: ProjectileSystem::new(),
        })
    }
}
