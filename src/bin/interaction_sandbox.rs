//! Interaction Sandbox - headless scripted walkthrough
//!
//! Run with: `cargo run --bin interaction_sandbox [config.json]`
//!
//! Builds a small scene (a crate, three display platforms, a skiff with a
//! helm and a mounted gun, and a target) and drives one player through it
//! frame by frame:
//!
//! - grab, carry and throw the crate
//! - take a subject from a platform and put it back
//! - try to place on an occupied platform, then release
//! - try to take from an empty platform
//! - take the helm, sail forward, shoot the target, step off
//!
//! Set `RUST_LOG=debug` to also see rejected requests.

use std::process::ExitCode;

use glam::Vec3;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use skiff_engine::camera::{FpsCamera, ViewFrame};
use skiff_engine::game::config::{ConfigError, InteractionConfig};
use skiff_engine::game::systems::{ControlMode, ProjectileEvent, ShooterConfig};
use skiff_engine::game::{
    ArchetypeLibrary, FrameReport, PlayerRig, Scene, SceneObject, SetupError, Subject, SubjectType,
};
use skiff_engine::input::{FrameInput, InputAction, MovementKeys};
use skiff_engine::physics::{BodyFlags, CarriableBody, Collider, EntityId, Layer, LayerMask, Transform};

const FRAME_DT: f32 = 1.0 / 60.0;
const EYE: Vec3 = Vec3::new(0.0, 1.6, 0.0);

#[derive(Debug, Error)]
enum SandboxError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Entities the script aims at.
struct Landmarks {
    crate_body: EntityId,
    stocked: EntityId,
    occupied: EntityId,
    empty: EntityId,
    wheel: EntityId,
    target: EntityId,
}

struct Sandbox {
    scene: Scene,
    rig: PlayerRig,
    marks: Landmarks,
}

impl Sandbox {
    fn new(config: InteractionConfig, archetypes: ArchetypeLibrary) -> Result<Self, SandboxError> {
        let mut scene = Scene::new();
        let layers = config.layers;

        let crate_body = scene.spawn(
            SceneObject::new("crate")
                .at(Vec3::new(0.0, 1.0, -5.0))
                .on_layer(layers.grab)
                .with_collider(Collider::cube(0.5))
                .with_body(CarriableBody::new(BodyFlags::default())),
        );

        let mut platform = |name: &str, position: Vec3| {
            scene.spawn(
                SceneObject::new(name)
                    .at(position)
                    .on_layer(layers.platform)
                    .with_collider(Collider::with_half_extents(Vec3::new(0.5, 0.5, 0.5)))
                    .as_platform(),
            )
        };
        let stocked = platform("pedestal west", Vec3::new(3.0, 0.5, -3.0));
        let occupied = platform("pedestal east", Vec3::new(-3.0, 0.5, -3.0));
        let empty = platform("pedestal north", Vec3::new(-3.5, 0.5, 1.0));

        let skiff_pose = Transform::from_position(Vec3::new(0.0, 0.0, 2.0));
        let skiff = scene.spawn(SceneObject::new("skiff").with_transform(skiff_pose));
        let wheel = scene
            .spawn_child(
                skiff,
                SceneObject::new("helm wheel")
                    .at(Vec3::new(0.0, 1.2, -1.0))
                    .on_layer(layers.steering)
                    .with_collider(Collider::cube(0.2)),
            )
            .unwrap_or(skiff);
        let gun_config = ShooterConfig {
            hit_mask: LayerMask::ALL.without(layers.steering),
            ..Default::default()
        };
        let gun = scene
            .spawn_child(
                skiff,
                SceneObject::new("bow gun")
                    .at(Vec3::new(0.0, 1.0, 0.0))
                    .with_shooter(gun_config),
            )
            .unwrap_or(skiff);

        let target = scene.spawn(
            SceneObject::new("raider")
                .at(Vec3::new(6.0, 1.5, -18.0))
                .on_layer(Layer(3))
                .with_collider(Collider::cube(0.6))
                .with_subject(Subject::new(SubjectType::B, 5.0)),
        );

        let rig = PlayerRig::builder()
            .config(config)
            .foot_camera(FpsCamera::with_position(EYE))
            .vehicle_at(skiff_pose)
            .archetypes(archetypes)
            .vehicle_entity(skiff)
            .gun_entity(gun)
            .build()?;

        let mut sandbox = Self {
            scene,
            rig,
            marks: Landmarks {
                crate_body,
                stocked,
                occupied,
                empty,
                wheel,
                target,
            },
        };
        let stocked_shows = [(SubjectType::A, true), (SubjectType::B, false)];
        let occupied_shows = [(SubjectType::B, true), (SubjectType::A, false)];
        sandbox.stock(stocked, &stocked_shows);
        sandbox.stock(occupied, &occupied_shows);
        sandbox.stock(empty, &[(SubjectType::C, false)]);
        Ok(sandbox)
    }

    fn stock(&mut self, slot: EntityId, subjects: &[(SubjectType, bool)]) {
        let on_top = Transform::from_position(Vec3::new(0.0, 0.9, 0.0));
        for &(subject_type, active) in subjects {
            if let Err(err) = self.rig.platforms.spawn_display_subject(
                &mut self.scene,
                slot,
                subject_type,
                on_top,
                active,
            ) {
                warn!(%err, %subject_type, "could not stock platform");
            }
        }
    }

    fn position_of(&self, id: EntityId) -> Vec3 {
        self.scene
            .world_transform(id)
            .map(|t| t.position)
            .unwrap_or(Vec3::ZERO)
    }

    /// Turn whichever camera is live toward `target`.
    fn look_at(&mut self, target: Vec3) {
        match self.rig.control.mode() {
            ControlMode::Foot => self.rig.control.foot_mut().camera.look_at(target),
            ControlMode::Vehicle => {
                let eye = self.rig.control.vehicle().look.position;
                self.rig
                    .control
                    .vehicle_mut()
                    .look
                    .align_with(&ViewFrame::looking_at(eye, target));
            }
        }
    }

    fn step(&mut self, input: &FrameInput) -> FrameReport {
        let report = self.rig.update(&mut self.scene, input, FRAME_DT);
        for event in &report.projectile_events {
            match event {
                ProjectileEvent::Hit {
                    entity, damage, ..
                } => info!(?entity, ?damage, "projectile hit"),
                ProjectileEvent::Expired { position } => info!(?position, "projectile expired"),
            }
        }
        report
    }

    fn press(&mut self, action: InputAction) -> FrameReport {
        self.step(&FrameInput::with_action(action))
    }

    fn run_for(&mut self, seconds: f32, movement: MovementKeys) {
        let mut input = FrameInput::new();
        input.movement = movement;
        let frames = (seconds / FRAME_DT).ceil() as u32;
        for _ in 0..frames {
            self.step(&input);
        }
    }

    fn idle(&mut self, seconds: f32) {
        self.run_for(seconds, MovementKeys::default());
    }

    fn carry_and_throw(&mut self) {
        info!("--- carry and throw ---");
        self.look_at(self.position_of(self.marks.crate_body));
        let report = self.press(InputAction::Use);
        info!(used = ?report.used, state = ?self.rig.grab.state(), "use on crate");
        self.idle(0.4);
        info!(state = ?self.rig.grab.state(), at = ?self.position_of(self.marks.crate_body), "after pull");

        self.look_at(Vec3::new(0.0, 3.0, -10.0));
        self.idle(0.5);
        let report = self.press(InputAction::Throw);
        info!(thrown = ?report.thrown, "throw");
        if let Some(body) = self.scene.body(self.marks.crate_body) {
            info!(velocity = ?body.linear_velocity, gravity = body.flags.use_gravity, "crate in flight");
        }
    }

    fn platform_round_trip(&mut self) {
        info!("--- take from platform and put back ---");
        self.look_at(self.position_of(self.marks.stocked));
        let report = self.press(InputAction::Use);
        info!(used = ?report.used, item = %self.rig.grab.item_in_hand(), "use on stocked platform");
        self.idle(0.4);

        let report = self.press(InputAction::Use);
        info!(used = ?report.used, state = ?self.rig.grab.state(), "use on stocked platform again");
    }

    fn occupied_and_empty(&mut self) {
        info!("--- occupied platform ---");
        self.look_at(self.position_of(self.marks.stocked));
        self.press(InputAction::Use);
        self.idle(0.4);

        self.look_at(self.position_of(self.marks.occupied));
        let report = self.press(InputAction::Use);
        info!(used = ?report.used, item = %self.rig.grab.item_in_hand(), "use on occupied platform");

        self.look_at(Vec3::new(0.0, 6.0, -2.0));
        let report = self.press(InputAction::Use);
        info!(used = ?report.used, "use at the sky");

        info!("--- empty platform ---");
        self.look_at(self.position_of(self.marks.empty));
        let report = self.press(InputAction::Use);
        info!(used = ?report.used, state = ?self.rig.grab.state(), "use on empty platform");
    }

    fn helm_and_gun(&mut self) {
        info!("--- helm ---");
        let report = self.press(InputAction::Fire);
        info!(fired = ?report.fired, "fire on foot");

        self.look_at(self.position_of(self.marks.wheel));
        let report = self.press(InputAction::Interact);
        info!(switch = ?report.control_switch, "interact at the wheel");

        let ahead = MovementKeys {
            forward: true,
            ..Default::default()
        };
        self.run_for(1.0, ahead);
        info!(
            skiff = ?self.rig.control.vehicle().platform.transform.position,
            speed = self.rig.control.vehicle().platform.velocity().length(),
            "under way"
        );

        let target = self.position_of(self.marks.target);
        for _ in 0..3 {
            self.look_at(target);
            let report = self.press(InputAction::Fire);
            info!(fired = ?report.fired, "fire at raider");
            self.idle(1.5);
        }
        let raider_up = self
            .scene
            .get(self.marks.target)
            .is_some_and(|o| o.active);
        info!(raider_up, "after volley");

        self.look_at(Vec3::new(0.0, 1.7, 40.0));
        let report = self.press(InputAction::Fire);
        info!(fired = ?report.fired, "fire astern");

        let report = self.press(InputAction::Interact);
        info!(switch = ?report.control_switch, "interact while steering");
    }
}

fn run() -> Result<(), SandboxError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading interaction config");
            InteractionConfig::load(path)?
        }
        None => InteractionConfig::default(),
    };
    let archetypes = ArchetypeLibrary::from_json_str(include_str!("../../data/archetypes.json"))?;
    info!(count = archetypes.len(), "archetypes loaded");

    let mut sandbox = Sandbox::new(config, archetypes)?;
    sandbox.carry_and_throw();
    sandbox.platform_round_trip();
    sandbox.occupied_and_empty();
    sandbox.helm_and_gun();
    info!(entities = sandbox.scene.len(), "sandbox finished");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "sandbox failed");
            ExitCode::FAILURE
        }
    }
}
