//! GrabController - grab, carry, throw and place physics bodies.
//!
//! # States
//!
//! - `Idle` - hands empty
//! - `Pulling` - a body is being interpolated to the hold pose
//! - `Held` - the body is attached to the hand or follows the view
//!
//! While a body is pulled or held, its physics flags are overridden and
//! its colliders disabled. The originals live in a hold record and are
//! written back exactly once when the body leaves the hand. A body that
//! disappears from the scene while in hand drops the controller back to
//! `Idle` without touching anything.
//!
//! # Use edge
//!
//! One press of the use button does at most one of: place the held item on
//! a platform, take a subject from a platform, release the held body, grab
//! a free body. Platform checks always come first.

use glam::Vec3;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::platform_system::{PlacementError, PlatformSystem};
use super::pull_task::PullTask;
use crate::camera::{Viewpoint, point_ahead, view_ray, view_rotation};
use crate::game::config::{GrabConfig, HandAnchor, InteractionConfig, LayerConfig, PlacementConfig};
use crate::game::scene::{ColliderRef, Scene};
use crate::game::subject::SubjectType;
use crate::physics::{
    BodyFlags, CarriableBody, EntityId, HolderId, LayerMask, RaycastQuery, Transform,
};

/// Grab state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabState {
    #[default]
    Idle,
    Pulling,
    Held,
}

/// Why a grab request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GrabError {
    #[error("hands are not empty")]
    NotIdle,
    #[error("nothing grabbable in reach")]
    NoTarget,
    #[error("hit object has no physics body")]
    NoBody,
    #[error("body is kinematic")]
    Kinematic,
    #[error("body is already held by another controller")]
    AlreadyHeld,
    #[error("nothing is held")]
    NotHeld,
    #[error("held body no longer exists")]
    BodyMissing,
}

/// What a use press did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UseOutcome {
    /// Held item was placed and the slot now shows `subject`
    Placed {
        slot: EntityId,
        subject: EntityId,
        subject_type: SubjectType,
    },
    /// A copy of the slot's subject is now being pulled to the hand
    PickedFromPlatform { slot: EntityId, body: EntityId },
    Grabbed(EntityId),
    Released(EntityId),
    PlacementRejected(PlacementError),
    GrabRejected(GrabError),
    /// A platform was targeted mid-pull; nothing happened
    Ignored,
}

/// Saved physics state of the body in hand.
#[derive(Debug, Clone)]
struct HoldRecord {
    body: EntityId,
    saved_flags: BodyFlags,
    saved_colliders: Vec<(ColliderRef, bool)>,
    pull: Option<PullTask>,
}

/// Per-player grab state machine.
#[derive(Debug, Clone)]
pub struct GrabController {
    holder: HolderId,
    grab: GrabConfig,
    placement: PlacementConfig,
    layers: LayerConfig,
    state: GrabState,
    hold: Option<HoldRecord>,
    item_in_hand: SubjectType,
}

impl GrabController {
    pub fn new(holder: HolderId, config: &InteractionConfig) -> Self {
        Self {
            holder,
            grab: config.grab,
            placement: config.placement,
            layers: config.layers,
            state: GrabState::Idle,
            hold: None,
            item_in_hand: SubjectType::None,
        }
    }

    pub fn state(&self) -> GrabState {
        self.state
    }

    pub fn holder(&self) -> HolderId {
        self.holder
    }

    /// Body currently pulled or held.
    pub fn held_body(&self) -> Option<EntityId> {
        self.hold.as_ref().map(|h| h.body)
    }

    /// Subject type of the body in hand (`None` when empty or untyped).
    pub fn item_in_hand(&self) -> SubjectType {
        self.item_in_hand
    }

    pub fn config(&self) -> &GrabConfig {
        &self.grab
    }

    /// Raycast from the view and start pulling the body that was hit.
    pub fn request_grab(
        &mut self,
        scene: &mut Scene,
        view: &impl Viewpoint,
    ) -> Result<EntityId, GrabError> {
        if self.state != GrabState::Idle {
            return Err(GrabError::NotIdle);
        }
        let hit = scene
            .raycast(view_ray(view), self.grab.max_grab_distance, self.grab.grab_mask)
            .ok_or(GrabError::NoTarget)?;
        let body = scene.body_owner(hit.entity).ok_or(GrabError::NoBody)?;
        if scene.body(body).is_some_and(CarriableBody::is_kinematic) {
            return Err(GrabError::Kinematic);
        }
        self.begin_pull(scene, body, view)?;
        Ok(body)
    }

    /// Start pulling a body that was not found by raycast, such as a fresh
    /// platform clone. Kinematic bodies are accepted; holding restores their
    /// flags on release like any other.
    pub fn pick_up_external(
        &mut self,
        scene: &mut Scene,
        body: EntityId,
        view: &impl Viewpoint,
    ) -> Result<(), GrabError> {
        if self.state != GrabState::Idle {
            return Err(GrabError::NotIdle);
        }
        if scene.body(body).is_none() {
            return Err(GrabError::BodyMissing);
        }
        self.begin_pull(scene, body, view)
    }

    fn begin_pull(
        &mut self,
        scene: &mut Scene,
        body: EntityId,
        view: &impl Viewpoint,
    ) -> Result<(), GrabError> {
        let start = scene.world_transform(body).ok_or(GrabError::BodyMissing)?;
        let colliders = scene.colliders_in_subtree(body);
        let rigid = scene.body_mut(body).ok_or(GrabError::NoBody)?;
        if !rigid.claim(self.holder) {
            return Err(GrabError::AlreadyHeld);
        }

        let saved_flags = rigid.flags;
        rigid.flags = BodyFlags::held(
            self.grab.held_drag,
            self.grab.held_angular_drag,
            saved_flags.constraints | self.grab.held_constraints,
        );
        rigid.linear_velocity = Vec3::ZERO;
        rigid.angular_velocity = Vec3::ZERO;

        let mut saved_colliders = Vec::with_capacity(colliders.len());
        for r in colliders {
            if let Some(collider) = scene.collider_mut(r) {
                saved_colliders.push((r, collider.enabled));
                collider.enabled = false;
            }
        }

        let target = self.hold_pose(view, start);
        let pull = PullTask::new(
            start,
            target,
            self.grab.pull_duration,
            self.grab.pull_ease,
            self.grab.align_rotation_on_attach,
        );

        self.item_in_hand = scene
            .get(body)
            .and_then(|o| o.subject.as_ref())
            .map(|s| s.subject_type)
            .unwrap_or_default();
        self.hold = Some(HoldRecord {
            body,
            saved_flags,
            saved_colliders,
            pull: Some(pull),
        });
        self.state = GrabState::Pulling;
        info!(?body, item = %self.item_in_hand, "grab started");
        Ok(())
    }

    /// Hand pose for the current view.
    fn hand_pose(view: &impl Viewpoint, hand: &HandAnchor) -> (Vec3, glam::Quat) {
        let position = view.position()
            + view.right() * hand.offset.x
            + view.up() * hand.offset.y
            + view.forward() * hand.offset.z;
        (position, (view_rotation(view) * hand.rotation).normalize())
    }

    /// Where a pull ends: the hand, or a point `hold_distance` ahead.
    fn hold_pose(&self, view: &impl Viewpoint, current: Transform) -> Transform {
        let (position, rotation) = match &self.grab.hand {
            Some(hand) => Self::hand_pose(view, hand),
            None => (
                point_ahead(view, self.grab.hold_distance),
                view_rotation(view),
            ),
        };
        Transform {
            position,
            rotation: if self.grab.align_rotation_on_attach {
                rotation
            } else {
                current.rotation
            },
            scale: current.scale,
        }
    }

    /// Put the body back into its pre-grab physics state and forget it.
    ///
    /// Returns the body id if it still existed.
    fn end_hold(&mut self, scene: &mut Scene) -> Option<EntityId> {
        let record = self.hold.take()?;
        self.state = GrabState::Idle;
        self.item_in_hand = SubjectType::None;

        let rigid = scene.body_mut(record.body)?;
        rigid.flags = record.saved_flags;
        rigid.unclaim(self.holder);
        for (r, enabled) in record.saved_colliders {
            if let Some(collider) = scene.collider_mut(r) {
                collider.enabled = enabled;
            }
        }
        Some(record.body)
    }

    /// Drop the hold record without restoring anything.
    fn forget_missing(&mut self, body: EntityId) {
        warn!(?body, "held body disappeared; dropping grab");
        self.hold = None;
        self.state = GrabState::Idle;
        self.item_in_hand = SubjectType::None;
    }

    /// Let go of the body in hand, cancelling any pull in progress.
    pub fn request_release(&mut self, scene: &mut Scene) -> Result<EntityId, GrabError> {
        let body = self.held_body().ok_or(GrabError::NotHeld)?;
        match self.end_hold(scene) {
            Some(body) => {
                info!(?body, "released");
                Ok(body)
            }
            None => {
                self.forget_missing(body);
                Err(GrabError::BodyMissing)
            }
        }
    }

    /// Throw the held body along the view. Only valid once fully held.
    pub fn request_throw(
        &mut self,
        scene: &mut Scene,
        view: &impl Viewpoint,
    ) -> Result<EntityId, GrabError> {
        if self.state != GrabState::Held {
            return Err(GrabError::NotHeld);
        }
        let body = self.held_body().ok_or(GrabError::NotHeld)?;
        let Some(body) = self.end_hold(scene) else {
            self.forget_missing(body);
            return Err(GrabError::BodyMissing);
        };

        let velocity = view.forward() * self.grab.throw_force + Vec3::Y * self.grab.throw_upward_force;
        if let Some(rigid) = scene.body_mut(body) {
            rigid.flags.is_kinematic = false;
            rigid.flags.use_gravity = true;
            rigid.linear_velocity = velocity;
        }
        info!(?body, ?velocity, "thrown");
        Ok(body)
    }

    /// Advance the pull or keep the held body with the view.
    pub fn tick(&mut self, scene: &mut Scene, view: &impl Viewpoint, dt: f32) {
        let Some(body) = self.held_body() else {
            return;
        };
        if scene.body(body).is_none() {
            self.forget_missing(body);
            return;
        }
        let Some(current) = scene.world_transform(body) else {
            self.forget_missing(body);
            return;
        };

        let pull_step = self
            .hold
            .as_mut()
            .and_then(|h| h.pull.as_mut())
            .map(|pull| pull.advance(dt));

        if let Some(step) = pull_step {
            scene.set_world_transform(body, step.pose);
            if step.finished {
                if let Some(hold) = self.hold.as_mut() {
                    hold.pull = None;
                }
                if self.grab.hand.is_some() {
                    let pose = self.hold_pose(view, step.pose);
                    scene.set_world_transform(body, pose);
                }
                self.state = GrabState::Held;
                info!(?body, "held");
            }
            return;
        }

        if self.grab.hand.is_some() {
            let pose = self.hold_pose(view, current);
            scene.set_world_transform(body, pose);
            return;
        }

        let target = point_ahead(view, self.grab.hold_distance);
        let desired = (target - current.position) * self.grab.follow_gain;
        let Some(rigid) = scene.body_mut(body) else {
            return;
        };
        rigid.linear_velocity = rigid.linear_velocity.lerp(desired, self.grab.follow_blend);
        let velocity = rigid.linear_velocity;
        scene.set_world_transform(
            body,
            Transform {
                position: current.position + velocity * dt,
                ..current
            },
        );
    }

    /// Handle one use press: platform placement or pickup first, then
    /// release or grab.
    pub fn handle_use(
        &mut self,
        scene: &mut Scene,
        platforms: &PlatformSystem,
        view: &impl Viewpoint,
    ) -> UseOutcome {
        let slot = scene
            .raycast(
                view_ray(view),
                self.placement.detection_distance,
                LayerMask::from(self.layers.platform),
            )
            .and_then(|hit| platforms.resolve_slot(scene, hit.entity));

        if let Some(slot) = slot {
            return match self.state {
                GrabState::Held => self.place_on(scene, platforms, slot),
                GrabState::Idle => self.take_from(scene, platforms, slot, view),
                GrabState::Pulling => {
                    debug!(?slot, "platform targeted mid-pull");
                    UseOutcome::Ignored
                }
            };
        }

        if self.state != GrabState::Idle {
            return match self.request_release(scene) {
                Ok(body) => UseOutcome::Released(body),
                Err(err) => UseOutcome::GrabRejected(err),
            };
        }

        match self.request_grab(scene, view) {
            Ok(body) => UseOutcome::Grabbed(body),
            Err(err) => {
                debug!(%err, "grab rejected");
                UseOutcome::GrabRejected(err)
            }
        }
    }

    fn place_on(&mut self, scene: &mut Scene, platforms: &PlatformSystem, slot: EntityId) -> UseOutcome {
        let Some(body) = self.held_body() else {
            return UseOutcome::GrabRejected(GrabError::NotHeld);
        };
        if !scene.contains(body) {
            self.forget_missing(body);
            return UseOutcome::GrabRejected(GrabError::BodyMissing);
        }
        if platforms.has_active_subject(scene, slot) {
            debug!(?slot, "platform occupied");
            return UseOutcome::PlacementRejected(PlacementError::Occupied);
        }

        let subject_type = self.item_in_hand;
        match platforms.activate_subject_type(scene, slot, subject_type) {
            Ok(subject) => {
                self.hold = None;
                self.state = GrabState::Idle;
                self.item_in_hand = SubjectType::None;
                scene.despawn(body);
                info!(?slot, ?body, %subject_type, "placed on platform");
                UseOutcome::Placed {
                    slot,
                    subject,
                    subject_type,
                }
            }
            Err(err) => {
                debug!(?slot, %err, "placement rejected");
                UseOutcome::PlacementRejected(err)
            }
        }
    }

    fn take_from(
        &mut self,
        scene: &mut Scene,
        platforms: &PlatformSystem,
        slot: EntityId,
        view: &impl Viewpoint,
    ) -> UseOutcome {
        match platforms.clone_subject(scene, slot, self.item_in_hand) {
            Ok(body) => match self.pick_up_external(scene, body, view) {
                Ok(()) => UseOutcome::PickedFromPlatform { slot, body },
                Err(err) => UseOutcome::GrabRejected(err),
            },
            Err(err) => {
                debug!(?slot, %err, "nothing taken from platform");
                UseOutcome::PlacementRejected(err)
            }
        }
    }
}
