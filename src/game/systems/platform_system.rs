//! PlatformSystem - display slots that show one subject at a time.
//!
//! A platform slot is a scene object flagged `platform`; the subjects it
//! owns are the subject-carrying objects in its subtree, active or not.
//! At most one owned subject is active. Picking a subject off a platform
//! builds a fresh carriable instance from the subject's archetype and
//! hides the displayed original.
//!
//! Every operation decides first and mutates second: a rejected request
//! leaves the scene exactly as it was.

use thiserror::Error;
use tracing::{debug, info};

use crate::game::scene::{Scene, SceneObject};
use crate::game::subject::{ArchetypeLibrary, Subject, SubjectArchetype, SubjectType};
use crate::physics::{BodyFlags, CarriableBody, EntityId, Layer, Transform};

/// Why a platform request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("platform already shows a subject")]
    Occupied,
    #[error("platform has no subject of type {0}")]
    NoMatchingSubject(SubjectType),
    #[error("platform has no active subject to take")]
    NothingToClone,
    #[error("no archetype registered for subject type {0}")]
    MissingArchetype(SubjectType),
    #[error("entity is not a platform")]
    NotAPlatform,
}

/// How an archetype is instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstanceKind {
    /// Shown on a platform: keeps the archetype body and shooter
    Display,
    /// Carried by the player: floating body guaranteed, shooter stripped
    Carried,
}

/// Platform slot operations over the scene.
#[derive(Debug, Clone)]
pub struct PlatformSystem {
    library: ArchetypeLibrary,
    /// Layer carried clones are moved onto
    grab_layer: Layer,
}

impl PlatformSystem {
    pub fn new(library: ArchetypeLibrary, grab_layer: Layer) -> Self {
        Self {
            library,
            grab_layer,
        }
    }

    /// Platform owning `hit`: the object itself or its nearest platform ancestor.
    pub fn resolve_slot(&self, scene: &Scene, hit: EntityId) -> Option<EntityId> {
        scene.find_in_ancestors(hit, |o| o.platform)
    }

    /// Subjects owned by `slot` in stable pre-order, active or not.
    pub fn owned_subjects(&self, scene: &Scene, slot: EntityId) -> Vec<EntityId> {
        scene
            .descendants(slot)
            .into_iter()
            .filter(|e| scene.get(*e).is_some_and(|o| o.subject.is_some()))
            .collect()
    }

    fn active_subjects(&self, scene: &Scene, slot: EntityId) -> Vec<EntityId> {
        self.owned_subjects(scene, slot)
            .into_iter()
            .filter(|e| scene.is_active_in_hierarchy(*e))
            .collect()
    }

    fn subject_type(scene: &Scene, id: EntityId) -> SubjectType {
        scene
            .get(id)
            .and_then(|o| o.subject.as_ref())
            .map(|s| s.subject_type)
            .unwrap_or_default()
    }

    pub fn has_active_subject(&self, scene: &Scene, slot: EntityId) -> bool {
        !self.active_subjects(scene, slot).is_empty()
    }

    /// Show the first owned subject of `subject_type` and hide every other.
    ///
    /// Only the first match is activated, so the slot never shows two
    /// subjects. Without a match nothing changes.
    pub fn activate_subject_type(
        &self,
        scene: &mut Scene,
        slot: EntityId,
        subject_type: SubjectType,
    ) -> Result<EntityId, PlacementError> {
        if subject_type.is_none() {
            return Err(PlacementError::NoMatchingSubject(subject_type));
        }
        if !scene.get(slot).is_some_and(|o| o.platform) {
            return Err(PlacementError::NotAPlatform);
        }

        let owned = self.owned_subjects(scene, slot);
        let Some(chosen) = owned
            .iter()
            .copied()
            .find(|e| Self::subject_type(scene, *e) == subject_type)
        else {
            debug!(?slot, %subject_type, "no matching subject on platform");
            return Err(PlacementError::NoMatchingSubject(subject_type));
        };

        for subject in &owned {
            scene.set_active(*subject, *subject == chosen);
        }
        info!(?slot, subject = ?chosen, %subject_type, "platform subject activated");
        Ok(chosen)
    }

    /// Build a carriable copy of the first active subject matching `filter`
    /// (`SubjectType::None` matches any) and hide the original.
    ///
    /// The copy is a root object at the original's world pose and scale, on
    /// the grab layer throughout, without a shooter, with its current
    /// health, and with a floating body when the archetype has none.
    pub fn clone_subject(
        &self,
        scene: &mut Scene,
        slot: EntityId,
        filter: SubjectType,
    ) -> Result<EntityId, PlacementError> {
        if !scene.get(slot).is_some_and(|o| o.platform) {
            return Err(PlacementError::NotAPlatform);
        }

        let active = self.active_subjects(scene, slot);
        if active.is_empty() {
            debug!(?slot, "platform has nothing to clone");
            return Err(PlacementError::NothingToClone);
        }
        let Some(original) = active
            .iter()
            .copied()
            .find(|e| Self::subject_type(scene, *e).matches_filter(filter))
        else {
            debug!(?slot, %filter, "no active subject matches filter");
            return Err(PlacementError::NoMatchingSubject(filter));
        };

        let subject_type = Self::subject_type(scene, original);
        let archetype = self
            .library
            .get(subject_type)
            .ok_or(PlacementError::MissingArchetype(subject_type))?;
        let pose = scene
            .world_transform(original)
            .ok_or(PlacementError::NothingToClone)?;
        let health = scene
            .get(original)
            .and_then(|o| o.subject.as_ref())
            .map(|s| s.health())
            .unwrap_or(archetype.max_health);

        let clone = instantiate(
            scene,
            archetype,
            None,
            pose,
            self.grab_layer,
            health,
            InstanceKind::Carried,
        );
        scene.set_active(original, false);

        info!(?slot, ?original, ?clone, %subject_type, "subject cloned from platform");
        Ok(clone)
    }

    /// Place a display subject of `subject_type` under `slot` at `local`.
    ///
    /// Display subjects take the slot's layer so the platform ray also
    /// finds the slot when it hits the subject.
    pub fn spawn_display_subject(
        &self,
        scene: &mut Scene,
        slot: EntityId,
        subject_type: SubjectType,
        local: Transform,
        active: bool,
    ) -> Result<EntityId, PlacementError> {
        let layer = scene
            .get(slot)
            .filter(|o| o.platform)
            .map(|o| o.layer)
            .ok_or(PlacementError::NotAPlatform)?;
        let archetype = self
            .library
            .get(subject_type)
            .ok_or(PlacementError::MissingArchetype(subject_type))?;

        let id = instantiate(
            scene,
            archetype,
            Some(slot),
            local,
            layer,
            archetype.max_health,
            InstanceKind::Display,
        );
        scene.set_active(id, active);
        Ok(id)
    }
}

fn instantiate(
    scene: &mut Scene,
    archetype: &SubjectArchetype,
    parent: Option<EntityId>,
    transform: Transform,
    layer: Layer,
    health: f32,
    kind: InstanceKind,
) -> EntityId {
    let mut root = SceneObject::new(format!("subject {}", archetype.subject_type))
        .with_transform(transform)
        .on_layer(layer)
        .with_subject(
            Subject::new(archetype.subject_type, archetype.max_health).with_health(health),
        );
    root.colliders = archetype.colliders.clone();

    match kind {
        InstanceKind::Display => {
            root.body = archetype.body.map(CarriableBody::new);
            root.shooter = archetype.shooter;
        }
        InstanceKind::Carried => {
            let flags = archetype.body.unwrap_or_else(BodyFlags::floating);
            root.body = Some(CarriableBody::new(flags));
        }
    }

    let id = match parent.and_then(|p| scene.spawn_child(p, root.clone())) {
        Some(id) => id,
        None => scene.spawn(root),
    };

    for part in &archetype.parts {
        let mut child = SceneObject::new(part.name.clone())
            .with_transform(part.transform)
            .on_layer(layer);
        child.colliders = part.colliders.clone();
        scene.spawn_child(id, child);
    }

    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::subject::PartDescriptor;
    use crate::game::systems::shooter::ShooterConfig;
    use crate::physics::Collider;
    use glam::{Quat, Vec3};

    const PLATFORM_LAYER: Layer = Layer(7);
    const GRAB_LAYER: Layer = Layer(6);

    fn library() -> ArchetypeLibrary {
        let mut library = ArchetypeLibrary::new();
        library.insert(
            SubjectArchetype::new(SubjectType::A)
                .with_shooter(ShooterConfig::default())
                .with_part(PartDescriptor {
                    name: "head".into(),
                    transform: Transform::from_position(Vec3::Y),
                    colliders: vec![Collider::cube(0.2)],
                }),
        );
        library.insert(SubjectArchetype::new(SubjectType::B));
        library.insert(
            SubjectArchetype::new(SubjectType::C)
                .with_body(BodyFlags::default()),
        );
        library
    }

    fn setup(types: &[(SubjectType, bool)]) -> (Scene, PlatformSystem, EntityId, Vec<EntityId>) {
        let mut scene = Scene::new();
        let system = PlatformSystem::new(library(), GRAB_LAYER);
        let slot = scene.spawn(
            SceneObject::new("platform")
                .at(Vec3::new(0.0, 0.0, -4.0))
                .on_layer(PLATFORM_LAYER)
                .with_collider(Collider::with_half_extents(Vec3::new(1.0, 0.1, 1.0)))
                .as_platform(),
        );
        let subjects = types
            .iter()
            .map(|(ty, active)| {
                system
                    .spawn_display_subject(
                        &mut scene,
                        slot,
                        *ty,
                        Transform::from_position(Vec3::Y),
                        *active,
                    )
                    .unwrap()
            })
            .collect();
        (scene, system, slot, subjects)
    }

    fn active_count(scene: &Scene, subjects: &[EntityId]) -> usize {
        subjects
            .iter()
            .filter(|e| scene.get(**e).unwrap().active)
            .count()
    }

    #[test]
    fn test_activate_shows_only_requested_type() {
        let (mut scene, system, slot, subjects) =
            setup(&[(SubjectType::A, true), (SubjectType::B, false)]);

        let shown = system
            .activate_subject_type(&mut scene, slot, SubjectType::B)
            .unwrap();
        assert_eq!(shown, subjects[1]);
        assert!(!scene.get(subjects[0]).unwrap().active);
        assert!(scene.get(subjects[1]).unwrap().active);
    }

    #[test]
    fn test_activate_none_type_fails() {
        let (mut scene, system, slot, _) = setup(&[(SubjectType::A, false)]);
        assert_eq!(
            system.activate_subject_type(&mut scene, slot, SubjectType::None),
            Err(PlacementError::NoMatchingSubject(SubjectType::None))
        );
    }

    #[test]
    fn test_activate_without_match_changes_nothing() {
        let (mut scene, system, slot, subjects) =
            setup(&[(SubjectType::A, true), (SubjectType::B, false)]);
        let result = system.activate_subject_type(&mut scene, slot, SubjectType::C);
        assert_eq!(result, Err(PlacementError::NoMatchingSubject(SubjectType::C)));
        assert!(scene.get(subjects[0]).unwrap().active);
        assert!(!scene.get(subjects[1]).unwrap().active);
    }

    #[test]
    fn test_activate_duplicate_types_keeps_single_active() {
        let (mut scene, system, slot, subjects) = setup(&[
            (SubjectType::A, false),
            (SubjectType::A, false),
            (SubjectType::B, true),
        ]);
        let sequence = [SubjectType::A, SubjectType::B, SubjectType::C, SubjectType::A];
        for ty in sequence {
            let _ = system.activate_subject_type(&mut scene, slot, ty);
            assert!(active_count(&scene, &subjects) <= 1);
        }
        assert!(scene.get(subjects[0]).unwrap().active);
    }

    #[test]
    fn test_has_active_subject() {
        let (mut scene, system, slot, subjects) = setup(&[(SubjectType::A, false)]);
        assert!(!system.has_active_subject(&scene, slot));
        scene.set_active(subjects[0], true);
        assert!(system.has_active_subject(&scene, slot));
    }

    #[test]
    fn test_resolve_slot_from_subject_part() {
        let (scene, system, slot, subjects) = setup(&[(SubjectType::A, true)]);
        let head = scene.get(subjects[0]).unwrap().children()[0];
        assert_eq!(system.resolve_slot(&scene, head), Some(slot));
        assert_eq!(system.resolve_slot(&scene, slot), Some(slot));
    }

    #[test]
    fn test_clone_builds_carriable_copy() {
        let (mut scene, system, slot, subjects) = setup(&[(SubjectType::A, true)]);
        scene
            .get_mut(slot)
            .unwrap()
            .transform
            .rotation = Quat::from_rotation_y(0.5);
        scene.apply_damage(subjects[0], 30.0);

        let original_pose = scene.world_transform(subjects[0]).unwrap();
        let clone = system
            .clone_subject(&mut scene, slot, SubjectType::None)
            .unwrap();

        let object = scene.get(clone).unwrap();
        assert_eq!(object.parent(), None);
        assert_eq!(object.layer, GRAB_LAYER);
        assert!(object.shooter.is_none());
        let body = object.body.as_ref().unwrap();
        assert!(!body.flags.use_gravity);
        assert!(!body.flags.is_kinematic);
        assert_eq!(object.subject.unwrap().health(), 70.0);

        for part in scene.descendants(clone) {
            assert_eq!(scene.get(part).unwrap().layer, GRAB_LAYER);
        }

        let pose = scene.world_transform(clone).unwrap();
        assert!((pose.position - original_pose.position).length() < 1e-4);
        assert!(pose.rotation.angle_between(original_pose.rotation) < 1e-4);

        assert!(!scene.get(subjects[0]).unwrap().active);
        assert!(scene.contains(subjects[0]));
        assert!(!system.has_active_subject(&scene, slot));
    }

    #[test]
    fn test_clone_keeps_archetype_body() {
        let (mut scene, system, slot, _) = setup(&[(SubjectType::C, true)]);
        let clone = system
            .clone_subject(&mut scene, slot, SubjectType::C)
            .unwrap();
        let body = scene.body(clone).unwrap();
        assert!(body.flags.use_gravity);
    }

    #[test]
    fn test_clone_with_no_active_subject_fails() {
        let (mut scene, system, slot, _) = setup(&[(SubjectType::A, false)]);
        let before = scene.len();
        assert_eq!(
            system.clone_subject(&mut scene, slot, SubjectType::None),
            Err(PlacementError::NothingToClone)
        );
        assert_eq!(scene.len(), before);
    }

    #[test]
    fn test_clone_respects_filter() {
        let (mut scene, system, slot, subjects) = setup(&[(SubjectType::B, true)]);
        assert_eq!(
            system.clone_subject(&mut scene, slot, SubjectType::A),
            Err(PlacementError::NoMatchingSubject(SubjectType::A))
        );
        assert!(scene.get(subjects[0]).unwrap().active);
    }

    #[test]
    fn test_non_platform_is_rejected() {
        let (mut scene, system, _, subjects) = setup(&[(SubjectType::A, true)]);
        assert_eq!(
            system.clone_subject(&mut scene, subjects[0], SubjectType::None),
            Err(PlacementError::NotAPlatform)
        );
    }
}
