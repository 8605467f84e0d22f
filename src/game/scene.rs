//! Scene - in-process object store for the interaction core.
//!
//! Objects form a parent/child hierarchy with local transforms. An object
//! takes part in queries only while it and all of its ancestors are active.
//! Entity ids are handed out monotonically and never reused, so systems
//! holding an id can detect that its object was despawned behind their back.

use std::collections::BTreeMap;

use glam::Vec3;
use tracing::trace;

use crate::game::subject::{DamageOutcome, Subject};
use crate::game::systems::shooter::ShooterConfig;
use crate::physics::{
    CarriableBody, Collider, EntityId, Layer, LayerMask, Ray, RayHit, RaycastQuery, Transform,
    aabb_surface_normal, ray_aabb_intersect,
};

/// A single object in the scene with its optional components.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    /// Pose relative to the parent (world pose for roots)
    pub transform: Transform,
    pub layer: Layer,
    pub active: bool,
    pub colliders: Vec<Collider>,
    pub body: Option<CarriableBody>,
    pub subject: Option<Subject>,
    pub shooter: Option<ShooterConfig>,
    /// Marks the object as a platform slot root
    pub platform: bool,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            layer: Layer::DEFAULT,
            active: true,
            colliders: Vec::new(),
            body: None,
            subject: None,
            shooter: None,
            platform: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    pub fn with_body(mut self, body: CarriableBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_shooter(mut self, shooter: ShooterConfig) -> Self {
        self.shooter = Some(shooter);
        self
    }

    pub fn as_platform(mut self) -> Self {
        self.platform = true;
        self
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }
}

/// Reference to one collider of one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderRef {
    pub entity: EntityId,
    pub index: usize,
}

/// Object store with hierarchy, activity and ray queries.
#[derive(Debug, Default)]
pub struct Scene {
    objects: BTreeMap<EntityId, SceneObject>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    /// Add a root object.
    pub fn spawn(&mut self, mut object: SceneObject) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        object.parent = None;
        object.children.clear();
        self.objects.insert(id, object);
        id
    }

    /// Add an object under `parent`; its transform is taken as local to the parent.
    pub fn spawn_child(&mut self, parent: EntityId, mut object: SceneObject) -> Option<EntityId> {
        if !self.contains(parent) {
            return None;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        object.parent = Some(parent);
        object.children.clear();
        self.objects.insert(id, object);
        if let Some(p) = self.objects.get_mut(&parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Remove an object and its whole subtree. Returns false if it was not present.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(parent) = self.objects.get(&id).map(|o| o.parent) else {
            return false;
        };
        if let Some(p) = parent.and_then(|p| self.objects.get_mut(&p)) {
            p.children.retain(|c| *c != id);
        }
        for entity in self.descendants(id) {
            self.objects.remove(&entity);
        }
        trace!(?id, "despawned subtree");
        true
    }

    /// `id` and all objects below it, depth-first in child order.
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(object) = self.objects.get(&current) else {
                continue;
            };
            out.push(current);
            stack.extend(object.children.iter().rev().copied());
        }
        out
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut current = Some(id);
        while let Some(entity) = current {
            let Some(object) = self.objects.get(&entity) else {
                break;
            };
            out.push(entity);
            current = object.parent;
        }
        out
    }

    /// First object in `id`'s ancestor chain (itself included) accepted by `pred`.
    pub fn find_in_ancestors(
        &self,
        id: EntityId,
        pred: impl Fn(&SceneObject) -> bool,
    ) -> Option<EntityId> {
        self.ancestors(id)
            .into_iter()
            .find(|e| self.objects.get(e).is_some_and(&pred))
    }

    /// Active flag of the object and every ancestor.
    pub fn is_active_in_hierarchy(&self, id: EntityId) -> bool {
        let chain = self.ancestors(id);
        !chain.is_empty()
            && chain
                .iter()
                .all(|e| self.objects.get(e).is_some_and(|o| o.active))
    }

    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.active = active;
                true
            }
            None => false,
        }
    }

    /// World pose composed through the parent chain.
    pub fn world_transform(&self, id: EntityId) -> Option<Transform> {
        let chain = self.ancestors(id);
        if chain.is_empty() {
            return None;
        }
        let mut world = Transform::IDENTITY;
        for entity in chain.iter().rev() {
            world = world.mul_transform(&self.objects[entity].transform);
        }
        Some(world)
    }

    /// Place an object at a world pose, converting into its parent's space.
    pub fn set_world_transform(&mut self, id: EntityId, world: Transform) -> bool {
        let Some(parent) = self.objects.get(&id).map(|o| o.parent) else {
            return false;
        };
        let local = match parent.and_then(|p| self.world_transform(p)) {
            Some(parent_world) => parent_world.relative(&world),
            None => world,
        };
        if let Some(object) = self.objects.get_mut(&id) {
            object.transform = local;
        }
        true
    }

    /// Object owning the physics body for a hit on `id`: the object itself,
    /// else the nearest ancestor carrying a body.
    pub fn body_owner(&self, id: EntityId) -> Option<EntityId> {
        self.find_in_ancestors(id, |o| o.body.is_some())
    }

    pub fn body(&self, id: EntityId) -> Option<&CarriableBody> {
        self.objects.get(&id).and_then(|o| o.body.as_ref())
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut CarriableBody> {
        self.objects.get_mut(&id).and_then(|o| o.body.as_mut())
    }

    /// Colliders of `id`'s subtree that are active in the hierarchy.
    pub fn colliders_in_subtree(&self, id: EntityId) -> Vec<ColliderRef> {
        self.descendants(id)
            .into_iter()
            .filter(|e| self.is_active_in_hierarchy(*e))
            .flat_map(|entity| {
                let count = self.objects[&entity].colliders.len();
                (0..count).map(move |index| ColliderRef { entity, index })
            })
            .collect()
    }

    pub fn collider(&self, r: ColliderRef) -> Option<&Collider> {
        self.objects.get(&r.entity).and_then(|o| o.colliders.get(r.index))
    }

    pub fn collider_mut(&mut self, r: ColliderRef) -> Option<&mut Collider> {
        self.objects
            .get_mut(&r.entity)
            .and_then(|o| o.colliders.get_mut(r.index))
    }

    /// Damage the subject on `id`; a depleted subject's object is deactivated.
    ///
    /// Returns `None` if the object has no subject.
    pub fn apply_damage(&mut self, id: EntityId, amount: f32) -> Option<DamageOutcome> {
        let object = self.objects.get_mut(&id)?;
        let outcome = object.subject.as_mut()?.apply_damage(amount);
        if outcome == DamageOutcome::Depleted {
            object.active = false;
        }
        Some(outcome)
    }
}

impl RaycastQuery for Scene {
    fn raycast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        if ray.direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let mut best: Option<RayHit> = None;
        for (id, object) in &self.objects {
            if object.colliders.is_empty() || !mask.contains(object.layer) {
                continue;
            }
            if !self.is_active_in_hierarchy(*id) {
                continue;
            }
            let Some(world) = self.world_transform(*id) else {
                continue;
            };

            for (index, collider) in object.colliders.iter().enumerate() {
                if !collider.enabled || collider.is_trigger {
                    continue;
                }
                let center = world.transform_point(collider.center);
                let (min, max) = collider.world_bounds(center, world.scale);
                let Some(t) = ray_aabb_intersect(ray.origin, ray.direction, min, max) else {
                    continue;
                };
                if t > max_distance || best.is_some_and(|b| t >= b.distance) {
                    continue;
                }
                let point = ray.at(t);
                best = Some(RayHit {
                    entity: *id,
                    collider_index: index,
                    point,
                    normal: aabb_surface_normal(point, min, max),
                    distance: t,
                });
            }
        }
        best
    }
}
