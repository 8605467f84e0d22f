//! Subjects - typed, damageable entities shown on platforms.
//!
//! A subject's type tag drives platform activation and the "item in hand"
//! readout of the grab controller. Subjects are described by archetypes so
//! platforms can instantiate fresh carriable copies instead of duplicating a
//! live object graph.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::config::ConfigError;
use crate::game::systems::shooter::ShooterConfig;
use crate::physics::{BodyFlags, Collider, Transform};

/// Default starting health of a subject.
pub const DEFAULT_SUBJECT_HEALTH: f32 = 100.0;

/// Subject type tag. `None` is the "no subject / no filter" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubjectType {
    #[default]
    None,
    A,
    B,
    C,
}

impl SubjectType {
    pub fn is_none(self) -> bool {
        self == SubjectType::None
    }

    /// Whether this type passes `filter` (`None` accepts every type).
    pub fn matches_filter(self, filter: SubjectType) -> bool {
        filter.is_none() || self == filter
    }
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SubjectType::None => "None",
            SubjectType::A => "A",
            SubjectType::B => "B",
            SubjectType::C => "C",
        };
        f.write_str(name)
    }
}

/// Result of applying damage to a subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Subject survived with the given health
    Alive(f32),
    /// Health reached zero; the owner must be deactivated
    Depleted,
}

/// Health and type of a damageable entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub subject_type: SubjectType,
    pub max_health: f32,
    health: f32,
}

impl Subject {
    pub fn new(subject_type: SubjectType, health: f32) -> Self {
        let health = health.max(0.0);
        Self {
            subject_type,
            max_health: health,
            health,
        }
    }

    /// Same subject with current health set to `health`, clamped to `[0, max_health]`.
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health.clamp(0.0, self.max_health);
        self
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_depleted(&self) -> bool {
        self.health <= 0.0
    }

    /// Subtract `amount` (negative amounts count as zero), flooring at zero.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            DamageOutcome::Depleted
        } else {
            DamageOutcome::Alive(self.health)
        }
    }
}

/// A child part of an archetype (visual or collision sub-object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDescriptor {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub colliders: Vec<Collider>,
}

/// Data description of a subject kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectArchetype {
    pub subject_type: SubjectType,
    #[serde(default = "default_health")]
    pub max_health: f32,
    /// Colliders on the root object
    #[serde(default)]
    pub colliders: Vec<Collider>,
    #[serde(default)]
    pub parts: Vec<PartDescriptor>,
    /// Physics body of the displayed subject, if it has one
    #[serde(default)]
    pub body: Option<BodyFlags>,
    /// Attack capability of the displayed subject
    #[serde(default)]
    pub shooter: Option<ShooterConfig>,
}

fn default_health() -> f32 {
    DEFAULT_SUBJECT_HEALTH
}

impl SubjectArchetype {
    pub fn new(subject_type: SubjectType) -> Self {
        Self {
            subject_type,
            max_health: DEFAULT_SUBJECT_HEALTH,
            colliders: vec![Collider::cube(0.5)],
            parts: Vec::new(),
            body: None,
            shooter: None,
        }
    }

    pub fn with_part(mut self, part: PartDescriptor) -> Self {
        self.parts.push(part);
        self
    }

    pub fn with_shooter(mut self, shooter: ShooterConfig) -> Self {
        self.shooter = Some(shooter);
        self
    }

    pub fn with_body(mut self, body: BodyFlags) -> Self {
        self.body = Some(body);
        self
    }
}

/// Archetypes keyed by subject type.
#[derive(Debug, Clone, Default)]
pub struct ArchetypeLibrary {
    archetypes: HashMap<SubjectType, SubjectArchetype>,
}

impl ArchetypeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an archetype, replacing any previous one of the same type.
    /// `SubjectType::None` is not a real subject and is ignored.
    pub fn insert(&mut self, archetype: SubjectArchetype) -> bool {
        if archetype.subject_type.is_none() {
            return false;
        }
        self.archetypes.insert(archetype.subject_type, archetype);
        true
    }

    pub fn get(&self, subject_type: SubjectType) -> Option<&SubjectArchetype> {
        self.archetypes.get(&subject_type)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Parse a JSON array of archetypes.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let list: Vec<SubjectArchetype> = serde_json::from_str(json)?;
        let mut library = Self::new();
        for archetype in list {
            library.insert(archetype);
        }
        Ok(library)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_floors_at_zero() {
        let mut subject = Subject::new(SubjectType::A, 5.0);
        assert_eq!(subject.apply_damage(3.0), DamageOutcome::Alive(2.0));
        assert_eq!(subject.apply_damage(10.0), DamageOutcome::Depleted);
        assert_eq!(subject.health(), 0.0);
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let mut subject = Subject::new(SubjectType::B, 10.0);
        assert_eq!(subject.apply_damage(-4.0), DamageOutcome::Alive(10.0));
        assert_eq!(subject.health(), 10.0);
    }

    #[test]
    fn test_damage_is_monotonic_over_sequences() {
        // Binary-exact amounts so the running total matches step-by-step subtraction
        let sequences: [&[f32]; 5] = [
            &[1.0, 2.0, 3.0],
            &[0.0, 0.0],
            &[50.0, 60.0],
            &[7.5, 2.5],
            &[0.25, 9.75, 1.0],
        ];
        for damages in sequences {
            let mut subject = Subject::new(SubjectType::C, 10.0);
            let mut last = subject.health();
            for d in damages {
                subject.apply_damage(*d);
                assert!(subject.health() <= last);
                last = subject.health();
            }
            let expected = (10.0 - damages.iter().sum::<f32>()).max(0.0);
            assert_eq!(subject.health(), expected);
            assert_eq!(subject.is_depleted(), expected <= 0.0);
        }
    }

    #[test]
    fn test_with_health_is_clamped() {
        let subject = Subject::new(SubjectType::A, 10.0);
        assert_eq!(subject.with_health(4.0).health(), 4.0);
        assert_eq!(subject.with_health(25.0).health(), 10.0);
        assert!(subject.with_health(-1.0).is_depleted());
    }

    #[test]
    fn test_type_filter() {
        assert!(SubjectType::A.matches_filter(SubjectType::None));
        assert!(SubjectType::A.matches_filter(SubjectType::A));
        assert!(!SubjectType::A.matches_filter(SubjectType::B));
    }

    #[test]
    fn test_library_ignores_none_type() {
        let mut library = ArchetypeLibrary::new();
        assert!(!library.insert(SubjectArchetype::new(SubjectType::None)));
        assert!(library.insert(SubjectArchetype::new(SubjectType::A)));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_library_from_json() {
        let json = r#"[
            { "subject_type": "A", "max_health": 40.0,
              "colliders": [ { "half_extents": [0.5, 0.5, 0.5] } ] },
            { "subject_type": "B",
              "parts": [ { "name": "head" } ] }
        ]"#;
        let library = ArchetypeLibrary::from_json_str(json).unwrap();
        assert_eq!(library.get(SubjectType::A).unwrap().max_health, 40.0);
        assert_eq!(library.get(SubjectType::B).unwrap().max_health, DEFAULT_SUBJECT_HEALTH);
        assert_eq!(library.get(SubjectType::B).unwrap().parts.len(), 1);
        assert!(library.get(SubjectType::C).is_none());
    }
}
