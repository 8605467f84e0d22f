//! Game Module
//!
//! The interaction layer built on top of the engine: scene storage,
//! subjects, platforms, grabbing, control switching and combat.

pub mod config;
pub mod scene;
pub mod session;
pub mod subject;
pub mod systems;

pub use config::{ConfigError, InteractionConfig};
pub use scene::{ColliderRef, Scene, SceneObject};
pub use session::{FrameReport, PlayerRig, PlayerRigBuilder, SetupError};
pub use subject::{
    ArchetypeLibrary, DamageOutcome, PartDescriptor, Subject, SubjectArchetype, SubjectType,
};
pub use systems::{
    ControlArbiter, ControlMode, GrabController, GrabError, GrabState, PlacementError,
    PlatformSystem, ProjectileSystem, UseOutcome,
};
