//! Skiff Engine Library
//!
//! First-person object interaction: grab, carry, throw and place physics
//! bodies, move subjects on and off display platforms, and hand control
//! between walking and steering a vehicle.
//!
//! # Modules
//!
//! - [`physics`] - Math types, layers, colliders, raycasts, carriable bodies, projectiles
//! - [`camera`] - Viewpoint providers (FPS camera, vehicle look camera) and view-ray helpers
//! - [`input`] - Key bindings, movement keys and per-frame action edges
//! - [`player`] - Foot and vehicle movement controllers
//! - [`game`] - Scene, subjects, interaction systems and the per-player rig
//!
//! # Example
//!
//! ```ignore
//! use skiff_engine::camera::FpsCamera;
//! use skiff_engine::game::{ArchetypeLibrary, PlayerRig, Scene};
//! use skiff_engine::input::{FrameInput, InputAction};
//! use skiff_engine::physics::Transform;
//!
//! let mut scene = Scene::new();
//! let mut rig = PlayerRig::builder()
//!     .foot_camera(FpsCamera::new())
//!     .vehicle_at(Transform::IDENTITY)
//!     .archetypes(ArchetypeLibrary::load("archetypes.json")?)
//!     .build()?;
//!
//! let report = rig.update(&mut scene, &FrameInput::with_action(InputAction::Use), 1.0 / 60.0);
//! ```

pub mod camera;
pub mod input;
pub mod physics;
pub mod player;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export commonly used input types
pub use input::{FrameInput, InputAction, KeyBindings, KeyCode, MovementKeys};
// Re-export player types
pub use player::{FootController, MovementController, Switchable, VehicleHelm};
