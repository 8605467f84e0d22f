//! Input Module
//!
//! Platform-agnostic input for the interaction layer: held movement keys,
//! edge-triggered actions and mouse look deltas, gathered into one
//! [`FrameInput`] per frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use skiff_engine::input::{FrameInput, InputSource, KeyBindings, KeyCode, MouseButton};
//!
//! let bindings = KeyBindings::new();
//! let mut frame = FrameInput::new();
//! frame.handle_press(&bindings, InputSource::Mouse(MouseButton::Left));
//! frame.movement.handle_key(KeyCode::W, true);
//! session.update(&mut scene, &frame, dt);
//! ```

pub mod bindings;
pub mod keyboard;

pub use bindings::{InputAction, InputSource, KeyBindings, MouseButton};
pub use keyboard::{KeyCode, MovementKeys};

use std::collections::HashSet;

/// Everything the interaction layer reads from input in one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Held movement keys
    pub movement: MovementKeys,
    /// Mouse movement this frame (pixels)
    pub look_delta: (f32, f32),
    pressed: HashSet<InputAction>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame with one action edge and no movement.
    pub fn with_action(action: InputAction) -> Self {
        let mut frame = Self::default();
        frame.press(action);
        frame
    }

    /// Record an action edge.
    pub fn press(&mut self, action: InputAction) {
        self.pressed.insert(action);
    }

    /// Record a physical press, translated through `bindings`.
    ///
    /// Returns the action it triggered, if any.
    pub fn handle_press(
        &mut self,
        bindings: &KeyBindings,
        source: InputSource,
    ) -> Option<InputAction> {
        let action = bindings.get_action(source)?;
        self.press(action);
        Some(action)
    }

    /// Whether `action` was pressed this frame.
    pub fn just_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }

    /// Drop edges and look delta before the next frame; held keys persist.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.look_delta = (0.0, 0.0);
    }
}
