//! Input Bindings Module
//!
//! Maps physical keys and mouse buttons to the logical actions the
//! interaction layer responds to, so controls can be remapped without
//! touching game logic.

use std::collections::HashMap;

use super::KeyCode;

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// A physical input that can trigger an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Edge-triggered logical actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Grab, release, place on or pick from a platform (default: left mouse)
    Use,
    /// Throw the held object (default: right mouse)
    Throw,
    /// Take or leave the helm (default: E)
    Interact,
    /// Fire the mounted gun while at the helm (default: F)
    Fire,
}

/// Bidirectional source/action mapping. Each action has at most one source.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    source_to_action: HashMap<InputSource, InputAction>,
    action_to_source: HashMap<InputAction, InputSource>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Default bindings:
    /// - Left mouse = Use
    /// - Right mouse = Throw
    /// - E = Interact
    /// - F = Fire
    pub fn new() -> Self {
        let mut bindings = Self {
            source_to_action: HashMap::new(),
            action_to_source: HashMap::new(),
        };

        bindings.bind(InputSource::Mouse(MouseButton::Left), InputAction::Use);
        bindings.bind(InputSource::Mouse(MouseButton::Right), InputAction::Throw);
        bindings.bind(InputSource::Key(KeyCode::E), InputAction::Interact);
        bindings.bind(InputSource::Key(KeyCode::F), InputAction::Fire);

        bindings
    }

    /// Bind a source to an action, dropping any previous binding of either.
    pub fn bind(&mut self, source: InputSource, action: InputAction) {
        if let Some(old_action) = self.source_to_action.remove(&source) {
            self.action_to_source.remove(&old_action);
        }
        if let Some(old_source) = self.action_to_source.remove(&action) {
            self.source_to_action.remove(&old_source);
        }

        self.source_to_action.insert(source, action);
        self.action_to_source.insert(action, source);
    }

    pub fn unbind_action(&mut self, action: InputAction) {
        if let Some(source) = self.action_to_source.remove(&action) {
            self.source_to_action.remove(&source);
        }
    }

    pub fn get_action(&self, source: InputSource) -> Option<InputAction> {
        self.source_to_action.get(&source).copied()
    }

    pub fn get_source(&self, action: InputAction) -> Option<InputSource> {
        self.action_to_source.get(&action).copied()
    }
}
