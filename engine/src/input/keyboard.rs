//! Keyboard Input Module
//!
//! Generic key codes and the held-key state that drives the movement
//! controllers. Decoupled from any windowing system.

/// Key codes used by the interaction layer, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    E,
    F,
    Q,
    Space,
    ShiftLeft,
    ShiftRight,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    /// Catch-all for unhandled keys
    Unknown,
}

/// Held movement keys.
///
/// The foot controller reads all of them; the vehicle reads forward,
/// backward, left and right as thrust and turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    /// W - forward / thrust
    pub forward: bool,
    /// S - backward / reverse thrust
    pub backward: bool,
    /// A - strafe or turn left
    pub left: bool,
    /// D - strafe or turn right
    pub right: bool,
    /// Shift - sprint
    pub sprint: bool,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state from a key press or release.
    ///
    /// Returns `true` if the key is a movement key.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W | KeyCode::ArrowUp => self.forward = pressed,
            KeyCode::S | KeyCode::ArrowDown => self.backward = pressed,
            KeyCode::A | KeyCode::ArrowLeft => self.left = pressed,
            KeyCode::D | KeyCode::ArrowRight => self.right = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.sprint = pressed,
            _ => return false,
        }
        true
    }

    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprint
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Forward/backward direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Left/right direction (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }
}
