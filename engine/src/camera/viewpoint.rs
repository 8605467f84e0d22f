//! Viewpoint provider.
//!
//! Interaction systems only need an eye position and a basis to aim their
//! rays and place held objects; any camera can provide that.

use glam::Vec3;

/// World-space eye position and orientation basis, sampled each frame.
pub trait Viewpoint {
    fn position(&self) -> Vec3;

    /// Normalized view direction.
    fn forward(&self) -> Vec3;

    /// Horizontal right vector. Falls back to +X when looking straight up or down.
    fn right(&self) -> Vec3 {
        let right = self.forward().cross(Vec3::Y);
        if right.length_squared() < 1e-8 {
            Vec3::X
        } else {
            right.normalize()
        }
    }

    fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }
}

/// Plain snapshot of a viewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    pub position: Vec3,
    pub forward: Vec3,
}

impl ViewFrame {
    /// Frame at `position` looking along `forward` (normalized here).
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
        }
    }

    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, target - position)
    }

    /// Capture the current state of any viewpoint.
    pub fn capture(view: &impl Viewpoint) -> Self {
        Self::new(view.position(), view.forward())
    }
}

impl Viewpoint for ViewFrame {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }
}
