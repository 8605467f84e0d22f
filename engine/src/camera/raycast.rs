//! Raycast Module
//!
//! Helpers that turn a viewpoint into rays, aim points and orientations.

use glam::{Mat3, Quat, Vec3};

use super::viewpoint::Viewpoint;
use crate::physics::Ray;

/// Ray from the eye along the view direction.
pub fn view_ray(view: &impl Viewpoint) -> Ray {
    Ray::new(view.position(), view.forward())
}

/// Point `distance` meters in front of the eye.
pub fn point_ahead(view: &impl Viewpoint, distance: f32) -> Vec3 {
    view.position() + view.forward() * distance
}

/// Rotation whose -Z axis points along `forward`, keeping `up` as close to
/// vertical as possible.
///
/// Degenerate input (zero forward, or forward parallel to `up`) falls back
/// to a valid basis instead of producing NaNs.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let back = -forward.normalize_or_zero();
    if back == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(back);
    if right.length_squared() < 1e-8 {
        right = Vec3::X.cross(back);
        if right.length_squared() < 1e-8 {
            right = Vec3::Y.cross(back);
        }
    }
    let right = right.normalize();
    let true_up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, back)).normalize()
}

/// Orientation of a viewpoint: its forward with world up.
pub fn view_rotation(view: &impl Viewpoint) -> Quat {
    look_rotation(view.forward(), Vec3::Y)
}
