//! Camera Module
//!
//! Viewpoints for the interaction systems: the on-foot FPS camera, the
//! vehicle look camera, and ray helpers built on the `Viewpoint` trait.
//! Window-system agnostic; only camera state and math.

pub mod fps_controller;
pub mod look_camera;
pub mod raycast;
pub mod viewpoint;

pub use fps_controller::FpsCamera;
pub use look_camera::{LookCamera, LookTuning};
pub use raycast::{look_rotation, point_ahead, view_ray, view_rotation};
pub use viewpoint::{ViewFrame, Viewpoint};
