//! Pull Task
//!
//! Timed interpolation that carries a freshly grabbed body from its pose at
//! grab time to the hold pose. The task is a plain record advanced once per
//! tick; cancelling a pull means dropping the record, so there is nothing
//! to unwind.
//!
//! # Easing
//!
//! Progress is `elapsed / duration` clamped to `[0, 1]` and shaped by an
//! [`Ease`] curve before it is applied to position (lerp) and rotation
//! (slerp).
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut task = PullTask::new(start, target, 0.25, Ease::OutCubic, true);
//! // Each frame:
//! let step = task.advance(delta_time);
//! body_pose = step.pose;
//! if step.finished { /* enter Held */ }
//! ```

use serde::{Deserialize, Serialize};

use crate::physics::Transform;

/// Tolerance used when deciding that a pull has run its full duration.
const COMPLETION_EPSILON: f32 = 1e-5;

/// Easing curves for the pull interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    #[default]
    OutCubic,
    InOutCubic,
}

impl Ease {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::InQuad => t * t,
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::InCubic => t * t * t,
            Ease::OutCubic => 1.0 - (1.0 - t).powi(3),
            Ease::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Pose produced by one [`PullTask::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullStep {
    pub pose: Transform,
    pub finished: bool,
}

/// In-flight pull interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullTask {
    start: Transform,
    target: Transform,
    elapsed: f32,
    duration: f32,
    ease: Ease,
    /// Interpolate rotation as well as position
    align_rotation: bool,
}

impl PullTask {
    /// Start a pull from `start` to `target` over `duration` seconds.
    ///
    /// Scale is never interpolated; the body keeps its starting scale.
    pub fn new(
        start: Transform,
        target: Transform,
        duration: f32,
        ease: Ease,
        align_rotation: bool,
    ) -> Self {
        Self {
            start,
            target,
            elapsed: 0.0,
            duration: duration.max(0.0),
            ease,
            align_rotation,
        }
    }

    /// Linear progress in `[0, 1]`. A zero-length pull is always complete.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration - COMPLETION_EPSILON
    }

    /// Advance by `dt` seconds and return the pose for this frame.
    pub fn advance(&mut self, dt: f32) -> PullStep {
        self.elapsed += dt.max(0.0);
        PullStep {
            pose: self.sample(),
            finished: self.is_finished(),
        }
    }

    /// Pose at the current progress without advancing time.
    pub fn sample(&self) -> Transform {
        if self.is_finished() {
            return self.end_pose();
        }
        let t = self.ease.apply(self.progress());
        let rotation = if self.align_rotation {
            self.start.rotation.slerp(self.target.rotation, t)
        } else {
            self.start.rotation
        };
        Transform {
            position: self.start.position.lerp(self.target.position, t),
            rotation,
            scale: self.start.scale,
        }
    }

    fn end_pose(&self) -> Transform {
        Transform {
            position: self.target.position,
            rotation: if self.align_rotation {
                self.target.rotation
            } else {
                self.start.rotation
            },
            scale: self.start.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    const ALL_EASES: [Ease; 7] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ];

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_ease_endpoints() {
        for ease in ALL_EASES {
            assert!(approx_eq(ease.apply(0.0), 0.0), "{:?} at 0", ease);
            assert!(approx_eq(ease.apply(1.0), 1.0), "{:?} at 1", ease);
        }
    }

    #[test]
    fn test_ease_is_monotonic() {
        for ease in ALL_EASES {
            let mut last = 0.0;
            for i in 1..=20 {
                let v = ease.apply(i as f32 / 20.0);
                assert!(v >= last - 1e-6, "{:?} decreased at step {}", ease, i);
                last = v;
            }
        }
    }

    #[test]
    fn test_out_cubic_front_loads_motion() {
        assert!(Ease::OutCubic.apply(0.5) > 0.5);
        assert!(approx_eq(Ease::OutCubic.apply(0.5), 0.875));
    }

    #[test]
    fn test_pull_finishes_after_duration() {
        let start = Transform::from_position(Vec3::ZERO);
        let target = Transform::from_position(Vec3::new(0.0, 0.0, -3.0));
        let mut task = PullTask::new(start, target, 0.25, Ease::OutCubic, true);

        let dt = 1.0 / 60.0;
        let mut frames = 0;
        loop {
            frames += 1;
            let step = task.advance(dt);
            if step.finished {
                assert_eq!(step.pose.position, target.position);
                break;
            }
            assert!(frames < 100);
        }
        // 0.25s at 60 Hz
        assert!((15..=16).contains(&frames), "finished after {} frames", frames);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let target = Transform::from_position(Vec3::X);
        let mut task = PullTask::new(Transform::IDENTITY, target, 0.0, Ease::Linear, false);
        assert!(task.is_finished());
        assert!(task.advance(0.0).finished);
    }

    #[test]
    fn test_rotation_only_interpolated_when_aligning() {
        let start = Transform::IDENTITY;
        let target = Transform::IDENTITY.with_rotation(Quat::from_rotation_y(1.0));

        let mut fixed = PullTask::new(start, target, 1.0, Ease::Linear, false);
        assert_eq!(fixed.advance(1.0).pose.rotation, Quat::IDENTITY);

        let mut aligned = PullTask::new(start, target, 1.0, Ease::Linear, true);
        let mid = aligned.advance(0.5).pose.rotation;
        assert!(approx_eq(mid.angle_between(Quat::IDENTITY), 0.5));
    }

    #[test]
    fn test_scale_is_preserved() {
        let start = Transform::IDENTITY.with_scale(Vec3::splat(2.0));
        let mut task = PullTask::new(start, Transform::IDENTITY, 0.5, Ease::Linear, true);
        assert_eq!(task.advance(0.25).pose.scale, Vec3::splat(2.0));
        assert_eq!(task.advance(0.25).pose.scale, Vec3::splat(2.0));
    }
}
