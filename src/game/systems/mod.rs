//! Game systems - self-contained modules that own state and logic.

pub mod control_arbiter;
pub mod grab_system;
pub mod platform_system;
pub mod projectile_system;
pub mod pull_task;
pub mod shooter;

pub use control_arbiter::{ControlArbiter, ControlMode};
pub use grab_system::{GrabController, GrabError, GrabState, UseOutcome};
pub use platform_system::{PlacementError, PlatformSystem};
pub use projectile_system::{ProjectileEvent, ProjectileSystem};
pub use pull_task::{Ease, PullStep, PullTask};
pub use shooter::{FireError, ShooterConfig, fire_mounted, horizontal_angle};
