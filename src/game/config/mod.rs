//! Config Module
//!
//! Tunable parameters for the interaction core, loadable from JSON.

pub mod interaction_config;

pub use interaction_config::{
    ConfigError, ControlConfig, GrabConfig, HandAnchor, InteractionConfig, LayerConfig,
    PlacementConfig,
};
