//! Navigation core for Node Runner.
//!
//! Computes per-target hint maps over a tile grid for two cost profiles
//! (careful for the player, reckless for hostiles) and keeps them in step
//! with bricks that break and regenerate.

pub mod config;
pub mod domain;
pub mod logging;
pub mod sim;

pub use config::NavConfig;
pub use domain::entity::{ActorId, ActorKind, Commands, ProfileKind};
pub use domain::hint::Hint;
pub use sim::board::Board;
pub use sim::event::GameEvent;
pub use sim::level::{LevelDef, LevelError};
