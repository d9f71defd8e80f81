//! Core simulation for grid snake
//!
//! This module contains all the game rules without any I/O or rendering dependencies.
//! Drivers call [`Simulation::tick`] on their own schedule and read back [`Snapshot`]s.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{EnemyPlacement, GameConfig, MAX_GRID_SIZE};
pub use engine::{Simulation, StatusMessage};
pub use state::{Cell, CollisionError, CollisionKind, RunState, Snake, Snapshot};
