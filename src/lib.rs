//! Grid Snake - a snake game on a fixed grid with a growing enemy population
//!
//! This library provides:
//! - Core simulation (game module), free of any I/O
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal driver (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
