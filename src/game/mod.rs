//! Core simulation module for Xenzia
//!
//! Everything here is free of I/O and rendering dependencies: the grid
//! engine, difficulty curve, hazard scheduler and session phase machine can
//! be driven synthetically from tests with a fake clock and a fixed seed.

pub mod action;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod hazard;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GridEngine, TickOutcome};
pub use hazard::{Hazard, HazardScheduler, HazardUpdate};
pub use session::{GameSession, SessionEvent};
pub use state::{
    Character, Food, FoodKind, GameOverReason, Phase, Position, Segment, SimState, Snake, Vec2,
};
