//! Xenzia - a grid-based snake arcade game with an on-chain leaderboard
//!
//! This library provides:
//! - Core simulation (game module): grid movement, collisions, scoring,
//!   difficulty curve, roaming bonus hazard, session phase machine
//! - Abstract collaborator seams (chain and audio modules)
//! - TUI rendering (render module)
//! - Keyboard input handling (input module)
//! - The interactive play mode (modes module)

pub mod audio;
pub mod chain;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
