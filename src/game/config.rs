use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use super::state::Position;

/// Configuration for the game
///
/// Every tunable the simulation depends on lives here; the engine and the
/// session never hard-code a field size or a difficulty constant. Defaults
/// can be overridden from a JSON file and from CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Size of one grid cell in pixels; all committed positions are
    /// multiples of this
    pub grid_size: i32,
    /// Width of the play field in pixels (must be a multiple of grid_size)
    pub field_width: i32,
    /// Height of the play field in pixels (must be a multiple of grid_size)
    pub field_height: i32,
    /// Number of segments a fresh snake starts with
    pub initial_snake_length: usize,

    // Difficulty curve
    /// Sprite scale below the scale threshold
    pub base_scale: f32,
    /// Floor for the sprite scale
    pub min_scale: f32,
    /// Score at which the scale starts stepping down
    pub scale_threshold: u32,
    /// Scale reduction per threshold crossed
    pub scale_step: f32,
    /// Milliseconds per grid step below the speed threshold
    pub base_move_delay_ms: u64,
    /// Floor for the move delay
    pub min_move_delay_ms: u64,
    /// Score at which the move delay starts stepping down
    pub speed_threshold: u32,
    /// Delay reduction in milliseconds per threshold crossed
    pub speed_step_ms: u64,

    // Render interpolation
    /// Interpolation fraction added per rendered frame (0..1 per tick)
    pub interpolation_step: f32,

    // Roaming bonus hazard
    /// Pixels the hazard travels per rendered frame
    pub hazard_speed: f32,
    /// How long a spawned hazard stays on the field
    pub hazard_lifetime_ms: u64,
    /// Lower bound of the respawn cooldown
    pub hazard_cooldown_min_ms: u64,
    /// Upper bound of the respawn cooldown
    pub hazard_cooldown_max_ms: u64,

    // Leaderboard
    /// How many entries to request from the leaderboard service
    pub leaderboard_size: usize,
    /// Seconds between periodic leaderboard refreshes
    pub leaderboard_refresh_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            field_width: 800,
            field_height: 600,
            initial_snake_length: 1,
            base_scale: 0.15,
            min_scale: 0.05,
            scale_threshold: 500,
            scale_step: 0.02,
            base_move_delay_ms: 100,
            min_move_delay_ms: 40,
            speed_threshold: 200,
            speed_step_ms: 10,
            interpolation_step: 0.15,
            hazard_speed: 1.0,
            hazard_lifetime_ms: 10_000,
            hazard_cooldown_min_ms: 120_000,
            hazard_cooldown_max_ms: 180_000,
            leaderboard_size: 100,
            leaderboard_refresh_secs: 60,
        }
    }
}

impl GameConfig {
    /// Create a configuration for a field of the given size in cells
    pub fn with_cells(cells_x: i32, cells_y: i32) -> Self {
        let base = Self::default();
        Self {
            field_width: cells_x * base.grid_size,
            field_height: cells_y * base.grid_size,
            ..base
        }
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency of the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(self.grid_size > 0, "grid_size must be positive");
        ensure!(
            self.field_width > 0 && self.field_width % self.grid_size == 0,
            "field_width must be a positive multiple of grid_size"
        );
        ensure!(
            self.field_height > 0 && self.field_height % self.grid_size == 0,
            "field_height must be a positive multiple of grid_size"
        );
        ensure!(
            self.initial_snake_length >= 1,
            "initial_snake_length must be at least 1"
        );
        ensure!(
            (self.initial_snake_length as i64)
                < i64::from(self.cells_x()) * i64::from(self.cells_y()),
            "initial_snake_length must leave at least one free cell for food"
        );
        ensure!(
            self.min_scale > 0.0 && self.min_scale <= self.base_scale,
            "min_scale must be in (0, base_scale]"
        );
        ensure!(
            self.min_move_delay_ms > 0 && self.min_move_delay_ms <= self.base_move_delay_ms,
            "min_move_delay_ms must be in (0, base_move_delay_ms]"
        );
        ensure!(
            self.scale_threshold > 0 && self.speed_threshold > 0,
            "difficulty thresholds must be positive"
        );
        ensure!(
            self.interpolation_step > 0.0 && self.interpolation_step <= 1.0,
            "interpolation_step must be in (0, 1]"
        );
        ensure!(
            self.hazard_cooldown_min_ms <= self.hazard_cooldown_max_ms,
            "hazard cooldown bounds are inverted"
        );
        Ok(())
    }

    /// Number of grid cells along the x axis
    pub fn cells_x(&self) -> i32 {
        self.field_width / self.grid_size
    }

    /// Number of grid cells along the y axis
    pub fn cells_y(&self) -> i32 {
        self.field_height / self.grid_size
    }

    /// Check whether a position lies within the field bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.field_width && pos.y >= 0 && pos.y < self.field_height
    }

    /// Center of the field snapped to the lattice
    pub fn center(&self) -> Position {
        Position::new(
            self.cells_x() / 2 * self.grid_size,
            self.cells_y() / 2 * self.grid_size,
        )
    }

    /// How long a spawned hazard lives
    pub fn hazard_lifetime(&self) -> Duration {
        Duration::from_millis(self.hazard_lifetime_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.field_width, 800);
        assert_eq!(config.field_height, 600);
        assert_eq!(config.initial_snake_length, 1);
        config.validate().unwrap();
    }

    #[test]
    fn test_with_cells() {
        let config = GameConfig::with_cells(30, 20);
        assert_eq!(config.field_width, 600);
        assert_eq!(config.field_height, 400);
        assert_eq!(config.cells_x(), 30);
        assert_eq!(config.cells_y(), 20);
    }

    #[test]
    fn test_bounds() {
        let config = GameConfig::default();
        assert!(config.in_bounds(Position::new(0, 0)));
        assert!(config.in_bounds(Position::new(780, 580)));
        assert!(!config.in_bounds(Position::new(800, 0)));
        assert!(!config.in_bounds(Position::new(0, 600)));
        assert!(!config.in_bounds(Position::new(-20, 0)));
    }

    #[test]
    fn test_center_is_on_lattice() {
        let config = GameConfig::default();
        let center = config.center();
        assert_eq!(center.x % config.grid_size, 0);
        assert_eq!(center.y % config.grid_size, 0);
    }

    #[test]
    fn test_validate_rejects_misaligned_field() {
        let config = GameConfig {
            field_width: 810,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_snake_filling_the_field() {
        let config = GameConfig {
            initial_snake_length: 4,
            ..GameConfig::with_cells(2, 2)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_cooldown() {
        let config = GameConfig {
            hazard_cooldown_min_ms: 200_000,
            hazard_cooldown_max_ms: 100_000,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
