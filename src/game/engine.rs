use rand::rngs::StdRng;
use rand::Rng;

use super::config::GameConfig;
use super::difficulty;
use super::state::{Food, FoodKind, GameOverReason, Position, Segment, SimState, Snake};

/// Result of advancing the grid one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved without eating
    Moved,
    /// The snake ate the food; the kind is the one consumed
    Ate(FoodKind),
    /// The run ended; no commit happened beyond the staged targets
    GameOver(GameOverReason),
}

/// The grid engine: movement, collision detection and scoring
///
/// Owns no mutable state of its own; it rewrites the `SimState` it is handed
/// and reports what happened. Game-over is a returned value, never an error.
pub struct GridEngine {
    config: GameConfig,
}

impl GridEngine {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh simulation state: snake at the field center heading
    /// right, food at a random free lattice cell
    pub fn reset(&self, rng: &mut StdRng) -> SimState {
        let scale = self.config.base_scale;
        let snake = Snake::new(
            self.config.center(),
            super::action::Direction::Right,
            self.config.initial_snake_length,
            self.config.grid_size,
            scale,
        );
        // Validated configs always leave at least one free cell
        let food = Food {
            position: self
                .spawn_food_position(&snake, rng)
                .unwrap_or_else(|| self.config.center()),
            kind: FoodKind::Normal,
            scale,
        };
        SimState {
            snake,
            food,
            score: 0,
            scale,
        }
    }

    /// Advance the authoritative grid state by one tick.
    ///
    /// Caller must only invoke this once the previous tick's interpolation
    /// has completed; the engine assumes every segment is at rest on its
    /// target. On `GameOver` the staged `start`/`target` fields may already
    /// be written, but nothing else is committed.
    pub fn advance_tick(&self, sim: &mut SimState, rng: &mut StdRng) -> TickOutcome {
        let grid = self.config.grid_size;

        // Record each segment's committed position as its interpolation start
        let prev: Vec<Position> = sim
            .snake
            .segments
            .iter()
            .map(|s| s.committed())
            .collect();
        for (seg, pos) in sim.snake.segments.iter_mut().zip(&prev) {
            seg.start = *pos;
        }

        // Head target, then follow-the-leader for the body
        let head_target = prev[0].stepped(sim.snake.direction, grid);
        sim.snake.segments[0].target = head_target;
        for i in 1..sim.snake.segments.len() {
            sim.snake.segments[i].target = prev[i - 1];
        }

        if !self.config.in_bounds(head_target) {
            return TickOutcome::GameOver(GameOverReason::Wall);
        }

        if sim.snake.body_targets_contain(head_target) {
            return TickOutcome::GameOver(GameOverReason::SelfHit);
        }

        // Food proximity on both axes
        let near_x = (head_target.x - sim.food.position.x).abs() < grid;
        let near_y = (head_target.y - sim.food.position.y).abs() < grid;
        if near_x && near_y {
            let eaten = sim.food.kind;
            if self.consume_food(sim, eaten, rng) {
                return TickOutcome::Ate(eaten);
            }
            return TickOutcome::GameOver(GameOverReason::BoardFull);
        }

        TickOutcome::Moved
    }

    /// Current tick cadence for a score
    pub fn move_interval(&self, score: u32) -> std::time::Duration {
        difficulty::move_interval_for(score, &self.config)
    }

    /// Apply growth, scoring and the kind ladder, then relocate the food.
    /// Returns false when the grown snake leaves no free cell; score and
    /// growth still commit so the final score reflects the last bite.
    fn consume_food(&self, sim: &mut SimState, eaten: FoodKind, rng: &mut StdRng) -> bool {
        let new_score = sim.score + eaten.points();

        // Grow: new tail segment at the previous tail's pre-tick position,
        // stationary for this tick
        let tail_pos = sim
            .snake
            .segments
            .last()
            .map(|s| s.start)
            .unwrap_or_else(|| self.config.center());
        let scale = difficulty::scale_for(new_score, &self.config);
        sim.snake.segments.push(Segment::at(tail_pos, scale));

        // Post-increment scale applies to every segment and the food
        for seg in &mut sim.snake.segments {
            seg.scale = scale;
        }
        sim.food.scale = scale;
        sim.scale = scale;

        sim.score = new_score;

        // Bonus food reverts to normal after consumption; normal food
        // upgrades on exact score multiples, the 530 rule checked second so
        // a common multiple ends up Bonus30
        sim.food.kind = match eaten {
            FoodKind::Bonus20 | FoodKind::Bonus30 => FoodKind::Normal,
            FoodKind::Normal => {
                let mut kind = FoodKind::Normal;
                if new_score % 100 == 0 {
                    kind = FoodKind::Bonus20;
                }
                if new_score % 530 == 0 {
                    kind = FoodKind::Bonus30;
                }
                kind
            }
        };

        match self.spawn_food_position(&sim.snake, rng) {
            Some(pos) => {
                sim.food.position = pos;
                true
            }
            None => false,
        }
    }

    /// Pick a uniformly random lattice cell inside the field that the snake
    /// does not occupy; None when no such cell exists
    fn spawn_food_position(&self, snake: &Snake, rng: &mut StdRng) -> Option<Position> {
        let mut free = Vec::new();
        for cy in 0..self.config.cells_y() {
            for cx in 0..self.config.cells_x() {
                let pos = Position::new(cx * self.config.grid_size, cy * self.config.grid_size);
                if !snake.occupies(pos) {
                    free.push(pos);
                }
            }
        }
        if free.is_empty() {
            None
        } else {
            Some(free[rng.gen_range(0..free.len())])
        }
    }
}
