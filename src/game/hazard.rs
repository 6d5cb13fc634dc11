use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use super::config::GameConfig;
use super::state::Vec2;

/// The roaming bonus hazard ("fatnadsjohn"): spawns at a field edge, drifts
/// inward, and ends the run on contact with the snake head.
///
/// The vanish deadline lives inside the hazard value, so destroying the
/// hazard destroys the deadline with it; a stale expiry acting on a dead
/// entity is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub pos: Vec2,
    pub dir: Vec2,
    pub spawned_at: Duration,
    pub vanish_at: Duration,
}

/// What a frame of hazard processing produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardUpdate {
    /// Nothing of note: absent, moved, spawned or expired
    Idle,
    /// The hazard touched the snake head; it has been destroyed
    Collision,
}

/// Timer-driven hazard lifecycle, advanced every rendered frame
///
/// Independent of the grid tick cadence. Movement is a fixed per-frame
/// increment, matching the source behavior; `hazard_speed` makes the rate
/// configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardScheduler {
    active: Option<Hazard>,
    next_spawn_at: Duration,
}

impl HazardScheduler {
    /// Schedule the first spawn one cooldown after `now`
    pub fn new(now: Duration, config: &GameConfig, rng: &mut StdRng) -> Self {
        Self {
            active: None,
            next_spawn_at: now + Self::cooldown(config, rng),
        }
    }

    pub fn active(&self) -> Option<&Hazard> {
        self.active.as_ref()
    }

    /// Destroy any active hazard and schedule the next spawn
    pub fn reset(&mut self, now: Duration, config: &GameConfig, rng: &mut StdRng) {
        self.active = None;
        self.next_spawn_at = now + Self::cooldown(config, rng);
    }

    /// One frame of hazard processing: spawn when due, expire past the
    /// deadline, move, and test head proximity
    pub fn update(
        &mut self,
        now: Duration,
        head: Vec2,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> HazardUpdate {
        if self.active.is_none() && now > self.next_spawn_at {
            self.active = Some(Self::spawn(now, config, rng));
        }

        let Some(hazard) = self.active.as_mut() else {
            return HazardUpdate::Idle;
        };

        if now >= hazard.vanish_at {
            self.active = None;
            self.next_spawn_at = now + Self::cooldown(config, rng);
            return HazardUpdate::Idle;
        }

        hazard.pos.x += hazard.dir.x * config.hazard_speed;
        hazard.pos.y += hazard.dir.y * config.hazard_speed;

        let grid = config.grid_size as f32;
        if (head.x - hazard.pos.x).abs() < grid && (head.y - hazard.pos.y).abs() < grid {
            self.active = None;
            return HazardUpdate::Collision;
        }

        HazardUpdate::Idle
    }

    /// Pick one of the four edges uniformly and a random point along it,
    /// facing inward
    fn spawn(now: Duration, config: &GameConfig, rng: &mut StdRng) -> Hazard {
        let width = config.field_width as f32;
        let height = config.field_height as f32;
        let (pos, dir) = match rng.gen_range(0..4) {
            0 => (
                Vec2 {
                    x: rng.gen_range(0.0..=width),
                    y: 0.0,
                },
                Vec2 { x: 0.0, y: 1.0 },
            ),
            1 => (
                Vec2 {
                    x: rng.gen_range(0.0..=width),
                    y: height,
                },
                Vec2 { x: 0.0, y: -1.0 },
            ),
            2 => (
                Vec2 {
                    x: 0.0,
                    y: rng.gen_range(0.0..=height),
                },
                Vec2 { x: 1.0, y: 0.0 },
            ),
            _ => (
                Vec2 {
                    x: width,
                    y: rng.gen_range(0.0..=height),
                },
                Vec2 { x: -1.0, y: 0.0 },
            ),
        };
        Hazard {
            pos,
            dir,
            spawned_at: now,
            vanish_at: now + config.hazard_lifetime(),
        }
    }

    fn cooldown(config: &GameConfig, rng: &mut StdRng) -> Duration {
        Duration::from_millis(
            rng.gen_range(config.hazard_cooldown_min_ms..=config.hazard_cooldown_max_ms),
        )
    }
}
