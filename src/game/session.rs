use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::action::Direction;
use super::config::GameConfig;
use super::engine::{GridEngine, TickOutcome};
use super::hazard::{Hazard, HazardScheduler, HazardUpdate};
use super::state::{Character, Food, FoodKind, GameOverReason, Phase, SimState, Snake};

/// Side-effect intents the session emits for its collaborators
///
/// The session never talks to audio, wallet or leaderboard services itself;
/// it reports what should happen and the play mode dispatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Start or resume background music
    MusicPlay,
    /// Pause background music
    MusicPause,
    /// Stop all audio
    MusicStop,
    /// Play the eat effect for the consumed food kind
    PlayEffect(FoodKind),
    /// The run ended; score submission may be attempted
    GameOver { reason: GameOverReason, score: u32 },
}

/// The game session: owns all mutable simulation state and the phase machine
///
/// Two cadences share one thread. `frame` runs every rendered frame and
/// advances the interpolation fraction and the hazard; the grid tick inside
/// it only fires once the move interval elapsed and interpolation reached
/// 1.0. Time is supplied by the caller as a duration since session start so
/// tests can drive it synthetically.
pub struct GameSession {
    engine: GridEngine,
    rng: StdRng,
    sim: SimState,
    hazard: HazardScheduler,
    phase: Phase,
    character: Option<Character>,
    pending_direction: Option<Direction>,
    interpolation: f32,
    next_tick_at: Duration,
    game_over_reason: Option<GameOverReason>,
}

impl GameSession {
    /// Create a fresh session in character selection. `seed` fixes the food
    /// and hazard placement for reproducible runs; `None` seeds from entropy.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let engine = GridEngine::new(config.clone());
        let sim = engine.reset(&mut rng);
        let hazard = HazardScheduler::new(Duration::ZERO, &config, &mut rng);
        Self {
            engine,
            rng,
            sim,
            hazard,
            phase: Phase::CharacterSelect,
            character: None,
            pending_direction: None,
            // Fully interpolated so the first tick fires immediately
            interpolation: 1.0,
            next_tick_at: Duration::ZERO,
            game_over_reason: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.sim.score
    }

    pub fn snake(&self) -> &Snake {
        &self.sim.snake
    }

    pub fn food(&self) -> &Food {
        &self.sim.food
    }

    pub fn scale(&self) -> f32 {
        self.sim.scale
    }

    pub fn hazard(&self) -> Option<&Hazard> {
        self.hazard.active()
    }

    pub fn character(&self) -> Option<Character> {
        self.character
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn interpolation(&self) -> f32 {
        self.interpolation
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Pick a character; only meaningful during character selection
    pub fn select_character(&mut self, character: Character) {
        if self.phase == Phase::CharacterSelect {
            self.character = Some(character);
            self.phase = Phase::Ready;
        }
    }

    /// Toggle between Ready and Running; ignored in any other phase
    pub fn toggle_pause(&mut self) -> Vec<SessionEvent> {
        match self.phase {
            Phase::Ready => {
                self.phase = Phase::Running;
                vec![SessionEvent::MusicPlay]
            }
            Phase::Running => {
                self.phase = Phase::Ready;
                vec![SessionEvent::MusicPause]
            }
            Phase::CharacterSelect | Phase::GameOver => Vec::new(),
        }
    }

    /// Queue a direction for the next tick. Only the most recent request per
    /// tick is kept; a reversal of the committed direction is dropped at
    /// commit time.
    pub fn queue_direction(&mut self, direction: Direction) {
        if self.phase == Phase::Running {
            self.pending_direction = Some(direction);
        }
    }

    /// Advance one rendered frame: interpolation, hazard, and the gated grid
    /// tick. Does nothing outside the Running phase.
    pub fn frame(&mut self, now: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }

        self.advance_interpolation();

        let head = self.sim.snake.head().display;
        let config = self.engine.config();
        if self.hazard.update(now, head, config, &mut self.rng) == HazardUpdate::Collision {
            self.enter_game_over(GameOverReason::Hazard, &mut events);
            return events;
        }

        if now >= self.next_tick_at && self.interpolation >= 1.0 {
            if let Some(direction) = self.pending_direction.take() {
                if !self.sim.snake.direction.is_opposite(direction) {
                    self.sim.snake.direction = direction;
                }
            }

            match self.engine.advance_tick(&mut self.sim, &mut self.rng) {
                TickOutcome::GameOver(reason) => {
                    self.enter_game_over(reason, &mut events);
                }
                outcome => {
                    if let TickOutcome::Ate(kind) = outcome {
                        events.push(SessionEvent::PlayEffect(kind));
                    }
                    self.interpolation = 0.0;
                    self.next_tick_at = now + self.engine.move_interval(self.sim.score);
                }
            }
        }

        events
    }

    /// Reset the whole run and return to Ready. The chosen character is kept.
    pub fn restart(&mut self, now: Duration) {
        if self.phase == Phase::CharacterSelect {
            return;
        }
        self.sim = self.engine.reset(&mut self.rng);
        self.hazard.reset(now, self.engine.config(), &mut self.rng);
        self.pending_direction = None;
        self.interpolation = 1.0;
        self.next_tick_at = now;
        self.game_over_reason = None;
        self.phase = Phase::Ready;
    }

    fn advance_interpolation(&mut self) {
        if self.interpolation >= 1.0 {
            return;
        }
        let step = self.engine.config().interpolation_step;
        self.interpolation = (self.interpolation + step).min(1.0);
        let t = self.interpolation;
        for seg in &mut self.sim.snake.segments {
            seg.display.x = seg.start.x as f32 + (seg.target.x - seg.start.x) as f32 * t;
            seg.display.y = seg.start.y as f32 + (seg.target.y - seg.start.y) as f32 * t;
        }
    }

    fn enter_game_over(&mut self, reason: GameOverReason, events: &mut Vec<SessionEvent>) {
        self.phase = Phase::GameOver;
        self.game_over_reason = Some(reason);
        events.push(SessionEvent::MusicStop);
        events.push(SessionEvent::GameOver {
            reason,
            score: self.sim.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Position;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn running_session(seed: u64) -> GameSession {
        let mut session = GameSession::new(GameConfig::default(), Some(seed));
        session.select_character(Character::Molandak);
        session.toggle_pause();
        assert_eq!(session.phase(), Phase::Running);
        session
    }

    /// Drive frames at a fixed 16ms cadence until the given time
    fn run_until(session: &mut GameSession, from_ms: u64, to_ms: u64) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let mut t = from_ms;
        while t <= to_ms {
            events.extend(session.frame(ms(t)));
            t += 16;
        }
        events
    }

    #[test]
    fn test_phase_machine_happy_path() {
        let mut session = GameSession::new(GameConfig::default(), Some(1));
        assert_eq!(session.phase(), Phase::CharacterSelect);

        // Pause and steering are ignored before a character is chosen
        assert!(session.toggle_pause().is_empty());
        assert_eq!(session.phase(), Phase::CharacterSelect);

        session.select_character(Character::Vans);
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.character(), Some(Character::Vans));

        let events = session.toggle_pause();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(events, vec![SessionEvent::MusicPlay]);

        let events = session.toggle_pause();
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(events, vec![SessionEvent::MusicPause]);
    }

    #[test]
    fn test_frame_is_inert_when_paused() {
        let mut session = GameSession::new(GameConfig::default(), Some(1));
        session.select_character(Character::Mouch);
        let snake_before = session.snake().clone();

        assert!(session.frame(ms(10_000)).is_empty());
        assert_eq!(session.snake(), &snake_before);
    }

    #[test]
    fn test_tick_waits_for_interpolation() {
        let mut session = running_session(1);
        // First tick fires immediately (interpolation starts complete)
        session.frame(ms(0));
        assert_eq!(session.interpolation(), 0.0);
        let head_after_first = session.snake().head().committed();

        // Time passes the move interval, but with a tiny interpolation step
        // the fraction is still below 1.0 after one frame, so no tick
        session.frame(ms(200));
        assert_eq!(session.snake().head().committed(), head_after_first);
    }

    #[test]
    fn test_interpolation_reaches_target_exactly() {
        let mut session = running_session(1);
        session.frame(ms(0));
        let head = session.snake().head().clone();
        assert_eq!(head.display.x, head.start.x as f32);

        // 0.15 per frame: 7 frames clamp to exactly 1.0. All frames stay
        // inside the 100ms move interval so no second tick fires.
        for i in 1..=7 {
            session.frame(ms(i * 10));
        }
        assert_eq!(session.interpolation(), 1.0);
        let head = session.snake().head();
        assert_eq!(head.display.x, head.target.x as f32);
        assert_eq!(head.display.y, head.target.y as f32);
    }

    #[test]
    fn test_no_reverse_commit() {
        let mut session = running_session(1);
        session.frame(ms(0));
        assert_eq!(session.snake().direction, Direction::Right);

        // A reversal request is dropped at commit time
        session.queue_direction(Direction::Left);
        run_until(&mut session, 16, 400);
        assert_eq!(session.snake().direction, Direction::Right);
    }

    #[test]
    fn test_latest_direction_wins() {
        let mut session = running_session(1);
        session.frame(ms(0));

        session.queue_direction(Direction::Up);
        session.queue_direction(Direction::Down);
        run_until(&mut session, 16, 400);
        // Down was the most recent non-reversing request
        assert_eq!(session.snake().direction, Direction::Down);
    }

    #[test]
    fn test_wall_run_ends_with_game_over_event() {
        let mut config = GameConfig::default();
        config.field_width = 200;
        config.field_height = 200;
        let mut session = GameSession::new(config, Some(1));
        session.select_character(Character::Keonehon);
        session.toggle_pause();

        let events = run_until(&mut session, 0, 60_000);
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.game_over_reason(), Some(GameOverReason::Wall));
        assert!(events.contains(&SessionEvent::MusicStop));
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::GameOver { reason: GameOverReason::Wall, .. })));

        // Terminal until restart: pause toggles and frames are no-ops
        assert!(session.toggle_pause().is_empty());
        assert!(session.frame(ms(61_000)).is_empty());
    }

    #[test]
    fn test_eat_emits_effect() {
        let mut session = running_session(3);
        session.frame(ms(0));
        // Park the food right of the head, two grid steps out
        let head = session.snake().head().committed();
        session.sim.food.position = Position::new(head.x + 40, head.y);

        let events = run_until(&mut session, 16, 2_000);
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::PlayEffect(FoodKind::Normal))));
        assert!(session.score() >= 10);
    }

    #[test]
    fn test_restart_resets_run_state() {
        let mut config = GameConfig::default();
        config.field_width = 200;
        config.field_height = 200;
        let mut session = GameSession::new(config.clone(), Some(1));
        session.select_character(Character::Molandak);
        session.toggle_pause();
        run_until(&mut session, 0, 60_000);
        assert_eq!(session.phase(), Phase::GameOver);

        session.restart(ms(60_000));

        let fresh = GameSession::new(config, Some(99));
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake().len(), fresh.snake().len());
        assert_eq!(session.snake().head().committed(), fresh.snake().head().committed());
        assert_eq!(session.snake().direction, fresh.snake().direction);
        assert_eq!(session.food().kind, FoodKind::Normal);
        assert!(session.hazard().is_none());
        assert_eq!(session.game_over_reason(), None);
        assert_eq!(session.scale(), session.config().base_scale);
        // Character survives the restart
        assert_eq!(session.character(), Some(Character::Molandak));
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let script = |session: &mut GameSession| -> (u32, Option<GameOverReason>) {
            session.select_character(Character::Vans);
            session.toggle_pause();
            let mut t = 0u64;
            while session.phase() == Phase::Running && t < 120_000 {
                if t == 1_000 {
                    session.queue_direction(Direction::Down);
                }
                if t == 2_000 {
                    session.queue_direction(Direction::Left);
                }
                session.frame(ms(t));
                t += 16;
            }
            (session.score(), session.game_over_reason())
        };

        let mut a = GameSession::new(GameConfig::default(), Some(1234));
        let mut b = GameSession::new(GameConfig::default(), Some(1234));
        assert_eq!(script(&mut a), script(&mut b));
        assert_eq!(a.snake().segments, b.snake().segments);
        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn test_grid_invariant_holds_over_long_run() {
        let mut session = running_session(5);
        let grid = session.config().grid_size;
        let mut t = 0u64;
        while session.phase() == Phase::Running && t < 30_000 {
            session.frame(ms(t));
            for seg in &session.snake().segments {
                assert_eq!(seg.committed().x % grid, 0);
                assert_eq!(seg.committed().y % grid, 0);
            }
            t += 16;
        }
    }
}
