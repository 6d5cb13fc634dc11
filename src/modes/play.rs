use std::io::{stderr, Stderr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::audio::{AudioSink, SoundEffect};
use crate::chain::{
    ChainError, ChainService, LeaderboardService, ScoreEntry, SubmissionStatus, TxConfirmation,
};
use crate::game::{GameConfig, GameSession, Phase, SessionEvent};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, ViewState};

/// Completion notices from in-flight chain calls, observed on the game loop
/// thread without ever blocking it
enum ChainMessage {
    Submission(Result<TxConfirmation, ChainError>),
    Board(Result<Vec<ScoreEntry>, ChainError>),
}

/// The interactive play mode: owns the session, dispatches its side-effect
/// intents to the collaborators, and drives the terminal UI.
pub struct PlayMode<S, A> {
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    audio: A,
    chain: Arc<S>,
    player: String,
    submission: SubmissionStatus,
    board: Vec<ScoreEntry>,
    started_at: Instant,
    run_in_progress: bool,
    should_quit: bool,
    chain_tx: mpsc::UnboundedSender<ChainMessage>,
    chain_rx: Option<mpsc::UnboundedReceiver<ChainMessage>>,
}

impl<S, A> PlayMode<S, A>
where
    S: ChainService + LeaderboardService + Send + Sync + 'static,
    A: AudioSink,
{
    pub fn new(
        config: GameConfig,
        seed: Option<u64>,
        chain: Arc<S>,
        player: String,
        audio: A,
    ) -> Self {
        let (chain_tx, chain_rx) = mpsc::unbounded_channel();
        Self {
            session: GameSession::new(config, seed),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            audio,
            chain,
            player,
            submission: SubmissionStatus::Idle,
            board: Vec::new(),
            started_at: Instant::now(),
            run_in_progress: false,
            should_quit: false,
            chain_tx,
            chain_rx: Some(chain_rx),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut chain_rx = self
            .chain_rx
            .take()
            .context("Game loop started twice")?;

        // Render (and interpolation/hazard frame) at 30 FPS; the grid tick
        // is gated inside the session by the score-dependent move interval
        let mut render_timer = interval(Duration::from_millis(33));

        // Leaderboard refresh runs regardless of game phase; the first tick
        // fires immediately and populates the initial board
        let refresh = Duration::from_secs(self.session.config().leaderboard_refresh_secs);
        let mut board_timer = interval(refresh);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Render frame: interpolation, hazard, gated grid tick
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let events = self.session.frame(self.started_at.elapsed());
                    self.handle_session_events(events);
                    terminal.draw(|frame| {
                        let view = ViewState {
                            session: &self.session,
                            metrics: &self.metrics,
                            submission: &self.submission,
                            board: &self.board,
                            player: &self.player,
                        };
                        self.renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                // Periodic leaderboard refresh
                _ = board_timer.tick() => {
                    self.spawn_board_refresh();
                }

                // Completed chain calls
                Some(message) = chain_rx.recv() => {
                    self.handle_chain_message(message);
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => {
                    self.session.queue_direction(direction);
                }
                KeyAction::TogglePause => {
                    let events = self.session.toggle_pause();
                    // The run clock starts when the run actually launches,
                    // not on pause/resume and not while idling in the menus
                    if self.session.phase() == Phase::Running && !self.run_in_progress {
                        self.metrics.on_game_start();
                        self.run_in_progress = true;
                    }
                    self.handle_session_events(events);
                }
                KeyAction::Select(character) => {
                    self.session.select_character(character);
                }
                KeyAction::Restart => {
                    self.session.restart(self.started_at.elapsed());
                    self.run_in_progress = false;
                    self.submission = SubmissionStatus::Idle;
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn handle_session_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::MusicPlay => self.audio.play_music(),
                SessionEvent::MusicPause => self.audio.pause_music(),
                SessionEvent::MusicStop => self.audio.stop_all(),
                SessionEvent::PlayEffect(kind) => {
                    self.audio.play_effect(SoundEffect::for_food(kind));
                }
                SessionEvent::GameOver { score, .. } => {
                    self.run_in_progress = false;
                    self.metrics.on_game_over(score);
                    self.spawn_submission(score);
                }
            }
        }
    }

    /// Dispatch the once-per-run score submission without stalling the loop;
    /// the game-over screen stays interactive while it is in flight
    fn spawn_submission(&mut self, score: u32) {
        if !self.chain.is_connected() {
            self.submission = SubmissionStatus::NotConnected;
            return;
        }
        self.submission = SubmissionStatus::InFlight;

        let chain = Arc::clone(&self.chain);
        let tx = self.chain_tx.clone();
        tokio::spawn(async move {
            let result = chain.submit_score(score).await;
            let _ = tx.send(ChainMessage::Submission(result));
        });
    }

    fn spawn_board_refresh(&self) {
        let chain = Arc::clone(&self.chain);
        let tx = self.chain_tx.clone();
        let n = self.session.config().leaderboard_size;
        tokio::spawn(async move {
            let result = chain.fetch_top_scores(n).await;
            let _ = tx.send(ChainMessage::Board(result));
        });
    }

    fn handle_chain_message(&mut self, message: ChainMessage) {
        match message {
            ChainMessage::Submission(Ok(confirmation)) => {
                self.submission = SubmissionStatus::Confirmed(confirmation);
                // Fresh submission should show up right away
                self.spawn_board_refresh();
            }
            ChainMessage::Submission(Err(error)) => {
                self.submission = SubmissionStatus::Failed(error);
            }
            ChainMessage::Board(Ok(board)) => {
                self.board = board;
            }
            ChainMessage::Board(Err(_)) => {
                // Stale board stays up; the next refresh retries
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
