use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::chain::{leaderboard::rank_of, ScoreEntry, SubmissionStatus};
use crate::game::{Character, FoodKind, GameOverReason, GameSession, Phase};
use crate::metrics::GameMetrics;

/// Everything the renderer needs for one frame, read-only
pub struct ViewState<'a> {
    pub session: &'a GameSession,
    pub metrics: &'a GameMetrics,
    pub submission: &'a SubmissionStatus,
    pub board: &'a [ScoreEntry],
    pub player: &'a str,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &ViewState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area + leaderboard
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(view);
        frame.render_widget(stats, chunks[0]);

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[1]);

        match view.session.phase() {
            Phase::CharacterSelect => {
                frame.render_widget(self.render_character_select(), main[0]);
            }
            Phase::GameOver => {
                frame.render_widget(self.render_game_over(view), main[0]);
            }
            Phase::Ready | Phase::Running => {
                frame.render_widget(self.render_grid(main[0], view), main[0]);
            }
        }

        frame.render_widget(self.render_leaderboard(view), main[1]);
        frame.render_widget(self.render_controls(view), chunks[2]);
    }

    fn render_grid(&self, _area: Rect, view: &ViewState) -> Paragraph<'_> {
        let session = view.session;
        let config = session.config();
        let grid = config.grid_size;
        let cells_x = config.cells_x();
        let cells_y = config.cells_y();

        // Interpolated positions rounded onto cells; drawing never touches
        // the authoritative grid state
        let to_cell = |x: f32, y: f32| -> (i32, i32) {
            (
                (x / grid as f32).round() as i32,
                (y / grid as f32).round() as i32,
            )
        };

        let head_cell = {
            let head = session.snake().head();
            to_cell(head.display.x, head.display.y)
        };
        let body_cells: Vec<(i32, i32)> = session.snake().segments[1..]
            .iter()
            .map(|s| to_cell(s.display.x, s.display.y))
            .collect();
        let food = session.food();
        let food_cell = (food.position.x / grid, food.position.y / grid);
        let hazard_cell = session
            .hazard()
            .map(|h| to_cell(h.pos.x, h.pos.y));

        let head_color = match session.character() {
            Some(Character::Keonehon) => Color::Cyan,
            Some(Character::Mouch) => Color::Yellow,
            Some(Character::Vans) => Color::Magenta,
            Some(Character::Molandak) | None => Color::Green,
        };

        let mut lines = Vec::with_capacity(cells_y as usize);
        for y in 0..cells_y {
            let mut spans = Vec::with_capacity(cells_x as usize);
            for x in 0..cells_x {
                let cell = (x, y);
                let span = if cell == head_cell {
                    Span::styled(
                        "■ ",
                        Style::default().fg(head_color).add_modifier(Modifier::BOLD),
                    )
                } else if hazard_cell == Some(cell) {
                    Span::styled(
                        "X ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if body_cells.contains(&cell) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if cell == food_cell {
                    match food.kind {
                        FoodKind::Normal => {
                            Span::styled("o ", Style::default().fg(Color::Red))
                        }
                        FoodKind::Bonus20 => Span::styled(
                            "◆ ",
                            Style::default()
                                .fg(Color::Magenta)
                                .add_modifier(Modifier::BOLD),
                        ),
                        FoodKind::Bonus30 => Span::styled(
                            "★ ",
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        ),
                    }
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }

        let title = if session.phase() == Phase::Ready {
            " Xenzia — press SPACE to start "
        } else {
            " Xenzia "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_character_select(&self) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Choose Your Character",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, character) in Character::ALL.iter().enumerate() {
            text.push(Line::from(vec![
                Span::styled(
                    format!("  {}  ", i + 1),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(character.name(), Style::default().fg(Color::Cyan)),
            ]));
        }
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "Press 1-4 to pick",
            Style::default().fg(Color::Gray),
        )));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(" Xenzia "),
        )
    }

    fn render_game_over(&self, view: &ViewState) -> Paragraph<'_> {
        let session = view.session;
        let reason = match session.game_over_reason() {
            Some(GameOverReason::Wall) => "You hit the wall",
            Some(GameOverReason::SelfHit) => "You ran into yourself",
            Some(GameOverReason::Hazard) => "Fatnadsjohn got you",
            Some(GameOverReason::BoardFull) => "You filled the whole board",
            None => "",
        };

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    session.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if let Some(message) = view.submission.message() {
            let color = match view.submission {
                SubmissionStatus::Confirmed(_) => Color::Green,
                SubmissionStatus::InFlight => Color::Yellow,
                _ => Color::Red,
            };
            text.push(Line::from(Span::styled(
                message,
                Style::default().fg(color),
            )));
        }

        if let Some(rank) = rank_of(view.board, view.player) {
            text.push(Line::from(Span::styled(
                format!("Leaderboard rank: #{rank}"),
                Style::default().fg(Color::Cyan),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_leaderboard(&self, view: &ViewState) -> Paragraph<'_> {
        let mut lines = Vec::new();
        if view.board.is_empty() {
            lines.push(Line::from(Span::styled(
                "No scores yet",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, entry) in view.board.iter().enumerate().take(15) {
            let date = chrono::DateTime::from_timestamp(entry.timestamp, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let mine = entry.player.eq_ignore_ascii_case(view.player);
            let style = if mine {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "{:>3} {:<14} {:>6} {}",
                    i + 1,
                    shorten(&entry.player),
                    entry.score,
                    date
                ),
                style,
            )));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Leaderboard ")
                .border_style(Style::default().fg(Color::White)),
        )
    }

    fn render_stats(&self, view: &ViewState) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.session.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.metrics.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(view.metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self, view: &ViewState) -> Paragraph<'_> {
        let hint = match view.session.phase() {
            Phase::CharacterSelect => "1-4 to choose | Q to quit",
            Phase::Ready => "SPACE to start | ↑↓←→/WASD to steer | Q to quit",
            Phase::Running => "SPACE to pause | ↑↓←→/WASD to steer | Q to quit",
            Phase::GameOver => "R to restart | Q to quit",
        };
        Paragraph::new(vec![Line::from(Span::styled(
            hint,
            Style::default().fg(Color::Cyan),
        ))])
        .alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First six and last four characters of an address-like player id. Counted
/// in characters, not bytes, so multi-byte names cannot split a boundary.
fn shorten(player: &str) -> String {
    let chars: Vec<char> = player.chars().collect();
    if chars.len() > 13 {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        player.to_string()
    }
}
