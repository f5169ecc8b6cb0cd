//! Game-over overlay: score recap, high-score name entry, restart gating.

use crate::constants::MAX_NAME_LEN;
use crate::game::types::Game;
use crate::scoreboard::ordinal;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Where the post-run submission flow currently stands. Driven by the app
/// loop as background store calls land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    /// Background high-score check in flight.
    Checking,
    /// The run qualifies; the player is typing a name.
    Prompt { placement: usize },
    /// The run did not make the board.
    NotHighScore,
    /// Submission in flight.
    Submitting,
    Submitted { placement: usize },
    Failed(String),
}

/// UI state for the game-over screen.
#[derive(Debug, Clone)]
pub struct GameOverScreen {
    pub name: String,
    pub state: SubmitState,
}

impl GameOverScreen {
    pub fn new() -> Self {
        GameOverScreen {
            name: String::new(),
            state: SubmitState::Checking,
        }
    }

    /// Name entry only accepts input while prompting, capped at the limit.
    pub fn handle_char(&mut self, c: char) {
        if matches!(self.state, SubmitState::Prompt { .. })
            && !c.is_control()
            && self.name.chars().count() < MAX_NAME_LEN
        {
            self.name.push(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if matches!(self.state, SubmitState::Prompt { .. } | SubmitState::Failed(_)) {
            self.name.pop();
        }
    }

    pub fn accepting_text(&self) -> bool {
        matches!(self.state, SubmitState::Prompt { .. } | SubmitState::Failed(_))
    }
}

impl Default for GameOverScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the game-over overlay on top of the (frozen) game scene.
pub fn render_game_over(
    frame: &mut Frame,
    area: Rect,
    game: &Game,
    screen: &GameOverScreen,
    now_ms: u64,
) {
    let width = 46.min(area.width);
    let height = 12.min(area.height);
    let overlay = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .title(" Game Over ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "HONK... splat.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Final score: "),
            Span::styled(
                game.score.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    match &screen.state {
        SubmitState::Checking => {
            lines.push(Line::from(Span::styled(
                "Checking the leaderboard...",
                Style::default().fg(Color::DarkGray),
            )));
        }
        SubmitState::Prompt { placement } => {
            lines.push(Line::from(Span::styled(
                format!("New high score! You placed {}.", ordinal(*placement)),
                Style::default().fg(Color::Green),
            )));
            lines.push(name_entry_line(&screen.name));
            lines.push(Line::from(Span::styled(
                "[Enter] Submit",
                Style::default().fg(Color::Cyan),
            )));
        }
        SubmitState::NotHighScore => {
            lines.push(Line::from(Span::styled(
                "No leaderboard spot this time.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        SubmitState::Submitting => {
            lines.push(Line::from(Span::styled(
                "Submitting...",
                Style::default().fg(Color::DarkGray),
            )));
        }
        SubmitState::Submitted { placement } => {
            lines.push(Line::from(Span::styled(
                format!("Saved! You are {} on the board.", ordinal(*placement)),
                Style::default().fg(Color::Green),
            )));
            lines.push(Line::from(Span::styled(
                "[H] View high scores",
                Style::default().fg(Color::Cyan),
            )));
        }
        SubmitState::Failed(message) => {
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )));
            lines.push(name_entry_line(&screen.name));
            lines.push(Line::from(Span::styled(
                "[Enter] Retry",
                Style::default().fg(Color::Cyan),
            )));
        }
    }

    lines.push(Line::from(""));
    if game.can_restart(now_ms) {
        lines.push(Line::from(Span::styled(
            "[Space] Play again   [Q] Quit",
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

fn name_entry_line(name: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("Name: "),
        Span::styled(
            format!("{}_", name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}
