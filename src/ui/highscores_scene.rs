//! High-scores screen: sortable leaderboard table plus the hidden purge flow.

use crate::scoreboard::geo::flag_emoji;
use crate::scoreboard::types::{ScoreEntry, SortOrder};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

/// Confirmation phrase the purge flow requires, typed in full.
pub const PURGE_PHRASE: &str = "PURGE";

/// UI state for the high-scores screen.
#[derive(Debug, Clone)]
pub struct HighScoresScreen {
    pub entries: Vec<ScoreEntry>,
    pub order: SortOrder,
    pub loading: bool,
    pub error: Option<String>,
    /// Set by the Ctrl+P unlock gesture; reveals the purge confirmation.
    pub purge_unlocked: bool,
    /// What the player has typed toward `PURGE_PHRASE`.
    pub purge_input: String,
}

impl HighScoresScreen {
    pub fn new() -> Self {
        HighScoresScreen {
            entries: Vec::new(),
            order: SortOrder::default(),
            loading: true,
            error: None,
            purge_unlocked: false,
            purge_input: String::new(),
        }
    }

    pub fn set_entries(&mut self, mut entries: Vec<ScoreEntry>) {
        self.order.apply(&mut entries);
        self.entries = entries;
        self.loading = false;
        self.error = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn cycle_sort(&mut self) {
        self.order = self.order.next();
        let mut entries = std::mem::take(&mut self.entries);
        self.order.apply(&mut entries);
        self.entries = entries;
    }

    pub fn unlock_purge(&mut self) {
        self.purge_unlocked = true;
        self.purge_input.clear();
    }

    pub fn cancel_purge(&mut self) {
        self.purge_unlocked = false;
        self.purge_input.clear();
    }

    /// Feed a typed character into the confirmation; returns true once the
    /// full phrase has been entered.
    pub fn purge_key(&mut self, c: char) -> bool {
        if !self.purge_unlocked {
            return false;
        }
        self.purge_input.push(c.to_ascii_uppercase());
        if !PURGE_PHRASE.starts_with(&self.purge_input) {
            self.purge_input.clear();
            return false;
        }
        self.purge_input == PURGE_PHRASE
    }
}

impl Default for HighScoresScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the high-scores screen.
pub fn render_highscores(frame: &mut Frame, area: Rect, screen: &HighScoresScreen) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" High Scores (by {}) ", screen.order.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(inner);

    if screen.loading {
        frame.render_widget(
            Paragraph::new("Loading scores...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            chunks[0],
        );
    } else if let Some(error) = &screen.error {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(
                    "[R] Retry",
                    Style::default().fg(Color::Cyan),
                )),
            ])
            .alignment(Alignment::Center),
            chunks[0],
        );
    } else if screen.entries.is_empty() {
        frame.render_widget(
            Paragraph::new("No scores yet. Go honk at some trees!")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            chunks[0],
        );
    } else {
        render_table(frame, chunks[0], screen);
    }

    render_footer(frame, chunks[1], screen);
}

fn render_table(frame: &mut Frame, area: Rect, screen: &HighScoresScreen) {
    let header = Row::new(vec!["#", "Name", "Score", "Country", "Date"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = screen
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let rank_style = match i {
                0 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                1 | 2 => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Color::DarkGray),
            };
            Row::new(vec![
                Span::styled(format!("{}", i + 1), rank_style),
                Span::raw(e.name.clone()),
                Span::styled(
                    e.score.to_string(),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(format!("{} {}", flag_emoji(&e.country), e.country_name)),
                Span::styled(
                    short_date(&e.date),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Min(14),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .column_spacing(1);

    frame.render_widget(table, area);
}

fn render_footer(frame: &mut Frame, area: Rect, screen: &HighScoresScreen) {
    let line = if screen.purge_unlocked {
        Line::from(vec![
            Span::styled(
                format!("Type {} to erase ALL scores: ", PURGE_PHRASE),
                Style::default().fg(Color::Red),
            ),
            Span::styled(
                format!("{}_", screen.purge_input),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   [Esc] Cancel", Style::default().fg(Color::Cyan)),
        ])
    } else {
        Line::from(vec![
            Span::styled("[S]", Style::default().fg(Color::Cyan)),
            Span::raw(" Sort  "),
            Span::styled("[R]", Style::default().fg(Color::Cyan)),
            Span::raw(" Refresh  "),
            Span::styled("[Esc]", Style::default().fg(Color::Cyan)),
            Span::raw(" Back"),
        ])
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// "M/D" display form of an RFC 3339 date, matching the compact table column.
fn short_date(date: &str) -> String {
    let mut parts = date.split('T').next().unwrap_or("").split('-');
    let _year = parts.next();
    match (parts.next(), parts.next()) {
        (Some(month), Some(day)) => format!(
            "{}/{}",
            month.trim_start_matches('0'),
            day.trim_start_matches('0')
        ),
        _ => "?".to_string(),
    }
}
