//! The title screen: banner, goose color picker, and key hints.

use crate::effects::color::GOOSE_COLORS;
use crate::ui::canvas::tui_color;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const TITLE: &[&str] = &[
    r"  ___ _                         ___                      ",
    r" | __| |__ _ _ __ _ __ _  _    / __|___  ___ ___ ___     ",
    r" | _|| / _` | '_ \ '_ \ || |  | (_ / _ \/ _ (_-</ -_)    ",
    r" |_| |_\__,_| .__/ .__/\_, |   \___\___/\___/__/\___|    ",
    r"            |_|  |_|   |__/                    honk!     ",
];

/// Render the title screen. `selected_color` indexes into `GOOSE_COLORS`.
pub fn render_start(frame: &mut Frame, area: Rect, selected_color: usize) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .split(inner);

    let mut title_lines: Vec<Line> = vec![Line::from("")];
    title_lines.extend(TITLE.iter().map(|row| {
        Line::from(Span::styled(
            *row,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    }));
    frame.render_widget(
        Paragraph::new(title_lines).alignment(Alignment::Center),
        chunks[0],
    );

    render_color_picker(frame, chunks[1], selected_color);

    let hints = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("[Space] ", Style::default().fg(Color::Cyan)),
            Span::raw("Start   "),
            Span::styled("[◄/►] ", Style::default().fg(Color::Cyan)),
            Span::raw("Goose color   "),
            Span::styled("[H] ", Style::default().fg(Color::Cyan)),
            Span::raw("High scores   "),
            Span::styled("[Q] ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        chunks[2],
    );
}

fn render_color_picker(frame: &mut Frame, area: Rect, selected: usize) {
    let (name, rgb) = GOOSE_COLORS[selected % GOOSE_COLORS.len()];
    let body = tui_color(rgb);

    let lines = vec![
        Line::from(Span::styled(
            "Pick your goose",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled("◄  ", Style::default().fg(Color::Cyan)),
            Span::styled("███", Style::default().fg(body)),
            Span::styled("  ►", Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            name,
            Style::default().fg(body).add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}
