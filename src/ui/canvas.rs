//! Cell-grid painter for the play area.
//!
//! The simulation runs in a fixed 400x600 logical coordinate space; this maps
//! logical positions onto whatever terminal rectangle we were given. Painters
//! draw back to front, later writes overwrite earlier ones.

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::effects::color::Rgb;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn tui_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

/// An off-screen character grid addressed in logical game coordinates.
#[derive(Debug)]
pub struct SceneCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl SceneCanvas {
    pub fn new(area: Rect) -> Self {
        let width = area.width as usize;
        let height = area.height as usize;
        SceneCanvas {
            width,
            height,
            cells: vec![
                Cell {
                    ch: ' ',
                    fg: Color::Reset,
                    bg: Color::Reset,
                };
                width * height
            ],
        }
    }

    pub fn cell_width(&self) -> usize {
        self.width
    }

    pub fn cell_height(&self) -> usize {
        self.height
    }

    /// Map a logical x to a cell column, if on screen.
    pub fn col(&self, x: f64) -> Option<usize> {
        if !(0.0..CANVAS_WIDTH).contains(&x) {
            return None;
        }
        let c = (x / CANVAS_WIDTH * self.width as f64) as usize;
        (c < self.width).then_some(c)
    }

    /// Map a logical y to a cell row, if on screen.
    pub fn row(&self, y: f64) -> Option<usize> {
        if !(0.0..CANVAS_HEIGHT).contains(&y) {
            return None;
        }
        let r = (y / CANVAS_HEIGHT * self.height as f64) as usize;
        (r < self.height).then_some(r)
    }

    /// Inverse of `row`: the logical y at the top of a cell row.
    pub fn row_to_y(&self, row: usize) -> f64 {
        row as f64 / self.height.max(1) as f64 * CANVAS_HEIGHT
    }

    /// Inverse of `col`: the logical x at the left of a cell column.
    pub fn col_to_x(&self, col: usize) -> f64 {
        col as f64 / self.width.max(1) as f64 * CANVAS_WIDTH
    }

    pub fn put_cell(&mut self, col: usize, row: usize, ch: char, fg: Color) {
        if col < self.width && row < self.height {
            let cell = &mut self.cells[row * self.width + col];
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    /// Paint a glyph at a logical position; off-screen positions are dropped.
    pub fn put(&mut self, x: f64, y: f64, ch: char, fg: Color) {
        if let (Some(c), Some(r)) = (self.col(x), self.row(y)) {
            self.put_cell(c, r, ch, fg);
        }
    }

    /// Fill a logical-coordinate rectangle with one glyph.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, ch: char, fg: Color) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let c0 = (x.max(0.0) / CANVAS_WIDTH * self.width as f64) as usize;
        let c1 = (((x + w).min(CANVAS_WIDTH) / CANVAS_WIDTH) * self.width as f64).ceil() as usize;
        let r0 = (y.max(0.0) / CANVAS_HEIGHT * self.height as f64) as usize;
        let r1 =
            (((y + h).min(CANVAS_HEIGHT) / CANVAS_HEIGHT) * self.height as f64).ceil() as usize;
        for r in r0..r1.min(self.height) {
            for c in c0..c1.min(self.width) {
                self.put_cell(c, r, ch, fg);
            }
        }
    }

    /// Paint every cell's background by row, top to bottom.
    pub fn fill_background<F: Fn(usize) -> Color>(&mut self, color_at_row: F) {
        for r in 0..self.height {
            let bg = color_at_row(r);
            for c in 0..self.width {
                self.cells[r * self.width + c].bg = bg;
            }
        }
    }

    /// Walk a logical-coordinate segment, painting each covered cell.
    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, ch: char, fg: Color) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = (dx.abs().max(dy.abs()) / 4.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.put(x0 + dx * t, y0 + dy * t, ch, fg);
        }
    }

    /// Write a text string starting at a cell position.
    pub fn draw_text(&mut self, col: usize, row: usize, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put_cell(col + i, row, ch, fg);
        }
    }

    /// Write a text string centered on a cell row.
    pub fn draw_text_centered(&mut self, row: usize, text: &str, fg: Color) {
        let len = text.chars().count();
        let col = self.width.saturating_sub(len) / 2;
        self.draw_text(col, row, text, fg);
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::with_capacity(self.height);
        for r in 0..self.height {
            let spans: Vec<Span> = (0..self.width)
                .map(|c| {
                    let cell = self.cells[r * self.width + c];
                    Span::styled(
                        cell.ch.to_string(),
                        Style::default().fg(cell.fg).bg(cell.bg),
                    )
                })
                .collect();
            lines.push(Line::from(spans));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> SceneCanvas {
        SceneCanvas::new(Rect::new(0, 0, 40, 30))
    }

    #[test]
    fn test_logical_corners_map_to_grid_corners() {
        let c = canvas();
        assert_eq!(c.col(0.0), Some(0));
        assert_eq!(c.row(0.0), Some(0));
        assert_eq!(c.col(CANVAS_WIDTH - 0.01), Some(39));
        assert_eq!(c.row(CANVAS_HEIGHT - 0.01), Some(29));
    }

    #[test]
    fn test_offscreen_coordinates_are_dropped() {
        let c = canvas();
        assert_eq!(c.col(-1.0), None);
        assert_eq!(c.col(CANVAS_WIDTH), None);
        assert_eq!(c.row(-0.5), None);
        assert_eq!(c.row(CANVAS_HEIGHT + 10.0), None);
    }

    #[test]
    fn test_put_offscreen_is_noop() {
        let mut c = canvas();
        // Must not panic or wrap around.
        c.put(-50.0, -50.0, 'x', Color::Red);
        c.put(CANVAS_WIDTH + 50.0, 10.0, 'x', Color::Red);
        assert_eq!(c.cells[0].ch, ' ');
    }

    #[test]
    fn test_fill_rect_clips_to_canvas() {
        let mut c = canvas();
        c.fill_rect(-100.0, -100.0, CANVAS_WIDTH + 200.0, CANVAS_HEIGHT + 200.0, '#', Color::Blue);
        assert!(c.cells.iter().all(|cell| cell.ch == '#'));
    }

    #[test]
    fn test_row_col_roundtrip() {
        let c = canvas();
        for row in 0..c.cell_height() {
            assert_eq!(c.row(c.row_to_y(row)), Some(row));
        }
        for col in 0..c.cell_width() {
            assert_eq!(c.col(c.col_to_x(col)), Some(col));
        }
    }
}
