//! The in-game scene: layered playfield rendering plus the score HUD.
//!
//! Draw order is fixed back to front: sky, starfield, mountains, space
//! decorations, disco ball, trees, fireworks, flock geese, the goose, HUD.

use crate::constants::*;
use crate::effects::color::{hsl_to_rgb, Rgb};
use crate::effects::types::{MountainLayer, VisualEffects};
use crate::game::types::{Game, GamePhase};
use crate::ui::canvas::{tui_color, SceneCanvas};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear},
    Frame,
};

const SPACE_SKY: Rgb = Rgb(0x05, 0x05, 0x14);

/// Render the full game scene.
pub fn render_game(frame: &mut Frame, area: Rect, game: &Game, now_ms: u64) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Flappy Goose ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 10 || inner.height < 8 {
        return;
    }

    let mut canvas = SceneCanvas::new(inner);
    let fx = &game.effects;

    paint_sky(&mut canvas, fx);
    paint_stars(&mut canvas, fx);
    paint_mountains(&mut canvas, fx);
    paint_space(&mut canvas, fx, now_ms);
    paint_disco_ball(&mut canvas, fx);
    paint_trees(&mut canvas, game);
    paint_fireworks(&mut canvas, fx);
    paint_flock(&mut canvas, game);
    paint_goose(&mut canvas, game);
    paint_hud(&mut canvas, game);

    canvas.render(frame, inner);
}

/// Vertical sky gradient with the drifting hue; blends to near-black as the
/// space transition ramps, and lightens with the pulse.
fn paint_sky(canvas: &mut SceneCanvas, fx: &VisualEffects) {
    let rows = canvas.cell_height();
    let transition = fx.space.transition;
    let hue = (200.0 + fx.background_hue) % 360.0;
    let pulse_lift = fx.pulse_value * 0.10;

    let colors: Vec<Color> = (0..rows)
        .map(|r| {
            let depth = r as f64 / rows.max(1) as f64;
            let lightness = (0.62 - 0.22 * depth + pulse_lift).clamp(0.0, 1.0);
            let sky = hsl_to_rgb(hue, 0.55, lightness);
            tui_color(sky.blend(SPACE_SKY, transition))
        })
        .collect();
    canvas.fill_background(|r| colors[r]);
}

fn paint_stars(canvas: &mut SceneCanvas, fx: &VisualEffects) {
    for star in &fx.stars {
        let color = star
            .color
            .map(tui_color)
            .unwrap_or(Color::Rgb(0xE0, 0xE0, 0xE0));
        let ch = if star.is_leaf {
            // Leaves tumble; alternate the glyph with rotation.
            if (star.rotation as u32 / 90) % 2 == 0 {
                '❧'
            } else {
                '~'
            }
        } else if star.size >= 2.0 {
            '+'
        } else {
            '·'
        };
        canvas.put(star.x, star.y, ch, color);
    }
}

/// Triangular ridge height at logical x, 0 when outside the segment.
fn ridge_height(layer: &MountainLayer, x: f64) -> f64 {
    let mut best = 0.0f64;
    for seg in &layer.segments {
        if x >= seg.x && x <= seg.x + seg.width {
            let t = (x - seg.x) / seg.width;
            let h = seg.height * (1.0 - (2.0 * t - 1.0).abs());
            best = best.max(h);
        }
    }
    best
}

fn paint_mountains(canvas: &mut SceneCanvas, fx: &VisualEffects) {
    // Mountains fade out underneath the space theme.
    let visibility = 1.0 - fx.space.transition;
    if visibility <= 0.0 {
        return;
    }
    for layer in &fx.mountains {
        let color = tui_color(layer.color.blend(SPACE_SKY, fx.space.transition));
        let baseline = layer.baseline * CANVAS_HEIGHT;
        for col in 0..canvas.cell_width() {
            let x = canvas.col_to_x(col);
            let h = ridge_height(layer, x);
            if h <= 0.0 {
                continue;
            }
            let top_row = canvas.row((baseline - h).max(0.0)).unwrap_or(0);
            let bottom_row = canvas
                .row(baseline.min(CANVAS_HEIGHT - 0.01))
                .unwrap_or(canvas.cell_height() - 1);
            for row in top_row..=bottom_row {
                canvas.put_cell(col, row, '█', color);
            }
        }
    }
}

fn paint_space(canvas: &mut SceneCanvas, fx: &VisualEffects, now_ms: u64) {
    if !fx.space.active {
        return;
    }
    for planet in &fx.space.planets {
        let color = tui_color(hsl_to_rgb(planet.hue, 0.6, 0.55));
        // A planet covers a disc of cells proportional to its radius.
        let r = planet.radius;
        let mut y = planet.y - r;
        while y <= planet.y + r {
            let dy = (y - planet.y).abs();
            let half = (r * r - dy * dy).max(0.0).sqrt();
            let mut x = planet.x - half;
            while x <= planet.x + half {
                canvas.put(x, y, '●', color);
                x += CANVAS_WIDTH / canvas.cell_width() as f64;
            }
            y += CANVAS_HEIGHT / canvas.cell_height() as f64;
        }
        if planet.rings {
            canvas.draw_line(
                planet.x - r * 1.6,
                planet.y,
                planet.x + r * 1.6,
                planet.y,
                '─',
                color,
            );
        }
    }

    for ufo in &fx.space.ufos {
        let body = tui_color(Rgb(0xB0, 0xB0, 0xC8));
        let dome = tui_color(Rgb(0x80, 0xFF, 0xE0));
        canvas.put(ufo.x, ufo.y - ufo.height / 2.0, '◠', dome);
        canvas.draw_line(
            ufo.x - ufo.width / 2.0,
            ufo.y,
            ufo.x + ufo.width / 2.0,
            ufo.y,
            '▬',
            body,
        );
        if ufo.beam_active {
            let beam = tui_color(hsl_to_rgb(ufo.beam_hue, 0.8, 0.6));
            let flicker = ((now_ms / 100) % 2) as f64;
            let spread = ufo.beam_width + flicker;
            let bottom = (ufo.y + 120.0).min(CANVAS_HEIGHT - 1.0);
            canvas.draw_line(ufo.x, ufo.y, ufo.x - spread, bottom, '░', beam);
            canvas.draw_line(ufo.x, ufo.y, ufo.x + spread, bottom, '░', beam);
        }
    }
}

fn paint_disco_ball(canvas: &mut SceneCanvas, fx: &VisualEffects) {
    let ball = &fx.disco_ball;
    if !ball.active {
        return;
    }
    let cx = CANVAS_WIDTH / 2.0;

    for ray in &ball.rays {
        let color = tui_color(hsl_to_rgb(ray.angle.to_degrees(), 0.9, 0.6).dim(ray.alpha));
        canvas.draw_line(
            cx,
            ball.y,
            cx + ray.angle.cos() * ray.length,
            ball.y + ray.angle.sin() * ray.length,
            '·',
            color,
        );
    }

    // Hanging wire, then the mirrored ball.
    let silver = tui_color(Rgb(0xC0, 0xC0, 0xC8));
    canvas.draw_line(cx, 0.0, cx, ball.y, '│', silver);
    let shimmer = if (ball.rotation as u32 / 45) % 2 == 0 {
        '◆'
    } else {
        '◇'
    };
    canvas.put(cx, ball.y, '◉', silver);
    canvas.put(cx - 8.0, ball.y, shimmer, silver);
    canvas.put(cx + 8.0, ball.y, shimmer, silver);
}

fn paint_trees(canvas: &mut SceneCanvas, game: &Game) {
    let trunk = tui_color(Rgb(0x6B, 0x45, 0x23));
    let foliage = tui_color(Rgb(0x2E, 0x8B, 0x2E));
    let foliage_dark = tui_color(Rgb(0x1E, 0x6B, 0x1E));

    for tree in &game.trees {
        // Top barrier: foliage hanging down to the gap.
        canvas.fill_rect(tree.x, 0.0, TREE_WIDTH, tree.gap_y, '▓', foliage);
        canvas.fill_rect(
            tree.x + TREE_WIDTH / 3.0,
            0.0,
            TREE_WIDTH / 3.0,
            tree.gap_y,
            '║',
            trunk,
        );
        // Gap lip rows read as canopy edges.
        canvas.fill_rect(tree.x, (tree.gap_y - 12.0).max(0.0), TREE_WIDTH, 12.0, '▒', foliage_dark);

        // Bottom barrier: trunk rising out of the ground with a canopy cap.
        let bottom_y = tree.gap_y + TREE_GAP;
        let bottom_h = CANVAS_HEIGHT - bottom_y;
        canvas.fill_rect(tree.x, bottom_y, TREE_WIDTH, bottom_h, '▓', foliage);
        canvas.fill_rect(
            tree.x + TREE_WIDTH / 3.0,
            bottom_y,
            TREE_WIDTH / 3.0,
            bottom_h,
            '║',
            trunk,
        );
        canvas.fill_rect(tree.x, bottom_y, TREE_WIDTH, 12.0, '▒', foliage_dark);
    }
}

fn paint_fireworks(canvas: &mut SceneCanvas, fx: &VisualEffects) {
    for firework in &fx.fireworks {
        for spark in &firework.sparks {
            let ch = if spark.size >= 3.5 { '✦' } else { '•' };
            canvas.put(spark.x, spark.y, ch, tui_color(firework.color.dim(spark.alpha)));
        }
        let gold = Rgb(0xFF, 0xD7, 0x00);
        for spark in &firework.text_sparks {
            canvas.put(spark.x, spark.y, '◦', tui_color(gold.dim(spark.alpha)));
        }
    }
}

fn goose_glyphs(wing_phase: f64, rotation: f64) -> (char, char) {
    let wing = if wing_phase.sin() > 0.0 { '^' } else { 'v' };
    let beak = if rotation < 0.0 { '›' } else { '»' };
    (wing, beak)
}

fn paint_flock(canvas: &mut SceneCanvas, game: &Game) {
    for goose in &game.flock {
        let (wing, _) = goose_glyphs(goose.wing_phase, goose.rotation);
        let color = tui_color(goose.color);
        canvas.put(goose.x, goose.y, '●', color);
        canvas.put(goose.x, goose.y - 8.0, wing, color);
    }
}

fn paint_goose(canvas: &mut SceneCanvas, game: &Game) {
    let goose = &game.goose;
    let color = tui_color(goose.color);
    let center_x = GOOSE_X + GOOSE_SIZE / 2.0;
    let center_y = goose.y + GOOSE_SIZE / 2.0;
    let (wing, beak) = goose_glyphs(goose.wing_phase, goose.rotation);

    canvas.fill_rect(
        GOOSE_X + 8.0,
        goose.y + 12.0,
        GOOSE_SIZE - 16.0,
        GOOSE_SIZE - 24.0,
        '█',
        color,
    );
    canvas.put(center_x, goose.y + 6.0, wing, color);
    canvas.put(GOOSE_X + GOOSE_SIZE, center_y, beak, tui_color(Rgb(0xFF, 0x8C, 0x00)));
    // Eye sits on the head regardless of terminal cell granularity.
    canvas.put(GOOSE_X + GOOSE_SIZE - 14.0, goose.y + 16.0, 'o', Color::Black);
}

fn paint_hud(canvas: &mut SceneCanvas, game: &Game) {
    let score_text = format!(" Score: {} ", game.score);
    canvas.draw_text_centered(0, &score_text, Color::White);
    if game.speed_multiplier > 1.0 {
        let speed_text = format!(" Speed: x{:.1} ", game.speed_multiplier);
        canvas.draw_text(1, 1, &speed_text, Color::Yellow);
    }
    if game.phase == GamePhase::Idle {
        let mid = canvas.cell_height() / 2;
        canvas.draw_text_centered(mid.saturating_sub(2), "Press Space to start!", Color::Yellow);
        canvas.draw_text_centered(mid, "Space flaps. Trees hurt.", Color::Gray);
    }
}

/// Status-bar hint line under the playfield.
pub fn render_status_bar(frame: &mut Frame, area: Rect, game: &Game) {
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let hints: Vec<Span> = match game.phase {
        GamePhase::Playing => vec![
            Span::styled("[Space]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Flap  "),
            Span::styled("[Q]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit"),
        ],
        _ => vec![
            Span::styled("[Space]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Start  "),
            Span::styled("[H]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" High Scores  "),
            Span::styled("[Q]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit"),
        ],
    };
    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ridge_height_peaks_at_segment_center() {
        let layer = MountainLayer {
            segments: vec![crate::effects::types::MountainSegment {
                x: 100.0,
                width: 200.0,
                height: 150.0,
            }],
            speed: 0.2,
            baseline: 0.75,
            base_color: Rgb(0, 0, 0),
            color: Rgb(0, 0, 0),
            target_color: Rgb(0, 0, 0),
            color_transition: 0.0,
        };
        assert_eq!(ridge_height(&layer, 200.0), 150.0);
        assert_eq!(ridge_height(&layer, 100.0), 0.0);
        assert_eq!(ridge_height(&layer, 300.0), 0.0);
        assert_eq!(ridge_height(&layer, 50.0), 0.0);
        assert!(ridge_height(&layer, 150.0) > 0.0);
    }

    #[test]
    fn test_goose_glyphs_follow_wing_phase() {
        let (up, _) = goose_glyphs(0.5, 0.0);
        let (down, _) = goose_glyphs(std::f64::consts::PI + 0.5, 0.0);
        assert_eq!(up, '^');
        assert_eq!(down, 'v');
    }
}
