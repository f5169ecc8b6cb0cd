//! Per-tick updates for the visual-effects layer.
//!
//! These functions take the clock (`now_ms`) and an RNG explicitly so the
//! whole layer can be driven deterministically from tests. None of them
//! touches simulation state; the score and tree speed come in read-only.

use crate::constants::*;
use crate::effects::color::{hsl_to_rgb, FIREWORK_COLORS};
use crate::effects::types::*;
use rand::Rng;

/// Per-tick step of the pulse triangle wave.
const PULSE_STEP: f64 = 0.002;
/// Per-tick progress of a mountain color interpolation.
const MOUNTAIN_COLOR_STEP: f64 = 0.02;

/// 5x7 bitmap glyphs for the digits 0-9, one row per byte, bit 4 leftmost.
const DIGIT_GLYPHS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

/// Logical units per glyph bitmap cell.
const GLYPH_CELL: f64 = 6.0;
const GLYPH_WIDTH: f64 = 5.0 * GLYPH_CELL;
const GLYPH_HEIGHT: f64 = 7.0 * GLYPH_CELL;
const GLYPH_SPACING: f64 = GLYPH_CELL;

/// Sample particle positions from the glyph shapes of `score`.
fn sample_score_text<R: Rng>(
    score: u32,
    center_x: f64,
    center_y: f64,
    rng: &mut R,
) -> Vec<TextSpark> {
    let digits: Vec<usize> = score
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();
    let total_width =
        digits.len() as f64 * GLYPH_WIDTH + (digits.len() as f64 - 1.0) * GLYPH_SPACING;
    let start_x = center_x - total_width / 2.0;
    let start_y = center_y - GLYPH_HEIGHT / 2.0;

    let mut sparks = Vec::new();
    for (i, &digit) in digits.iter().enumerate() {
        let glyph_x = start_x + i as f64 * (GLYPH_WIDTH + GLYPH_SPACING);
        for (row, bits) in DIGIT_GLYPHS[digit].iter().enumerate() {
            for col in 0..5 {
                if bits & (1 << (4 - col)) != 0 {
                    let x = glyph_x + col as f64 * GLYPH_CELL;
                    let y = start_y + row as f64 * GLYPH_CELL;
                    sparks.push(TextSpark {
                        x,
                        y,
                        origin_x: x,
                        origin_y: y,
                        vx: rng.gen_range(-1.0..1.0),
                        vy: rng.gen_range(-1.0..1.0),
                        alpha: 1.0,
                    });
                }
            }
        }
    }
    sparks
}

/// Create one firework burst anchored near (`anchor_x`, `anchor_y`).
pub fn spawn_firework<R: Rng>(
    fx: &mut VisualEffects,
    score: u32,
    anchor_x: f64,
    anchor_y: f64,
    now_ms: u64,
    rng: &mut R,
) {
    let center_x = anchor_x + rng.gen_range(-25.0..25.0);
    let center_y = anchor_y + rng.gen_range(-25.0..25.0);
    let color = FIREWORK_COLORS[rng.gen_range(0..FIREWORK_COLORS.len())];

    let mut sparks = Vec::with_capacity(FIREWORK_PARTICLES);
    for i in 0..FIREWORK_PARTICLES {
        let angle = std::f64::consts::TAU * i as f64 / FIREWORK_PARTICLES as f64;
        let speed = rng.gen_range(2.0..4.0);
        sparks.push(Spark {
            x: center_x,
            y: center_y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            alpha: 1.0,
            size: rng.gen_range(2.0..5.0),
        });
    }

    fx.fireworks.push(Firework {
        created_ms: now_ms,
        color,
        sparks,
        text_sparks: sample_score_text(score, center_x, center_y, rng),
    });
}

/// Age, move and prune fireworks. Explosion sparks drift apart under a small
/// gravity bias; text sparks explode for the first half of the lifetime, then
/// spring back toward their sampled glyph positions.
pub fn update_fireworks(fx: &mut VisualEffects, now_ms: u64) {
    fx.fireworks
        .retain(|f| now_ms.saturating_sub(f.created_ms) <= FIREWORK_TTL_MS);
    for firework in &mut fx.fireworks {
        let age = now_ms.saturating_sub(firework.created_ms);
        let alpha = (1.0 - age as f64 / FIREWORK_TTL_MS as f64).max(0.0);

        for spark in &mut firework.sparks {
            spark.x += spark.vx;
            spark.y += spark.vy;
            spark.vy += 0.05;
            spark.alpha = alpha;
        }

        let exploding = age < FIREWORK_TTL_MS / 2;
        for spark in &mut firework.text_sparks {
            if exploding {
                spark.x += spark.vx;
                spark.y += spark.vy;
            } else {
                spark.x += (spark.origin_x - spark.x) * 0.1;
                spark.y += (spark.origin_y - spark.y) * 0.1;
            }
            spark.alpha = alpha;
        }
    }
}

/// Scroll star streaks left and recycle them at the right edge. Stars acquire
/// a random hue lazily once colorization is active.
pub fn update_stars<R: Rng>(fx: &mut VisualEffects, speed_multiplier: f64, rng: &mut R) {
    for star in &mut fx.stars {
        star.x -= star.speed * speed_multiplier;
        if star.is_leaf {
            star.rotation = (star.rotation + star.speed) % 360.0;
        }
        if star.x < 0.0 {
            star.x = CANVAS_WIDTH;
            star.y = rng.gen_range(0.0..CANVAS_HEIGHT);
        }
        if fx.stars_colorized && star.color.is_none() {
            star.color = Some(hsl_to_rgb(rng.gen_range(0.0..360.0), 1.0, 0.5));
        }
    }
}

/// Inject the maple-leaf batch, once, if none are present.
pub fn inject_leaves<R: Rng>(fx: &mut VisualEffects, rng: &mut R) {
    if fx.stars.iter().any(|s| s.is_leaf) {
        return;
    }
    for _ in 0..LEAF_COUNT {
        fx.stars.push(Star::leaf(rng));
    }
}

/// Scroll the parallax layers and maintain the sliding window: evict the
/// leftmost segment once fully off-screen, append a fresh one at the right
/// edge. Above score 10 layer colors drift toward periodically re-rolled
/// targets by continuous interpolation.
pub fn update_mountains<R: Rng>(fx: &mut VisualEffects, tree_speed: f64, score: u32, rng: &mut R) {
    fx.mountain_hue = (fx.mountain_hue + 0.3) % 360.0;
    let mountain_hue = fx.mountain_hue;

    for (index, layer) in fx.mountains.iter_mut().enumerate() {
        if score >= 10 {
            layer.color_transition += MOUNTAIN_COLOR_STEP;
            if layer.color_transition >= 1.0 {
                layer.color_transition = 0.0;
                let hue = (mountain_hue + index as f64 * 40.0) % 360.0;
                let lightness = 0.30 + 0.20 * (1.0 - index as f64 / 2.0);
                layer.target_color = hsl_to_rgb(hue, 0.4, lightness);
            }
            layer.color = layer.color.blend(layer.target_color, 0.05);
        } else {
            layer.color = layer.base_color;
        }

        for segment in &mut layer.segments {
            segment.x -= tree_speed * layer.speed * 0.5;
        }

        let evict = layer
            .segments
            .first()
            .map(|s| s.x + s.width < 0.0)
            .unwrap_or(false);
        if evict {
            layer.segments.remove(0);
            let last = layer.segments.last().expect("layer never empties");
            let new_x = last.x + last.width - 40.0;
            layer
                .segments
                .push(MountainSegment::random_shape(rng, new_x));
        }
    }
}

/// Advance the pulse triangle wave between 0 and 1.
pub fn update_pulse(fx: &mut VisualEffects) {
    fx.pulse_value += PULSE_STEP * fx.pulse_direction;
    if fx.pulse_value >= 1.0 {
        fx.pulse_value = 1.0;
        fx.pulse_direction = -1.0;
    } else if fx.pulse_value <= 0.0 {
        fx.pulse_value = 0.0;
        fx.pulse_direction = 1.0;
    }
}

/// Lower the ball toward its target, rotate it, emit and age light rays.
pub fn update_disco_ball<R: Rng>(fx: &mut VisualEffects, now_ms: u64, rng: &mut R) {
    let ball = &mut fx.disco_ball;
    if !ball.active {
        return;
    }
    if ball.y < ball.target_y {
        ball.y += DISCO_DESCEND_SPEED;
    }
    ball.rotation = (ball.rotation + 0.5) % 360.0;

    if now_ms.saturating_sub(ball.last_ray_ms) >= DISCO_RAY_INTERVAL_MS {
        ball.rays.push(Ray {
            angle: rng.gen_range(0.0..std::f64::consts::TAU),
            length: 0.0,
            width: rng.gen_range(1.0..4.0),
            alpha: 0.6,
        });
        ball.last_ray_ms = now_ms;
    }

    for ray in &mut ball.rays {
        ray.length += 5.0;
        ray.alpha -= 0.02;
    }
    ball.rays.retain(|r| r.alpha > 0.0);
}

/// Spawn the initial 2-3 planet batch, spaced a full canvas width apart.
pub fn spawn_planets<R: Rng>(fx: &mut VisualEffects, rng: &mut R) {
    if !fx.space.planets.is_empty() {
        return;
    }
    let count = rng.gen_range(2..=3);
    for i in 0..count {
        let x = CANVAS_WIDTH + i as f64 * CANVAS_WIDTH;
        fx.space.planets.push(Planet::random(rng, x));
    }
}

/// Spawn 1-2 patrolling UFOs.
pub fn spawn_ufos<R: Rng>(fx: &mut VisualEffects, rng: &mut R) {
    let count = rng.gen_range(1..=2);
    for _ in 0..count {
        fx.space.ufos.push(Ufo::random(rng));
    }
}

/// Advance the space theme: ramp the transition, drift planets (wrapping to
/// the right with re-rolled properties), patrol UFOs with a sine bob, and
/// occasionally top the planet count back up.
pub fn update_space<R: Rng>(
    fx: &mut VisualEffects,
    tree_speed: f64,
    score: u32,
    now_ms: u64,
    rng: &mut R,
) {
    let space = &mut fx.space;
    if !space.active {
        return;
    }
    if space.transition < 1.0 {
        space.transition = (space.transition + 0.005).min(1.0);
    }

    for planet in &mut space.planets {
        planet.x -= planet.speed * tree_speed * 0.2;
        if planet.x < -planet.radius * 2.0 {
            planet.x = CANVAS_WIDTH + rng.gen_range(0.0..CANVAS_WIDTH);
            planet.y = rng.gen_range(0.15..0.75) * CANVAS_HEIGHT;
            planet.radius = rng.gen_range(10.0..25.0);
            planet.speed = rng.gen_range(0.05..0.2);
            planet.rings = rng.gen_bool(0.3);
        }
        if score >= 130 {
            planet.hue = (planet.hue + 0.2) % 360.0;
        }
    }

    // Probabilistic refill keeps a few planets in play once they unlock.
    if score >= 110 && space.planets.len() < 3 && rng.gen_bool(0.005) {
        let x = CANVAS_WIDTH + rng.gen_range(0.0..CANVAS_WIDTH / 2.0);
        space.planets.push(Planet::random(rng, x));
    }

    let t = now_ms as f64;
    for ufo in &mut space.ufos {
        ufo.x += ufo.speed_x;
        ufo.y += (t * 0.001 + ufo.phase).sin() * 0.5;

        let off_right = ufo.speed_x > 0.0 && ufo.x > CANVAS_WIDTH + ufo.width;
        let off_left = ufo.speed_x < 0.0 && ufo.x < -ufo.width;
        if off_right || off_left {
            ufo.x = if ufo.speed_x > 0.0 {
                -ufo.width
            } else {
                CANVAS_WIDTH + ufo.width
            };
            ufo.y = rng.gen_range(0.1..0.7) * CANVAS_HEIGHT;
            ufo.beam_active = rng.gen_bool(0.5);
        }

        if ufo.beam_active {
            ufo.beam_width = (t * 0.005).sin() * 5.0 + 15.0;
            if score >= 120 {
                ufo.beam_hue = (ufo.beam_hue + 1.0) % 360.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fx(seed: u64) -> (VisualEffects, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let fx = VisualEffects::new(&mut rng);
        (fx, rng)
    }

    #[test]
    fn test_firework_spark_counts() {
        let (mut fx, mut rng) = fx(1);
        spawn_firework(&mut fx, 10, 100.0, 300.0, 5000, &mut rng);
        assert_eq!(fx.fireworks.len(), 1);
        assert_eq!(fx.fireworks[0].sparks.len(), FIREWORK_PARTICLES);
        // "10" has two glyphs; both must contribute pixels.
        assert!(fx.fireworks[0].text_sparks.len() > 20);
    }

    #[test]
    fn test_firework_expires_after_ttl() {
        let (mut fx, mut rng) = fx(2);
        spawn_firework(&mut fx, 10, 100.0, 300.0, 1000, &mut rng);
        update_fireworks(&mut fx, 1000 + FIREWORK_TTL_MS);
        assert_eq!(fx.fireworks.len(), 1);
        update_fireworks(&mut fx, 1001 + FIREWORK_TTL_MS);
        assert!(fx.fireworks.is_empty());
    }

    #[test]
    fn test_text_sparks_return_home() {
        let (mut fx, mut rng) = fx(3);
        spawn_firework(&mut fx, 7, 200.0, 300.0, 0, &mut rng);
        // Run well into the second half of the lifetime.
        for ms in (0..=1900).step_by(16) {
            update_fireworks(&mut fx, ms);
        }
        let fw = &fx.fireworks[0];
        for spark in &fw.text_sparks {
            assert!((spark.x - spark.origin_x).abs() < 2.0);
            assert!((spark.y - spark.origin_y).abs() < 2.0);
        }
    }

    #[test]
    fn test_stars_recycle_to_right_edge() {
        let (mut fx, mut rng) = fx(4);
        fx.stars[0].x = 0.5;
        fx.stars[0].speed = 2.0;
        update_stars(&mut fx, 1.0, &mut rng);
        assert_eq!(fx.stars[0].x, CANVAS_WIDTH);
    }

    #[test]
    fn test_lazy_star_colorization() {
        let (mut fx, mut rng) = fx(5);
        update_stars(&mut fx, 1.0, &mut rng);
        assert!(fx.stars.iter().all(|s| s.color.is_none()));
        fx.stars_colorized = true;
        update_stars(&mut fx, 1.0, &mut rng);
        assert!(fx.stars.iter().all(|s| s.color.is_some()));
    }

    #[test]
    fn test_inject_leaves_is_idempotent() {
        let (mut fx, mut rng) = fx(6);
        inject_leaves(&mut fx, &mut rng);
        let count = fx.stars.iter().filter(|s| s.is_leaf).count();
        assert_eq!(count, LEAF_COUNT);
        inject_leaves(&mut fx, &mut rng);
        let count = fx.stars.iter().filter(|s| s.is_leaf).count();
        assert_eq!(count, LEAF_COUNT);
    }

    #[test]
    fn test_mountain_strip_stays_continuous() {
        let (mut fx, mut rng) = fx(7);
        for _ in 0..5000 {
            update_mountains(&mut fx, 4.0, 0, &mut rng);
        }
        for layer in &fx.mountains {
            let last = layer.segments.last().unwrap();
            assert!(
                last.x + last.width >= CANVAS_WIDTH,
                "strip must keep covering the canvas"
            );
            for pair in layer.segments.windows(2) {
                assert!(pair[1].x > pair[0].x, "segments stay ordered");
                assert!(
                    pair[1].x < pair[0].x + pair[0].width,
                    "segments keep overlapping"
                );
            }
        }
    }

    #[test]
    fn test_mountain_colors_drift_above_ten() {
        let (mut fx, mut rng) = fx(8);
        let base = fx.mountains[0].base_color;
        for _ in 0..500 {
            update_mountains(&mut fx, 2.0, 15, &mut rng);
        }
        assert_ne!(fx.mountains[0].color, base);
        // Below the threshold the base color is restored.
        update_mountains(&mut fx, 2.0, 0, &mut rng);
        assert_eq!(fx.mountains[0].color, base);
    }

    #[test]
    fn test_pulse_stays_in_unit_range() {
        let (mut fx, _) = fx(9);
        for _ in 0..3000 {
            update_pulse(&mut fx);
            assert!((0.0..=1.0).contains(&fx.pulse_value));
        }
    }

    #[test]
    fn test_disco_ball_descends_and_emits() {
        let (mut fx, mut rng) = fx(10);
        fx.disco_ball.activate();
        let mut now = 0u64;
        for _ in 0..200 {
            now += TICK_INTERVAL_MS;
            update_disco_ball(&mut fx, now, &mut rng);
        }
        assert!(fx.disco_ball.y >= fx.disco_ball.target_y);
        assert!(!fx.disco_ball.rays.is_empty());
        // Rays fade out: none may exceed the initial alpha.
        assert!(fx.disco_ball.rays.iter().all(|r| r.alpha <= 0.6));
    }

    #[test]
    fn test_space_transition_monotonic_and_capped() {
        let (mut fx, mut rng) = fx(11);
        fx.space.active = true;
        let mut prev = 0.0;
        for tick in 0..500 {
            update_space(&mut fx, 2.0, 100, tick * TICK_INTERVAL_MS, &mut rng);
            assert!(fx.space.transition >= prev);
            prev = fx.space.transition;
        }
        assert_eq!(fx.space.transition, 1.0);
    }

    #[test]
    fn test_planets_wrap_to_the_right() {
        let (mut fx, mut rng) = fx(12);
        fx.space.active = true;
        spawn_planets(&mut fx, &mut rng);
        let n = fx.space.planets.len();
        fx.space.planets[0].x = -100.0;
        update_space(&mut fx, 2.0, 110, 0, &mut rng);
        assert_eq!(fx.space.planets.len(), n);
        assert!(fx.space.planets[0].x >= CANVAS_WIDTH);
    }

    #[test]
    fn test_spawn_planets_once() {
        let (mut fx, mut rng) = fx(13);
        spawn_planets(&mut fx, &mut rng);
        let n = fx.space.planets.len();
        assert!((2..=3).contains(&n));
        spawn_planets(&mut fx, &mut rng);
        assert_eq!(fx.space.planets.len(), n);
    }
}
