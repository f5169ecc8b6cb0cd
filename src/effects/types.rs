//! Data structures for the layered visual-effects system.
//!
//! Everything here is decorative: it reads the score and the clock but never
//! feeds back into collision or scoring. Dynamic collections are plain `Vec`s
//! pruned once per tick with `retain`.

use crate::constants::*;
use crate::effects::color::{Rgb, MOUNTAIN_BASE_COLORS};
use rand::Rng;

/// An ambient background particle: a star streak, or a maple leaf once the
/// leaf milestone has fired.
#[derive(Debug, Clone)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    /// Assigned lazily once star colorization is active.
    pub color: Option<Rgb>,
    pub is_leaf: bool,
    /// Degrees; only meaningful for leaves.
    pub rotation: f64,
}

impl Star {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Star {
            x: rng.gen_range(0.0..CANVAS_WIDTH),
            y: rng.gen_range(0.0..CANVAS_HEIGHT),
            size: rng.gen_range(1.0..3.0),
            speed: rng.gen_range(1.0..3.0),
            color: None,
            is_leaf: false,
            rotation: 0.0,
        }
    }

    pub fn leaf<R: Rng>(rng: &mut R) -> Self {
        Star {
            x: rng.gen_range(0.0..CANVAS_WIDTH),
            y: rng.gen_range(0.0..CANVAS_HEIGHT),
            size: rng.gen_range(2.0..5.0),
            speed: rng.gen_range(2.0..5.0),
            color: Some(Rgb(0xFF, 0x00, 0x00)),
            is_leaf: true,
            rotation: rng.gen_range(0.0..360.0),
        }
    }
}

/// One triangular mountain in a parallax layer.
#[derive(Debug, Clone)]
pub struct MountainSegment {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

impl MountainSegment {
    pub fn random_shape<R: Rng>(rng: &mut R, x: f64) -> Self {
        MountainSegment {
            x,
            width: rng.gen_range(150.0..300.0),
            height: rng.gen_range(100.0..250.0),
        }
    }
}

/// A single parallax layer: a continuous strip of mountain segments.
#[derive(Debug, Clone)]
pub struct MountainLayer {
    pub segments: Vec<MountainSegment>,
    /// Scroll-speed multiplier relative to tree speed (farther = slower).
    pub speed: f64,
    /// Ridge baseline as a fraction of canvas height.
    pub baseline: f64,
    pub base_color: Rgb,
    pub color: Rgb,
    pub target_color: Rgb,
    /// 0..1 progress of the current color interpolation.
    pub color_transition: f64,
}

impl MountainLayer {
    fn new<R: Rng>(rng: &mut R, speed: f64, baseline: f64, base_color: Rgb) -> Self {
        let mut segments = Vec::new();
        let mut x = 0.0;
        // Keep covered width >= canvas width + margin; segments overlap by 40.
        while x < CANVAS_WIDTH + 300.0 {
            let seg = MountainSegment::random_shape(rng, x);
            x += seg.width - 40.0;
            segments.push(seg);
        }
        MountainLayer {
            segments,
            speed,
            baseline,
            base_color,
            color: base_color,
            target_color: base_color,
            color_transition: 0.0,
        }
    }
}

/// The three fixed parallax layers, back to front.
pub fn initial_mountain_layers<R: Rng>(rng: &mut R) -> [MountainLayer; 3] {
    [
        MountainLayer::new(rng, 0.2, 0.75, MOUNTAIN_BASE_COLORS[0]),
        MountainLayer::new(rng, 0.4, 0.80, MOUNTAIN_BASE_COLORS[1]),
        MountainLayer::new(rng, 0.6, 0.85, MOUNTAIN_BASE_COLORS[2]),
    ]
}

/// One explosion particle of a firework.
#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub alpha: f64,
    pub size: f64,
}

/// A particle sampled from the score digits: explodes outward, then settles
/// back onto its sampled position.
#[derive(Debug, Clone)]
pub struct TextSpark {
    pub x: f64,
    pub y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub vx: f64,
    pub vy: f64,
    pub alpha: f64,
}

/// A firework burst keyed by its creation timestamp.
#[derive(Debug, Clone)]
pub struct Firework {
    pub created_ms: u64,
    pub color: Rgb,
    pub sparks: Vec<Spark>,
    pub text_sparks: Vec<TextSpark>,
}

/// A fading light ray emitted by the disco ball.
#[derive(Debug, Clone)]
pub struct Ray {
    pub angle: f64,
    pub length: f64,
    pub width: f64,
    pub alpha: f64,
}

/// The one-shot disco-ball decoration: descends into view, rotates, and
/// periodically emits light rays.
#[derive(Debug, Clone, Default)]
pub struct DiscoBall {
    pub active: bool,
    pub y: f64,
    pub target_y: f64,
    pub rotation: f64,
    pub rays: Vec<Ray>,
    pub last_ray_ms: u64,
}

impl DiscoBall {
    pub fn activate(&mut self) {
        self.active = true;
        self.y = -50.0;
        self.target_y = CANVAS_HEIGHT / 4.0;
        self.rays.clear();
        self.last_ray_ms = 0;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.rays.clear();
    }
}

/// A drifting background planet in space mode.
#[derive(Debug, Clone)]
pub struct Planet {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed: f64,
    pub hue: f64,
    pub rings: bool,
}

impl Planet {
    pub fn random<R: Rng>(rng: &mut R, x: f64) -> Self {
        Planet {
            x,
            y: rng.gen_range(0.15..0.75) * CANVAS_HEIGHT,
            radius: rng.gen_range(10.0..25.0),
            speed: rng.gen_range(0.05..0.2),
            hue: rng.gen_range(0.0..360.0),
            rings: rng.gen_bool(0.3),
        }
    }
}

/// A patrolling UFO in space mode.
#[derive(Debug, Clone)]
pub struct Ufo {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Signed horizontal speed; sign is the patrol direction.
    pub speed_x: f64,
    /// Random phase for the sine bobbing motion.
    pub phase: f64,
    pub beam_active: bool,
    pub beam_width: f64,
    pub beam_hue: f64,
}

impl Ufo {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let width = rng.gen_range(30.0..50.0);
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Ufo {
            x: if direction > 0.0 { -width } else { CANVAS_WIDTH + width },
            y: rng.gen_range(0.1..0.7) * CANVAS_HEIGHT,
            width,
            height: width * 0.4,
            speed_x: direction * rng.gen_range(0.3..1.1),
            phase: rng.gen_range(0.0..std::f64::consts::TAU),
            beam_active: rng.gen_bool(0.5),
            beam_width: 15.0,
            beam_hue: rng.gen_range(0.0..360.0),
        }
    }
}

/// Late-game theme swap: a persistent flag plus a monotonic transition value.
#[derive(Debug, Clone, Default)]
pub struct SpaceMode {
    pub active: bool,
    /// 0..=1, increases by 0.005 per tick once active, never reverts.
    pub transition: f64,
    pub planets: Vec<Planet>,
    pub ufos: Vec<Ufo>,
}

/// Aggregate state for everything decorative.
#[derive(Debug, Clone)]
pub struct VisualEffects {
    pub background_hue: f64,
    pub mountain_hue: f64,
    /// Triangle-wave screen tint in 0..=1 (active in the 40..100 band).
    pub pulse_value: f64,
    pub pulse_direction: f64,
    pub stars: Vec<Star>,
    /// Once set, uncolored stars lazily acquire random hues.
    pub stars_colorized: bool,
    pub mountains: [MountainLayer; 3],
    pub fireworks: Vec<Firework>,
    pub disco_ball: DiscoBall,
    pub space: SpaceMode,
}

impl VisualEffects {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        VisualEffects {
            background_hue: 0.0,
            mountain_hue: 0.0,
            pulse_value: 0.0,
            pulse_direction: 1.0,
            stars: (0..STAR_COUNT).map(|_| Star::random(rng)).collect(),
            stars_colorized: false,
            mountains: initial_mountain_layers(rng),
            fireworks: Vec::new(),
            disco_ball: DiscoBall::default(),
            space: SpaceMode::default(),
        }
    }

    /// Full reset for a new run. Stars and mountains keep their shapes but
    /// drop acquired colors; everything ephemeral is cleared.
    pub fn reset(&mut self) {
        self.background_hue = 0.0;
        self.mountain_hue = 0.0;
        self.pulse_value = 0.0;
        self.pulse_direction = 1.0;
        self.stars.retain(|s| !s.is_leaf);
        for star in &mut self.stars {
            star.color = None;
        }
        self.stars_colorized = false;
        for layer in &mut self.mountains {
            layer.color = layer.base_color;
            layer.target_color = layer.base_color;
            layer.color_transition = 0.0;
        }
        self.fireworks.clear();
        self.disco_ball = DiscoBall::default();
        self.space = SpaceMode::default();
    }

    /// Partial reset at the score-100 theme swap: transient decorations go,
    /// the colorized starfield stays.
    pub fn clear_transient_decorations(&mut self) {
        self.disco_ball.deactivate();
        self.fireworks.clear();
        self.stars.retain(|s| !s.is_leaf);
        self.pulse_value = 0.0;
        self.pulse_direction = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_initial_star_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let fx = VisualEffects::new(&mut rng);
        assert_eq!(fx.stars.len(), STAR_COUNT);
        assert!(fx.stars.iter().all(|s| !s.is_leaf && s.color.is_none()));
    }

    #[test]
    fn test_mountain_layers_cover_canvas() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let fx = VisualEffects::new(&mut rng);
        for layer in &fx.mountains {
            let last = layer.segments.last().unwrap();
            assert!(last.x + last.width >= CANVAS_WIDTH + 300.0 - 40.0);
            assert!(layer.segments.first().unwrap().x <= 0.0);
        }
    }

    #[test]
    fn test_reset_drops_leaves_and_colors() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut fx = VisualEffects::new(&mut rng);
        fx.stars.push(Star::leaf(&mut rng));
        fx.stars[0].color = Some(Rgb(1, 2, 3));
        fx.disco_ball.activate();
        fx.space.active = true;
        fx.space.transition = 0.7;

        fx.reset();
        assert!(fx.stars.iter().all(|s| !s.is_leaf && s.color.is_none()));
        assert!(!fx.disco_ball.active);
        assert!(!fx.space.active);
        assert_eq!(fx.space.transition, 0.0);
    }

    #[test]
    fn test_theme_swap_keeps_star_colors() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut fx = VisualEffects::new(&mut rng);
        fx.stars[0].color = Some(Rgb(9, 9, 9));
        fx.stars.push(Star::leaf(&mut rng));
        fx.disco_ball.activate();

        fx.clear_transient_decorations();
        assert_eq!(fx.stars[0].color, Some(Rgb(9, 9, 9)));
        assert!(fx.stars.iter().all(|s| !s.is_leaf));
        assert!(!fx.disco_ball.active);
    }

    #[test]
    fn test_disco_activation_targets_upper_quarter() {
        let mut ball = DiscoBall::default();
        ball.activate();
        assert!(ball.active);
        assert_eq!(ball.y, -50.0);
        assert_eq!(ball.target_y, CANVAS_HEIGHT / 4.0);
    }

    #[test]
    fn test_ufo_enters_from_travel_side() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            let ufo = Ufo::random(&mut rng);
            if ufo.speed_x > 0.0 {
                assert!(ufo.x < 0.0);
            } else {
                assert!(ufo.x > CANVAS_WIDTH);
            }
        }
    }
}
