//! Core simulation state: the goose, the maple trees, flock bursts, and the
//! run-level state machine.

use crate::constants::*;
use crate::effects::color::{Rgb, GOOSE_COLORS, RAINBOW};
use crate::effects::milestones::MilestoneTable;
use crate::effects::types::VisualEffects;
use rand::Rng;

/// Run-level state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Pre-game: accepting a start command.
    Idle,
    /// Simulation advancing every tick.
    Playing,
    /// Terminal: a collision or boundary violation ended the run.
    GameOver,
}

/// The player. Horizontal position is fixed at `GOOSE_X`; only the vertical
/// axis simulates.
#[derive(Debug, Clone)]
pub struct Goose {
    pub y: f64,
    /// Vertical velocity, positive = downward.
    pub velocity: f64,
    /// Degrees; negative = nose up.
    pub rotation: f64,
    /// Wing-flap phase accumulator (cosmetic).
    pub wing_phase: f64,
    pub color: Rgb,
}

impl Goose {
    pub fn new(color: Rgb) -> Self {
        Goose {
            y: CANVAS_HEIGHT / 2.0,
            velocity: 0.0,
            rotation: 0.0,
            wing_phase: 0.0,
            color,
        }
    }

    pub fn reset(&mut self) {
        self.y = CANVAS_HEIGHT / 2.0;
        self.velocity = 0.0;
        self.rotation = 0.0;
    }
}

/// A maple tree pair: top and bottom barrier with a passable vertical gap.
#[derive(Debug, Clone)]
pub struct Tree {
    pub x: f64,
    /// Top of the gap; the gap spans `gap_y..gap_y + TREE_GAP`.
    pub gap_y: f64,
    /// Guards the single score increment per tree.
    pub passed: bool,
}

impl Tree {
    /// Spawn at the right edge with a uniformly random gap position.
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        let min = TREE_MIN_GAP_Y;
        let max = CANVAS_HEIGHT - TREE_GAP - TREE_MIN_GAP_Y;
        Tree {
            x: CANVAS_WIDTH,
            gap_y: rng.gen_range(min..max),
            passed: false,
        }
    }
}

/// One decorative goose of a ten-point flock burst.
#[derive(Debug, Clone)]
pub struct FlockGoose {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Degrees, aligned with the velocity vector.
    pub rotation: f64,
    pub wing_phase: f64,
    pub color: Rgb,
}

/// Spawn a radial burst of `FLOCK_SIZE` rainbow geese at (`x`, `y`).
pub fn flock_burst(x: f64, y: f64) -> Vec<FlockGoose> {
    (0..FLOCK_SIZE)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / FLOCK_SIZE as f64;
            FlockGoose {
                x,
                y,
                vx: angle.cos() * FLOCK_SPEED,
                vy: angle.sin() * FLOCK_SPEED,
                rotation: angle.to_degrees(),
                wing_phase: 0.0,
                color: RAINBOW[i % RAINBOW.len()],
            }
        })
        .collect()
}

/// The whole game: one explicit owned instance, no hidden module state.
#[derive(Debug, Clone)]
pub struct Game {
    pub phase: GamePhase,
    pub score: u32,
    /// Derived from the score every tick: 1 + floor(score/10) * 0.1.
    pub speed_multiplier: f64,
    /// Current obstacle scroll speed in units per tick.
    pub tree_speed: f64,
    pub goose: Goose,
    pub trees: Vec<Tree>,
    pub flock: Vec<FlockGoose>,
    pub effects: VisualEffects,
    pub milestones: MilestoneTable,
    /// Timestamp of the terminal transition; gates the restart lock.
    pub over_at_ms: Option<u64>,
}

impl Game {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Game {
            phase: GamePhase::Idle,
            score: 0,
            speed_multiplier: 1.0,
            tree_speed: BASE_SPEED,
            goose: Goose::new(GOOSE_COLORS[0].1),
            trees: Vec::new(),
            flock: Vec::new(),
            effects: VisualEffects::new(rng),
            milestones: MilestoneTable::new(),
            over_at_ms: None,
        }
    }

    /// Restart is locked for `RESTART_LOCK_MS` after the terminal transition
    /// so a held input cannot skip the game-over screen.
    pub fn can_restart(&self, now_ms: u64) -> bool {
        match self.phase {
            GamePhase::GameOver => self
                .over_at_ms
                .map(|t| now_ms.saturating_sub(t) >= RESTART_LOCK_MS)
                .unwrap_or(true),
            _ => true,
        }
    }
}
