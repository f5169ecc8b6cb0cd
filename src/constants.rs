//! Tuning constants for the simulation and the scoreboard.
//!
//! All positions are expressed in a fixed logical canvas of 400x600 units;
//! the renderer scales this space onto the terminal cell grid.

/// Logical canvas width in units.
pub const CANVAS_WIDTH: f64 = 400.0;
/// Logical canvas height in units.
pub const CANVAS_HEIGHT: f64 = 600.0;

/// Fixed simulation timestep in milliseconds (~60 Hz reference rate).
///
/// The original tuning assumed one update per display frame; the constants
/// below are per-tick values calibrated against this nominal rate.
pub const TICK_INTERVAL_MS: u64 = 16;

// Goose physics
pub const GRAVITY: f64 = 0.22;
pub const JUMP_IMPULSE: f64 = -5.0;
pub const MAX_FALL_SPEED: f64 = 6.0;
pub const GOOSE_X: f64 = 100.0;
pub const GOOSE_SIZE: f64 = 48.0;
/// Rotation snapped to while ascending (degrees).
pub const ASCEND_ROTATION: f64 = -25.0;
/// Rotation set on a jump impulse (degrees).
pub const JUMP_ROTATION: f64 = -30.0;
/// Terminal nose-down rotation (degrees).
pub const MAX_ROTATION: f64 = 90.0;
/// Largest per-tick rotation increment while easing nose-down.
pub const ROTATION_STEP_CAP: f64 = 4.0;
/// Wing-flap phase advance per tick (cosmetic).
pub const WING_SPEED: f64 = 0.15;

// Maple trees (obstacles)
pub const TREE_WIDTH: f64 = 60.0;
pub const TREE_GAP: f64 = 200.0;
/// Minimum distance between the gap and either canvas edge.
pub const TREE_MIN_GAP_Y: f64 = 100.0;
/// A new tree spawns once the last one is this far from the right edge.
pub const TREE_SPAWN_THRESHOLD: f64 = 250.0;
pub const BASE_SPEED: f64 = 2.0;
/// Speed multiplier gains this much for every 10 points.
pub const SPEED_STEP: f64 = 0.1;

// Flock bursts
pub const FLOCK_SIZE: usize = 8;
pub const FLOCK_SPEED: f64 = 5.0;
/// Flock geese are pruned once this far outside the canvas.
pub const FLOCK_MARGIN: f64 = 50.0;

// Fireworks
pub const FIREWORK_PARTICLES: usize = 50;
pub const FIREWORK_TTL_MS: u64 = 2000;

// Ambient stars
pub const STAR_COUNT: usize = 100;
pub const LEAF_COUNT: usize = 20;

// Disco ball
pub const DISCO_DESCEND_SPEED: f64 = 2.0;
pub const DISCO_RAY_INTERVAL_MS: u64 = 100;

// State machine
/// Restart is rejected for this long after a run ends.
pub const RESTART_LOCK_MS: u64 = 1000;

// Scoreboard
pub const LEADERBOARD_CAPACITY: usize = 50;
pub const MAX_NAME_LEN: usize = 10;
