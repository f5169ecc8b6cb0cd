//! Visual effects: parallax mountains, star warp, fireworks with particle
//! score text, flock bursts, disco ball, and the late-game space theme.
//!
//! The layer reads the score and the clock; it never influences physics,
//! collision, or scoring.

pub mod color;
pub mod logic;
pub mod milestones;
pub mod types;
