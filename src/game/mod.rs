//! Simulation core: player physics, obstacle engine, scoring, and the
//! run state machine. Split into `types` (data) and `logic` (tick
//! processing).

pub mod logic;
pub mod types;
