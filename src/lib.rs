//! Flappy Goose - Terminal Arcade Game Library
//!
//! This module exposes the simulation and scoreboard logic for testing and
//! external use.

// Allow dead code in library - some functions are only used by the binary
#![allow(dead_code)]

pub mod build_info;
pub mod constants;
pub mod effects;
pub mod game;
pub mod scoreboard;
pub mod utils;

// UI module is not exposed as it's tightly coupled to the terminal
mod ui;
