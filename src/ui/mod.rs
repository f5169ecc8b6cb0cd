//! Terminal rendering: one scene module per screen plus the shared
//! cell-grid painter.

pub mod canvas;
pub mod game_over_scene;
pub mod game_scene;
pub mod highscores_scene;
pub mod start_scene;
