pub mod app;
pub mod components;
pub mod config;
pub mod game;
pub mod game_loop;
pub mod input;
pub mod power_ups;
pub mod scoring;
pub mod state;
pub mod systems;
pub mod timers;
pub mod ui;

#[cfg(test)]
mod tests;

pub use app::App;
pub use components::{Board, Cell, Piece, TetrominoType};
pub use config::GameConfig;
pub use input::Key;
pub use state::{AnimationMode, GameMode, PowerUpKind};
