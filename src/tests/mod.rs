#![warn(clippy::all, clippy::pedantic)]

pub mod components_tests;
pub mod game_loop_tests;
