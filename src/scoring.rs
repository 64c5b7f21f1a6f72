#![warn(clippy::all, clippy::pedantic)]

use crate::game::{LINE_POINTS, LINES_PER_LEVEL, STARTING_LEVEL};

/// Points for clearing `lines_cleared` rows at once at the given level.
/// More than four simultaneous rows cannot happen with the standard pieces
/// and scores nothing.
#[must_use]
pub fn calculate_score(lines_cleared: usize, level: u32) -> u32 {
    LINE_POINTS.get(lines_cleared).copied().unwrap_or(0) * level
}

/// Level reached after clearing `total_lines` rows in a game.
#[must_use]
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + STARTING_LEVEL
}
