#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to u32 since line counts never exceed the board height
    clippy::cast_possible_truncation
)]

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Board, Piece};
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, STARTING_LEVEL};
use crate::scoring::{calculate_score, level_for_lines};
use crate::timers::TimerHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Start,
    Countdown,
    Playing,
    Paused,
    Clearing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    #[default]
    Smooth,
    Step,
}

impl AnimationMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            AnimationMode::Smooth => AnimationMode::Step,
            AnimationMode::Step => AnimationMode::Smooth,
        }
    }
}

#[derive(Debug, Resource, Clone)]
pub struct GameState {
    pub mode: GameMode,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    // Number of lock events this session
    pub pieces_locked: u32,
    pub holding_allowed: bool,
    pub soft_drop_active: bool,
    pub countdown: u32,
    pub countdown_timer: Option<TimerHandle>,
    // Milliseconds accumulated since the last gravity tick
    pub drop_counter: f64,
    // Fraction of the current cell-to-cell fall, for rendering only
    pub drop_progress: f64,
    pub animation_mode: AnimationMode,
    // Board with the locked piece stamped in, waiting for the clear delay
    pub pending_clear: Option<Board>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            mode: GameMode::Start,
            score: 0,
            level: STARTING_LEVEL,
            lines_cleared: 0,
            pieces_locked: 0,
            holding_allowed: true,
            soft_drop_active: false,
            countdown: 0,
            countdown_timer: None,
            drop_counter: 0.0,
            drop_progress: 0.0,
            animation_mode: AnimationMode::default(),
            pending_clear: None,
        }
    }
}

impl GameState {
    #[must_use]
    pub fn new(animation_mode: AnimationMode) -> Self {
        Self {
            animation_mode,
            ..Self::default()
        }
    }

    /// Back to a fresh game. The animation mode is a player preference and
    /// survives restarts.
    pub fn reset(&mut self) {
        *self = Self::new(self.animation_mode);
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.mode == GameMode::Playing
    }

    pub fn reset_drop(&mut self) {
        self.drop_counter = 0.0;
        self.drop_progress = 0.0;
    }

    /// Scores a finished clear at the current level, then recomputes the
    /// level from the new line total. Returns the points awarded.
    pub fn apply_line_clear(&mut self, lines_cleared: usize) -> u32 {
        let points = calculate_score(lines_cleared, self.level);
        self.score += points;
        self.lines_cleared += lines_cleared as u32;
        self.level = level_for_lines(self.lines_cleared);
        points
    }
}

/// The piece slots: the one in play, the preview, and the hold slot.
#[derive(Resource, Debug, Clone, Default)]
pub struct Pieces {
    pub current: Option<Piece>,
    pub next: Option<Piece>,
    pub hold: Option<Piece>,
}

/// Source of randomness for new pieces. Seed it for reproducible games.
#[derive(Resource, Debug, Clone)]
pub struct PieceRng(pub fastrand::Rng);

impl Default for PieceRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

impl PieceRng {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }

    pub fn next_piece(&mut self) -> Piece {
        Piece::random(&mut self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Laser,
    Slow,
    Mutate,
    Aimer,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Laser,
        PowerUpKind::Slow,
        PowerUpKind::Mutate,
        PowerUpKind::Aimer,
    ];

    const fn index(self) -> usize {
        match self {
            PowerUpKind::Laser => 0,
            PowerUpKind::Slow => 1,
            PowerUpKind::Mutate => 2,
            PowerUpKind::Aimer => 3,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PowerUpKind::Laser => "laser",
            PowerUpKind::Slow => "slow",
            PowerUpKind::Mutate => "mutate",
            PowerUpKind::Aimer => "aimer",
        }
    }

    /// Activation hotkeys `1`..`4`.
    #[must_use]
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(PowerUpKind::Laser),
            '2' => Some(PowerUpKind::Slow),
            '3' => Some(PowerUpKind::Mutate),
            '4' => Some(PowerUpKind::Aimer),
            _ => None,
        }
    }
}

/// Target cell of the aimer, always on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AimerCursor {
    pub x: usize,
    pub y: usize,
}

impl Default for AimerCursor {
    fn default() -> Self {
        Self {
            x: BOARD_WIDTH / 2,
            y: BOARD_HEIGHT / 2,
        }
    }
}

impl AimerCursor {
    /// Steps the cursor by one cell, clamped to a `width` x `height` board.
    #[must_use]
    pub fn stepped(self, dx: i32, dy: i32, width: usize, height: usize) -> Self {
        let step = |value: usize, delta: i32, len: usize| -> usize {
            match delta {
                d if d < 0 => value.saturating_sub(1),
                d if d > 0 => (value + 1).min(len.saturating_sub(1)),
                _ => value,
            }
        };

        Self {
            x: step(self.x, dx, width),
            y: step(self.y, dy, height),
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PowerUps {
    counts: [u32; 4],
    pub slow_motion: bool,
    pub slow_motion_timer: Option<TimerHandle>,
    // Time left on the slow-motion expiry while the game is paused
    pub slow_motion_remaining: Option<f64>,
    pub aiming: bool,
    pub cursor: AimerCursor,
}

impl Default for PowerUps {
    fn default() -> Self {
        Self::new(crate::game::INITIAL_POWER_UP_COUNT)
    }
}

impl PowerUps {
    #[must_use]
    pub fn new(initial_count: u32) -> Self {
        Self {
            counts: [initial_count; 4],
            slow_motion: false,
            slow_motion_timer: None,
            slow_motion_remaining: None,
            aiming: false,
            cursor: AimerCursor::default(),
        }
    }

    #[must_use]
    pub fn count(&self, kind: PowerUpKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn set_count(&mut self, kind: PowerUpKind, count: u32) {
        self.counts[kind.index()] = count;
    }

    #[must_use]
    pub fn counts(&self) -> [(PowerUpKind, u32); 4] {
        PowerUpKind::ALL.map(|kind| (kind, self.count(kind)))
    }

    /// One more use of every kind, awarded per clear event.
    pub fn grant_all(&mut self) {
        for count in &mut self.counts {
            *count += 1;
        }
    }

    /// Spends one use. Returns `false` when none are left.
    pub fn consume(&mut self, kind: PowerUpKind) -> bool {
        let count = &mut self.counts[kind.index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }
}
