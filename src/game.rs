#![warn(clippy::all, clippy::pedantic)]

// Game board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

// Line clear scoring (level 1 values, multiplied by the current level)
pub const LINE_POINTS: [u32; 5] = [0, 100, 300, 500, 800];

// Level progression
pub const LINES_PER_LEVEL: u32 = 10;
pub const STARTING_LEVEL: u32 = 1;

// Game timing (milliseconds)
pub const BASE_DROP_INTERVAL_MS: f64 = 1000.0;
pub const LINE_CLEAR_DELAY_MS: f64 = 300.0;
pub const SLOW_MOTION_DURATION_MS: f64 = 5000.0;
pub const SLOW_MOTION_FACTOR: f64 = 3.0;
pub const COUNTDOWN_SECONDS: u32 = 3;
pub const COUNTDOWN_STEP_MS: f64 = 1000.0;

// Delayed auto-shift / auto-repeat for held keys
pub const DAS_DELAY_MS: f64 = 160.0;
pub const ARR_INTERVAL_MS: f64 = 40.0;

// Every power-up starts a game with this many uses
pub const INITIAL_POWER_UP_COUNT: u32 = 1;

// Offsets tried in order after a rotation; the first valid one wins
pub const KICK_OFFSETS: [(i32, i32); 6] = [(0, 0), (1, 0), (-1, 0), (2, 0), (-2, 0), (0, -1)];
