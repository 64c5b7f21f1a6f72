pub mod loader;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::game::{
    ARR_INTERVAL_MS, BASE_DROP_INTERVAL_MS, COUNTDOWN_SECONDS, COUNTDOWN_STEP_MS, DAS_DELAY_MS,
    INITIAL_POWER_UP_COUNT, LINE_CLEAR_DELAY_MS, SLOW_MOTION_DURATION_MS, SLOW_MOTION_FACTOR,
};
use crate::state::AnimationMode;

/// Game tunables. Every section falls back to its defaults when missing from
/// the file, so a partial TOML document is valid.
#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Plain values first so the TOML output keeps them above the tables
    pub animation_mode: AnimationMode,
    pub timing: TimingConfig,
    pub input: InputConfig,
    pub power_ups: PowerUpConfig,
}

// Gravity, delays and countdown, all in milliseconds unless noted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub base_drop_interval_ms: f64,
    pub slow_motion_factor: f64,
    pub slow_motion_duration_ms: f64,
    pub line_clear_delay_ms: f64,
    pub countdown_seconds: u32,
    pub countdown_step_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_drop_interval_ms: BASE_DROP_INTERVAL_MS,
            slow_motion_factor: SLOW_MOTION_FACTOR,
            slow_motion_duration_ms: SLOW_MOTION_DURATION_MS,
            line_clear_delay_ms: LINE_CLEAR_DELAY_MS,
            countdown_seconds: COUNTDOWN_SECONDS,
            countdown_step_ms: COUNTDOWN_STEP_MS,
        }
    }
}

// Held-key repeat timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub das_delay_ms: f64,
    pub arr_interval_ms: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            das_delay_ms: DAS_DELAY_MS,
            arr_interval_ms: ARR_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub initial_count: u32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            initial_count: INITIAL_POWER_UP_COUNT,
        }
    }
}
