//! Gravity scheduler driven by frame timestamps.
//!
//! The caller invokes [`frame`] at whatever cadence it renders, passing a
//! monotonic timestamp in milliseconds. Elapsed time accumulates into the
//! drop counter and is drained one gravity tick per drop interval.

use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::config::GameConfig;
use crate::state::{GameMode, GameState, PowerUps};
use crate::systems;

#[derive(Resource, Debug, Default)]
pub struct GameLoop {
    running: bool,
    // Timestamp of the previous frame; zero means "no frame seen yet"
    last_time: f64,
    starts: u32,
}

impl GameLoop {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    /// How many times the loop went from stopped to running.
    #[must_use]
    pub fn start_count(&self) -> u32 {
        self.starts
    }
}

pub fn start(world: &mut World) {
    let mut game_loop = world.resource_mut::<GameLoop>();
    if game_loop.running {
        return;
    }
    game_loop.running = true;
    game_loop.starts += 1;
    debug!("Game loop started");
}

pub fn stop(world: &mut World) {
    let mut game_loop = world.resource_mut::<GameLoop>();
    if game_loop.running {
        game_loop.running = false;
        debug!("Game loop stopped");
    }
}

/// Forgets the previous frame time so the next frame measures no elapsed
/// time. The drop counter is left alone.
pub fn reset_time(world: &mut World) {
    world.resource_mut::<GameLoop>().last_time = 0.0;
}

/// Restarts the loop from a fresh time baseline.
pub fn resume(world: &mut World) {
    reset_time(world);
    start(world);
}

/// Milliseconds between gravity ticks at the current level, stretched while
/// slow motion is active.
#[must_use]
pub fn drop_interval(world: &World) -> f64 {
    let timing = &world.resource::<GameConfig>().timing;
    let level = f64::from(world.resource::<GameState>().level.max(1));
    let factor = if world.resource::<PowerUps>().slow_motion {
        timing.slow_motion_factor
    } else {
        1.0
    };
    (timing.base_drop_interval_ms / level * factor).max(1.0)
}

pub fn frame(world: &mut World, timestamp: f64) {
    if !world.resource::<GameLoop>().running {
        return;
    }
    if world.resource::<GameState>().mode != GameMode::Playing {
        stop(world);
        return;
    }

    let delta_time = {
        let mut game_loop = world.resource_mut::<GameLoop>();
        if game_loop.last_time == 0.0 {
            game_loop.last_time = timestamp;
        }
        let delta = (timestamp - game_loop.last_time).max(0.0);
        game_loop.last_time = timestamp;
        delta
    };

    let interval = drop_interval(world);
    let soft_drop_active = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.drop_counter += delta_time;
        trace!(
            "Frame: delta {delta_time}ms, counter {}ms, interval {interval}ms",
            game_state.drop_counter
        );
        game_state.soft_drop_active
    };

    // A held soft drop supplies its own downward steps
    if !soft_drop_active {
        while world.resource::<GameState>().drop_counter >= interval {
            // Consume the interval before ticking; a spawn inside the tick
            // zeroes the counter and must not be pushed negative
            world.resource_mut::<GameState>().drop_counter -= interval;
            systems::tick(world);

            if world.resource::<GameState>().mode != GameMode::Playing {
                world.resource_mut::<GameState>().drop_progress = 0.0;
                stop(world);
                return;
            }
        }
    }

    let progress = if systems::can_move_down(world) {
        (world.resource::<GameState>().drop_counter / interval).min(1.0)
    } else {
        0.0
    };
    world.resource_mut::<GameState>().drop_progress = progress;
}
