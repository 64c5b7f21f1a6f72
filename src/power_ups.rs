#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow sign loss when going from signed to unsigned types since the laser row is clamped first
    clippy::cast_sign_loss,
    // Allow wrapping since board heights are tiny
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::{Board, Cell};
use crate::config::GameConfig;
use crate::input::Key;
use crate::state::{GameMode, GameState, PieceRng, Pieces, PowerUpKind, PowerUps};
use crate::timers::{Scheduler, TimerEvent};

#[must_use]
pub fn can_use_power_up(world: &World, kind: PowerUpKind) -> bool {
    let power_ups = world.resource::<PowerUps>();
    power_ups.count(kind) > 0 && world.resource::<GameState>().is_playing() && !power_ups.aiming
}

/// Spends one use of `kind` and applies it. Returns `false` without side
/// effects when the power-up is unavailable.
pub fn activate_power_up(world: &mut World, kind: PowerUpKind) -> bool {
    if !can_use_power_up(world, kind) {
        debug!("Power-up {} unavailable", kind.name());
        return false;
    }
    world.resource_mut::<PowerUps>().consume(kind);
    info!("Activating power-up {}", kind.name());

    match kind {
        PowerUpKind::Laser => fire_laser(world),
        PowerUpKind::Slow => start_slow_motion(world),
        PowerUpKind::Mutate => mutate_pieces(world),
        PowerUpKind::Aimer => start_aiming(world),
    }
    true
}

// Wipes the row just under the lowest filled row of the current piece
fn fire_laser(world: &mut World) {
    let Some(piece) = world.resource::<Pieces>().current.clone() else {
        return;
    };

    let mut board = world.resource_mut::<Board>();
    let bottom_row = piece.lowest_filled_row().unwrap_or(piece.y);
    let last_row = board.height.saturating_sub(1) as i32;
    let target = (bottom_row + 1).clamp(0, last_row);
    debug!("Laser clearing row {target}");
    board.clear_row(target as usize);
}

fn start_slow_motion(world: &mut World) {
    let duration = world.resource::<GameConfig>().timing.slow_motion_duration_ms;
    world.resource_scope(|world, mut power_ups: Mut<PowerUps>| {
        let mut scheduler = world.resource_mut::<Scheduler>();
        // A second activation restarts the clock instead of stacking
        if let Some(previous) = power_ups.slow_motion_timer.take() {
            scheduler.cancel(previous);
        }
        power_ups.slow_motion = true;
        power_ups.slow_motion_remaining = None;
        power_ups.slow_motion_timer = Some(scheduler.schedule(duration, TimerEvent::EndSlowMotion));
    });
}

pub fn end_slow_motion(world: &mut World) {
    let mut power_ups = world.resource_mut::<PowerUps>();
    power_ups.slow_motion = false;
    power_ups.slow_motion_timer = None;
    power_ups.slow_motion_remaining = None;
    debug!("Slow motion ended");
}

/// Parks the slow-motion expiry while the game is paused.
pub fn suspend_slow_motion(world: &mut World) {
    world.resource_scope(|world, mut power_ups: Mut<PowerUps>| {
        if let Some(handle) = power_ups.slow_motion_timer.take() {
            power_ups.slow_motion_remaining = world
                .resource_mut::<Scheduler>()
                .cancel_with_remaining(handle);
        }
    });
}

/// Re-arms a parked slow-motion expiry with the time it had left.
pub fn resume_slow_motion(world: &mut World) {
    world.resource_scope(|world, mut power_ups: Mut<PowerUps>| {
        if let Some(remaining) = power_ups.slow_motion_remaining.take() {
            let handle = world
                .resource_mut::<Scheduler>()
                .schedule(remaining, TimerEvent::EndSlowMotion);
            power_ups.slow_motion_timer = Some(handle);
        }
    });
}

// New current and next pieces, both at their spawn position
fn mutate_pieces(world: &mut World) {
    let (current, next) = {
        let mut rng = world.resource_mut::<PieceRng>();
        (rng.next_piece(), rng.next_piece())
    };
    debug!("Mutated current and next pieces");

    let mut pieces = world.resource_mut::<Pieces>();
    pieces.current = Some(current);
    pieces.next = Some(next);
}

fn start_aiming(world: &mut World) {
    world.resource_mut::<PowerUps>().aiming = true;
    world.resource_mut::<GameState>().mode = GameMode::Paused;
    place_marker(world);
}

// Draws the cursor marker over whatever occupies the cell
fn place_marker(world: &mut World) {
    let cursor = world.resource::<PowerUps>().cursor;
    world
        .resource_mut::<Board>()
        .set(cursor.x, cursor.y, Cell::Aimer);
}

// Clears the cursor marker. The cell it covered is left empty.
fn lift_marker(world: &mut World) {
    let cursor = world.resource::<PowerUps>().cursor;
    let mut board = world.resource_mut::<Board>();
    if board.get(cursor.x, cursor.y) == Some(Cell::Aimer) {
        board.set(cursor.x, cursor.y, Cell::Empty);
    }
}

/// Drives the aimer while it is active: arrows move the cursor, `Enter`
/// fires. Returns `true` once the shot resolved and play should resume.
pub fn handle_aimer_keys(world: &mut World, key: Key) -> bool {
    if !world.resource::<PowerUps>().aiming {
        return false;
    }

    let (dx, dy) = match key {
        Key::Enter => {
            execute_aimer(world);
            return true;
        }
        Key::Left => (-1, 0),
        Key::Right => (1, 0),
        Key::Up => (0, -1),
        Key::Down => (0, 1),
        _ => return false,
    };

    lift_marker(world);
    let (width, height) = {
        let board = world.resource::<Board>();
        (board.width, board.height)
    };
    {
        let mut power_ups = world.resource_mut::<PowerUps>();
        power_ups.cursor = power_ups.cursor.stepped(dx, dy, width, height);
    }
    place_marker(world);
    false
}

// Destroys the targeted cell, lets its column settle, and returns to play
fn execute_aimer(world: &mut World) {
    lift_marker(world);

    let cursor = {
        let mut power_ups = world.resource_mut::<PowerUps>();
        power_ups.aiming = false;
        power_ups.cursor
    };

    {
        let mut board = world.resource_mut::<Board>();
        board.set(cursor.x, cursor.y, Cell::Empty);
        board.apply_gravity_to_column(cursor.x);
    }
    info!("Aimer destroyed cell ({}, {})", cursor.x, cursor.y);

    world.resource_mut::<GameState>().mode = GameMode::Playing;
}
