use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::{Board, Cell, Piece};
use crate::config::GameConfig;
use crate::game::KICK_OFFSETS;
use crate::state::{GameMode, GameState, PieceRng, Pieces, PowerUps};
use crate::timers::{Scheduler, TimerEvent};

fn is_playing(world: &World) -> bool {
    world.resource::<GameState>().is_playing()
}

/// Puts the queued piece into play, queues a fresh one, and ends the game if
/// the new piece does not fit.
pub fn spawn_next_piece(world: &mut World) {
    let fresh = world.resource_mut::<PieceRng>().next_piece();
    let queued = world.resource_mut::<Pieces>().next.replace(fresh);
    let piece = match queued {
        Some(piece) => piece,
        None => world.resource_mut::<PieceRng>().next_piece(),
    };

    let fits = world.resource::<Board>().is_valid_position(&piece);
    debug!(
        "Spawning {:?} at ({}, {})",
        piece.tetromino_type(),
        piece.x,
        piece.y
    );
    world.resource_mut::<Pieces>().current = Some(piece);

    let mut game_state = world.resource_mut::<GameState>();
    game_state.reset_drop();
    if !fits {
        info!("Game over with score {}", game_state.score);
        game_state.mode = GameMode::GameOver;
    }
}

// Replaces the current piece with its moved copy if that position is valid
fn try_move(world: &mut World, dx: i32, dy: i32) -> bool {
    let Some(moved) = world
        .resource::<Pieces>()
        .current
        .as_ref()
        .map(|piece| piece.moved(dx, dy))
    else {
        return false;
    };

    if !world.resource::<Board>().is_valid_position(&moved) {
        return false;
    }

    world.resource_mut::<Pieces>().current = Some(moved);
    true
}

#[must_use]
pub fn can_move_down(world: &World) -> bool {
    world
        .resource::<Pieces>()
        .current
        .as_ref()
        .is_some_and(|piece| {
            world
                .resource::<Board>()
                .is_valid_position(&piece.moved(0, 1))
        })
}

/// Landing preview for the current piece. Only exists while playing.
#[must_use]
pub fn ghost_piece(world: &World) -> Option<Piece> {
    if !is_playing(world) {
        return None;
    }
    let piece = world.resource::<Pieces>().current.as_ref()?;
    Some(world.resource::<Board>().drop_position(piece))
}

pub fn move_left(world: &mut World) {
    if is_playing(world) {
        try_move(world, -1, 0);
    }
}

pub fn move_right(world: &mut World) {
    if is_playing(world) {
        try_move(world, 1, 0);
    }
}

/// Rotates clockwise, trying each kick offset in order. Leaves the piece as
/// it was when no offset fits.
pub fn rotate_piece(world: &mut World) {
    if !is_playing(world) {
        return;
    }
    let Some(rotated) = world
        .resource::<Pieces>()
        .current
        .as_ref()
        .map(Piece::rotated)
    else {
        return;
    };

    let kicked = {
        let board = world.resource::<Board>();
        KICK_OFFSETS
            .iter()
            .map(|&(dx, dy)| rotated.moved(dx, dy))
            .find(|candidate| board.is_valid_position(candidate))
    };

    if let Some(piece) = kicked {
        world.resource_mut::<Pieces>().current = Some(piece);
    }
}

/// One step down, locking if blocked. Restarts the gravity accumulator so
/// the next automatic tick is a full interval away.
pub fn soft_drop(world: &mut World) {
    if !is_playing(world) {
        return;
    }
    tick(world);
    world.resource_mut::<GameState>().reset_drop();
}

pub fn hard_drop(world: &mut World) {
    if !is_playing(world) {
        return;
    }
    let Some(ghost) = ghost_piece(world) else {
        return;
    };

    if let Some(piece) = world.resource_mut::<Pieces>().current.as_mut() {
        piece.y = ghost.y;
    } else {
        return;
    }
    lock_piece(world);
}

/// Swaps the current piece with the hold slot, or stashes it and spawns the
/// next one when the slot is empty. Allowed once per locked piece.
pub fn hold_piece(world: &mut World) {
    {
        let game_state = world.resource::<GameState>();
        if !game_state.is_playing() || !game_state.holding_allowed {
            debug!("Hold rejected");
            return;
        }
    }

    let Some(current) = world.resource_mut::<Pieces>().current.take() else {
        return;
    };
    let previously_held = world
        .resource_mut::<Pieces>()
        .hold
        .replace(current.at_spawn());

    match previously_held {
        Some(held) => {
            world.resource_mut::<Pieces>().current = Some(held.at_spawn());
            world.resource_mut::<GameState>().reset_drop();
        }
        None => spawn_next_piece(world),
    }

    world.resource_mut::<GameState>().holding_allowed = false;
}

/// Gravity step: move down one row, lock when that is impossible.
pub fn tick(world: &mut World) {
    if !try_move(world, 0, 1) {
        lock_piece(world);
    }
}

/// Stamps the current piece into the board. Completed rows are flashed with
/// the clearing marker and removed once the clear delay has elapsed;
/// otherwise the next piece spawns right away.
pub fn lock_piece(world: &mut World) {
    let Some(piece) = world.resource::<Pieces>().current.clone() else {
        return;
    };

    let stamped = world.resource::<Board>().with_piece(&piece);
    let full_rows = stamped.full_rows();
    world.resource_mut::<GameState>().pieces_locked += 1;

    if full_rows.is_empty() {
        debug!("Locked piece at ({}, {})", piece.x, piece.y);
        *world.resource_mut::<Board>() = stamped;
        spawn_next_piece(world);
        world.resource_mut::<GameState>().holding_allowed = true;
        return;
    }

    info!("Clearing rows {full_rows:?}");
    world.resource_mut::<Pieces>().current = None;

    let mut display = stamped.clone();
    display.fill_rows(&full_rows, Cell::Clearing);
    *world.resource_mut::<Board>() = display;

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.mode = GameMode::Clearing;
        game_state.pending_clear = Some(stamped);
        game_state.drop_progress = 0.0;
    }

    let delay = world.resource::<GameConfig>().timing.line_clear_delay_ms;
    world
        .resource_mut::<Scheduler>()
        .schedule(delay, TimerEvent::FinishLineClear);
}

/// Deferred half of a lock with completed rows: compacts the board, scores,
/// rewards one use of every power-up, and brings the next piece in.
pub fn finish_line_clear(world: &mut World) {
    let Some(stamped) = world.resource_mut::<GameState>().pending_clear.take() else {
        return;
    };

    let (board, lines_cleared) = stamped.clear_lines();
    *world.resource_mut::<Board>() = board;

    {
        let mut game_state = world.resource_mut::<GameState>();
        let points = game_state.apply_line_clear(lines_cleared);
        info!(
            "Cleared {} lines for {} points (score {}, level {})",
            lines_cleared, points, game_state.score, game_state.level
        );
    }
    world.resource_mut::<PowerUps>().grant_all();

    spawn_next_piece(world);

    let mut game_state = world.resource_mut::<GameState>();
    game_state.holding_allowed = true;
    // Spawning may already have ended the game
    if game_state.mode == GameMode::Clearing {
        game_state.mode = GameMode::Playing;
    }
}
