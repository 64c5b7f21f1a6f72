//! Key press/release handling with delayed auto-shift.
//!
//! Held movement keys act once on press, repeat first after the DAS delay and
//! then at the ARR interval until released. The other keys fire once per
//! press and stay latched until their release arrives.

#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::trace;

use crate::config::GameConfig;
use crate::power_ups;
use crate::state::{GameState, PowerUpKind, PowerUps};
use crate::systems;
use crate::timers::{RepeatAction, Scheduler, TimerEvent, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Hold,
    PowerUp(PowerUpKind),
}

#[derive(Resource, Debug, Default)]
pub struct InputState {
    // Only one horizontal direction repeats at a time
    shift: Option<(RepeatAction, TimerHandle)>,
    soft_drop: Option<TimerHandle>,
    latched: Vec<Key>,
}

impl InputState {
    #[must_use]
    pub fn is_latched(&self, key: Key) -> bool {
        self.latched.contains(&key)
    }

    #[must_use]
    pub fn is_repeating(&self, action: RepeatAction) -> bool {
        match action {
            RepeatAction::SoftDrop => self.soft_drop.is_some(),
            _ => self.shift.is_some_and(|(armed, _)| armed == action),
        }
    }
}

fn arm_repeat(world: &mut World, action: RepeatAction) -> TimerHandle {
    let (delay, interval) = {
        let input = &world.resource::<GameConfig>().input;
        (input.das_delay_ms, input.arr_interval_ms)
    };
    world.resource_mut::<Scheduler>().schedule_repeating(
        delay,
        interval,
        TimerEvent::AutoRepeat(action),
    )
}

pub fn press(world: &mut World, key: Key) {
    if !world.resource::<GameState>().is_playing() {
        return;
    }

    match key {
        Key::Left | Key::Right => {
            if world.resource::<InputState>().shift.is_some() {
                return;
            }
            let action = if key == Key::Left {
                RepeatAction::MoveLeft
            } else {
                RepeatAction::MoveRight
            };
            repeat(world, action);
            let handle = arm_repeat(world, action);
            world.resource_mut::<InputState>().shift = Some((action, handle));
        }
        Key::Down => {
            if world.resource::<InputState>().soft_drop.is_some() {
                return;
            }
            {
                let mut game_state = world.resource_mut::<GameState>();
                game_state.soft_drop_active = true;
                game_state.drop_counter = 0.0;
            }
            systems::soft_drop(world);
            let handle = arm_repeat(world, RepeatAction::SoftDrop);
            world.resource_mut::<InputState>().soft_drop = Some(handle);
        }
        Key::Up | Key::Space | Key::Hold | Key::PowerUp(_) => {
            if world.resource::<InputState>().is_latched(key) {
                trace!("Ignoring repeated {key:?}");
                return;
            }
            world.resource_mut::<InputState>().latched.push(key);
            fire_once(world, key);
        }
        Key::Enter => {}
    }
}

fn fire_once(world: &mut World, key: Key) {
    match key {
        Key::Up => systems::rotate_piece(world),
        Key::Space => systems::hard_drop(world),
        Key::Hold => systems::hold_piece(world),
        Key::PowerUp(kind) => {
            power_ups::activate_power_up(world, kind);
            // Held movement must not leak into the aiming cursor
            if world.resource::<PowerUps>().aiming {
                clear_timers(world);
            }
        }
        _ => {}
    }
}

pub fn release(world: &mut World, key: Key) {
    match key {
        Key::Left | Key::Right => {
            let action = if key == Key::Left {
                RepeatAction::MoveLeft
            } else {
                RepeatAction::MoveRight
            };
            let armed = world
                .resource::<InputState>()
                .shift
                .filter(|(armed, _)| *armed == action);
            if let Some((_, handle)) = armed {
                world.resource_mut::<Scheduler>().cancel(handle);
                world.resource_mut::<InputState>().shift = None;
            }
        }
        Key::Down => {
            if let Some(handle) = world.resource_mut::<InputState>().soft_drop.take() {
                world.resource_mut::<Scheduler>().cancel(handle);
            }
            world.resource_mut::<GameState>().soft_drop_active = false;
        }
        _ => world.resource_mut::<InputState>().latched.retain(|k| *k != key),
    }
}

/// One auto-repeat step of a held key.
pub fn repeat(world: &mut World, action: RepeatAction) {
    match action {
        RepeatAction::MoveLeft => systems::move_left(world),
        RepeatAction::MoveRight => systems::move_right(world),
        RepeatAction::SoftDrop => systems::soft_drop(world),
    }
}

/// Cancels every key repeat and forgets the held soft drop. Latched keys
/// stay latched until their release arrives.
pub fn clear_timers(world: &mut World) {
    let (shift, soft_drop) = {
        let mut input = world.resource_mut::<InputState>();
        (input.shift.take(), input.soft_drop.take())
    };

    let mut scheduler = world.resource_mut::<Scheduler>();
    if let Some((_, handle)) = shift {
        scheduler.cancel(handle);
    }
    if let Some(handle) = soft_drop {
        scheduler.cancel(handle);
    }
    world.resource_mut::<GameState>().soft_drop_active = false;
}

/// Full reset for a new game, including latches.
pub fn reset(world: &mut World) {
    clear_timers(world);
    world.resource_mut::<InputState>().latched.clear();
}
