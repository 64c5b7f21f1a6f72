//! Cooperative one-shot and repeating timers.
//!
//! Nothing here runs on its own: the owner advances the clock with
//! [`Scheduler::pop_due`] and dispatches each returned event. Every pending
//! timer lives in the registry, so a restart can drop all of them at once.

#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Player actions that repeat while their key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    CountdownTick,
    FinishLineClear,
    EndSlowMotion,
    AutoRepeat(RepeatAction),
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    due: f64,
    interval: Option<f64>,
    event: TimerEvent,
}

#[derive(Resource, Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    /// Current scheduler time in milliseconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Moves the clock forward. The clock never runs backwards.
    pub fn set_now(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn schedule(&mut self, delay: f64, event: TimerEvent) -> TimerHandle {
        self.insert(delay, None, event)
    }

    /// Fires first after `first_delay`, then every `interval` until cancelled.
    pub fn schedule_repeating(
        &mut self,
        first_delay: f64,
        interval: f64,
        event: TimerEvent,
    ) -> TimerHandle {
        // A zero interval would fire forever inside a single pop_due drain
        self.insert(first_delay, Some(interval.max(1.0)), event)
    }

    fn insert(&mut self, delay: f64, interval: Option<f64>, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            due: self.now + delay.max(0.0),
            interval,
            event,
        });
        trace!("Scheduled {event:?} as {handle:?} in {delay}ms");
        handle
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.cancel_with_remaining(handle).is_some()
    }

    /// Cancels a timer and reports how long it still had to run.
    pub fn cancel_with_remaining(&mut self, handle: TimerHandle) -> Option<f64> {
        let index = self.timers.iter().position(|t| t.handle == handle)?;
        let timer = self.timers.remove(index);
        Some((timer.due - self.now).max(0.0))
    }

    /// Drops every pending timer and returns how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Takes the earliest timer due at or before `now`, moving the clock to
    /// its due time. Repeating timers are re-armed before being returned, so
    /// the handler may cancel them.
    pub fn pop_due(&mut self, now: f64) -> Option<TimerEvent> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.handle.cmp(&b.handle)))
            .map(|(index, _)| index)?;

        let timer = &mut self.timers[index];
        let event = timer.event;
        self.now = self.now.max(timer.due);

        if let Some(interval) = timer.interval {
            timer.due += interval;
        } else {
            self.timers.remove(index);
        }

        Some(event)
    }
}
