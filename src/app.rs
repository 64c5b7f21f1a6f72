#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::info;

use crate::components::{Board, Cell, Piece};
use crate::config::GameConfig;
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game_loop::{self, GameLoop};
use crate::input::{self, InputState, Key};
use crate::power_ups;
use crate::state::{
    AimerCursor, AnimationMode, GameMode, GameState, PieceRng, Pieces, PowerUpKind, PowerUps,
};
use crate::systems;
use crate::timers::{Scheduler, TimerEvent};

/// One game session. Owns every resource of the game and wires timer events
/// and loop restarts between the engine modules.
pub struct App {
    pub world: World,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    #[must_use]
    pub fn with_config(config: GameConfig) -> Self {
        Self::build(config, PieceRng::default())
    }

    /// Same as [`App::with_config`] but with a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::build(config, PieceRng::with_seed(seed))
    }

    fn build(config: GameConfig, rng: PieceRng) -> Self {
        let mut world = World::new();
        world.insert_resource(Board::new(BOARD_WIDTH, BOARD_HEIGHT));
        world.insert_resource(GameState::new(config.animation_mode));
        world.insert_resource(Pieces::default());
        world.insert_resource(PowerUps::new(config.power_ups.initial_count));
        world.insert_resource(rng);
        world.insert_resource(Scheduler::default());
        world.insert_resource(GameLoop::default());
        world.insert_resource(InputState::default());
        world.insert_resource(config);

        Self {
            world,
            should_quit: false,
        }
    }

    /// Throws away the running session and begins a countdown into a fresh
    /// game.
    pub fn start_game(&mut self) {
        self.world.resource_mut::<Scheduler>().cancel_all();
        input::reset(&mut self.world);
        game_loop::stop(&mut self.world);
        game_loop::reset_time(&mut self.world);

        self.world.resource_mut::<Board>().clear();
        let (current, next) = {
            let mut rng = self.world.resource_mut::<PieceRng>();
            (rng.next_piece(), rng.next_piece())
        };
        *self.world.resource_mut::<Pieces>() = Pieces {
            current: Some(current),
            next: Some(next),
            hold: None,
        };

        let (initial_count, countdown, step) = {
            let config = self.world.resource::<GameConfig>();
            (
                config.power_ups.initial_count,
                config.timing.countdown_seconds,
                config.timing.countdown_step_ms,
            )
        };
        *self.world.resource_mut::<PowerUps>() = PowerUps::new(initial_count);
        self.world.resource_mut::<GameState>().reset();

        info!("Starting new game");
        if countdown == 0 {
            self.begin_play();
            return;
        }

        let handle = self.world.resource_mut::<Scheduler>().schedule_repeating(
            step,
            step,
            TimerEvent::CountdownTick,
        );
        let mut game_state = self.world.resource_mut::<GameState>();
        game_state.mode = GameMode::Countdown;
        game_state.countdown = countdown;
        game_state.countdown_timer = Some(handle);
    }

    fn begin_play(&mut self) {
        self.world.resource_mut::<GameState>().mode = GameMode::Playing;
        game_loop::resume(&mut self.world);
    }

    pub fn toggle_pause(&mut self) {
        if self.world.resource::<PowerUps>().aiming {
            return;
        }

        match self.world.resource::<GameState>().mode {
            GameMode::Playing => {
                self.world.resource_mut::<GameState>().mode = GameMode::Paused;
                game_loop::stop(&mut self.world);
                input::clear_timers(&mut self.world);
                power_ups::suspend_slow_motion(&mut self.world);
                info!("Game paused");
            }
            GameMode::Paused => {
                self.world.resource_mut::<GameState>().mode = GameMode::Playing;
                power_ups::resume_slow_motion(&mut self.world);
                game_loop::resume(&mut self.world);
                info!("Game resumed");
            }
            _ => {}
        }
    }

    /// Cancels everything still scheduled. The session can be restarted
    /// with [`App::start_game`].
    pub fn teardown(&mut self) {
        let cancelled = self.world.resource_mut::<Scheduler>().cancel_all();
        input::reset(&mut self.world);
        game_loop::stop(&mut self.world);
        info!("Teardown cancelled {cancelled} timers");
    }

    /// Moves time forward to `now` (milliseconds, monotonic): fires every
    /// timer due by then in order, then runs one loop frame.
    pub fn advance(&mut self, now: f64) {
        loop {
            let Some(event) = self.world.resource_mut::<Scheduler>().pop_due(now) else {
                break;
            };
            self.dispatch(event);
        }
        self.world.resource_mut::<Scheduler>().set_now(now);
        game_loop::frame(&mut self.world, now);
    }

    fn dispatch(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::CountdownTick => self.countdown_tick(),
            TimerEvent::FinishLineClear => {
                systems::finish_line_clear(&mut self.world);
                if self.world.resource::<GameState>().is_playing() {
                    game_loop::resume(&mut self.world);
                }
            }
            TimerEvent::EndSlowMotion => power_ups::end_slow_motion(&mut self.world),
            TimerEvent::AutoRepeat(action) => input::repeat(&mut self.world, action),
        }
    }

    fn countdown_tick(&mut self) {
        let finished = {
            let mut game_state = self.world.resource_mut::<GameState>();
            if game_state.mode != GameMode::Countdown {
                return;
            }
            game_state.countdown = game_state.countdown.saturating_sub(1);
            if game_state.countdown == 0 {
                game_state.countdown_timer.take()
            } else {
                None
            }
        };

        if let Some(handle) = finished {
            self.world.resource_mut::<Scheduler>().cancel(handle);
            self.begin_play();
        }
    }

    // Commands

    pub fn press_key(&mut self, key: Key) {
        if self.world.resource::<PowerUps>().aiming {
            self.handle_aimer_keys(key);
        } else {
            input::press(&mut self.world, key);
        }
    }

    pub fn release_key(&mut self, key: Key) {
        input::release(&mut self.world, key);
    }

    pub fn handle_aimer_keys(&mut self, key: Key) {
        if power_ups::handle_aimer_keys(&mut self.world, key) {
            game_loop::resume(&mut self.world);
        }
    }

    pub fn move_left(&mut self) {
        systems::move_left(&mut self.world);
    }

    pub fn move_right(&mut self) {
        systems::move_right(&mut self.world);
    }

    pub fn rotate(&mut self) {
        systems::rotate_piece(&mut self.world);
    }

    pub fn soft_drop(&mut self) {
        systems::soft_drop(&mut self.world);
    }

    pub fn hard_drop(&mut self) {
        systems::hard_drop(&mut self.world);
    }

    pub fn hold(&mut self) {
        systems::hold_piece(&mut self.world);
    }

    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> bool {
        let activated = power_ups::activate_power_up(&mut self.world, kind);
        if self.world.resource::<PowerUps>().aiming {
            input::clear_timers(&mut self.world);
        }
        activated
    }

    pub fn toggle_animation_mode(&mut self) {
        let mut game_state = self.world.resource_mut::<GameState>();
        game_state.animation_mode = game_state.animation_mode.toggled();
    }

    // Observable state

    #[must_use]
    pub fn board(&self) -> &Board {
        self.world.resource::<Board>()
    }

    /// The board as it should be drawn: locked cells, the ghost overlay and
    /// the current piece.
    #[must_use]
    pub fn render_board(&self) -> Board {
        let mut board = self.board().clone();

        if let Some(ghost) = self.ghost_piece() {
            for (x, y, _) in ghost.filled_cells() {
                if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                    if board.get(x, y) == Some(Cell::Empty) {
                        board.set(x, y, Cell::Ghost);
                    }
                }
            }
        }

        if let Some(piece) = self.current_piece() {
            for (x, y, cell) in piece.filled_cells() {
                if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                    board.set(x, y, cell);
                }
            }
        }

        board
    }

    #[must_use]
    pub fn pieces(&self) -> &Pieces {
        self.world.resource::<Pieces>()
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.pieces().current.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        self.pieces().next.as_ref()
    }

    #[must_use]
    pub fn hold_piece(&self) -> Option<&Piece> {
        self.pieces().hold.as_ref()
    }

    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        systems::ghost_piece(&self.world)
    }

    fn game_state(&self) -> &GameState {
        self.world.resource::<GameState>()
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.game_state().mode
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.game_state().score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.game_state().level
    }

    #[must_use]
    pub fn lines_cleared(&self) -> u32 {
        self.game_state().lines_cleared
    }

    #[must_use]
    pub fn countdown(&self) -> u32 {
        self.game_state().countdown
    }

    #[must_use]
    pub fn drop_progress(&self) -> f64 {
        self.game_state().drop_progress
    }

    #[must_use]
    pub fn animation_mode(&self) -> AnimationMode {
        self.game_state().animation_mode
    }

    #[must_use]
    pub fn power_up_count(&self, kind: PowerUpKind) -> u32 {
        self.world.resource::<PowerUps>().count(kind)
    }

    #[must_use]
    pub fn power_up_counts(&self) -> [(PowerUpKind, u32); 4] {
        self.world.resource::<PowerUps>().counts()
    }

    #[must_use]
    pub fn can_use_power_up(&self, kind: PowerUpKind) -> bool {
        power_ups::can_use_power_up(&self.world, kind)
    }

    #[must_use]
    pub fn is_aiming(&self) -> bool {
        self.world.resource::<PowerUps>().aiming
    }

    #[must_use]
    pub fn aimer_cursor(&self) -> AimerCursor {
        self.world.resource::<PowerUps>().cursor
    }

    #[must_use]
    pub fn is_slow_motion(&self) -> bool {
        self.world.resource::<PowerUps>().slow_motion
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }
}
