#[cfg(test)]
mod tests {
    use crate::components::{Board, Cell, Piece, TetrominoType};
    use crate::game_loop::{self, GameLoop, drop_interval, frame};
    use crate::state::{GameMode, GameState, Pieces, PowerUps};
    use crate::tests::test_utils::world_with_piece;
    use bevy_ecs::prelude::*;

    fn running_world(piece: Piece) -> World {
        let mut world = world_with_piece(piece);
        game_loop::start(&mut world);
        world
    }

    fn piece_y(world: &World) -> i32 {
        world
            .resource::<Pieces>()
            .current
            .as_ref()
            .map_or(-1, |piece| piece.y)
    }

    #[test]
    fn test_drop_interval_scaling() {
        let mut world = world_with_piece(Piece::new(TetrominoType::O));
        assert_eq!(drop_interval(&world), 1000.0);

        world.resource_mut::<GameState>().level = 4;
        assert_eq!(drop_interval(&world), 250.0);

        world.resource_mut::<PowerUps>().slow_motion = true;
        assert_eq!(drop_interval(&world), 750.0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut world = world_with_piece(Piece::new(TetrominoType::O));
        game_loop::start(&mut world);
        game_loop::start(&mut world);
        assert_eq!(world.resource::<GameLoop>().start_count(), 1);

        game_loop::stop(&mut world);
        game_loop::resume(&mut world);
        assert_eq!(world.resource::<GameLoop>().start_count(), 2);
    }

    #[test]
    fn test_first_frame_has_no_delta() {
        let mut world = running_world(Piece::new(TetrominoType::O));

        frame(&mut world, 5000.0);

        assert_eq!(world.resource::<GameState>().drop_counter, 0.0);
        assert_eq!(world.resource::<GameLoop>().last_time(), 5000.0);
        assert_eq!(piece_y(&world), 0);
    }

    #[test]
    fn test_gravity_ticks_per_interval() {
        let mut world = running_world(Piece::new(TetrominoType::O));

        frame(&mut world, 100.0);
        frame(&mut world, 1099.0);
        assert_eq!(piece_y(&world), 0);

        frame(&mut world, 1100.0);
        assert_eq!(piece_y(&world), 1);

        // A long frame drains several intervals at once
        frame(&mut world, 4100.0);
        assert_eq!(piece_y(&world), 4);
    }

    #[test]
    fn test_drop_progress() {
        let mut world = running_world(Piece::new(TetrominoType::O));

        frame(&mut world, 100.0);
        frame(&mut world, 350.0);
        assert_eq!(world.resource::<GameState>().drop_progress, 0.25);

        frame(&mut world, 850.0);
        assert_eq!(world.resource::<GameState>().drop_progress, 0.75);
    }

    #[test]
    fn test_drop_progress_zero_when_resting() {
        let mut world = running_world(Piece {
            y: 18,
            ..Piece::new(TetrominoType::O)
        });

        frame(&mut world, 100.0);
        frame(&mut world, 600.0);
        assert_eq!(world.resource::<GameState>().drop_progress, 0.0);
        assert_eq!(world.resource::<GameState>().drop_counter, 500.0);
    }

    #[test]
    fn test_soft_drop_suspends_gravity() {
        let mut world = running_world(Piece::new(TetrominoType::O));
        world.resource_mut::<GameState>().soft_drop_active = true;

        frame(&mut world, 100.0);
        frame(&mut world, 3100.0);
        assert_eq!(piece_y(&world), 0);
    }

    #[test]
    fn test_slow_motion_stretches_interval() {
        let mut world = running_world(Piece::new(TetrominoType::O));
        world.resource_mut::<PowerUps>().slow_motion = true;

        frame(&mut world, 100.0);
        frame(&mut world, 2100.0);
        assert_eq!(piece_y(&world), 0);
        frame(&mut world, 3100.0);
        assert_eq!(piece_y(&world), 1);
    }

    #[test]
    fn test_frame_stops_when_not_playing() {
        let mut world = running_world(Piece::new(TetrominoType::O));
        world.resource_mut::<GameState>().mode = GameMode::Paused;

        frame(&mut world, 100.0);
        assert!(!world.resource::<GameLoop>().is_running());
    }

    #[test]
    fn test_stopped_loop_does_nothing() {
        let mut world = world_with_piece(Piece::new(TetrominoType::O));

        frame(&mut world, 100.0);
        frame(&mut world, 5100.0);
        assert_eq!(piece_y(&world), 0);
        assert_eq!(world.resource::<GameState>().drop_counter, 0.0);
    }

    #[test]
    fn test_game_over_halts_drain() {
        let mut world = running_world(Piece::new(TetrominoType::O));
        {
            let mut board = world.resource_mut::<Board>();
            board.cells[2][4] = Cell::Block(TetrominoType::T);
            board.cells[2][5] = Cell::Block(TetrominoType::T);
        }

        frame(&mut world, 100.0);
        frame(&mut world, 5100.0);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.mode, GameMode::GameOver);
        assert_eq!(game_state.drop_progress, 0.0);
        assert_eq!(game_state.pieces_locked, 1);
        assert!(!world.resource::<GameLoop>().is_running());
    }

    #[test]
    fn test_resume_keeps_drop_counter() {
        let mut world = running_world(Piece::new(TetrominoType::O));
        frame(&mut world, 100.0);
        frame(&mut world, 700.0);

        game_loop::stop(&mut world);
        game_loop::resume(&mut world);
        frame(&mut world, 9000.0);
        assert_eq!(world.resource::<GameState>().drop_counter, 600.0);

        frame(&mut world, 9400.0);
        assert_eq!(piece_y(&world), 1);
    }
}
