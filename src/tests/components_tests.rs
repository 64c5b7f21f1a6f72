#[cfg(test)]
mod tests {
    use crate::components::{Board, Cell, Piece, TetrominoType};
    use crate::game::{BOARD_HEIGHT, BOARD_WIDTH};
    use crate::tests::test_utils::{
        board_from_values, column_board, column_values, fill_row_except, shape_values,
    };

    #[test]
    fn test_cell_values() {
        assert_eq!(Cell::Empty.value(), 0);
        assert_eq!(Cell::Ghost.value(), -1);
        assert_eq!(Cell::Aimer.value(), -2);
        assert_eq!(Cell::Clearing.value(), -3);
        assert_eq!(Cell::Block(TetrominoType::I).value(), 1);
        assert_eq!(Cell::Block(TetrominoType::Z).value(), 7);

        assert_eq!(Cell::from_value(4), Some(Cell::Block(TetrominoType::O)));
        assert_eq!(Cell::from_value(8), None);
        assert_eq!(Cell::from_value(-4), None);

        // Only locked blocks count as filled
        assert!(Cell::Block(TetrominoType::T).is_filled());
        assert!(!Cell::Ghost.is_filled());
        assert!(!Cell::Aimer.is_filled());
        assert!(!Cell::Clearing.is_filled());
    }

    #[test]
    fn test_piece_spawn_position() {
        // floor(10 / 2) - floor(width / 2)
        assert_eq!(Piece::new(TetrominoType::I).x, 3);
        assert_eq!(Piece::new(TetrominoType::O).x, 4);
        assert_eq!(Piece::new(TetrominoType::T).x, 4);

        for tetromino_type in TetrominoType::ALL {
            let piece = Piece::new(tetromino_type);
            assert_eq!(piece.y, 0);
            assert_eq!(piece.tetromino_type(), Some(tetromino_type));
        }
    }

    #[test]
    fn test_piece_cells_carry_color_index() {
        let piece = Piece::new(TetrominoType::L);
        assert_eq!(shape_values(&piece), vec![vec![0, 0, 3], vec![3, 3, 3]]);
    }

    #[test]
    fn test_random_piece_uses_rng() {
        let mut first = fastrand::Rng::with_seed(42);
        let mut second = fastrand::Rng::with_seed(42);
        let a: Vec<_> = (0..20).map(|_| Piece::random(&mut first)).collect();
        let b: Vec<_> = (0..20).map(|_| Piece::random(&mut second)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rotation_literals() {
        let rotate = |t: TetrominoType| shape_values(&Piece::new(t).rotated());

        assert_eq!(rotate(TetrominoType::J), vec![vec![2, 2], vec![2, 0], vec![2, 0]]);
        assert_eq!(rotate(TetrominoType::L), vec![vec![3, 0], vec![3, 0], vec![3, 3]]);
        assert_eq!(rotate(TetrominoType::S), vec![vec![5, 0], vec![5, 5], vec![0, 5]]);
        assert_eq!(rotate(TetrominoType::Z), vec![vec![0, 7], vec![7, 7], vec![7, 0]]);
        assert_eq!(rotate(TetrominoType::T), vec![vec![6, 0], vec![6, 6], vec![6, 0]]);
        assert_eq!(rotate(TetrominoType::I), vec![vec![1], vec![1], vec![1], vec![1]]);
    }

    #[test]
    fn test_o_piece_rotation_invariant() {
        let piece = Piece::new(TetrominoType::O);
        assert_eq!(piece.rotated(), piece);
    }

    #[test]
    fn test_four_rotations_return_original() {
        for tetromino_type in TetrominoType::ALL {
            let piece = Piece::new(tetromino_type);
            let rotated = piece.rotated().rotated().rotated().rotated();
            assert_eq!(rotated, piece, "{tetromino_type:?} after four turns");
        }
    }

    #[test]
    fn test_rotation_keeps_origin() {
        let piece = Piece::new(TetrominoType::T).moved(2, 5);
        let rotated = piece.rotated();
        assert_eq!((rotated.x, rotated.y), (piece.x, piece.y));
    }

    #[test]
    fn test_valid_position_walls_and_floor() {
        let board = Board::default();
        let piece = Piece::new(TetrominoType::O);

        assert!(board.is_valid_position(&piece));
        assert!(!board.is_valid_position(&Piece { x: -1, ..piece.clone() }));
        assert!(!board.is_valid_position(&Piece { x: 9, ..piece.clone() }));
        assert!(board.is_valid_position(&Piece { x: 8, ..piece.clone() }));
        assert!(board.is_valid_position(&Piece { y: 18, ..piece.clone() }));
        assert!(!board.is_valid_position(&Piece { y: 19, ..piece }));
    }

    #[test]
    fn test_valid_position_above_board() {
        let mut board = Board::default();
        board.cells[0].fill(Cell::Block(TetrominoType::I));

        // Rows above the board never collide
        let piece = Piece {
            y: -2,
            ..Piece::new(TetrominoType::O)
        };
        assert!(board.is_valid_position(&piece));
        assert!(!board.is_valid_position(&piece.moved(0, 1)));
    }

    #[test]
    fn test_valid_position_ignores_transient_cells() {
        let mut board = Board::default();
        board.cells[1][4] = Cell::Ghost;
        board.cells[1][5] = Cell::Aimer;
        assert!(board.is_valid_position(&Piece::new(TetrominoType::O)));

        board.cells[1][5] = Cell::Block(TetrominoType::S);
        assert!(!board.is_valid_position(&Piece::new(TetrominoType::O)));
    }

    #[test]
    fn test_clear_lines_without_full_rows() {
        let mut board = Board::default();
        fill_row_except(&mut board, BOARD_HEIGHT - 1, &[3]);

        let (cleared, lines) = board.clear_lines();
        assert_eq!(lines, 0);
        assert_eq!(cleared, board);
    }

    #[test]
    fn test_clear_lines_bottom_row() {
        let mut board = Board::default();
        board.cells[BOARD_HEIGHT - 2][0] = Cell::Block(TetrominoType::T);
        board.cells[BOARD_HEIGHT - 1].fill(Cell::Block(TetrominoType::I));

        let (cleared, lines) = board.clear_lines();
        assert_eq!(lines, 1);
        assert!(cleared.cells[0].iter().all(|cell| *cell == Cell::Empty));
        // Everything above shifts down by one
        assert_eq!(
            cleared.cells[BOARD_HEIGHT - 1][0],
            Cell::Block(TetrominoType::T)
        );
        assert_eq!(cleared.cells.len(), BOARD_HEIGHT);
    }

    #[test]
    fn test_clear_lines_tetris() {
        let mut board = Board::default();
        for y in BOARD_HEIGHT - 4..BOARD_HEIGHT {
            board.cells[y].fill(Cell::Block(TetrominoType::I));
        }

        let (cleared, lines) = board.clear_lines();
        assert_eq!(lines, 4);
        assert!(cleared.is_empty());
        assert_eq!(cleared.height, BOARD_HEIGHT);
        assert_eq!(cleared.width, BOARD_WIDTH);
    }

    #[test]
    fn test_clear_lines_keeps_row_order() {
        let board = board_from_values(&[
            &[0, 0, 0],
            &[1, 0, 0],
            &[2, 2, 2],
            &[0, 3, 0],
            &[4, 4, 4],
        ]);

        let (cleared, lines) = board.clear_lines();
        assert_eq!(lines, 2);
        assert_eq!(
            cleared,
            board_from_values(&[
                &[0, 0, 0],
                &[0, 0, 0],
                &[0, 0, 0],
                &[1, 0, 0],
                &[0, 3, 0],
            ])
        );
    }

    #[test]
    fn test_gravity_single_gap() {
        let mut board = column_board(&[1, 0, 1]);
        board.apply_gravity_to_column(0);
        assert_eq!(column_values(&board, 0), vec![0, 1, 1]);
    }

    #[test]
    fn test_gravity_multiple_gaps() {
        let mut board = column_board(&[1, 0, 1, 0, 1]);
        board.apply_gravity_to_column(0);
        assert_eq!(column_values(&board, 0), vec![0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_gravity_preserves_order() {
        let mut board = column_board(&[0, 2, 0, 3, 0, 4, 0, 0, 5, 0]);
        board.apply_gravity_to_column(0);
        assert_eq!(column_values(&board, 0), vec![0, 0, 0, 0, 0, 0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_gravity_full_and_empty_columns() {
        let mut full = column_board(&[1, 2, 3]);
        full.apply_gravity_to_column(0);
        assert_eq!(column_values(&full, 0), vec![1, 2, 3]);

        let mut empty = column_board(&[0, 0, 0]);
        empty.apply_gravity_to_column(0);
        assert_eq!(column_values(&empty, 0), vec![0, 0, 0]);
    }

    #[test]
    fn test_gravity_leaves_other_columns() {
        let mut board = board_from_values(&[&[1, 6], &[0, 0], &[0, 7]]);
        board.apply_gravity_to_column(0);
        assert_eq!(board, board_from_values(&[&[0, 6], &[0, 0], &[1, 7]]));

        // Out of range columns are ignored
        board.apply_gravity_to_column(5);
        assert_eq!(board, board_from_values(&[&[0, 6], &[0, 0], &[1, 7]]));
    }

    #[test]
    fn test_drop_position() {
        let mut board = Board::default();
        let piece = Piece::new(TetrominoType::O);
        assert_eq!(board.drop_position(&piece).y, 18);

        board.cells[10][4] = Cell::Block(TetrominoType::Z);
        let landing = board.drop_position(&piece);
        assert_eq!(landing.y, 8);
        assert_eq!(landing.x, piece.x);
        assert_eq!(piece.y, 0);
    }

    #[test]
    fn test_with_piece_and_full_rows() {
        let mut board = Board::default();
        fill_row_except(&mut board, 19, &[3, 4, 5, 6]);
        let piece = Piece {
            y: 19,
            ..Piece::new(TetrominoType::I)
        };

        let stamped = board.with_piece(&piece);
        assert_eq!(stamped.full_rows(), vec![19]);
        assert!(board.full_rows().is_empty());
    }

    #[test]
    fn test_clear_row_does_not_compact() {
        let mut board = board_from_values(&[&[1, 0], &[2, 2], &[0, 3]]);
        board.clear_row(1);
        assert_eq!(board, board_from_values(&[&[1, 0], &[0, 0], &[0, 3]]));
    }

    #[test]
    fn test_lowest_filled_row() {
        let piece = Piece::new(TetrominoType::T).moved(0, 5);
        assert_eq!(piece.lowest_filled_row(), Some(6));

        let vertical = Piece::new(TetrominoType::I).rotated().moved(0, -2);
        assert_eq!(vertical.lowest_filled_row(), Some(1));
    }
}
