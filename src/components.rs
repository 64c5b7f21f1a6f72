#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;

use crate::game::{BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        match rng.u8(0..7) {
            0 => TetrominoType::I,
            1 => TetrominoType::J,
            2 => TetrominoType::L,
            3 => TetrominoType::O,
            4 => TetrominoType::S,
            5 => TetrominoType::T,
            _ => TetrominoType::Z,
        }
    }

    /// Fixed color index stamped into every filled cell of this piece (1..=7).
    #[must_use]
    pub const fn color_index(self) -> u8 {
        match self {
            TetrominoType::I => 1,
            TetrominoType::J => 2,
            TetrominoType::L => 3,
            TetrominoType::O => 4,
            TetrominoType::S => 5,
            TetrominoType::T => 6,
            TetrominoType::Z => 7,
        }
    }

    #[must_use]
    pub fn from_color_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.color_index() == index)
    }

    /// Spawn orientation, `true` marks a filled sub-cell.
    #[must_use]
    pub fn layout(self) -> &'static [&'static [bool]] {
        const X: bool = true;
        const O: bool = false;
        match self {
            TetrominoType::I => &[&[X, X, X, X]],
            TetrominoType::J => &[&[X, O, O], &[X, X, X]],
            TetrominoType::L => &[&[O, O, X], &[X, X, X]],
            TetrominoType::O => &[&[X, X], &[X, X]],
            TetrominoType::S => &[&[O, X, X], &[X, X, O]],
            TetrominoType::T => &[&[O, X, O], &[X, X, X]],
            TetrominoType::Z => &[&[X, X, O], &[O, X, X]],
        }
    }

    #[must_use]
    pub fn get_color(self) -> ratatui::style::Color {
        match self {
            TetrominoType::I => ratatui::style::Color::Cyan,
            TetrominoType::J => ratatui::style::Color::Blue,
            TetrominoType::L => ratatui::style::Color::LightRed,
            TetrominoType::O => ratatui::style::Color::Yellow,
            TetrominoType::S => ratatui::style::Color::Green,
            TetrominoType::T => ratatui::style::Color::Magenta,
            TetrominoType::Z => ratatui::style::Color::Red,
        }
    }
}

/// One grid cell. Only `Block` is ever persisted by a lock; the other
/// non-empty variants are transient overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Block(TetrominoType),
    Ghost,
    Aimer,
    Clearing,
}

impl Cell {
    /// Numeric value of the cell: 0 empty, 1..=7 block color, -1 ghost,
    /// -2 aimer cursor, -3 line-clear marker.
    #[must_use]
    pub const fn value(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Block(t) => t.color_index() as i8,
            Cell::Ghost => -1,
            Cell::Aimer => -2,
            Cell::Clearing => -3,
        }
    }

    #[must_use]
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            0 => Some(Cell::Empty),
            -1 => Some(Cell::Ghost),
            -2 => Some(Cell::Aimer),
            -3 => Some(Cell::Clearing),
            1..=7 => TetrominoType::from_color_index(value as u8).map(Cell::Block),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(self, Cell::Block(_))
    }
}

/// A falling piece: the top-left origin of its shape matrix on the board.
/// `y` may be negative while the piece pokes out above the visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub x: i32,
    pub y: i32,
    pub shape: Vec<Vec<Cell>>,
}

impl Piece {
    /// Builds a piece at the spawn position with its cells stamped in color.
    #[must_use]
    pub fn new(tetromino_type: TetrominoType) -> Self {
        let shape: Vec<Vec<Cell>> = tetromino_type
            .layout()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&filled| {
                        if filled {
                            Cell::Block(tetromino_type)
                        } else {
                            Cell::Empty
                        }
                    })
                    .collect()
            })
            .collect();

        let width = shape.first().map_or(0, Vec::len);
        Self {
            x: Self::spawn_x(width),
            y: 0,
            shape,
        }
    }

    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::new(TetrominoType::random(rng))
    }

    /// Column that horizontally centers a shape of the given width.
    #[must_use]
    pub fn spawn_x(width: usize) -> i32 {
        (BOARD_WIDTH / 2) as i32 - (width / 2) as i32
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.shape.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.shape.len()
    }

    /// The same shape moved back to the spawn column and row.
    #[must_use]
    pub fn at_spawn(&self) -> Self {
        Self {
            x: Self::spawn_x(self.width()),
            y: 0,
            shape: self.shape.clone(),
        }
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            shape: self.shape.clone(),
        }
    }

    /// Rotates the shape 90 degrees clockwise (transpose, then reverse each
    /// new row). The origin is left untouched.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let shape = (0..self.width())
            .map(|col| self.shape.iter().rev().map(|row| row[col]).collect())
            .collect();

        Self {
            x: self.x,
            y: self.y,
            shape,
        }
    }

    /// Absolute board coordinates of every filled sub-cell.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.shape.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_filled())
                .map(move |(col, cell)| (self.x + col as i32, self.y + row as i32, *cell))
        })
    }

    /// Absolute row of the lowest shape row holding a filled cell.
    #[must_use]
    pub fn lowest_filled_row(&self) -> Option<i32> {
        self.shape
            .iter()
            .rposition(|row| row.iter().any(|cell| cell.is_filled()))
            .map(|row| self.y + row as i32)
    }

    #[must_use]
    pub fn tetromino_type(&self) -> Option<TetrominoType> {
        self.shape.iter().flatten().find_map(|cell| match cell {
            Cell::Block(t) => Some(*t),
            _ => None,
        })
    }
}

/// Row-major grid: `cells[y][x]`, row 0 at the top.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::Empty);
        }
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Writes a cell if the coordinate is on the board.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// A piece fits when every filled cell is inside the side walls, above
    /// the floor, and not on a locked block. Cells above row 0 never collide.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        for (x, y, _) in piece.filled_cells() {
            // Check bounds; there is deliberately no top bound
            if x < 0
                || x >= i32::try_from(self.width).unwrap_or(i32::MAX)
                || y >= i32::try_from(self.height).unwrap_or(i32::MAX)
            {
                return false;
            }

            // Check if space is already occupied
            if y >= 0 && self.cells[y as usize][x as usize].is_filled() {
                return false;
            }
        }

        true
    }

    /// A copy of the board with the piece's visible cells stamped in.
    #[must_use]
    pub fn with_piece(&self, piece: &Piece) -> Board {
        let mut board = self.clone();
        for (x, y, cell) in piece.filled_cells() {
            if board.contains(x, y) {
                board.cells[y as usize][x as usize] = cell;
            }
        }
        board
    }

    /// Indices of rows whose every cell is a locked block.
    #[must_use]
    pub fn full_rows(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().all(|cell| cell.is_filled()))
            .map(|(y, _)| y)
            .collect()
    }

    /// Removes full rows, keeping the order of the rest, and refills the top
    /// with empty rows. Returns the new board and the number of rows removed.
    #[must_use]
    pub fn clear_lines(&self) -> (Board, usize) {
        let kept: Vec<Vec<Cell>> = self
            .cells
            .iter()
            .filter(|row| !row.iter().all(|cell| cell.is_filled()))
            .cloned()
            .collect();

        let lines_cleared = self.height - kept.len();
        let mut cells = vec![vec![Cell::Empty; self.width]; lines_cleared];
        cells.extend(kept);

        (
            Board {
                width: self.width,
                height: self.height,
                cells,
            },
            lines_cleared,
        )
    }

    /// Overwrites whole rows with a single cell value.
    pub fn fill_rows(&mut self, rows: &[usize], cell: Cell) {
        for &y in rows {
            if let Some(row) = self.cells.get_mut(y) {
                row.fill(cell);
            }
        }
    }

    /// Zeroes one row in place without compacting the rows above it.
    pub fn clear_row(&mut self, y: usize) {
        self.fill_rows(&[y], Cell::Empty);
    }

    /// Lets every block in the column fall into the gaps below it, keeping
    /// their vertical order.
    pub fn apply_gravity_to_column(&mut self, col: usize) {
        if col >= self.width {
            return;
        }

        // Find the first empty cell from the bottom
        let Some(mut empty_row) = (0..self.height)
            .rev()
            .find(|&y| self.cells[y][col] == Cell::Empty)
        else {
            return; // Column is full
        };

        for y in (0..empty_row).rev() {
            let cell = self.cells[y][col];
            if cell != Cell::Empty {
                self.cells[empty_row][col] = cell;
                self.cells[y][col] = Cell::Empty;
                empty_row -= 1;
            }
        }
    }

    /// Where the piece would come to rest if dropped straight down.
    #[must_use]
    pub fn drop_position(&self, piece: &Piece) -> Piece {
        let floor = i32::try_from(self.height).unwrap_or(i32::MAX);
        let mut landing = piece.clone();
        while self.is_valid_position(&landing) && landing.y <= floor {
            landing.y += 1;
        }
        landing.y -= 1;
        landing
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|cell| *cell == Cell::Empty)
    }
}
