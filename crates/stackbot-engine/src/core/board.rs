use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BoardSizeError;

use super::piece::Piece;

/// A single board cell: `0` is empty, anything else is an occupied cell's RGB color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Cell(u32);

impl Cell {
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn new(color: u32) -> Self {
        Self(color)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn color(self) -> u32 {
        self.0
    }
}

/// Color used for cells created by [`Board::with_bottom_rows`].
const FIXTURE_CELL: Cell = Cell::new(0x80_80_80);

/// Occupancy grid with a hidden buffer above the visible area.
///
/// Rows are counted from the top and include the `buffer_rows` spawn area, which is not
/// displayed but takes part in collisions and in the overflow check ([`Board::exceeded`]).
/// Coordinates outside `[0, rows) × [0, columns)` behave as occupied, so pieces can never
/// leave the grid.
///
/// Dimensions are fixed at construction.
///
/// # Example
///
/// ```
/// use stackbot_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::standard();
/// let piece = Piece::spawn(PieceKind::I, &board).dropped(&board);
/// board.add_piece(piece);
/// assert_eq!(board.clear_lines(), 0);
/// assert!(!board.exceeded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: u8,
    columns: u8,
    buffer_rows: u8,
    cells: Vec<Cell>,
}

impl Board {
    pub const STANDARD_ROWS: usize = 22;
    pub const STANDARD_COLUMNS: usize = 10;
    pub const STANDARD_BUFFER_ROWS: usize = 2;

    /// Creates an empty board.
    ///
    /// Rows and columns must be in `1..=255` and the buffer must leave at least one
    /// visible row.
    pub fn new(rows: usize, columns: usize, buffer_rows: usize) -> Result<Self, BoardSizeError> {
        let error = BoardSizeError {
            rows,
            columns,
            buffer_rows,
        };
        let (Ok(r), Ok(c), Ok(b)) = (
            u8::try_from(rows),
            u8::try_from(columns),
            u8::try_from(buffer_rows),
        ) else {
            return Err(error);
        };
        if r == 0 || c == 0 || b >= r {
            return Err(error);
        }
        Ok(Self {
            rows: r,
            columns: c,
            buffer_rows: b,
            cells: vec![Cell::EMPTY; rows * columns],
        })
    }

    /// The 22 × 10 board with 2 buffer rows.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rows: 22,
            columns: 10,
            buffer_rows: 2,
            cells: vec![Cell::EMPTY; Self::STANDARD_ROWS * Self::STANDARD_COLUMNS],
        }
    }

    /// Total row count, buffer included.
    #[must_use]
    pub fn rows(&self) -> usize {
        usize::from(self.rows)
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        usize::from(self.columns)
    }

    #[must_use]
    pub fn buffer_rows(&self) -> usize {
        usize::from(self.buffer_rows)
    }

    /// Rows below the buffer.
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        self.rows() - self.buffer_rows()
    }

    pub(crate) fn columns_i32(&self) -> i32 {
        i32::from(self.columns)
    }

    fn index(&self, row: i32, column: i32) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        (row < self.rows() && column < self.columns()).then(|| row * self.columns() + column)
    }

    fn row_cells(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.columns()..][..self.columns()]
    }

    /// Cell at `(row, column)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        (row < self.rows() && column < self.columns())
            .then(|| self.cells[row * self.columns() + column])
    }

    /// Whether `(row, column)` is unavailable to a piece: occupied or out of bounds.
    #[must_use]
    pub fn is_occupied(&self, row: i32, column: i32) -> bool {
        self.index(row, column)
            .is_none_or(|index| !self.cells[index].is_empty())
    }

    /// Checks if any occupied cell of `piece` overlaps the stack or leaves the grid.
    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        piece
            .occupied_positions()
            .any(|(row, column)| self.is_occupied(row, column))
    }

    /// Locks a piece, writing its color into each of its occupied cells.
    ///
    /// The caller guarantees the placement is legal (see [`Board::is_colliding`]).
    pub fn add_piece(&mut self, piece: Piece) {
        debug_assert!(!self.is_colliding(piece), "illegal placement: {piece}");
        let color = piece.kind().color();
        for (row, column) in piece.occupied_positions() {
            if let Some(index) = self.index(row, column) {
                self.cells[index] = color;
            }
        }
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.row_cells(row).iter().all(|cell| !cell.is_empty())
    }

    /// Number of completely filled rows.
    #[must_use]
    pub fn full_lines(&self) -> usize {
        (0..self.rows()).filter(|&row| self.is_row_full(row)).count()
    }

    /// Removes all full rows at once and returns how many were removed.
    ///
    /// Rows above a removed row shift down; the same number of empty rows appear at the
    /// top, so the board keeps its dimensions.
    pub fn clear_lines(&mut self) -> usize {
        let width = self.columns();
        let mut count = 0;
        for row in (0..self.rows()).rev() {
            if self.is_row_full(row) {
                count += 1;
                continue;
            }
            if count > 0 {
                let start = row * width;
                self.cells
                    .copy_within(start..start + width, (row + count) * width);
            }
        }
        self.cells[..count * width].fill(Cell::EMPTY);
        count
    }

    /// Whether any cell in the buffer rows is occupied (game over).
    #[must_use]
    pub fn exceeded(&self) -> bool {
        self.cells[..self.buffer_rows() * self.columns()]
            .iter()
            .any(|cell| !cell.is_empty())
    }

    /// Fills the bottom rows from ASCII art, `#` occupied and `.` empty.
    ///
    /// Blank lines and whitespace are ignored; the last line of `art` becomes the bottom
    /// row. Intended for fixtures and tests.
    ///
    /// # Panics
    ///
    /// Panics if a line does not have exactly `columns` cells or if there are more lines
    /// than rows.
    #[must_use]
    pub fn with_bottom_rows(mut self, art: &str) -> Self {
        let lines: Vec<Vec<char>> = art
            .lines()
            .map(|line| line.chars().filter(|c| *c == '#' || *c == '.').collect())
            .filter(|line: &Vec<char>| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= self.rows(),
            "art has {} rows but the board only {}",
            lines.len(),
            self.rows()
        );

        let top = self.rows() - lines.len();
        let width = self.columns();
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(
                line.len(),
                width,
                "each row must have exactly {} cells, got {} at row {}",
                width,
                line.len(),
                i
            );
            for (column, ch) in line.iter().enumerate() {
                self.cells[(top + i) * width + column] = if *ch == '#' {
                    FIXTURE_CELL
                } else {
                    Cell::EMPTY
                };
            }
        }
        self
    }
}

/// Renders the visible rows as `#`/`.` lines.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.buffer_rows()..self.rows() {
            for cell in self.row_cells(row) {
                f.write_str(if cell.is_empty() { "." } else { "#" })?;
            }
            if row + 1 < self.rows() {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::PieceKind;

    use super::*;

    fn occupied_count(board: &Board) -> usize {
        board.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    #[test]
    fn test_standard_board() {
        let board = Board::standard();
        assert_eq!(board, Board::new(22, 10, 2).unwrap());
        assert_eq!(board.visible_rows(), 20);
        assert_eq!(occupied_count(&board), 0);
        assert!(!board.exceeded());
    }

    #[test]
    fn test_bottom_rows_fill_from_floor() {
        let board = Board::new(4, 3, 1).unwrap().with_bottom_rows(
            "
            #..
            .##
            ",
        );
        assert_eq!(occupied_count(&board), 3);
        assert_eq!(board.cell(2, 0), Some(FIXTURE_CELL));
        assert_eq!(board.cell(2, 1), Some(Cell::EMPTY));
        assert_eq!(board.cell(3, 0), Some(Cell::EMPTY));
        assert_eq!(board.cell(3, 2), Some(FIXTURE_CELL));
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(Board::new(0, 10, 0).is_err());
        assert!(Board::new(10, 0, 0).is_err());
        assert!(Board::new(4, 4, 4).is_err());
        assert!(Board::new(300, 10, 2).is_err());
        assert!(Board::new(4, 4, 0).is_ok());
    }

    #[test]
    fn test_out_of_bounds_is_occupied() {
        let board = Board::new(4, 4, 0).unwrap();
        assert!(!board.is_occupied(0, 0));
        assert!(!board.is_occupied(3, 3));
        assert!(board.is_occupied(-1, 0));
        assert!(board.is_occupied(0, -1));
        assert!(board.is_occupied(4, 0));
        assert!(board.is_occupied(0, 4));
        assert_eq!(board.cell(4, 0), None);
    }

    #[test]
    fn test_add_piece_writes_color() {
        let mut board = Board::standard();
        let piece = Piece::new(PieceKind::T, 0, 20, 0);
        board.add_piece(piece);
        assert_eq!(board.cell(20, 1), Some(PieceKind::T.color()));
        assert_eq!(board.cell(21, 0), Some(PieceKind::T.color()));
        assert_eq!(board.cell(21, 2), Some(PieceKind::T.color()));
        assert_eq!(board.cell(20, 0), Some(Cell::EMPTY));
        assert_eq!(occupied_count(&board), 4);
    }

    #[test]
    fn test_clear_single_line_keeps_row_count() {
        let mut board = Board::standard().with_bottom_rows(
            "
            #.........
            ##########
            ",
        );
        assert_eq!(board.full_lines(), 1);
        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board.rows(), 22);
        assert_eq!(board.cells.len(), 22 * 10);
        assert_eq!(board.cell(21, 0), Some(FIXTURE_CELL));
        assert_eq!(board.cell(20, 0), Some(Cell::EMPTY));
        assert_eq!(occupied_count(&board), 1);
    }

    #[test]
    fn test_clear_lines_is_idempotent() {
        let mut board = Board::standard().with_bottom_rows(
            "
            ..##......
            ##########
            #.########
            ##########
            ",
        );
        assert_eq!(board.clear_lines(), 2);
        let after_first = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, after_first);
    }

    #[test]
    fn test_clear_non_adjacent_lines_shifts_rows() {
        let mut board = Board::standard().with_bottom_rows(
            "
            .#........
            ##########
            #.########
            ##########
            ",
        );
        assert_eq!(board.clear_lines(), 2);
        let expected = Board::standard().with_bottom_rows(
            "
            .#........
            #.########
            ",
        );
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_all_rows() {
        let mut board = Board::new(3, 2, 1).unwrap().with_bottom_rows(
            "
            ##
            ##
            ##
            ",
        );
        assert_eq!(board.clear_lines(), 3);
        assert_eq!(occupied_count(&board), 0);
    }

    #[test]
    fn test_exceeded_only_in_buffer() {
        let art = format!("#.........\n{}", "..........\n".repeat(19));
        let board = Board::standard().with_bottom_rows(&art);
        assert_eq!(board.cell(2, 0), Some(FIXTURE_CELL));
        assert!(!board.exceeded());

        let mut board = Board::standard();
        board.add_piece(Piece::new(PieceKind::O, 0, 1, 4));
        assert!(board.exceeded());
    }

    #[test]
    fn test_display_shows_visible_rows() {
        let board = Board::new(4, 3, 1).unwrap().with_bottom_rows(
            "
            #..
            ##.
            ",
        );
        assert_eq!(board.to_string(), "...\n#..\n##.");
    }
}
