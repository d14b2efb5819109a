use std::{cell::OnceCell, iter};

use arrayvec::ArrayVec;
use stackbot_engine::Board;

/// Upper bound on board columns (dimensions are stored as `u8`).
const MAX_COLUMNS: usize = u8::MAX as usize;

type ColumnValues = ArrayVec<u8, MAX_COLUMNS>;

/// Lazily evaluated features of a board.
///
/// Heights are measured over all rows, buffer included: a column's height is
/// `rows - index of its topmost occupied cell`, or 0 when the column is empty.
/// Every metric is computed at most once.
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<ColumnValues>,
    column_occupied_cells: OnceCell<ColumnValues>,
    aggregate_height: OnceCell<u32>,
    full_lines: OnceCell<u32>,
    num_holes: OnceCell<u32>,
    bumpiness: OnceCell<u32>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            full_lines: OnceCell::new(),
            num_holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    fn occupied(&self, row: usize, column: usize) -> bool {
        self.board
            .cell(row, column)
            .is_some_and(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn column_heights(&self) -> &[u8] {
        self.column_heights.get_or_init(|| {
            let rows = self.board.rows();
            (0..self.board.columns())
                .map(|column| {
                    let top = (0..rows).find(|&row| self.occupied(row, column));
                    top.map_or(0, |top| to_u8(rows - top))
                })
                .collect()
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8] {
        self.column_occupied_cells.get_or_init(|| {
            (0..self.board.columns())
                .map(|column| {
                    to_u8(
                        (0..self.board.rows())
                            .filter(|&row| self.occupied(row, column))
                            .count(),
                    )
                })
                .collect()
        })
    }

    /// Sum of column heights.
    #[must_use]
    pub fn aggregate_height(&self) -> u32 {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().copied().map(u32::from).sum())
    }

    /// Number of completely filled rows.
    #[must_use]
    pub fn full_lines(&self) -> u32 {
        *self
            .full_lines
            .get_or_init(|| to_u32(self.board.full_lines()))
    }

    /// Empty cells with at least one occupied cell above them in the same column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| u32::from(h - occ))
                .sum()
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| u32::from(w[0].abs_diff(w[1])))
                .sum()
        })
    }
}

// Board dimensions are bounded by `u8::MAX`, so per-column counts always fit.
fn to_u8(value: usize) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_no_features() {
        let analysis = BoardAnalysis::new(Board::standard());
        assert_eq!(analysis.column_heights(), &[0; 10]);
        assert_eq!(analysis.aggregate_height(), 0);
        assert_eq!(analysis.full_lines(), 0);
        assert_eq!(analysis.num_holes(), 0);
        assert_eq!(analysis.bumpiness(), 0);
    }

    #[test]
    fn test_features_of_small_stack() {
        let board = Board::standard().with_bottom_rows(
            "
            .#........
            .#.#......
            ##.#######
            ",
        );
        let analysis = BoardAnalysis::new(board);
        assert_eq!(analysis.column_heights(), &[1, 3, 0, 2, 1, 1, 1, 1, 1, 1]);
        assert_eq!(analysis.aggregate_height(), 12);
        assert_eq!(analysis.full_lines(), 0);
        assert_eq!(analysis.num_holes(), 0);
        // |1-3| + |3-0| + |0-2| + |2-1|
        assert_eq!(analysis.bumpiness(), 2 + 3 + 2 + 1);
    }

    #[test]
    fn test_holes_count_every_covered_empty_cell() {
        let board = Board::standard().with_bottom_rows(
            "
            #.........
            ..#.......
            #.#.......
            ..........
            ",
        );
        let analysis = BoardAnalysis::new(board);
        assert_eq!(analysis.column_heights()[0], 4);
        assert_eq!(analysis.column_heights()[2], 3);
        // column 0: rows 2 and 4 from the top of the art, column 2: the bottom row
        assert_eq!(analysis.num_holes(), 3);
    }

    #[test]
    fn test_full_lines_counted_without_clearing() {
        let board = Board::standard().with_bottom_rows(
            "
            #.........
            ##########
            ##########
            ",
        );
        let analysis = BoardAnalysis::new(board);
        assert_eq!(analysis.full_lines(), 2);
        assert_eq!(analysis.column_heights()[0], 3);
        assert_eq!(analysis.aggregate_height(), 3 + 9 * 2);
    }
}
