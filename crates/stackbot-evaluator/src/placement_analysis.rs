//! A hypothetical placement locked on a scratch copy of the board.
//!
//! Features are measured on the board right after locking, before any line is cleared,
//! so a placement that completes rows is credited through [`BoardAnalysis::full_lines`].

use stackbot_engine::{Board, Piece};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Piece,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Locks `placement` (already at its landing row) on a copy of `before_placement`.
    #[must_use]
    pub fn from_board(before_placement: &Board, placement: Piece) -> Self {
        let mut board = before_placement.clone();
        board.add_piece(placement);
        Self {
            placement,
            board_analysis: BoardAnalysis::new(board),
        }
    }

    #[must_use]
    pub fn placement(&self) -> Piece {
        self.placement
    }

    /// Board with the piece locked and full rows still in place.
    #[must_use]
    pub fn board(&self) -> &Board {
        self.board_analysis.board()
    }

    /// Rows this placement completes.
    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.board().full_lines()
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}

#[cfg(test)]
mod tests {
    use stackbot_engine::PieceKind;

    use super::*;

    #[test]
    fn test_live_board_untouched() {
        let board = Board::standard().with_bottom_rows("###...####");
        let landing = Piece::new(PieceKind::I, 1, 0, 1).dropped(&board);
        let analysis = PlacementAnalysis::from_board(&board, landing);

        assert_eq!(board, Board::standard().with_bottom_rows("###...####"));
        assert_ne!(analysis.board(), &board);
        assert_eq!(analysis.placement(), landing);
        assert_eq!(analysis.cleared_lines(), 0);
    }

    #[test]
    fn test_completed_rows_stay_on_board() {
        let board = Board::standard().with_bottom_rows("###....###");
        let landing = Piece::new(PieceKind::I, 0, 0, 3).dropped(&board);
        let analysis = PlacementAnalysis::from_board(&board, landing);

        assert_eq!(analysis.cleared_lines(), 1);
        assert_eq!(analysis.board_analysis().full_lines(), 1);
        assert_eq!(analysis.board_analysis().aggregate_height(), 10);
    }
}
