use rand::Rng;
use rand_pcg::Pcg32;

use crate::{
    GameOverError, PieceCollisionError,
    core::{board::Board, piece::Piece},
};

use super::piece_bag::PieceBag;

/// State of a single game: the board, the falling piece and the piece supply.
#[derive(Debug, Clone)]
pub struct GameField<R = Pcg32> {
    board: Board,
    falling_piece: Piece,
    piece_bag: PieceBag<R>,
}

impl GameField<Pcg32> {
    /// Standard board with a seeded 7-bag.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Board::standard(), PieceBag::with_seed(seed))
    }
}

impl<R> GameField<R>
where
    R: Rng,
{
    /// Starts a game on `board`, spawning the first piece from `piece_bag`.
    pub fn new(board: Board, mut piece_bag: PieceBag<R>) -> Self {
        let falling_piece = Piece::spawn(piece_bag.pop_next(), &board);
        Self {
            board,
            falling_piece,
            piece_bag,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    /// The next piece at its spawn position.
    #[must_use]
    pub fn next_piece(&self) -> Piece {
        Piece::spawn(self.piece_bag.peek_next(), &self.board)
    }

    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    /// Drops `placement` straight down, locks it and clears full lines.
    ///
    /// Returns the number of cleared lines together with the game-over status. The game
    /// is over when the stack reaches the buffer rows after clearing, or when the next
    /// piece cannot spawn; in either case the locked board is kept for inspection.
    pub fn complete_piece_drop(
        &mut self,
        placement: Piece,
    ) -> (usize, Result<(), GameOverError>) {
        let landed = placement.dropped(&self.board);
        self.board.add_piece(landed);
        let cleared_lines = self.board.clear_lines();

        if self.board.exceeded() {
            return (cleared_lines, Err(GameOverError::BufferExceeded));
        }

        self.falling_piece = Piece::spawn(self.piece_bag.pop_next(), &self.board);
        if self.board.is_colliding(self.falling_piece) {
            return (cleared_lines, Err(GameOverError::SpawnBlocked));
        }

        (cleared_lines, Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceKind;

    #[test]
    fn test_next_piece_becomes_falling_piece() {
        let mut field = GameField::with_seed(1);
        let next = field.next_piece();
        let (cleared, result) = field.complete_piece_drop(field.falling_piece());
        assert_eq!(cleared, 0);
        assert!(result.is_ok());
        assert_eq!(field.falling_piece(), next);
    }

    #[test]
    fn test_set_falling_piece_rejects_collision() {
        let mut field = GameField::with_seed(1);
        let piece = field.falling_piece();
        assert!(field.set_falling_piece(piece.with_position(-5, 0)).is_err());
        assert_eq!(field.falling_piece(), piece);
        let moved = piece.moved_down(field.board()).unwrap();
        assert!(field.set_falling_piece(moved).is_ok());
        assert_eq!(field.falling_piece(), moved);
    }

    #[test]
    fn test_drop_clears_completed_line() {
        let board = Board::standard().with_bottom_rows("####....##");
        let mut field = GameField::new(board, PieceBag::with_seed(0));
        let i_piece = Piece::new(PieceKind::I, 0, 0, 4);
        let (cleared, result) = field.complete_piece_drop(i_piece);
        assert_eq!(cleared, 1);
        assert!(result.is_ok());
        assert_eq!(field.board(), &Board::standard());
    }

    #[test]
    fn test_stacking_in_one_column_ends_the_game() {
        let mut field = GameField::with_seed(9);
        let mut outcome = Ok(());
        for _ in 0..50 {
            let piece = field.falling_piece();
            let (_, result) = field.complete_piece_drop(piece);
            outcome = result;
            if outcome.is_err() {
                break;
            }
        }
        assert!(outcome.is_err());
        assert!(
            field.board().exceeded() || field.board().is_colliding(field.falling_piece())
        );
    }
}
