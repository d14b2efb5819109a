//! Turn evaluation: selecting the best placement for the falling piece.
//!
//! # How It Works
//!
//! 1. **Enumerate placements** - for every rotation (ascending) and every column
//!    (ascending) at which the rotated piece fits at its current row, drop it straight
//!    down. No kicks and no sideways drift while falling.
//! 2. **Score** - lock each landing on a scratch board and score it with the
//!    [`PlacementEvaluator`]. With a next piece, the candidate's score is instead the best
//!    score of all placements of the next piece on that scratch board.
//! 3. **Select** - the first candidate with the strictly highest score wins.
//!
//! The search is exhaustive: every first placement is crossed with every follow-up, with
//! no pruning. The live board is never mutated.
//!
//! # Usage
//!
//! ```
//! use stackbot_engine::GameField;
//! use stackbot_evaluator::{turn_evaluator::TurnEvaluator, weights::Weights};
//!
//! let evaluator = TurnEvaluator::with_weights(Weights::default());
//! let mut field = GameField::with_seed(0);
//! let stats = evaluator.play_session(&mut field, 30, true);
//! assert_eq!(stats.completed_pieces(), 30);
//! ```

use arrayvec::ArrayVec;
use rand::Rng;
use stackbot_engine::{Board, GameField, GameOverError, GameStats, Piece, PieceKind};

use crate::{
    placement_analysis::PlacementAnalysis,
    placement_evaluator::{PlacementEvaluator, WeightedPlacementEvaluator},
    weights::Weights,
};

/// The piece has no legal placement on the board: game over for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no legal placement for {piece}")]
pub struct NoPlacementError {
    pub piece: Piece,
}

/// A turn that could not be completed; either way the game is over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum TurnError {
    #[display("{_0}")]
    NoPlacement(NoPlacementError),
    #[display("{_0}")]
    GameOver(GameOverError),
}

/// The chosen action for one turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnPlan {
    placement: Piece,
    landing: Piece,
    score: f64,
}

impl TurnPlan {
    /// The piece at the chosen rotation and column, still at its starting row.
    #[must_use]
    pub fn placement(&self) -> Piece {
        self.placement
    }

    /// Where [`TurnPlan::placement`] comes to rest when dropped.
    #[must_use]
    pub fn landing(&self) -> Piece {
        self.landing
    }

    /// Score of the plan; [`f64::NEG_INFINITY`] when lookahead found no follow-up.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Commits this plan to `field` and records the drop in `stats`.
    ///
    /// Returns the number of cleared lines and the game-over status.
    pub fn apply<R>(
        &self,
        field: &mut GameField<R>,
        stats: &mut GameStats,
    ) -> (usize, Result<(), GameOverError>)
    where
        R: Rng,
    {
        debug_assert_eq!(field.falling_piece().kind(), self.placement.kind());
        let (cleared_lines, result) = field.complete_piece_drop(self.placement);
        stats.complete_piece_drop(cleared_lines);
        (cleared_lines, result)
    }
}

/// Selects the best placement using a replaceable [`PlacementEvaluator`].
#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
}

impl TurnEvaluator<'static> {
    /// Turn evaluator backed by a [`WeightedPlacementEvaluator`].
    #[must_use]
    pub fn with_weights(weights: Weights) -> Self {
        Self::new(Box::new(WeightedPlacementEvaluator::new(weights)))
    }
}

impl<'a> TurnEvaluator<'a> {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Swaps the scoring used by subsequent turns.
    pub fn set_placement_evaluator(&mut self, placement_evaluator: Box<dyn PlacementEvaluator + 'a>) {
        self.placement_evaluator = placement_evaluator;
    }

    /// Selects the best placement for `piece`, optionally looking one piece ahead.
    ///
    /// Only the kind and the row of `piece` (and `next`) matter: candidates are generated
    /// at that row for every rotation and column.
    pub fn select_best_turn(
        &self,
        board: &Board,
        piece: Piece,
        next: Option<Piece>,
    ) -> Result<TurnPlan, NoPlacementError> {
        let mut best: Option<TurnPlan> = None;

        for placement in available_placements(piece, board) {
            let landing = placement.dropped(board);
            let analysis = PlacementAnalysis::from_board(board, landing);
            let score = match next {
                Some(next) => self
                    .best_score(analysis.board(), next)
                    .unwrap_or(f64::NEG_INFINITY),
                None => self.placement_evaluator.evaluate_placement(&analysis),
            };
            if best.is_none_or(|best| score > best.score) {
                best = Some(TurnPlan {
                    placement,
                    landing,
                    score,
                });
            }
        }

        best.ok_or(NoPlacementError { piece })
    }

    fn best_score(&self, board: &Board, piece: Piece) -> Option<f64> {
        available_placements(piece, board)
            .map(|placement| {
                let analysis = PlacementAnalysis::from_board(board, placement.dropped(board));
                self.placement_evaluator.evaluate_placement(&analysis)
            })
            .reduce(f64::max)
    }

    /// Selects the best placement for the falling piece of `field` and commits it.
    ///
    /// With `lookahead`, the next piece from the field's bag is considered. The drop is
    /// recorded in `stats` even when it ends the game.
    pub fn play_turn<R>(
        &self,
        field: &mut GameField<R>,
        stats: &mut GameStats,
        lookahead: bool,
    ) -> Result<TurnPlan, TurnError>
    where
        R: Rng,
    {
        let next = lookahead.then(|| field.next_piece());
        let plan = self.select_best_turn(field.board(), field.falling_piece(), next)?;
        let (_cleared_lines, result) = plan.apply(field, stats);
        result?;
        Ok(plan)
    }

    /// Plays up to `turn_limit` turns headlessly, stopping early on game over.
    pub fn play_session<R>(
        &self,
        field: &mut GameField<R>,
        turn_limit: usize,
        lookahead: bool,
    ) -> GameStats
    where
        R: Rng,
    {
        let mut stats = GameStats::new();
        for _ in 0..turn_limit {
            if self.play_turn(field, &mut stats, lookahead).is_err() {
                break;
            }
        }
        stats
    }
}

/// Rotation patterns of a kind, each anchored at `row`, column unset.
fn rotations(kind: PieceKind, row: i32) -> ArrayVec<Piece, 4> {
    (0..kind.rotation_count())
        .map(|rotation| Piece::new(kind, rotation, row, 0))
        .collect()
}

/// Every non-colliding `(rotation, column)` of `piece` at its current row, in search
/// order: rotation ascending, then column ascending.
///
/// Columns range over every anchor that keeps the occupied cells inside the board, so
/// a bounding box may hang past either wall.
pub fn available_placements(piece: Piece, board: &Board) -> impl Iterator<Item = Piece> + '_ {
    let columns = i32::try_from(board.columns()).unwrap_or(i32::MAX);
    rotations(piece.kind(), piece.row())
        .into_iter()
        .flat_map(move |rotated| {
            let dimension = i32::try_from(rotated.dimension()).unwrap_or(i32::MAX);
            (1 - dimension..columns).map(move |column| rotated.with_position(rotated.row(), column))
        })
        .filter(|candidate| !board.is_colliding(*candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator(weights: Weights) -> TurnEvaluator<'static> {
        TurnEvaluator::with_weights(weights)
    }

    const LINES_ONLY: Weights = Weights {
        height: 0.0,
        lines: 1.0,
        holes: 0.0,
        bumpiness: 0.0,
    };

    #[test]
    fn test_placement_counts_on_empty_board() {
        let board = Board::standard();
        let count = |kind| available_placements(Piece::spawn(kind, &board), &board).count();
        assert_eq!(count(PieceKind::O), 9);
        assert_eq!(count(PieceKind::I), 7 + 10);
        assert_eq!(count(PieceKind::S), 8 + 9);
        assert_eq!(count(PieceKind::T), 8 + 9 + 8 + 9);
    }

    #[test]
    fn test_placements_in_search_order() {
        let board = Board::standard();
        let placements: Vec<_> = available_placements(Piece::spawn(PieceKind::I, &board), &board)
            .map(|p| (p.rotation(), p.column()))
            .collect();
        assert_eq!(placements.first(), Some(&(0, 0)));
        assert_eq!(placements[6], (0, 6));
        // vertical I: occupied column is offset 2 inside the box
        assert_eq!(placements[7], (1, -2));
        assert_eq!(placements.last(), Some(&(1, 7)));
    }

    #[test]
    fn test_i_piece_on_small_empty_board() {
        let board = Board::new(4, 4, 0).unwrap();
        let piece = Piece::spawn(PieceKind::I, &board);
        let plan = evaluator(Weights::default())
            .select_best_turn(&board, piece, None)
            .unwrap();

        assert_eq!(plan.placement().rotation(), 0);
        assert_eq!(plan.placement().row(), 0);
        let cells: Vec<_> = plan.landing().occupied_positions().collect();
        assert_eq!(cells, [(3, 0), (3, 1), (3, 2), (3, 3)]);

        let analysis = PlacementAnalysis::from_board(&board, plan.landing());
        let features = analysis.board_analysis();
        assert_eq!(features.column_heights(), &[1, 1, 1, 1]);
        assert_eq!(features.bumpiness(), 0);
        assert_eq!(features.full_lines(), 1);
    }

    #[test]
    fn test_lines_only_weights_prefer_clearing() {
        let board = Board::standard().with_bottom_rows("#####.####");
        let piece = Piece::spawn(PieceKind::I, &board);
        let plan = evaluator(LINES_ONLY)
            .select_best_turn(&board, piece, None)
            .unwrap();

        assert_eq!(plan.score(), 1.0);
        assert!(plan.landing().occupied_positions().any(|cell| cell == (21, 5)));
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let board = Board::standard();
        let zero = Weights {
            height: 0.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 0.0,
        };
        let plan = evaluator(zero)
            .select_best_turn(&board, Piece::spawn(PieceKind::T, &board), None)
            .unwrap();
        assert_eq!(plan.placement().rotation(), 0);
        assert_eq!(plan.placement().column(), 0);
    }

    #[test]
    fn test_blocked_spawn_row_reports_no_placement() {
        let art = "##########\n".repeat(21) + "#########.";
        let board = Board::standard().with_bottom_rows(&art);
        let piece = Piece::spawn(PieceKind::O, &board);
        assert_eq!(
            evaluator(Weights::default()).select_best_turn(&board, piece, None),
            Err(NoPlacementError { piece })
        );
    }

    #[test]
    fn test_lookahead_sets_up_next_piece() {
        // A two-wide gap only the following O can fill, so the I must stay clear of it.
        let board = Board::standard().with_bottom_rows(
            "
            ####..####
            ####..####
            ",
        );
        let i_piece = Piece::spawn(PieceKind::I, &board);
        let o_piece = Piece::spawn(PieceKind::O, &board);
        let evaluator = evaluator(LINES_ONLY);

        let plan = evaluator
            .select_best_turn(&board, i_piece, Some(o_piece))
            .unwrap();
        assert_eq!(plan.score(), 2.0);
        assert!(plan.landing().occupied_positions().all(|(_, c)| c != 4 && c != 5));
    }

    #[test]
    fn test_candidates_without_follow_up_rank_last() {
        // The flat I comes first but fills row 1, leaving the O nowhere to go.
        let board = Board::new(4, 4, 0).unwrap().with_bottom_rows(
            "
            #.##
            #.##
            ",
        );
        let plan = evaluator(LINES_ONLY)
            .select_best_turn(
                &board,
                Piece::spawn(PieceKind::I, &board),
                Some(Piece::spawn(PieceKind::O, &board)),
            )
            .unwrap();
        assert!(plan.score().is_finite());
        assert_eq!(plan.placement().rotation(), 1);
        assert_eq!(plan.placement().column(), -1);
    }

    #[test]
    fn test_replaced_evaluator_changes_choice() {
        let board = Board::standard().with_bottom_rows("#####.####");
        let piece = Piece::spawn(PieceKind::I, &board);
        let zero = Weights {
            height: 0.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 0.0,
        };
        let mut evaluator = evaluator(zero);

        let plan = evaluator.select_best_turn(&board, piece, None).unwrap();
        assert_eq!((plan.placement().rotation(), plan.placement().column()), (0, 0));

        evaluator.set_placement_evaluator(Box::new(WeightedPlacementEvaluator::new(LINES_ONLY)));
        let plan = evaluator.select_best_turn(&board, piece, None).unwrap();
        assert_eq!((plan.placement().rotation(), plan.placement().column()), (1, 3));
        assert_eq!(plan.score(), 1.0);
    }

    #[test]
    fn test_play_turn_commits_selected_plan() {
        let evaluator = evaluator(Weights::default());
        let mut field = GameField::with_seed(3);
        let expected = evaluator
            .select_best_turn(field.board(), field.falling_piece(), Some(field.next_piece()))
            .unwrap();

        let mut stats = GameStats::new();
        let plan = evaluator.play_turn(&mut field, &mut stats, true).unwrap();
        assert_eq!(plan, expected);
        assert_eq!(stats.completed_pieces(), 1);
        for (row, column) in plan.landing().occupied_positions() {
            assert!(field.board().is_occupied(row, column));
        }
    }

    #[test]
    fn test_play_turn_reports_game_over() {
        let zero = Weights {
            height: 0.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 0.0,
        };
        let evaluator = evaluator(zero);
        let mut field = GameField::with_seed(4);
        let mut stats = GameStats::new();
        let error = loop {
            if let Err(e) = evaluator.play_turn(&mut field, &mut stats, false) {
                break e;
            }
            assert!(stats.completed_pieces() < 1_000);
        };
        // the left stack reaches the buffer rows long before the spawn columns fill up
        assert_eq!(error, TurnError::GameOver(GameOverError::BufferExceeded));
    }

    #[test]
    fn test_session_ends_on_game_over() {
        let zero = Weights {
            height: 0.0,
            lines: 0.0,
            holes: 0.0,
            bumpiness: 0.0,
        };
        // always the leftmost first rotation: the stack grows until the game ends
        let mut field = GameField::with_seed(4);
        let stats = evaluator(zero).play_session(&mut field, 1_000, false);
        assert!(stats.completed_pieces() < 1_000);
    }

    #[test]
    fn test_session_with_default_weights_clears_lines() {
        let mut field = GameField::with_seed(2024);
        let stats = evaluator(Weights::default()).play_session(&mut field, 200, true);
        assert_eq!(stats.completed_pieces(), 200);
        assert!(stats.score() > 0);
        assert!(!field.board().exceeded());
    }
}
