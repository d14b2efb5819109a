//! Placement search for the falling-block puzzle.
//!
//! The crate is layered like this:
//!
//! ```text
//! TurnEvaluator (enumerate placements, one-ply lookahead, select best)
//!     ↓ uses
//! PlacementEvaluator (score a single locked placement)
//!     ↓ uses
//! PlacementAnalysis / BoardAnalysis (features of the board after locking)
//! ```
//!
//! - [`board_analysis`] - lazily computed board features: aggregate height, full lines,
//!   holes and bumpiness
//! - [`placement_analysis`] - a hypothetical placement locked on a scratch board
//! - [`placement_evaluator`] - the [`PlacementEvaluator`](placement_evaluator::PlacementEvaluator)
//!   seam and the linear [`WeightedPlacementEvaluator`](placement_evaluator::WeightedPlacementEvaluator)
//! - [`turn_evaluator`] - exhaustive placement search and headless session play
//! - [`weights`] - the weight vector, its defaults and input validation
//!
//! # Example
//!
//! ```
//! use stackbot_engine::{Board, Piece, PieceKind};
//! use stackbot_evaluator::{turn_evaluator::TurnEvaluator, weights::Weights};
//!
//! let board = Board::standard();
//! let evaluator = TurnEvaluator::with_weights(Weights::default());
//!
//! let current = Piece::spawn(PieceKind::T, &board);
//! let next = Piece::spawn(PieceKind::I, &board);
//! let plan = evaluator.select_best_turn(&board, current, Some(next)).unwrap();
//!
//! assert_eq!(plan.placement().row(), current.row());
//! assert!(!plan.landing().can_move_down(&board));
//! ```

pub mod board_analysis;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod turn_evaluator;
pub mod weights;
