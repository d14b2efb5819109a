//! Placement evaluation: scoring a single locked placement.
//!
//! [`PlacementEvaluator`] is the seam between search and scoring. The stock
//! implementation, [`WeightedPlacementEvaluator`], is a plain linear combination with no
//! normalization:
//!
//! ```text
//! score = -height·aggregate_height + lines·full_lines - holes·holes - bumpiness·bumpiness
//! ```

use std::fmt;

use crate::{placement_analysis::PlacementAnalysis, weights::Weights};

/// Evaluates piece placements by assigning scores (higher is better).
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f64;
}

/// Linear evaluator over the four board features.
///
/// # Example
///
/// ```
/// use stackbot_engine::{Board, Piece, PieceKind};
/// use stackbot_evaluator::{
///     placement_analysis::PlacementAnalysis,
///     placement_evaluator::{PlacementEvaluator, WeightedPlacementEvaluator},
///     weights::Weights,
/// };
///
/// let board = Board::standard();
/// let landing = Piece::spawn(PieceKind::O, &board).dropped(&board);
/// let analysis = PlacementAnalysis::from_board(&board, landing);
///
/// let evaluator = WeightedPlacementEvaluator::new(Weights {
///     height: 1.0,
///     lines: 0.0,
///     holes: 0.0,
///     bumpiness: 0.0,
/// });
/// assert_eq!(evaluator.evaluate_placement(&analysis), -4.0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WeightedPlacementEvaluator {
    weights: Weights,
}

impl WeightedPlacementEvaluator {
    #[must_use]
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
    }
}

impl PlacementEvaluator for WeightedPlacementEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f64 {
        let features = analysis.board_analysis();
        let w = &self.weights;
        -w.height * f64::from(features.aggregate_height())
            + w.lines * f64::from(features.full_lines())
            - w.holes * f64::from(features.num_holes())
            - w.bumpiness * f64::from(features.bumpiness())
    }
}
