//! Game driving state built on top of [`crate::core`].
//!
//! - [`GameField`] - board, falling piece and upcoming pieces for a single game
//! - [`GameStats`] - lines, level and clear histogram
//! - [`PieceBag`] - 7-bag piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`GameField`] from a seed
//! 2. Decide where the falling piece goes (by hand or with an evaluator)
//! 3. Commit it with [`GameField::complete_piece_drop`], which locks the piece, clears
//!    lines and spawns the next one
//! 4. Feed the cleared line count to [`GameStats::complete_piece_drop`]
//! 5. Repeat until a [`GameOverError`](crate::GameOverError) is reported
//!
//! # Example
//!
//! ```
//! use stackbot_engine::{GameField, GameStats};
//!
//! let mut field = GameField::with_seed(7);
//! let mut stats = GameStats::new();
//!
//! let placement = field.falling_piece();
//! let (cleared, result) = field.complete_piece_drop(placement);
//! stats.complete_piece_drop(cleared);
//!
//! assert!(result.is_ok());
//! assert_eq!(stats.completed_pieces(), 1);
//! ```

pub use self::{game_field::*, game_stats::*, piece_bag::*};

mod game_field;
mod game_stats;
mod piece_bag;
