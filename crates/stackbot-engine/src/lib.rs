//! Core game model for the falling-block puzzle.
//!
//! - [`core`] holds the data structures: [`Board`], [`Piece`], [`PieceKind`], [`Cell`].
//! - [`engine`] drives a game: [`GameField`], [`GameStats`], [`PieceBag`].
//!
//! All state is explicit. Nothing in this crate keeps process-wide mutable state, and
//! every source of randomness is an injected [`rand::Rng`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid board size {rows}x{columns} with {buffer_rows} buffer rows")]
pub struct BoardSizeError {
    pub rows: usize,
    pub columns: usize,
    pub buffer_rows: usize,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum GameOverError {
    #[display("locked piece intrudes into the buffer rows")]
    BufferExceeded,
    #[display("new piece collides at its spawn position")]
    SpawnBlocked,
}
