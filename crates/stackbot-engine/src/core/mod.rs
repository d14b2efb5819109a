pub use self::{board::*, piece::*};

pub mod board;
pub mod piece;
