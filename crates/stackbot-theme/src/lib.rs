//! Random color themes expressed as CSS filter chains.
//!
//! Content drawn in black can be recolored with a chain of CSS filters. Finding the chain
//! that yields a given color is a small non-smooth optimization problem, solved here with
//! SPSA:
//!
//! - [`color`] - [`Color`] with the filter operations, HSL and hex conversion
//! - [`filter`] - the six-parameter [`FilterParams`] and its CSS rendering
//! - [`spsa`] - a generic SPSA minimizer
//! - [`solver`] - the two-phase [`Solver`] fitting a filter to a target color
//! - [`Theme`] - random background, opposed foreground and the matching filter
//!
//! Every random draw goes through an injected [`rand::Rng`].
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use stackbot_theme::Theme;
//!
//! let mut rng = Pcg32::seed_from_u64(42);
//! let theme = Theme::random(&mut rng);
//! assert_eq!(theme.foreground, theme.background.opposed());
//! println!("background: {}, filter: {}", theme.background.to_hex(), theme.filter());
//! ```

pub use self::{
    color::{Color, Hsl, ParseColorError},
    filter::FilterParams,
    solver::{Solution, Solver, SolverConfig},
    theme::Theme,
};

pub mod color;
pub mod filter;
pub mod solver;
pub mod spsa;
mod theme;
