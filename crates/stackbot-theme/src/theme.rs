use rand::Rng;

use crate::{
    color::Color,
    solver::{Solution, Solver},
};

/// A random color scheme: background, its opposed foreground, and the filter that
/// paints black content in the foreground color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub solution: Solution,
}

impl Theme {
    /// Draws a background from `rng` and solves the foreground filter with the same RNG.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let background = Color::random(rng);
        Self::from_background(background, rng)
    }

    pub fn from_background<R>(background: Color, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let foreground = background.opposed();
        let solution = Solver::new(foreground).solve(rng);
        Self {
            background,
            foreground,
            solution,
        }
    }

    /// CSS filter chain for content drawn in black.
    #[must_use]
    pub fn filter(&self) -> String {
        self.solution.filter()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_foreground_is_opposed_background() {
        let theme = Theme::random(&mut Pcg32::seed_from_u64(21));
        assert_eq!(theme.foreground, theme.background.opposed());
        assert_eq!(theme.filter(), theme.solution.filter());
    }

    #[test]
    fn test_seeded_theme_is_reproducible() {
        let a = Theme::random(&mut Pcg32::seed_from_u64(2));
        let b = Theme::random(&mut Pcg32::seed_from_u64(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_background_solves_for_foreground() {
        let background: Color = "#FFFFFF".parse().unwrap();
        let theme = Theme::from_background(background, &mut Pcg32::seed_from_u64(0));
        assert_eq!(theme.foreground, Color::BLACK);
        let solver = Solver::new(Color::BLACK);
        assert_eq!(solver.loss(&theme.solution.values), theme.solution.loss);
    }
}
