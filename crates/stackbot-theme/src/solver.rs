//! Fits [`FilterParams`] so that the filter chain turns black into a target color.
//!
//! The search runs [`Spsa`] in two phases. The wide phase starts from a fixed mid-range
//! vector with large steps and is retried (keeping the best run) while the loss stays
//! above a threshold. The narrow phase refines the wide result with step sizes scaled by
//! the loss it has to remove.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    color::{Color, Hsl},
    filter::FilterParams,
    spsa::{Objective, Spsa, SpsaResult},
};

/// Schedule constants of the two solver phases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub wide_a: [f64; 6],
    pub wide_big_a: f64,
    pub wide_c: f64,
    pub wide_iterations: u32,
    pub wide_initial: [f64; 6],
    /// Upper bound on wide runs.
    pub wide_attempts: usize,
    /// Wide runs repeat while the best loss is above this.
    pub wide_loss_threshold: f64,
    pub narrow_c: f64,
    pub narrow_iterations: u32,
    /// Narrow step gains as multiples of `wide loss + 1`.
    pub narrow_a_scale: [f64; 6],
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            wide_a: [60.0, 180.0, 18000.0, 600.0, 1.2, 1.2],
            wide_big_a: 5.0,
            wide_c: 15.0,
            wide_iterations: 1000,
            wide_initial: [50.0, 20.0, 3750.0, 50.0, 100.0, 100.0],
            wide_attempts: 3,
            wide_loss_threshold: 25.0,
            narrow_c: 2.0,
            narrow_iterations: 500,
            narrow_a_scale: [0.25, 0.25, 1.0, 0.25, 0.2, 0.2],
        }
    }
}

/// Best filter found and its loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub values: FilterParams,
    pub loss: f64,
}

impl Solution {
    /// The CSS filter chain.
    #[must_use]
    pub fn filter(&self) -> String {
        self.values.to_string()
    }
}

impl From<SpsaResult<6>> for Solution {
    fn from(result: SpsaResult<6>) -> Self {
        Self {
            values: FilterParams::new(result.values),
            loss: result.loss,
        }
    }
}

/// Loss of a filter against a target: `Σ|ΔRGB| + Σ|ΔHSL|` of the filtered black.
#[derive(Debug, Clone, Copy)]
struct FilterLoss {
    target: Color,
    target_hsl: Hsl,
}

impl Objective<6> for FilterLoss {
    fn loss(&self, values: &[f64; 6]) -> f64 {
        let color = FilterParams::new(*values).apply(Color::BLACK);
        let rgb: f64 = color
            .channels()
            .iter()
            .zip(self.target.channels())
            .map(|(c, t)| (c - t).abs())
            .sum();
        rgb + color.hsl().distance(&self.target_hsl)
    }

    fn constrain(&self, index: usize, value: f64) -> f64 {
        FilterParams::constrain(index, value)
    }
}

/// Filter solver for one target color.
///
/// # Example
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use stackbot_theme::{Color, Solver};
///
/// let solver = Solver::new("#FFFFFF".parse().unwrap());
/// let solution = solver.solve(&mut Pcg32::seed_from_u64(0));
/// assert_eq!(solver.loss(&solution.values), solution.loss);
/// assert!(solution.filter().starts_with("invert("));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    objective: FilterLoss,
    config: SolverConfig,
}

impl Solver {
    #[must_use]
    pub fn new(target: Color) -> Self {
        Self::with_config(target, SolverConfig::default())
    }

    #[must_use]
    pub fn with_config(target: Color, config: SolverConfig) -> Self {
        Self {
            objective: FilterLoss {
                target,
                target_hsl: target.hsl(),
            },
            config,
        }
    }

    #[must_use]
    pub fn target(&self) -> Color {
        self.objective.target
    }

    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Loss of `params` against the target.
    #[must_use]
    pub fn loss(&self, params: &FilterParams) -> f64 {
        self.objective.loss(params.values())
    }

    /// Runs the wide phase, then the narrow phase on its result.
    pub fn solve<R>(&self, rng: &mut R) -> Solution
    where
        R: Rng + ?Sized,
    {
        let wide = self.solve_wide(rng);
        self.solve_narrow(wide, rng).into()
    }

    fn solve_wide<R>(&self, rng: &mut R) -> SpsaResult<6>
    where
        R: Rng + ?Sized,
    {
        let config = &self.config;
        let spsa = Spsa::new(
            config.wide_a,
            config.wide_big_a,
            config.wide_c,
            config.wide_iterations,
        );
        let mut best = SpsaResult {
            values: config.wide_initial,
            loss: f64::INFINITY,
        };
        for _ in 0..config.wide_attempts {
            if best.loss <= config.wide_loss_threshold {
                break;
            }
            let result = spsa.minimize(&self.objective, config.wide_initial, rng);
            if result.loss < best.loss {
                best = result;
            }
        }
        best
    }

    fn solve_narrow<R>(&self, wide: SpsaResult<6>, rng: &mut R) -> SpsaResult<6>
    where
        R: Rng + ?Sized,
    {
        let config = &self.config;
        let big_a = wide.loss;
        let a1 = big_a + 1.0;
        let spsa = Spsa::new(
            config.narrow_a_scale.map(|scale| scale * a1),
            big_a,
            config.narrow_c,
            config.narrow_iterations,
        );
        let narrow = spsa.minimize(&self.objective, wide.values, rng);
        if narrow.loss < wide.loss { narrow } else { wide }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_loss_zero_for_exact_filter() {
        let solver = Solver::new(Color::WHITE);
        let white = FilterParams::new([100.0, 0.0, 100.0, 0.0, 100.0, 100.0]);
        assert_eq!(solver.loss(&white), 0.0);

        let identity = FilterParams::new([0.0, 0.0, 100.0, 0.0, 100.0, 100.0]);
        // black against white: 3·255 in RGB plus 100 lightness
        assert!((solver.loss(&identity) - (3.0 * 255.0 + 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_solution() {
        let solver = Solver::new("#3A7BD5".parse().unwrap());
        let a = solver.solve(&mut Pcg32::seed_from_u64(17));
        let b = solver.solve(&mut Pcg32::seed_from_u64(17));
        assert_eq!(a, b);
        assert_eq!(a.filter(), b.filter());
    }

    #[test]
    fn test_white_target_converges() {
        let solver = Solver::new(Color::WHITE);
        let best = (0..4)
            .map(|seed| solver.solve(&mut Pcg32::seed_from_u64(seed)).loss)
            .fold(f64::INFINITY, f64::min);
        assert!(best <= 1.0, "best loss {best}");
    }

    #[test]
    fn test_solution_values_in_range() {
        let solver = Solver::new("#C04020".parse().unwrap());
        let solution = solver.solve(&mut Pcg32::seed_from_u64(5));
        for (index, value) in solution.values.values().iter().enumerate() {
            assert!(
                (0.0..=FilterParams::max(index)).contains(value),
                "parameter {index} = {value}"
            );
        }
        assert!((solver.loss(&solution.values) - solution.loss).abs() < 1e-9);
    }

    #[test]
    fn test_narrow_phase_never_loses_wide_result() {
        let config = SolverConfig {
            wide_iterations: 50,
            narrow_iterations: 0,
            ..SolverConfig::default()
        };
        let solver = Solver::with_config(Color::WHITE, config);
        let wide = solver.solve_wide(&mut Pcg32::seed_from_u64(9));
        assert!(wide.loss.is_finite());

        // an empty narrow run reports infinite loss and must not replace the wide result
        let refined = solver.solve_narrow(wide, &mut Pcg32::seed_from_u64(9));
        assert_eq!(refined, wide);
        assert_eq!(
            solver.solve(&mut Pcg32::seed_from_u64(9)),
            Solution::from(wide)
        );
    }

    #[test]
    fn test_wide_phase_stops_once_below_threshold() {
        // any finite loss is accepted, so only the first wide run happens
        let config = SolverConfig {
            wide_loss_threshold: f64::MAX,
            wide_iterations: 10,
            narrow_iterations: 0,
            ..SolverConfig::default()
        };
        let solver = Solver::with_config(Color::WHITE, config);
        let mut rng = Pcg32::seed_from_u64(1);
        let solution = solver.solve(&mut rng);

        let spsa = Spsa::new(config.wide_a, config.wide_big_a, config.wide_c, 10);
        let single = spsa.minimize(
            &solver.objective,
            config.wide_initial,
            &mut Pcg32::seed_from_u64(1),
        );
        assert_eq!(solution, Solution::from(single));
    }
}
