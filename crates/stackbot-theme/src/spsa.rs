//! Simultaneous Perturbation Stochastic Approximation.
//!
//! Each iteration perturbs every coordinate at once by `±c_k`, estimates the gradient
//! from just two loss evaluations, and steps against it:
//!
//! ```text
//! c_k   = c / (k + 1)^γ
//! g_i   = (loss(x + c_k·Δ) - loss(x - c_k·Δ)) / (2·c_k) · Δ_i      Δ_i ∈ {-1, +1}
//! a_k,i = a_i / (A + k + 1)^α
//! x_i   = constrain(i, x_i - a_k,i · g_i)
//! ```
//!
//! The best vector seen (by loss after each step) is returned, so a run never ends worse
//! than its best intermediate point.

use rand::Rng;

/// Function minimized by [`Spsa`].
pub trait Objective<const N: usize> {
    fn loss(&self, values: &[f64; N]) -> f64;

    /// Projects an updated coordinate back into its feasible range.
    fn constrain(&self, _index: usize, value: f64) -> f64 {
        value
    }
}

/// Step-size schedule of one SPSA run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spsa<const N: usize> {
    /// Per-coordinate step gain.
    pub a: [f64; N],
    /// Stability constant `A` of the step decay.
    pub big_a: f64,
    /// Perturbation size.
    pub c: f64,
    pub iterations: u32,
    pub alpha: f64,
    pub gamma: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpsaResult<const N: usize> {
    pub values: [f64; N],
    pub loss: f64,
}

impl<const N: usize> Spsa<N> {
    pub const ALPHA: f64 = 1.0;
    pub const GAMMA: f64 = 1.0 / 6.0;

    #[must_use]
    pub fn new(a: [f64; N], big_a: f64, c: f64, iterations: u32) -> Self {
        Self {
            a,
            big_a,
            c,
            iterations,
            alpha: Self::ALPHA,
            gamma: Self::GAMMA,
        }
    }

    /// Runs the walk from `initial`. Signs are drawn from `rng`, one per coordinate and
    /// iteration, so a seeded RNG gives a reproducible result.
    ///
    /// With zero iterations the result is `initial` with an infinite loss.
    pub fn minimize<O, R>(&self, objective: &O, initial: [f64; N], rng: &mut R) -> SpsaResult<N>
    where
        O: Objective<N> + ?Sized,
        R: Rng + ?Sized,
    {
        let mut values = initial;
        let mut best = SpsaResult {
            values: initial,
            loss: f64::INFINITY,
        };

        for k in 0..self.iterations {
            let k = f64::from(k);
            let ck = self.c / (k + 1.0).powf(self.gamma);
            let deltas: [f64; N] =
                std::array::from_fn(|_| if rng.random_bool(0.5) { 1.0 } else { -1.0 });
            let high = std::array::from_fn(|i| values[i] + ck * deltas[i]);
            let low = std::array::from_fn(|i| values[i] - ck * deltas[i]);

            let loss_diff = objective.loss(&high) - objective.loss(&low);
            for (i, value) in values.iter_mut().enumerate() {
                let g = loss_diff / (2.0 * ck) * deltas[i];
                let ak = self.a[i] / (self.big_a + k + 1.0).powf(self.alpha);
                *value = objective.constrain(i, *value - ak * g);
            }

            let loss = objective.loss(&values);
            if loss < best.loss {
                best = SpsaResult { values, loss };
            }
        }

        best
    }
}
