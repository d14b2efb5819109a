//! Weight vector of the linear placement evaluation.
//!
//! Weights arrive from configuration as a [`WeightInput`] whose fields may each be
//! missing. [`Weights::from_input`] resolves it field by field: missing fields take the
//! defaults silently, while `NaN` or values outside `[0, 1]` are rejected and also fall
//! back to the defaults. Rejections are reported so the host can surface them, together
//! with the weights that were applied anyway.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Linear evaluation weights. Each is the magnitude applied to one board feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub height: f64,
    pub lines: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Weights {
    pub const DEFAULT: Self = Self {
        height: 0.510_066,
        lines: 0.760_666,
        holes: 0.356_63,
        bumpiness: 0.184_483,
    };

    /// Resolves configured weights, replacing missing and invalid fields with defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use stackbot_evaluator::weights::{WeightField, WeightInput, Weights};
    ///
    /// let input = WeightInput {
    ///     lines: Some(0.9),
    ///     holes: Some(1.5),
    ///     ..WeightInput::default()
    /// };
    /// let error = Weights::from_input(&input).unwrap_err();
    /// assert_eq!(error.rejected, [(WeightField::Holes, 1.5)]);
    /// assert_eq!(error.weights.lines, 0.9);
    /// assert_eq!(error.weights.holes, Weights::DEFAULT.holes);
    /// ```
    pub fn from_input(input: &WeightInput) -> Result<Self, WeightValidationError> {
        let mut weights = Self::DEFAULT;
        let mut rejected = Vec::new();
        for field in WeightField::ALL {
            let Some(value) = input.get(field) else {
                continue;
            };
            if is_valid_weight(value) {
                *weights.get_mut(field) = value;
            } else {
                rejected.push((field, value));
            }
        }
        if rejected.is_empty() {
            Ok(weights)
        } else {
            Err(WeightValidationError { rejected, weights })
        }
    }

    #[must_use]
    pub fn get(&self, field: WeightField) -> f64 {
        match field {
            WeightField::Height => self.height,
            WeightField::Lines => self.lines,
            WeightField::Holes => self.holes,
            WeightField::Bumpiness => self.bumpiness,
        }
    }

    fn get_mut(&mut self, field: WeightField) -> &mut f64 {
        match field {
            WeightField::Height => &mut self.height,
            WeightField::Lines => &mut self.lines,
            WeightField::Holes => &mut self.holes,
            WeightField::Bumpiness => &mut self.bumpiness,
        }
    }
}

fn is_valid_weight(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Partially specified weights, as read from configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightInput {
    pub height: Option<f64>,
    pub lines: Option<f64>,
    pub holes: Option<f64>,
    pub bumpiness: Option<f64>,
}

impl WeightInput {
    #[must_use]
    pub fn get(&self, field: WeightField) -> Option<f64> {
        match field {
            WeightField::Height => self.height,
            WeightField::Lines => self.lines,
            WeightField::Holes => self.holes,
            WeightField::Bumpiness => self.bumpiness,
        }
    }

    /// Field-wise merge where values present in `overrides` win.
    #[must_use]
    pub fn with_overrides(self, overrides: &Self) -> Self {
        Self {
            height: overrides.height.or(self.height),
            lines: overrides.lines.or(self.lines),
            holes: overrides.holes.or(self.holes),
            bumpiness: overrides.bumpiness.or(self.bumpiness),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightField {
    #[display("height")]
    Height,
    #[display("lines")]
    Lines,
    #[display("holes")]
    Holes,
    #[display("bumpiness")]
    Bumpiness,
}

impl WeightField {
    pub const ALL: [Self; 4] = [Self::Height, Self::Lines, Self::Holes, Self::Bumpiness];
}

/// Some configured weights were rejected; `weights` holds the partially applied result.
#[derive(Debug, Clone, PartialEq, derive_more::Error)]
pub struct WeightValidationError {
    pub rejected: Vec<(WeightField, f64)>,
    pub weights: Weights,
}

impl fmt::Display for WeightValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("weights must be in [0, 1]; rejected ")?;
        for (i, (field, value)) in self.rejected.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}={value}")?;
        }
        f.write_str(" (defaults used instead)")
    }
}
