use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Six filter amounts applied to black, in chain order.
///
/// | index | function | unit | range |
/// |---|---|---|---|
/// | 0 | `invert` | % | 0–100 |
/// | 1 | `sepia` | % | 0–100 |
/// | 2 | `saturate` | % | 0–7500 |
/// | 3 | `hue-rotate` | 1/100 turn (×3.6 = degrees) | 0–100, cyclic |
/// | 4 | `brightness` | % | 0–200 |
/// | 5 | `contrast` | % | 0–200 |
///
/// `Display` renders the CSS filter chain with every amount rounded:
///
/// ```
/// use stackbot_theme::FilterParams;
///
/// let params = FilterParams::new([12.4, 0.0, 350.6, 50.0, 99.5, 100.0]);
/// assert_eq!(
///     params.to_string(),
///     "invert(12%) sepia(0%) saturate(351%) hue-rotate(180deg) brightness(100%) contrast(100%)",
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterParams([f64; 6]);

impl FilterParams {
    pub const LEN: usize = 6;

    pub const INVERT: usize = 0;
    pub const SEPIA: usize = 1;
    pub const SATURATE: usize = 2;
    pub const HUE_ROTATE: usize = 3;
    pub const BRIGHTNESS: usize = 4;
    pub const CONTRAST: usize = 5;

    /// Degrees per hue-rotate unit.
    pub const HUE_DEGREES_PER_UNIT: f64 = 3.6;

    #[must_use]
    pub const fn new(values: [f64; 6]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn values(&self) -> &[f64; 6] {
        &self.0
    }

    /// Upper bound of the parameter at `index`.
    #[must_use]
    pub fn max(index: usize) -> f64 {
        match index {
            Self::SATURATE => 7500.0,
            Self::BRIGHTNESS | Self::CONTRAST => 200.0,
            _ => 100.0,
        }
    }

    /// Brings a parameter back into its range: hue-rotate wraps around, the others clamp.
    #[must_use]
    pub fn constrain(index: usize, value: f64) -> f64 {
        let max = Self::max(index);
        if index == Self::HUE_ROTATE {
            if value > max {
                value % max
            } else if value < 0.0 {
                max + value % max
            } else {
                value
            }
        } else {
            value.clamp(0.0, max)
        }
    }

    /// Runs the filter chain on `color`.
    #[must_use]
    pub fn apply(&self, color: Color) -> Color {
        let [invert, sepia, saturate, hue, brightness, contrast] = self.0;
        color
            .invert(invert / 100.0)
            .sepia(sepia / 100.0)
            .saturate(saturate / 100.0)
            .hue_rotate(hue * Self::HUE_DEGREES_PER_UNIT)
            .brightness(brightness / 100.0)
            .contrast(contrast / 100.0)
    }
}

impl fmt::Display for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [invert, sepia, saturate, hue, brightness, contrast] = self.0;
        write!(
            f,
            "invert({}%) sepia({}%) saturate({}%) hue-rotate({}deg) brightness({}%) contrast({}%)",
            invert.round(),
            sepia.round(),
            saturate.round(),
            (hue * Self::HUE_DEGREES_PER_UNIT).round(),
            brightness.round(),
            contrast.round(),
        )
    }
}
