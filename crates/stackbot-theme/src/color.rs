use std::{f64::consts::PI, fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// RGB color with `f64` channels, always clamped to `[0, 255]`.
///
/// The filter operations mirror the CSS filter functions of the same name and return a
/// new color, so a filter chain reads left to right:
///
/// ```
/// use stackbot_theme::Color;
///
/// let color = Color::BLACK.invert(1.0).sepia(0.5).brightness(0.8);
/// assert!(color.r() > color.b());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawColor")]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

#[derive(Deserialize)]
struct RawColor {
    r: f64,
    g: f64,
    b: f64,
}

impl From<RawColor> for Color {
    fn from(RawColor { r, g, b }: RawColor) -> Self {
        Self::new(r, g, b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

type Matrix = [f64; 9];

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Self = Self {
        r: 255.0,
        g: 255.0,
        b: 255.0,
    };

    /// Creates a color, clamping each channel to `[0, 255]`.
    #[must_use]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp(r),
            g: clamp(g),
            b: clamp(b),
        }
    }

    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(f64::from(r), f64::from(g), f64::from(b))
    }

    /// Uniformly random color (each channel any of the 256 levels).
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        rng.random()
    }

    #[must_use]
    pub fn r(&self) -> f64 {
        self.r
    }

    #[must_use]
    pub fn g(&self) -> f64 {
        self.g
    }

    #[must_use]
    pub fn b(&self) -> f64 {
        self.b
    }

    #[must_use]
    pub fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels rounded to the nearest integer level.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb8(&self) -> [u8; 3] {
        // channels are clamped to [0, 255], so the rounded value always fits
        self.channels().map(|c| c.round() as u8)
    }

    /// `#RRGGBB` in upper case.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// Complement of every hex digit, i.e. `255 - channel`.
    #[must_use]
    pub fn opposed(&self) -> Self {
        Self::new(255.0 - self.r, 255.0 - self.g, 255.0 - self.b)
    }

    fn multiply(self, m: &Matrix) -> Self {
        Self::new(
            self.r * m[0] + self.g * m[1] + self.b * m[2],
            self.r * m[3] + self.g * m[4] + self.b * m[5],
            self.r * m[6] + self.g * m[7] + self.b * m[8],
        )
    }

    /// Rotates the hue by `angle` degrees.
    #[must_use]
    pub fn hue_rotate(self, angle: f64) -> Self {
        let (sin, cos) = (angle / 180.0 * PI).sin_cos();
        self.multiply(&[
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ])
    }

    /// `value` is the filter amount, 1 for full grayscale.
    #[must_use]
    pub fn grayscale(self, value: f64) -> Self {
        let v = 1.0 - value;
        self.multiply(&[
            0.2126 + 0.7874 * v,
            0.7152 - 0.7152 * v,
            0.0722 - 0.0722 * v,
            0.2126 - 0.2126 * v,
            0.7152 + 0.2848 * v,
            0.0722 - 0.0722 * v,
            0.2126 - 0.2126 * v,
            0.7152 - 0.7152 * v,
            0.0722 + 0.9278 * v,
        ])
    }

    #[must_use]
    pub fn sepia(self, value: f64) -> Self {
        let v = 1.0 - value;
        self.multiply(&[
            0.393 + 0.607 * v,
            0.769 - 0.769 * v,
            0.189 - 0.189 * v,
            0.349 - 0.349 * v,
            0.686 + 0.314 * v,
            0.168 - 0.168 * v,
            0.272 - 0.272 * v,
            0.534 - 0.534 * v,
            0.131 + 0.869 * v,
        ])
    }

    /// `value` 1 leaves the color unchanged, 0 fully desaturates.
    #[must_use]
    pub fn saturate(self, value: f64) -> Self {
        self.multiply(&[
            0.213 + 0.787 * value,
            0.715 - 0.715 * value,
            0.072 - 0.072 * value,
            0.213 - 0.213 * value,
            0.715 + 0.285 * value,
            0.072 - 0.072 * value,
            0.213 - 0.213 * value,
            0.715 - 0.715 * value,
            0.072 + 0.928 * value,
        ])
    }

    #[must_use]
    pub fn brightness(self, value: f64) -> Self {
        self.linear(value, 0.0)
    }

    #[must_use]
    pub fn contrast(self, value: f64) -> Self {
        self.linear(value, -(0.5 * value) + 0.5)
    }

    /// `channel · slope + intercept · 255` on every channel.
    #[must_use]
    pub fn linear(self, slope: f64, intercept: f64) -> Self {
        let f = |c: f64| c * slope + intercept * 255.0;
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    #[must_use]
    pub fn invert(self, value: f64) -> Self {
        let f = |c: f64| (value + c / 255.0 * (1.0 - 2.0 * value)) * 255.0;
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Hue, saturation and lightness, each on a 0–100 scale.
    #[must_use]
    #[expect(clippy::many_single_char_names, clippy::float_cmp)]
    pub fn hsl(&self) -> Hsl {
        let (r, g, b) = (self.r / 255.0, self.g / 255.0, self.b / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = f64::midpoint(max, min);

        let d = max - min;
        let (h, s) = if d == 0.0 {
            (0.0, 0.0)
        } else {
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h / 6.0, s)
        };

        Hsl {
            h: h * 100.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 255.0)
}

/// Renders as `rgb(r, g, b)` with rounded channels.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "rgb({r}, {g}, {b})")
    }
}

impl Distribution<Color> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        let [r, g, b]: [u8; 3] = rng.random();
        Color::from_rgb8(r, g, b)
    }
}

/// Hue, saturation and lightness on a 0–100 scale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Sum of absolute component differences.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.h - other.h).abs() + (self.s - other.s).abs() + (self.l - other.l).abs()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex color '{input}'")]
pub struct ParseColorError {
    pub input: String,
}

/// Parses `#RRGGBB` or the `#RGB` shorthand. The `#` is optional and digits are
/// case-insensitive.
///
/// ```
/// use stackbot_theme::Color;
///
/// let color: Color = "#03f".parse().unwrap();
/// assert_eq!(color.to_rgb8(), [0x00, 0x33, 0xFF]);
/// assert_eq!(color, "0033FF".parse().unwrap());
/// ```
impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseColorError {
            input: s.to_owned(),
        };
        let digits = s.strip_prefix('#').unwrap_or(s);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(error());
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => return Err(error()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| error());
        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }
}
