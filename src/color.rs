use std::iter::Sum;
use std::ops::{ Add, AddAssign, Div, Mul };

use crate::feq;

/// A color.
///
/// Represented with red-green-blue (RGB) values. Material coefficients and
/// light intensities share this type. Colors produced by the renderer are
/// not clamped; a channel can exceed `1.0` when several lights add up, and
/// only the image writer clamps them.
///
/// # Examples
///
/// Blend a material coefficient with a light:
///
/// ```
/// # use phong_tracer::color::Color;
/// let diffuse = Color::rgb(1.0, 0.5, 0.0);
/// let light = Color::rgb(0.5, 0.5, 0.5);
/// assert_eq!(diffuse * light, Color::rgb(0.5, 0.25, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating
/// point error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// A gray with all three channels set to `v`.
    pub fn gray(v: f64) -> Color {
        Color { r: v, g: v, b: v }
    }

    /// The color black.
    pub fn black() -> Color {
        Color::gray(0.0)
    }

    /// The color white.
    pub fn white() -> Color {
        Color::gray(1.0)
    }

    /// Whether every channel is exactly zero.
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Computes the Hadamard product of two colors.
    ///
    /// The hadamard product multiplies each component of the two colors, and
    /// yields a new color containing those products.
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        let r = c1.r * c2.r;
        let g = c1.g * c2.g;
        let b = c1.b * c2.b;

        Color { r, g, b }
    }

    /// Clamps each channel into `[0.0, 1.0]`.
    pub fn clamped(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

impl Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::black(), |acc, c| acc + c)
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

/// Multiplies a color by a color.
///
/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

impl Div<f64> for Color {
    type Output = Color;

    fn div(self, other: f64) -> Self::Output {
        Color {
            r: self.r / other,
            g: self.g / other,
            b: self.b / other,
        }
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 1.6, g: 0.7, b: 1.0 };

    assert_eq!(c1 + c2, c3);
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);
    let c2 = Color { r: 0.4, g: 0.6, b: 0.8 };

    assert_eq!(c1 * 2.0, c2);
    assert_eq!(c2 / 2.0, c1);
}

#[test]
fn sum_colors() {
    let colors = vec![Color::gray(0.25); 4];

    assert_eq!(colors.into_iter().sum::<Color>(), Color::white());
}

#[test]
fn clamp_and_black() {
    assert_eq!(Color::rgb(-0.5, 0.5, 1.5).clamped(), Color::rgb(0.0, 0.5, 1.0));
    assert!(Color::black().is_black());
    assert!(!Color::rgb(0.0, 1e-9, 0.0).is_black());
}
