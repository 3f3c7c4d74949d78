use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

use cgmath::prelude::*;
use cgmath::Vector3;

use crate::Float;

/// Linear RGB color. Components are unbounded; clamping happens only at
/// the pixel sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    rgb: Vector3<Float>,
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl Color {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self {
            rgb: Vector3::new(r, g, b),
        }
    }

    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn r(&self) -> Float {
        self.rgb.x
    }

    pub fn g(&self) -> Float {
        self.rgb.y
    }

    pub fn b(&self) -> Float {
        self.rgb.z
    }

    pub fn is_black(&self) -> bool {
        self.rgb.x == 0.0 && self.rgb.y == 0.0 && self.rgb.z == 0.0
    }

    /// Per-channel equality within an absolute tolerance.
    pub fn almost_eq(&self, other: Color, tolerance: Float) -> bool {
        (self.rgb.x - other.rgb.x).abs() < tolerance
            && (self.rgb.y - other.rgb.y).abs() < tolerance
            && (self.rgb.z - other.rgb.z).abs() < tolerance
    }

    /// True when every channel is strictly below `threshold`. Used for
    /// importance pruning of recursive branches.
    pub fn below(&self, threshold: Float) -> bool {
        self.rgb.x < threshold && self.rgb.y < threshold && self.rgb.z < threshold
    }

    /// Clamped conversion for 8-bit sinks.
    pub fn to_rgb8(self) -> [u8; 3] {
        let to_byte = |c: Float| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_byte(self.rgb.x), to_byte(self.rgb.y), to_byte(self.rgb.z)]
    }
}

/// Gray color from a single coefficient. Lets builders accept either a
/// scalar or a full triple.
impl From<Float> for Color {
    fn from(v: Float) -> Self {
        Self::new(v, v, v)
    }
}

impl Add for Color {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.rgb += rhs.rgb;
    }
}

impl Mul for Color {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self *= rhs;
        self
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, rhs: Self) {
        self.rgb.mul_assign_element_wise(rhs.rgb);
    }
}

impl Mul<Float> for Color {
    type Output = Self;

    fn mul(mut self, rhs: Float) -> Self {
        self *= rhs;
        self
    }
}

impl MulAssign<Float> for Color {
    fn mul_assign(&mut self, rhs: Float) {
        self.rgb *= rhs;
    }
}

impl Mul<Color> for Float {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        rhs * self
    }
}

impl Div<Float> for Color {
    type Output = Self;

    fn div(mut self, rhs: Float) -> Self {
        self /= rhs;
        self
    }
}

impl DivAssign<Float> for Color {
    fn div_assign(&mut self, rhs: Float) {
        self.rgb *= rhs.recip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let c = Color::new(0.2, 0.4, 0.8) + Color::new(0.1, 0.1, 0.1);
        assert!(c.almost_eq(Color::new(0.3, 0.5, 0.9), 1e-12));
        let scaled = c * 2.0;
        assert!(scaled.almost_eq(Color::new(0.6, 1.0, 1.8), 1e-12));
        let product = Color::new(0.5, 0.5, 0.5) * Color::new(0.4, 0.8, 1.0);
        assert!(product.almost_eq(Color::new(0.2, 0.4, 0.5), 1e-12));
        assert!((Color::white() / 2.0).almost_eq(Color::from(0.5), 1e-12));
    }

    #[test]
    fn below_requires_every_channel() {
        assert!(Color::black().below(0.001));
        assert!(Color::new(0.0005, 0.0, 0.0009).below(0.001));
        assert!(!Color::new(0.1, 0.0, 0.0).below(0.001));
    }

    #[test]
    fn rgb8_clamps() {
        assert_eq!(Color::new(-1.0, 0.5, 3.0).to_rgb8(), [0, 128, 255]);
    }
}
