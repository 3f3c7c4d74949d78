//! The primary float type and the shared tolerance comparisons.
//!
//! All geometric sign tests go through [`nearly_zero`] so the tolerance
//! policy lives in exactly one place.

use crate::consts;

pub type Float = f64;

/// Is `x` zero within the shared absolute tolerance?
pub fn nearly_zero(x: Float) -> bool {
    x.abs() < consts::EPSILON
}

/// Are `a` and `b` equal within the shared absolute tolerance?
pub fn almost_eq(a: Float, b: Float) -> bool {
    nearly_zero(a - b)
}

/// Conversion to the primary float type for pixel indices and counts.
pub trait ToFloat {
    fn to_float(self) -> Float;
}

impl ToFloat for u32 {
    fn to_float(self) -> Float {
        self.into()
    }
}

impl ToFloat for usize {
    fn to_float(self) -> Float {
        self as Float
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_bounds() {
        assert!(nearly_zero(0.0));
        assert!(nearly_zero(1e-11));
        assert!(nearly_zero(-1e-11));
        assert!(!nearly_zero(1e-9));
        assert!(almost_eq(1.0, 1.0 + 1e-12));
        assert!(!almost_eq(1.0, 1.0 + 1e-9));
    }
}
