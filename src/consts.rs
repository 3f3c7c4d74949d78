use crate::Float;

/// Absolute tolerance for sign tests on dot and cross products.
pub const EPSILON: Float = 1e-10;
/// Origin displacement for spawned shadow, reflection and refraction rays.
pub const RAY_OFFSET: Float = 1e-4;
/// Quantization step for adaptive-sampling cache keys.
pub const SAMPLE_QUANTUM: Float = 1e-9;
pub const INFINITY: Float = f64::INFINITY;
