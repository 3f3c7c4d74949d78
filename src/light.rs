use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::consts;
use crate::error::{Error, Result};
use crate::float::nearly_zero;
use crate::Float;

/// A light source queried at world points during shading.
pub trait Light: Send + Sync {
    /// Attenuated intensity arriving at `p`.
    fn intensity(&self, p: Point3<Float>) -> Color;

    /// Unit vector from the light toward `p`. Shadow and transparency
    /// rays travel along its negation.
    fn direction(&self, p: Point3<Float>) -> Vector3<Float>;

    /// Distance from the light to `p`; infinite for directional lights.
    fn distance(&self, p: Point3<Float>) -> Float;
}

/// Uniform base illumination, applied once per traced pixel ray.
#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    pub fn new(ia: Color, ka: impl Into<Color>) -> Self {
        Self {
            intensity: ia * ka.into(),
        }
    }

    /// Fully dark.
    pub fn none() -> Self {
        Self {
            intensity: Color::black(),
        }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

/// Light from a fixed direction at infinite distance, no attenuation.
pub struct DirectionalLight {
    intensity: Color,
    direction: Vector3<Float>,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: Vector3<Float>) -> Result<Self> {
        if nearly_zero(direction.magnitude2()) {
            return Err(Error::DegenerateGeometry(
                "light direction is a zero vector".to_string(),
            ));
        }
        Ok(Self {
            intensity,
            direction: direction.normalize(),
        })
    }
}

impl Light for DirectionalLight {
    fn intensity(&self, _p: Point3<Float>) -> Color {
        self.intensity
    }

    fn direction(&self, _p: Point3<Float>) -> Vector3<Float> {
        self.direction
    }

    fn distance(&self, _p: Point3<Float>) -> Float {
        consts::INFINITY
    }
}

/// Omnidirectional light with distance attenuation
/// `1 / (kc + kl·d + kq·d²)`.
pub struct PointLight {
    intensity: Color,
    position: Point3<Float>,
    kc: Float,
    kl: Float,
    kq: Float,
}

impl PointLight {
    pub fn new(intensity: Color, position: Point3<Float>) -> Self {
        Self {
            intensity,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    pub fn with_kc(mut self, kc: Float) -> Self {
        self.kc = kc;
        self
    }

    pub fn with_kl(mut self, kl: Float) -> Self {
        self.kl = kl;
        self
    }

    pub fn with_kq(mut self, kq: Float) -> Self {
        self.kq = kq;
        self
    }

    fn attenuation(&self, p: Point3<Float>) -> Float {
        let d = self.position.distance(p);
        self.kc + self.kl * d + self.kq * d * d
    }
}

impl Light for PointLight {
    fn intensity(&self, p: Point3<Float>) -> Color {
        self.intensity / self.attenuation(p)
    }

    fn direction(&self, p: Point3<Float>) -> Vector3<Float> {
        (p - self.position).normalize()
    }

    fn distance(&self, p: Point3<Float>) -> Float {
        self.position.distance(p)
    }
}

/// Point light restricted to the forward hemisphere of a beam direction;
/// intensity scales with the cosine of the beam angle before attenuation.
pub struct SpotLight {
    point: PointLight,
    beam: Vector3<Float>,
}

impl SpotLight {
    pub fn new(
        intensity: Color,
        position: Point3<Float>,
        beam: Vector3<Float>,
    ) -> Result<Self> {
        if nearly_zero(beam.magnitude2()) {
            return Err(Error::DegenerateGeometry(
                "spot beam direction is a zero vector".to_string(),
            ));
        }
        Ok(Self {
            point: PointLight::new(intensity, position),
            beam: beam.normalize(),
        })
    }

    pub fn with_kc(mut self, kc: Float) -> Self {
        self.point = self.point.with_kc(kc);
        self
    }

    pub fn with_kl(mut self, kl: Float) -> Self {
        self.point = self.point.with_kl(kl);
        self
    }

    pub fn with_kq(mut self, kq: Float) -> Self {
        self.point = self.point.with_kq(kq);
        self
    }
}

impl Light for SpotLight {
    fn intensity(&self, p: Point3<Float>) -> Color {
        let beam_l = self.beam.dot(self.point.direction(p));
        if beam_l > consts::EPSILON {
            self.point.intensity(p) * beam_l
        } else {
            Color::black()
        }
    }

    fn direction(&self, p: Point3<Float>) -> Vector3<Float> {
        self.point.direction(p)
    }

    fn distance(&self, p: Point3<Float>) -> Float {
        self.point.distance(p)
    }
}
