use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::float::nearly_zero;
use crate::intersect::{t_in_range, Hit, Intersect, Ray};
use crate::material::Material;
use crate::Float;

use super::Primitive;

/// Infinite cylinder around an axis ray.
#[derive(Clone, Debug)]
pub struct Tube {
    axis: Ray,
    radius: Float,
    material: Material,
    emission: Color,
}

impl Tube {
    pub fn new(axis: Ray, radius: Float) -> Result<Self> {
        if radius <= 0.0 {
            return Err(Error::DegenerateGeometry(format!(
                "tube radius must be positive, got {}",
                radius
            )));
        }
        Ok(Self {
            axis,
            radius,
            material: Material::default(),
            emission: Color::black(),
        })
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> Float {
        self.radius
    }
}

impl Intersect for Tube {
    /// Quadratic solve in the plane perpendicular to the axis, the
    /// cylindrical analogue of the sphere's discriminant test.
    fn intersect(&self, ray: &Ray, max_distance: Float) -> Vec<Hit<'_>> {
        let va = self.axis.dir;
        let dp = ray.orig - self.axis.orig;
        let d_perp = ray.dir - ray.dir.dot(va) * va;
        let dp_perp = dp - dp.dot(va) * va;

        let a = d_perp.magnitude2();
        // Parallel to the axis: the perpendicular distance never changes.
        if nearly_zero(a) {
            return Vec::new();
        }
        let b = 2.0 * d_perp.dot(dp_perp);
        let c = dp_perp.magnitude2() - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Vec::new();
        }
        let sq = discriminant.sqrt();
        let t1 = (-b - sq) / (2.0 * a);
        let t2 = (-b + sq) / (2.0 * a);

        let mut hits = Vec::new();
        if t_in_range(t1, max_distance) {
            hits.push(Hit {
                primitive: self,
                point: ray.point_at(t1),
            });
        }
        if !nearly_zero(sq) && t_in_range(t2, max_distance) {
            hits.push(Hit {
                primitive: self,
                point: ray.point_at(t2),
            });
        }
        hits
    }
}

impl Primitive for Tube {
    /// Radial direction from the foot of the perpendicular projection of
    /// `p` onto the axis.
    fn normal(&self, p: Point3<Float>) -> Vector3<Float> {
        let to_p = p - self.axis.orig;
        let t = self.axis.dir.dot(to_p);
        if nearly_zero(t) {
            // p is abreast of the axis origin.
            return to_p.normalize();
        }
        let foot = self.axis.point_at(t);
        (p - foot).normalize()
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn emission(&self) -> Color {
        self.emission
    }
}
