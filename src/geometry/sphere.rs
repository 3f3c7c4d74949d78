use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::float::nearly_zero;
use crate::intersect::{t_in_range, Hit, Intersect, Ray};
use crate::material::Material;
use crate::Float;

use super::Primitive;

#[derive(Clone, Debug)]
pub struct Sphere {
    center: Point3<Float>,
    radius: Float,
    material: Material,
    emission: Color,
}

impl Sphere {
    pub fn new(center: Point3<Float>, radius: Float) -> Result<Self> {
        if radius <= 0.0 {
            return Err(Error::DegenerateGeometry(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }
        Ok(Self {
            center,
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

    pub fn center(&self) -> Point3<Float> {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }
}

impl Intersect for Sphere {
    fn intersect(&self, ray: &Ray, max_distance: Float) -> Vec<Hit<'_>> {
        // Origin at the center: exactly one forward point at distance r.
        if ray.orig == self.center {
            if t_in_range(self.radius, max_distance) {
                return vec![Hit {
                    primitive: self,
                    point: ray.point_at(self.radius),
                }];
            }
            return Vec::new();
        }
        let u = self.center - ray.orig;
        // Projection of the center onto the ray.
        let tm = ray.dir.dot(u);
        let d2 = u.magnitude2() - tm * tm;
        let th2 = self.radius * self.radius - d2;
        if th2 < 0.0 {
            return Vec::new();
        }
        let th = th2.sqrt();
        let mut hits = Vec::new();
        if t_in_range(tm - th, max_distance) {
            hits.push(Hit {
                primitive: self,
                point: ray.point_at(tm - th),
            });
        }
        // A tangent ray has one root, not two coincident ones.
        if !nearly_zero(th) && t_in_range(tm + th, max_distance) {
            hits.push(Hit {
                primitive: self,
                point: ray.point_at(tm + th),
            });
        }
        hits
    }
}

impl Primitive for Sphere {
    fn normal(&self, p: Point3<Float>) -> Vector3<Float> {
        (p - self.center).normalize()
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn emission(&self) -> Color {
        self.emission
    }
}
