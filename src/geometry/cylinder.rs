use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::consts;
use crate::error::{Error, Result};
use crate::float::nearly_zero;
use crate::intersect::{t_in_range, Hit, Intersect, Ray};
use crate::material::Material;
use crate::Float;

use super::Primitive;

/// Finite cylinder: a tube bounded by two cap disks along its axis.
#[derive(Clone, Debug)]
pub struct Cylinder {
    axis: Ray,
    radius: Float,
    height: Float,
    material: Material,
    emission: Color,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: Float, height: Float) -> Result<Self> {
        if radius <= 0.0 {
            return Err(Error::DegenerateGeometry(format!(
                "cylinder radius must be positive, got {}",
                radius
            )));
        }
        if height <= 0.0 {
            return Err(Error::DegenerateGeometry(format!(
                "cylinder height must be positive, got {}",
                height
            )));
        }
        Ok(Self {
            axis,
            radius,
            height,
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

    pub fn height(&self) -> Float {
        self.height
    }

    /// Axial coordinate of `p`: distance of its axis foot from the base.
    fn axial(&self, p: Point3<Float>) -> Float {
        self.axis.dir.dot(p - self.axis.orig)
    }

    /// Intersection with one cap disk. The rim circle counts as a miss,
    /// like a polygon edge.
    fn cap_hit(&self, ray: &Ray, center: Point3<Float>, max_distance: Float) -> Option<Hit<'_>> {
        let dv = self.axis.dir.dot(ray.dir);
        if nearly_zero(dv) {
            return None;
        }
        let t = self.axis.dir.dot(center - ray.orig) / dv;
        if !t_in_range(t, max_distance) {
            return None;
        }
        let point = ray.point_at(t);
        if point.distance2(center) - self.radius * self.radius < -consts::EPSILON {
            Some(Hit {
                primitive: self,
                point,
            })
        } else {
            None
        }
    }
}

impl Intersect for Cylinder {
    /// Tube quadratic with its roots clipped to the axial span, plus the
    /// two cap disks. A convex solid, so at most two hits come back.
    fn intersect(&self, ray: &Ray, max_distance: Float) -> Vec<Hit<'_>> {
        let mut hits = Vec::new();

        let va = self.axis.dir;
        let dp = ray.orig - self.axis.orig;
        let d_perp = ray.dir - ray.dir.dot(va) * va;
        let dp_perp = dp - dp.dot(va) * va;

        let a = d_perp.magnitude2();
        if !nearly_zero(a) {
            let b = 2.0 * d_perp.dot(dp_perp);
            let c = dp_perp.magnitude2() - self.radius * self.radius;
            let discriminant = b * b - 4.0 * a * c;
            if discriminant >= 0.0 {
                let sq = discriminant.sqrt();
                let mut roots = vec![(-b - sq) / (2.0 * a)];
                if !nearly_zero(sq) {
                    roots.push((-b + sq) / (2.0 * a));
                }
                for t in roots {
                    if !t_in_range(t, max_distance) {
                        continue;
                    }
                    let point = ray.point_at(t);
                    // Within the side surface, caps excluded.
                    let s = self.axial(point);
                    if s > consts::EPSILON && self.height - s > consts::EPSILON {
                        hits.push(Hit {
                            primitive: self,
                            point,
                        });
                    }
                }
            }
        }

        let top = self.axis.point_at(self.height);
        if let Some(hit) = self.cap_hit(ray, self.axis.orig, max_distance) {
            hits.push(hit);
        }
        if let Some(hit) = self.cap_hit(ray, top, max_distance) {
            hits.push(hit);
        }
        hits
    }
}

impl Primitive for Cylinder {
    /// Axis direction on either base, radial from the axis foot on the
    /// side surface.
    fn normal(&self, p: Point3<Float>) -> Vector3<Float> {
        if p == self.axis.orig {
            return self.axis.dir;
        }
        let t = self.axial(p);
        if nearly_zero(t) || nearly_zero(self.height - t) {
            return self.axis.dir;
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
