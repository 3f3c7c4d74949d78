use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::float::nearly_zero;
use crate::intersect::{t_in_range, Hit, Intersect, Ray};
use crate::material::Material;
use crate::Float;

use super::Primitive;

/// Infinite plane defined by a reference point and a unit normal.
#[derive(Clone, Debug)]
pub struct Plane {
    q0: Point3<Float>,
    normal: Vector3<Float>,
    material: Material,
    emission: Color,
}

impl Plane {
    pub fn new(q0: Point3<Float>, normal: Vector3<Float>) -> Result<Self> {
        if nearly_zero(normal.magnitude2()) {
            return Err(Error::DegenerateGeometry(
                "plane normal is a zero vector".to_string(),
            ));
        }
        Ok(Self {
            q0,
            normal: normal.normalize(),
            material: Material::default(),
            emission: Color::black(),
        })
    }

    /// Plane through three non-collinear points.
    pub fn from_points(a: Point3<Float>, b: Point3<Float>, c: Point3<Float>) -> Result<Self> {
        let v1 = b - a;
        let v2 = c - a;
        if nearly_zero(v1.magnitude2()) || nearly_zero(v2.magnitude2()) {
            return Err(Error::DegenerateGeometry(
                "plane points are coincident".to_string(),
            ));
        }
        let n = v1.cross(v2);
        if nearly_zero(n.magnitude2()) {
            return Err(Error::DegenerateGeometry(
                "plane points are collinear".to_string(),
            ));
        }
        Plane::new(a, n)
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn reference_point(&self) -> Point3<Float> {
        self.q0
    }

    pub fn normal_vector(&self) -> Vector3<Float> {
        self.normal
    }
}

impl Intersect for Plane {
    fn intersect(&self, ray: &Ray, max_distance: Float) -> Vec<Hit<'_>> {
        // A ray starting exactly at the reference point has no
        // well-defined offset from the plane. Documented degenerate
        // policy: no intersection.
        if ray.orig == self.q0 {
            return Vec::new();
        }
        let nv = self.normal.dot(ray.dir);
        // Parallel to the plane (possibly lying in it).
        if nearly_zero(nv) {
            return Vec::new();
        }
        let nqp = self.normal.dot(self.q0 - ray.orig);
        // Origin lies in the plane.
        if nearly_zero(nqp) {
            return Vec::new();
        }
        let t = nqp / nv;
        if !t_in_range(t, max_distance) {
            return Vec::new();
        }
        vec![Hit {
            primitive: self,
            point: ray.point_at(t),
        }]
    }
}

impl Primitive for Plane {
    fn normal(&self, _p: Point3<Float>) -> Vector3<Float> {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn emission(&self) -> Color {
        self.emission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;

    fn xy_plane() -> Plane {
        Plane::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)).unwrap()
    }

    #[test]
    fn construction_normalizes() {
        let p = Plane::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 7.0)).unwrap();
        assert!((p.normal_vector().magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn construction_rejects_degenerate_points() {
        let a = Point3::new(0.0, 0.0, 0.0);
        assert!(Plane::from_points(a, a, Point3::new(1.0, 0.0, 0.0)).is_err());
        // Collinear
        assert!(Plane::from_points(
            a,
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0)
        )
        .is_err());
        assert!(Plane::new(a, Vector3::new(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn from_points_normal_is_unit() {
        let p = Plane::from_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        )
        .unwrap();
        assert!((p.normal(Point3::new(1.0, 1.0, 0.0)).magnitude() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn single_hit_in_front() {
        let plane = xy_plane();
        let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        let hits = plane.intersect(&ray, consts::INFINITY);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn behind_or_parallel_misses() {
        let plane = xy_plane();
        // Pointing away
        let away = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(plane.intersect(&away, consts::INFINITY).is_empty());
        // Parallel above the plane
        let parallel = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(plane.intersect(&parallel, consts::INFINITY).is_empty());
    }

    #[test]
    fn ray_in_plane_misses() {
        let plane = xy_plane();
        let ray = Ray::new(Point3::new(1.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(plane.intersect(&ray, consts::INFINITY).is_empty());
    }

    #[test]
    fn origin_at_reference_point_misses() {
        let plane = xy_plane();
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 1.0)).unwrap();
        assert!(plane.intersect(&ray, consts::INFINITY).is_empty());
    }

    #[test]
    fn max_distance_filters() {
        let plane = xy_plane();
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(plane.intersect(&ray, 4.0).is_empty());
        assert_eq!(plane.intersect(&ray, 5.0).len(), 1);
    }
}
