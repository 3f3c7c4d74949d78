use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::float::nearly_zero;
use crate::intersect::{Hit, Intersect, Ray};
use crate::material::Material;
use crate::Float;

use super::{Plane, Primitive};

/// Convex planar polygon given as an ordered vertex loop, backed by its
/// supporting plane. A triangle is the three-vertex case.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Point3<Float>>,
    plane: Plane,
    material: Material,
    emission: Color,
}

impl Polygon {
    /// Validates the loop: at least 3 vertices, no coincident neighbors,
    /// all vertices coplanar, consecutive-edge cross products agreeing in
    /// sign with the face normal (convex, consistently wound).
    pub fn new(vertices: Vec<Point3<Float>>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::DegenerateGeometry(
                "a polygon needs at least 3 vertices".to_string(),
            ));
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        let polygon = Self {
            vertices,
            plane,
            material: Material::default(),
            emission: Color::black(),
        };
        if polygon.vertices.len() == 3 {
            return Ok(polygon);
        }

        let n = polygon.plane.normal_vector();
        let v = &polygon.vertices;
        let last = v.len() - 1;
        let mut edge1 = v[last] - v[last - 1];
        let mut edge2 = v[0] - v[last];
        let corner = edge1.cross(edge2).dot(n);
        if nearly_zero(corner) {
            return Err(Error::DegenerateGeometry(
                "three consecutive polygon vertices are collinear".to_string(),
            ));
        }
        let positive = corner > 0.0;
        for i in 1..v.len() {
            if !nearly_zero((v[i] - v[0]).dot(n)) {
                return Err(Error::DegenerateGeometry(
                    "polygon vertices are not coplanar".to_string(),
                ));
            }
            edge1 = edge2;
            edge2 = v[i] - v[i - 1];
            let corner = edge1.cross(edge2).dot(n);
            if nearly_zero(corner) {
                return Err(Error::DegenerateGeometry(
                    "three consecutive polygon vertices are collinear".to_string(),
                ));
            }
            if positive != (corner > 0.0) {
                return Err(Error::DegenerateGeometry(
                    "polygon vertices must be convex and ordered by edge path".to_string(),
                ));
            }
        }
        Ok(polygon)
    }

    pub fn triangle(a: Point3<Float>, b: Point3<Float>, c: Point3<Float>) -> Result<Self> {
        Self::new(vec![a, b, c])
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn vertices(&self) -> &[Point3<Float>] {
        &self.vertices
    }

    /// Does the plane hit at `ray` fall inside the vertex loop?
    ///
    /// The signed volumes `(vᵢ × vᵢ₊₁)·dir` over the vertex-to-origin
    /// vectors must all share one sign; a zero lands on an edge or vertex
    /// and counts as a miss.
    fn contains(&self, ray: &Ray) -> bool {
        let to_vertex: Vec<Vector3<Float>> =
            self.vertices.iter().map(|&v| v - ray.orig).collect();
        let mut sign = 0;
        for (i, a) in to_vertex.iter().enumerate() {
            let b = &to_vertex[(i + 1) % to_vertex.len()];
            let s = ray.dir.dot(a.cross(*b));
            if nearly_zero(s) {
                return false;
            }
            let s = if s > 0.0 { 1 } else { -1 };
            if sign == 0 {
                sign = s;
            } else if sign != s {
                return false;
            }
        }
        true
    }
}

impl Intersect for Polygon {
    fn intersect(&self, ray: &Ray, max_distance: Float) -> Vec<Hit<'_>> {
        let planar = self.plane.intersect(ray, max_distance);
        let hit = match planar.first() {
            Some(hit) => hit.point,
            None => return Vec::new(),
        };
        if !self.contains(ray) {
            return Vec::new();
        }
        vec![Hit {
            primitive: self,
            point: hit,
        }]
    }
}

impl Primitive for Polygon {
    fn normal(&self, _p: Point3<Float>) -> Vector3<Float> {
        self.plane.normal_vector()
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

    fn p(x: Float, y: Float, z: Float) -> Point3<Float> {
        Point3::new(x, y, z)
    }

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn valid_construction() {
        assert!(Polygon::triangle(p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)).is_ok());
        assert!(Polygon::new(vec![
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(-1.0, 1.0, 1.0),
        ])
        .is_ok());
    }

    #[test]
    fn rejects_too_few_vertices() {
        assert!(Polygon::new(vec![p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn rejects_non_coplanar() {
        assert!(Polygon::new(vec![
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 2.0, 2.0),
        ])
        .is_err());
    }

    #[test]
    fn rejects_concave_and_misordered() {
        // Concave: the dent at (0.5, 0.25) flips the corner sign.
        assert!(Polygon::new(vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.5, 0.25, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ])
        .is_err());
        // Vertices out of edge order.
        assert!(Polygon::new(vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
        ])
        .is_err());
    }

    #[test]
    fn rejects_collinear_triangle() {
        assert!(Polygon::triangle(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0)).is_err());
    }

    #[test]
    fn rejects_coincident_vertices() {
        let a = p(0.0, 0.0, 0.0);
        assert!(Polygon::triangle(a, a, p(1.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn hit_inside() {
        let square = unit_square();
        let ray = Ray::new(p(0.5, 0.5, 1.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        let hits = square.intersect(&ray, consts::INFINITY);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point, p(0.5, 0.5, 0.0));
    }

    #[test]
    fn miss_outside_and_on_edge() {
        let square = unit_square();
        let outside = Ray::new(p(2.0, 0.5, 1.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(square.intersect(&outside, consts::INFINITY).is_empty());
        // Through an edge: zero signed volume, counts as a miss.
        let edge = Ray::new(p(0.5, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(square.intersect(&edge, consts::INFINITY).is_empty());
    }

    #[test]
    fn triangle_hit_and_normal() {
        let tri = Polygon::triangle(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(0.0, 2.0, 0.0)).unwrap();
        let ray = Ray::new(p(0.5, 0.5, -3.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let hits = tri.intersect(&ray, consts::INFINITY);
        assert_eq!(hits.len(), 1);
        let n = tri.normal(hits[0].point);
        assert!((n.magnitude() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn max_distance_filters() {
        let square = unit_square();
        let ray = Ray::new(p(0.5, 0.5, 2.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(square.intersect(&ray, 1.5).is_empty());
        assert_eq!(square.intersect(&ray, 2.5).len(), 1);
    }
}
