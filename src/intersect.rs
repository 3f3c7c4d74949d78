use std::sync::atomic::{AtomicUsize, Ordering};

use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::consts;
use crate::error::{Error, Result};
use crate::float::nearly_zero;
use crate::geometry::Primitive;
use crate::Float;

static RAY_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Ray with a unit direction. Construction fails on a zero direction.
#[derive(Clone, Debug)]
pub struct Ray {
    pub orig: Point3<Float>,
    pub dir: Vector3<Float>,
}

impl Ray {
    pub fn new(orig: Point3<Float>, dir: Vector3<Float>) -> Result<Ray> {
        if nearly_zero(dir.magnitude2()) {
            return Err(Error::DegenerateGeometry(
                "ray direction is a zero vector".to_string(),
            ));
        }
        RAY_COUNT.fetch_add(1, Ordering::Relaxed);
        Ok(Ray {
            orig,
            dir: dir.normalize(),
        })
    }

    /// Secondary ray whose origin is displaced off the spawning surface.
    ///
    /// The origin moves along `normal` to whichever side `dir` departs
    /// toward, so the new ray cannot immediately re-hit its own surface.
    /// One rule for shadow, reflection and refraction rays alike.
    pub fn spawn(orig: Point3<Float>, dir: Vector3<Float>, normal: Vector3<Float>) -> Result<Ray> {
        let offset = if dir.dot(normal) > 0.0 {
            consts::RAY_OFFSET * normal
        } else {
            -consts::RAY_OFFSET * normal
        };
        Ray::new(orig + offset, dir)
    }

    pub fn point_at(&self, t: Float) -> Point3<Float> {
        self.orig + t * self.dir
    }

    /// The hit nearest to the ray origin, or `None` for an empty set.
    pub fn find_closest<'a>(&self, hits: Vec<Hit<'a>>) -> Option<Hit<'a>> {
        hits.into_iter().min_by(|a, b| {
            let da = a.point.distance2(self.orig);
            let db = b.point.distance2(self.orig);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Total rays constructed since the last reset.
    pub fn count() -> usize {
        RAY_COUNT.load(Ordering::Relaxed)
    }

    pub fn reset_count() {
        RAY_COUNT.store(0, Ordering::Relaxed);
    }
}

/// A single ray-primitive intersection. Lives only for the duration of
/// one query and the shading computation that consumes it.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    pub primitive: &'a dyn Primitive,
    pub point: Point3<Float>,
}

pub trait Intersect: Send + Sync {
    /// All intersections with `0 < t <= max_distance`. Ordering among the
    /// results is unspecified; "no intersection" is always the empty
    /// vector, never a sentinel.
    fn intersect(&self, ray: &Ray, max_distance: Float) -> Vec<Hit<'_>>;
}

/// Shared range filter for intersection distances. Strictly positive and
/// bounded above by `max_distance` within the common tolerance.
pub(crate) fn t_in_range(t: Float, max_distance: Float) -> bool {
    t > consts::EPSILON && t - max_distance <= consts::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Sphere;

    #[test]
    fn direction_is_normalized() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 5.0)).unwrap();
        assert!((ray.dir.magnitude() - 1.0).abs() < 1e-12);
        assert_eq!(ray.dir, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn point_at_walks_the_ray() {
        let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(ray.point_at(2.5), Point3::new(1.0, 2.5, 0.0));
    }

    #[test]
    fn spawn_offsets_toward_departure_side() {
        let n = Vector3::new(0.0, 0.0, 1.0);
        let orig = Point3::new(0.0, 0.0, 0.0);
        let up = Ray::spawn(orig, Vector3::new(1.0, 0.0, 1.0), n).unwrap();
        assert!(up.orig.z > 0.0);
        let down = Ray::spawn(orig, Vector3::new(1.0, 0.0, -1.0), n).unwrap();
        assert!(down.orig.z < 0.0);
    }

    #[test]
    fn find_closest_picks_nearest_point() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.0).unwrap();
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let hits = vec![
            Hit {
                primitive: &sphere,
                point: Point3::new(10.0, 10.0, 10.0),
            },
            Hit {
                primitive: &sphere,
                point: Point3::new(0.0, 0.0, 2.0),
            },
            Hit {
                primitive: &sphere,
                point: Point3::new(5.0, 5.0, 5.0),
            },
        ];
        let closest = ray.find_closest(hits).unwrap();
        assert_eq!(closest.point, Point3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn find_closest_of_empty_is_none() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(ray.find_closest(Vec::new()).is_none());
    }

    #[test]
    fn range_filter() {
        assert!(t_in_range(1.0, 10.0));
        assert!(t_in_range(10.0, 10.0));
        assert!(!t_in_range(0.0, 10.0));
        assert!(!t_in_range(-1.0, 10.0));
        assert!(!t_in_range(10.1, 10.0));
    }
}
