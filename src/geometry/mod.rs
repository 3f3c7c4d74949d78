//! Geometric primitives answering surface-normal and ray-intersection
//! queries. Intersection is deliberately exhaustive; there is no spatial
//! acceleration here.

mod collection;
mod cylinder;
mod plane;
mod polygon;
mod sphere;
mod tube;

pub use self::collection::SurfaceList;
pub use self::cylinder::Cylinder;
pub use self::plane::Plane;
pub use self::polygon::Polygon;
pub use self::sphere::Sphere;
pub use self::tube::Tube;

use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::intersect::Intersect;
use crate::material::Material;
use crate::Float;

/// A shadable surface: something a hit can refer back to for its normal,
/// material and emission. All primitive variants implement this single
/// trait; dispatch is dynamic.
pub trait Primitive: Intersect {
    /// Unit outward normal at `p`, which must lie on the surface.
    fn normal(&self, p: Point3<Float>) -> Vector3<Float>;

    fn material(&self) -> &Material;

    fn emission(&self) -> Color;
}
