use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::float::{nearly_zero, ToFloat};
use crate::intersect::Ray;
use crate::Float;

/// Pinhole camera: an eye point, an orthonormal basis and a view plane.
///
/// The view plane sits `distance` in front of the eye along `forward`;
/// pixel (0, 0) is the top-left corner of a centered grid, rows growing
/// downward.
#[derive(Clone, Debug)]
pub struct Camera {
    pos: Point3<Float>,
    forward: Vector3<Float>,
    up: Vector3<Float>,
    right: Vector3<Float>,
    width: Float,
    height: Float,
    distance: Float,
}

impl Camera {
    /// Fails unless `forward` and `up` are orthogonal non-zero vectors.
    pub fn new(pos: Point3<Float>, forward: Vector3<Float>, up: Vector3<Float>) -> Result<Self> {
        if nearly_zero(forward.magnitude2()) || nearly_zero(up.magnitude2()) {
            return Err(Error::DegenerateGeometry(
                "camera basis vector is a zero vector".to_string(),
            ));
        }
        if !nearly_zero(forward.normalize().dot(up.normalize())) {
            return Err(Error::DegenerateGeometry(
                "camera forward and up vectors are not orthogonal".to_string(),
            ));
        }
        let forward = forward.normalize();
        let up = up.normalize();
        Ok(Self {
            pos,
            forward,
            up,
            right: up.cross(forward),
            width: 0.0,
            height: 0.0,
            distance: 0.0,
        })
    }

    pub fn set_viewplane(mut self, width: Float, height: Float) -> Result<Self> {
        if width < 0.0 || height < 0.0 {
            return Err(Error::DegenerateGeometry(format!(
                "view-plane dimensions must not be negative, got {}x{}",
                width, height
            )));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    pub fn set_distance(mut self, distance: Float) -> Result<Self> {
        if distance < 0.0 {
            return Err(Error::DegenerateGeometry(format!(
                "view-plane distance must not be negative, got {}",
                distance
            )));
        }
        self.distance = distance;
        Ok(self)
    }

    pub fn pos(&self) -> Point3<Float> {
        self.pos
    }

    pub fn up(&self) -> Vector3<Float> {
        self.up
    }

    pub fn right(&self) -> Vector3<Float> {
        self.right
    }

    pub fn width(&self) -> Float {
        self.width
    }

    pub fn height(&self) -> Float {
        self.height
    }

    pub fn distance(&self) -> Float {
        self.distance
    }

    // Zero dimensions mean the setters were never called.
    pub fn has_viewplane(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn has_distance(&self) -> bool {
        self.distance > 0.0
    }

    /// World-space size of one pixel on an `nx` by `ny` view plane.
    pub fn pixel_size(&self, nx: u32, ny: u32) -> (Float, Float) {
        (self.width / nx.to_float(), self.height / ny.to_float())
    }

    /// Center of pixel (`col`, `row`) on the view-plane grid. Columns grow
    /// along `-right`, rows along `-up` (the y flip).
    pub fn pixel_point(&self, nx: u32, ny: u32, col: u32, row: u32) -> Point3<Float> {
        let center = self.pos + self.distance * self.forward;
        let (rx, ry) = self.pixel_size(nx, ny);
        let x = -(col.to_float() - (nx.to_float() - 1.0) / 2.0) * rx;
        let y = -(row.to_float() - (ny.to_float() - 1.0) / 2.0) * ry;
        center + x * self.right + y * self.up
    }

    /// Ray from the eye through the center of pixel (`col`, `row`).
    pub fn construct_ray(&self, nx: u32, ny: u32, col: u32, row: u32) -> Result<Ray> {
        let target = self.pixel_point(nx, ny, col, row);
        Ray::new(self.pos, target - self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;
    use crate::geometry::Sphere;
    use crate::intersect::Intersect;

    fn basic_camera() -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap()
        .set_viewplane(3.0, 3.0)
        .unwrap()
        .set_distance(1.0)
        .unwrap()
    }

    #[test]
    fn rejects_non_orthogonal_basis() {
        assert!(Camera::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 1.0),
        )
        .is_err());
    }

    #[test]
    fn rejects_negative_viewplane() {
        let camera = Camera::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!(camera.clone().set_viewplane(-1.0, 1.0).is_err());
        assert!(camera.set_distance(-0.5).is_err());
    }

    #[test]
    fn basis_is_right_handed() {
        let camera = basic_camera();
        // up x forward for this orientation points along -x.
        assert_eq!(camera.right(), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn center_pixel_ray_goes_forward() {
        let camera = basic_camera();
        let ray = camera.construct_ray(3, 3, 1, 1).unwrap();
        assert_eq!(ray.dir, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn grid_is_centered_and_y_flipped() {
        let camera = basic_camera();
        // Top-left pixel center of a 3x3 grid on a 3x3 plane: one pixel
        // right of center along -right is +x, one up is +y.
        let p = camera.pixel_point(3, 3, 0, 0);
        assert_eq!(p, Point3::new(1.0, 1.0, -1.0));
        let p = camera.pixel_point(3, 3, 2, 2);
        assert_eq!(p, Point3::new(-1.0, -1.0, -1.0));
    }

    // Camera-geometry integration: count sphere intersections over all
    // view-plane rays of a 3x3 grid.
    #[test]
    fn ray_grid_intersection_counts() {
        let camera = basic_camera();
        // Big sphere in front of the camera: every center ray enters and
        // exits, 18 intersections total.
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -3.0), 2.0).unwrap();
        let mut count = 0;
        for row in 0..3 {
            for col in 0..3 {
                let ray = camera.construct_ray(3, 3, col, row).unwrap();
                count += sphere.intersect(&ray, consts::INFINITY).len();
            }
        }
        assert_eq!(count, 18);

        // Small sphere dead ahead: only the central ray hits.
        let small = Sphere::new(Point3::new(0.0, 0.0, -3.0), 0.4).unwrap();
        let mut count = 0;
        for row in 0..3 {
            for col in 0..3 {
                let ray = camera.construct_ray(3, 3, col, row).unwrap();
                count += small.intersect(&ray, consts::INFINITY).len();
            }
        }
        assert_eq!(count, 2);
    }
}
