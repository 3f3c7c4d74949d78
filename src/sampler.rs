use std::collections::HashMap;

use cgmath::{EuclideanSpace, Point3};

use crate::camera::Camera;
use crate::color::Color;
use crate::consts;
use crate::float::ToFloat;
use crate::intersect::Ray;
use crate::tracer::WhittedTracer;
use crate::Float;

/// Per-pixel color strategy. The strategies are mutually exclusive; the
/// last one configured wins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sampling {
    /// One ray through the pixel center.
    Center,
    /// n x n jittered rays averaged with uniform weight.
    Grid(u32),
    /// Recursive corner sampling: subdivide while the four cell corners
    /// disagree by more than `tolerance` per channel and depth remains.
    Adaptive { max_depth: u32, tolerance: Float },
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling::Center
    }
}

/// Floating-point world coordinates are fragile map keys, so cache keys
/// quantize each coordinate to `consts::SAMPLE_QUANTUM` before hashing.
/// Shared corners of sibling cells then collide even when computed along
/// different arithmetic paths.
type SampleKey = [i64; 3];

fn sample_key(p: Point3<Float>) -> SampleKey {
    let q = |c: Float| (c / consts::SAMPLE_QUANTUM).round() as i64;
    [q(p.x), q(p.y), q(p.z)]
}

/// Produces one color per pixel by tracing rays from the camera eye
/// through view-plane sample points.
pub struct PixelSampler<'a> {
    camera: &'a Camera,
    tracer: &'a WhittedTracer,
    sampling: Sampling,
}

impl<'a> PixelSampler<'a> {
    pub fn new(camera: &'a Camera, tracer: &'a WhittedTracer, sampling: Sampling) -> Self {
        Self {
            camera,
            tracer,
            sampling,
        }
    }

    pub fn pixel_color(&self, nx: u32, ny: u32, col: u32, row: u32) -> Color {
        match self.sampling {
            Sampling::Center => {
                self.trace_through(self.camera.pixel_point(nx, ny, col, row))
            }
            Sampling::Grid(n) => self.grid_color(nx, ny, col, row, n.max(1)),
            Sampling::Adaptive {
                max_depth,
                tolerance,
            } => self.adaptive_color(nx, ny, col, row, max_depth, tolerance),
        }
    }

    fn trace_through(&self, target: Point3<Float>) -> Color {
        // The target cannot coincide with the eye once the view-plane
        // distance is validated positive, so construction only fails for
        // genuinely degenerate configurations.
        match Ray::new(self.camera.pos(), target - self.camera.pos()) {
            Ok(ray) => self.tracer.trace(&ray),
            Err(_) => self.tracer.scene().background,
        }
    }

    /// Uniform average over an n x n subgrid with one jittered sample per
    /// cell.
    fn grid_color(&self, nx: u32, ny: u32, col: u32, row: u32, n: u32) -> Color {
        let center = self.camera.pixel_point(nx, ny, col, row);
        let (rx, ry) = self.camera.pixel_size(nx, ny);
        let (cell_w, cell_h) = (rx / n.to_float(), ry / n.to_float());
        let mut sum = Color::black();
        for i in 0..n {
            for j in 0..n {
                let dx = -rx / 2.0 + (j.to_float() + rand::random::<Float>()) * cell_w;
                let dy = -ry / 2.0 + (i.to_float() + rand::random::<Float>()) * cell_h;
                let target = center + dx * self.camera.right() + dy * self.camera.up();
                sum += self.trace_through(target);
            }
        }
        sum / (n * n).to_float()
    }

    fn adaptive_color(
        &self,
        nx: u32,
        ny: u32,
        col: u32,
        row: u32,
        max_depth: u32,
        tolerance: Float,
    ) -> Color {
        let center = self.camera.pixel_point(nx, ny, col, row);
        let (rx, ry) = self.camera.pixel_size(nx, ny);
        let half_x = rx / 2.0 * self.camera.right();
        let half_y = ry / 2.0 * self.camera.up();
        let corners = [
            center - half_x - half_y,
            center + half_x - half_y,
            center - half_x + half_y,
            center + half_x + half_y,
        ];
        let mut cache = HashMap::new();
        let colors = corners.map(|p| self.sample_cached(&mut cache, p));
        self.refine(&mut cache, corners, colors, max_depth, tolerance)
    }

    fn sample_cached(
        &self,
        cache: &mut HashMap<SampleKey, Color>,
        point: Point3<Float>,
    ) -> Color {
        let key = sample_key(point);
        if let Some(&color) = cache.get(&key) {
            return color;
        }
        let color = self.trace_through(point);
        cache.insert(key, color);
        color
    }

    /// Recursive refinement of one cell given its corner points and their
    /// colors. Terminates when the corners almost agree or depth runs
    /// out; otherwise splits into four children sharing edge midpoints
    /// and the center through the cache.
    fn refine(
        &self,
        cache: &mut HashMap<SampleKey, Color>,
        corners: [Point3<Float>; 4],
        colors: [Color; 4],
        depth: u32,
        tolerance: Float,
    ) -> Color {
        let average =
            (colors[0] + colors[1] + colors[2] + colors[3]) / 4.0;
        let uniform = colors[1..]
            .iter()
            .all(|c| c.almost_eq(colors[0], tolerance));
        if depth == 0 || uniform {
            return average;
        }
        let [c00, c10, c01, c11] = corners;
        let mid = |a: Point3<Float>, b: Point3<Float>| Point3::midpoint(a, b);
        let top = mid(c00, c10);
        let bottom = mid(c01, c11);
        let left = mid(c00, c01);
        let right = mid(c10, c11);
        let center = mid(c00, c11);

        let children = [
            [c00, top, left, center],
            [top, c10, center, right],
            [left, center, c01, bottom],
            [center, right, bottom, c11],
        ];
        let mut sum = Color::black();
        for child in children {
            let child_colors = child.map(|p| self.sample_cached(cache, p));
            sum += self.refine(cache, child, child_colors, depth - 1, tolerance);
        }
        sum / 4.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cgmath::Vector3;

    use super::*;
    use crate::color::Color;
    use crate::geometry::Sphere;
    use crate::material::Material;
    use crate::scene::Scene;

    fn camera() -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap()
        .set_viewplane(2.0, 2.0)
        .unwrap()
        .set_distance(1.0)
        .unwrap()
    }

    fn uniform_tracer() -> WhittedTracer {
        // Nothing to hit: every sample is the background color.
        let scene = Scene::builder("uniform")
            .background(Color::new(0.3, 0.6, 0.9))
            .build();
        WhittedTracer::new(Arc::new(scene))
    }

    #[test]
    fn quantized_keys_collide_for_nearby_points() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-13, 2.0 - 1e-13, 3.0);
        assert_eq!(sample_key(a), sample_key(b));
        let c = Point3::new(1.0 + 1e-6, 2.0, 3.0);
        assert_ne!(sample_key(a), sample_key(c));
    }

    #[test]
    fn strategies_agree_on_uniform_scenes() {
        let camera = camera();
        let tracer = uniform_tracer();
        let expected = Color::new(0.3, 0.6, 0.9);

        let center = PixelSampler::new(&camera, &tracer, Sampling::Center);
        assert!(center.pixel_color(4, 4, 1, 2).almost_eq(expected, 1e-9));

        let grid = PixelSampler::new(&camera, &tracer, Sampling::Grid(3));
        assert!(grid.pixel_color(4, 4, 1, 2).almost_eq(expected, 1e-9));

        let adaptive = PixelSampler::new(
            &camera,
            &tracer,
            Sampling::Adaptive {
                max_depth: 4,
                tolerance: 0.01,
            },
        );
        assert!(adaptive.pixel_color(4, 4, 1, 2).almost_eq(expected, 1e-9));
    }

    #[test]
    fn adaptive_terminates_early_on_uniform_regions() {
        let camera = camera();
        let tracer = uniform_tracer();
        // Exhaustive subdivision at depth 50 would need a 2^50 sample
        // grid. Agreement at the first four corners has to stop the
        // recursion for this to finish at all.
        let sampler = PixelSampler::new(
            &camera,
            &tracer,
            Sampling::Adaptive {
                max_depth: 50,
                tolerance: 0.01,
            },
        );
        let c = sampler.pixel_color(4, 4, 0, 0);
        assert!(c.almost_eq(Color::new(0.3, 0.6, 0.9), 1e-9));
    }

    #[test]
    fn adaptive_matches_grid_average_near_an_edge() {
        // Half the pixel sees the sphere, half the background; adaptive
        // refinement must land near the supersampled average.
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -10.0), 5.0)
            .unwrap()
            .with_material(Material::new().with_kd(0.5));
        let scene = Scene::builder("edge")
            .background(Color::new(0.8, 0.8, 0.8))
            .surface(sphere)
            .build();
        let tracer = WhittedTracer::new(Arc::new(scene));
        let camera = camera();

        let grid = PixelSampler::new(&camera, &tracer, Sampling::Grid(8));
        let adaptive = PixelSampler::new(
            &camera,
            &tracer,
            Sampling::Adaptive {
                max_depth: 6,
                tolerance: 0.05,
            },
        );
        // An edge pixel of the 2x2 grid.
        let g = grid.pixel_color(2, 2, 0, 0);
        let a = adaptive.pixel_color(2, 2, 0, 0);
        assert!(a.almost_eq(g, 0.15));
    }

    #[test]
    fn shared_samples_are_reused() {
        let camera = camera();
        let tracer = uniform_tracer();
        let sampler = PixelSampler::new(&camera, &tracer, Sampling::Center);
        let mut cache = HashMap::new();
        let p = Point3::new(0.5, 0.5, -1.0);
        let first = sampler.sample_cached(&mut cache, p);
        let second = sampler.sample_cached(&mut cache, p + Vector3::new(1e-13, 0.0, 0.0));
        // The nudged point quantizes to the same key: no new entry.
        assert_eq!(cache.len(), 1);
        assert_eq!(first, second);
    }
}
