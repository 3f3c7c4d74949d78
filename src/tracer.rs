use std::sync::Arc;

use cgmath::prelude::*;

use crate::color::Color;
use crate::consts;
use crate::float::nearly_zero;
use crate::intersect::{Hit, Intersect, Ray};
use crate::light::Light;
use crate::scene::Scene;
use crate::Float;

/// Recursion depth for global effects.
const DEFAULT_MAX_DEPTH: usize = 10;
/// Importance threshold below which a recursive branch is pruned.
const DEFAULT_MIN_IMPORTANCE: Float = 0.001;

/// Recursive Whitted-style shading engine: local Phong lighting with
/// transparency-weighted shadows, plus bounded-depth reflection and
/// refraction pruned by a running importance coefficient.
pub struct WhittedTracer {
    scene: Arc<Scene>,
    max_depth: usize,
    min_importance: Float,
}

impl WhittedTracer {
    pub fn new(scene: Arc<Scene>) -> Self {
        Self {
            scene,
            max_depth: DEFAULT_MAX_DEPTH,
            min_importance: DEFAULT_MIN_IMPORTANCE,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_min_importance(mut self, min_importance: Float) -> Self {
        self.min_importance = min_importance;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Color seen along `ray`: the shaded closest hit plus the ambient
    /// term, or the scene background on a miss. Ambient is added here and
    /// only here, never inside the recursion.
    pub fn trace(&self, ray: &Ray) -> Color {
        match self.find_closest(ray) {
            Some(hit) => {
                self.shade(&hit, ray, self.max_depth, Color::white())
                    + self.scene.ambient.intensity()
            }
            None => self.scene.background,
        }
    }

    fn find_closest(&self, ray: &Ray) -> Option<Hit<'_>> {
        ray.find_closest(self.scene.surfaces.intersect(ray, consts::INFINITY))
    }

    fn shade(&self, hit: &Hit<'_>, ray: &Ray, depth: usize, k: Color) -> Color {
        let color = self.local_effects(hit, ray, k);
        if depth <= 1 {
            color
        } else {
            color + self.global_effects(hit, ray, depth, k)
        }
    }

    /// Emission plus diffuse and specular contributions from every light
    /// whose direction lies on the viewer's side of the surface.
    fn local_effects(&self, hit: &Hit<'_>, ray: &Ray, k: Color) -> Color {
        let v = ray.dir;
        let n = hit.primitive.normal(hit.point);
        let mut color = hit.primitive.emission();
        let nv = n.dot(v);
        if nearly_zero(nv) {
            return color;
        }
        let material = hit.primitive.material();
        for light in &self.scene.lights {
            let l = light.direction(hit.point);
            let nl = n.dot(l);
            // Light and viewer must be on the same side: sign(nl) == sign(nv).
            if nearly_zero(nl) || nl * nv < 0.0 {
                continue;
            }
            let ktr = self.transparency(hit, light.as_ref(), l, n, k);
            if (ktr * k).below(self.min_importance) {
                continue;
            }
            let il = light.intensity(hit.point) * ktr;
            let diffuse = material.kd * nl.abs();
            let r = l - 2.0 * nl * n;
            let rv = -r.dot(v);
            let specular = if rv > consts::EPSILON {
                material.ks * rv.powi(material.shininess)
            } else {
                Color::black()
            };
            color += il * (diffuse + specular);
        }
        color
    }

    /// Product of the transmission coefficients of every occluder between
    /// the hit point and the light. White means unshadowed; the walk
    /// short-circuits to black once the scaled factor stops mattering.
    fn transparency(
        &self,
        hit: &Hit<'_>,
        light: &dyn Light,
        l: cgmath::Vector3<Float>,
        n: cgmath::Vector3<Float>,
        k: Color,
    ) -> Color {
        let shadow = match Ray::spawn(hit.point, -l, n) {
            Ok(ray) => ray,
            Err(_) => return Color::white(),
        };
        let max_distance = light.distance(hit.point);
        let mut ktr = Color::white();
        for occluder in self.scene.surfaces.intersect(&shadow, max_distance) {
            ktr *= occluder.primitive.material().kt;
            if (ktr * k).below(self.min_importance) {
                return Color::black();
            }
        }
        ktr
    }

    fn global_effects(&self, hit: &Hit<'_>, ray: &Ray, depth: usize, k: Color) -> Color {
        let v = ray.dir;
        let n = hit.primitive.normal(hit.point);
        let material = hit.primitive.material();
        let mut color = Color::black();
        // Mirror reflection about the normal.
        let reflected = v - 2.0 * v.dot(n) * n;
        if let Ok(ray) = Ray::spawn(hit.point, reflected, n) {
            color += self.global_branch(&ray, depth, k, material.kr);
        }
        // Straight-through refraction.
        if let Ok(ray) = Ray::spawn(hit.point, v, n) {
            color += self.global_branch(&ray, depth, k, material.kt);
        }
        color
    }

    /// One reflection or refraction branch carrying coefficient `kx`.
    /// Prunes to the coefficient-scaled background once the running
    /// importance drops below the threshold; the geometric decay of the
    /// coefficients bounds total ray count by a convergent series.
    fn global_branch(&self, ray: &Ray, depth: usize, k: Color, kx: Color) -> Color {
        let kkx = k * kx;
        if kkx.below(self.min_importance) {
            return self.scene.background * kkx;
        }
        match self.find_closest(ray) {
            None => self.scene.background * kx,
            Some(hit) => {
                let n = hit.primitive.normal(hit.point);
                // Grazing continuation contributes nothing.
                if nearly_zero(n.dot(ray.dir)) {
                    Color::black()
                } else {
                    self.shade(&hit, ray, depth - 1, kkx) * kx
                }
            }
        }
    }
}
