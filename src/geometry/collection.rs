use crate::intersect::{Hit, Intersect, Ray};
use crate::Float;

/// Insertion-ordered collection of intersectable surfaces, including
/// nested collections. Queries fan out to every member and concatenate
/// the in-range hits; closest-hit selection is the caller's job.
#[derive(Default)]
pub struct SurfaceList {
    surfaces: Vec<Box<dyn Intersect>>,
}

impl SurfaceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, surface: impl Intersect + 'static) {
        self.surfaces.push(Box::new(surface));
    }

    pub fn with(mut self, surface: impl Intersect + 'static) -> Self {
        self.add(surface);
        self
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl Intersect for SurfaceList {
    fn intersect(&self, ray: &Ray, max_distance: Float) -> Vec<Hit<'_>> {
        let mut hits = Vec::new();
        for surface in &self.surfaces {
            hits.extend(surface.intersect(ray, max_distance));
        }
        hits
    }
}
