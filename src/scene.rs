use crate::color::Color;
use crate::geometry::SurfaceList;
use crate::intersect::Intersect;
use crate::light::{AmbientLight, Light};

/// Passive aggregate of everything a render reads: background color,
/// ambient light, the surface collection and an ordered light list.
/// Built once before rendering and immutable during it.
pub struct Scene {
    pub name: String,
    pub background: Color,
    pub ambient: AmbientLight,
    pub surfaces: SurfaceList,
    pub lights: Vec<Box<dyn Light>>,
}

impl Scene {
    pub fn builder(name: impl Into<String>) -> SceneBuilder {
        SceneBuilder {
            name: name.into(),
            background: Color::black(),
            ambient: AmbientLight::none(),
            surfaces: SurfaceList::new(),
            lights: Vec::new(),
        }
    }
}

pub struct SceneBuilder {
    name: String,
    background: Color,
    ambient: AmbientLight,
    surfaces: SurfaceList,
    lights: Vec<Box<dyn Light>>,
}

impl SceneBuilder {
    pub fn background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn surface(mut self, surface: impl Intersect + 'static) -> Self {
        self.surfaces.add(surface);
        self
    }

    pub fn light(mut self, light: impl Light + 'static) -> Self {
        self.lights.push(Box::new(light));
        self
    }

    pub fn build(self) -> Scene {
        Scene {
            name: self.name,
            background: self.background,
            ambient: self.ambient,
            surfaces: self.surfaces,
            lights: self.lights,
        }
    }
}
