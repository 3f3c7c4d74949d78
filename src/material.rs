use crate::color::Color;

/// Surface reflectance coefficients. Built once during scene setup and
/// read-only for the whole render.
#[derive(Clone, Copy, Debug, Default)]
pub struct Material {
    /// Diffuse coefficient
    pub kd: Color,
    /// Specular coefficient
    pub ks: Color,
    /// Transmission coefficient
    pub kt: Color,
    /// Reflection coefficient
    pub kr: Color,
    /// Phong shininess exponent
    pub shininess: i32,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kd(mut self, kd: impl Into<Color>) -> Self {
        self.kd = kd.into();
        self
    }

    pub fn with_ks(mut self, ks: impl Into<Color>) -> Self {
        self.ks = ks.into();
        self
    }

    pub fn with_kt(mut self, kt: impl Into<Color>) -> Self {
        self.kt = kt.into();
        self
    }

    pub fn with_kr(mut self, kr: impl Into<Color>) -> Self {
        self.kr = kr.into();
        self
    }

    pub fn with_shininess(mut self, shininess: i32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Fully opaque to shadow rays?
    pub fn is_opaque(&self) -> bool {
        self.kt.is_black()
    }
}
