use std::path::PathBuf;

use image::RgbImage;

use crate::color::Color;
use crate::error::Result;

/// Destination for rendered pixels. Workers deliver colors in linear
/// space; the sink decides what to do with them.
pub trait PixelSink: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
    /// Called once after the last pixel has been delivered.
    fn flush(&mut self) -> Result<()>;
}

/// Writes the render to an image file. The format is picked from the
/// path extension by the image crate.
pub struct ImageSink {
    image: RgbImage,
    path: PathBuf,
}

impl ImageSink {
    pub fn new(width: u32, height: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            image: RgbImage::new(width, height),
            path: path.into(),
        }
    }
}

impl PixelSink for ImageSink {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.image.put_pixel(x, y, image::Rgb(color.to_rgb8()));
    }

    fn flush(&mut self) -> Result<()> {
        self.image.save(&self.path)?;
        log::info!("saved render to {}", self.path.display());
        Ok(())
    }
}

/// In-memory sink for inspecting render output in tests.
pub struct BufferSink {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl BufferSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::black(); (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }
}

impl PixelSink for BufferSink {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_stores_and_returns_pixels() {
        let mut sink = BufferSink::new(4, 2);
        sink.set_pixel(3, 1, Color::new(0.1, 0.2, 0.3));
        assert_eq!(sink.pixel(3, 1), Color::new(0.1, 0.2, 0.3));
        assert_eq!(sink.pixel(0, 0), Color::black());
        assert!(sink.flush().is_ok());
    }

    #[test]
    fn image_sink_clamps_through_to_rgb8() {
        let mut sink = ImageSink::new(2, 2, "unused.png");
        sink.set_pixel(0, 0, Color::new(2.0, -1.0, 0.5));
        assert_eq!(sink.image.get_pixel(0, 0), &image::Rgb([255, 0, 128]));
    }
}
