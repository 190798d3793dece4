use std::path::Path;

use glam::Vec2;

use super::error::GlobeError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: u8,
}

impl PixelSample {
    pub fn is_land(&self) -> bool {
        self.alpha != 0
    }
}

/// Decoded RGBA8 raster whose alpha channel marks land.
#[derive(Clone, Debug)]
pub struct LandMask {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl LandMask {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, GlobeError> {
        let expected = 4 * width as usize * height as usize;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(GlobeError::InvalidMask {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_image(image: &image::DynamicImage) -> Result<Self, GlobeError> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, rgba.into_raw())
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, GlobeError> {
        let path = path.as_ref();
        log::info!("Loading land mask from {}", path.display());
        Self::from_image(&image::open(path)?)
    }

    /// Uniform mask, mostly useful for previews and tests.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, GlobeError> {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(4 * width as usize * height as usize)
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Byte offset of the pixel under `uv`: `4 * floor(u * W) + floor(v * H) * 4 * W`.
    ///
    /// Coordinates outside `[0, 1)` are clamped onto the edge pixels.
    pub fn offset(&self, uv: Vec2) -> usize {
        let column = ((uv.x * self.width as f32).floor() as usize).min(self.width as usize - 1);
        let row = ((uv.y * self.height as f32).floor() as usize).min(self.height as usize - 1);

        4 * column + row * (4 * self.width as usize)
    }

    pub fn sample(&self, uv: Vec2) -> PixelSample {
        let offset = self.offset(uv);
        let [r, g, b, alpha] = [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
            self.pixels[offset + 3],
        ];

        PixelSample { r, g, b, alpha }
    }

    pub fn is_land(&self, uv: Vec2) -> bool {
        self.sample(uv).is_land()
    }
}
