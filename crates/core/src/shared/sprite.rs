use image::imageops::{self, FilterType};
use image::RgbaImage;

/// An immutable RGBA overlay image. Alpha is a linear blend weight in `0..=255`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    image: RgbaImage,
}

impl Sprite {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `[r, g, b, a]` at the given position.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Resamples to exactly `width × height`.
    ///
    /// Shrinking averages the source pixels covering each target pixel;
    /// enlarging interpolates linearly. A same-size request returns a clone.
    pub fn resized(&self, width: u32, height: u32) -> Sprite {
        if width == self.width() && height == self.height() {
            return self.clone();
        }
        if width <= self.width() && height <= self.height() {
            return Sprite::new(imageops::thumbnail(&self.image, width, height));
        }
        Sprite::new(imageops::resize(&self.image, width, height, FilterType::Triangle))
    }
}
