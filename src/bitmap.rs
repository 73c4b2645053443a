//! Owned RGBA8 pixel buffer and the noise-to-gray renderer.

use std::path::Path;

use image::RgbaImage;
use rand::Rng;

use crate::error::{Error, Result};
use crate::noise::NoiseField;
use crate::params::NoiseParams;

/// Bytes per RGBA8 pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Host-side RGBA8 image, `4 * width * height` bytes, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Allocate a zeroed (transparent black) bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    /// Build an opaque gray bitmap from one level per pixel (row-major)
    pub fn from_gray_levels(width: u32, height: u32, levels: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize;
        if levels.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: levels.len(),
            });
        }

        let mut bitmap = Self::new(width, height);
        for (pixel, &level) in bitmap
            .pixels
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(levels)
        {
            pixel.copy_from_slice(&[level, level, level, 255]);
        }
        Ok(bitmap)
    }

    /// Fill with a freshly generated noise field of the bitmap's size
    pub fn render_noise<R: Rng + ?Sized>(
        &mut self,
        params: &NoiseParams,
        rng: &mut R,
    ) -> Result<()> {
        let field = NoiseField::generate(params, self.width as usize, self.height as usize, rng)?;
        self.fill_from_field(&field);
        Ok(())
    }

    /// Fill every pixel from `field` sampled at normalized coordinates
    ///
    /// Gray level is `255 * value` truncated; alpha is always 255.
    pub fn fill_from_field(&mut self, field: &NoiseField) {
        let width = self.width as usize;
        let (fw, fh) = (self.width as f32, self.height as f32);

        for (offset, pixel) in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let x = offset % width;
            let y = offset / width;
            let u = x as f32 / fw;
            let v = y as f32 / fh;

            let level = (255.0 * field.sample(u, v)) as u8;
            pixel.copy_from_slice(&[level, level, level, 255]);
        }
    }

    /// Gray level (red channel) at (x, y)
    pub fn gray(&self, x: u32, y: u32) -> u8 {
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.pixels[offset]
    }

    /// Red channel of every pixel in row-major order
    pub fn gray_levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.pixels.chunks_exact(BYTES_PER_PIXEL).map(|pixel| pixel[0])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA8 bytes, ready for a texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy into an `image` buffer
    pub fn to_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            Error::BufferSize {
                expected: self.pixel_count() * BYTES_PER_PIXEL,
                actual: self.pixels.len(),
            },
        )
    }

    /// Save as PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_image()?.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_bitmap_size() {
        let bitmap = Bitmap::new(256, 128);

        assert_eq!(bitmap.as_bytes().len(), 4 * 256 * 128);
        assert_eq!(bitmap.pixel_count(), 256 * 128);
        assert!(bitmap.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_render_noise_writes_opaque_gray() {
        let mut bitmap = Bitmap::new(64, 64);
        let mut rng = StdRng::seed_from_u64(5);
        bitmap.render_noise(&NoiseParams::default(), &mut rng).unwrap();

        for pixel in bitmap.as_bytes().chunks_exact(4) {
            assert_eq!(pixel[0], pixel[1]);
            assert_eq!(pixel[1], pixel[2]);
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_fill_truncates_field_values() {
        let params = NoiseParams::default();
        let mut rng = StdRng::seed_from_u64(9);
        let field = NoiseField::generate(&params, 64, 64, &mut rng).unwrap();

        let mut bitmap = Bitmap::new(64, 64);
        bitmap.fill_from_field(&field);

        for (x, y) in [(0, 0), (17, 3), (63, 63)] {
            let expected = (255.0 * field.value(x, y)) as u8;
            assert_eq!(bitmap.gray(x as u32, y as u32), expected);
        }
    }

    #[test]
    fn test_render_rejects_indivisible_size() {
        let mut bitmap = Bitmap::new(100, 100);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(bitmap.render_noise(&NoiseParams::default(), &mut rng).is_err());
    }

    #[test]
    fn test_from_gray_levels() {
        let bitmap = Bitmap::from_gray_levels(2, 2, &[0, 64, 128, 255]).unwrap();

        assert_eq!(bitmap.gray(1, 0), 64);
        assert_eq!(bitmap.gray(1, 1), 255);
        assert_eq!(bitmap.gray_levels().collect::<Vec<_>>(), vec![0, 64, 128, 255]);
        assert!(Bitmap::from_gray_levels(2, 2, &[0; 3]).is_err());
    }

    #[test]
    fn test_to_image_matches_pixels() {
        let bitmap = Bitmap::from_gray_levels(2, 1, &[10, 20]).unwrap();
        let image = bitmap.to_image().unwrap();

        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(1, 0).0, [20, 20, 20, 255]);
    }
}
