//! The CPU-side framebuffer.  Row-major, one `Rgb` per pixel, and its
//! length is fixed when it is allocated.

use crate::color::Rgb;
use crate::planes::Pixel;

/// A fixed-size, row-major buffer of RGB pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Allocates a `width` x `height` buffer of black pixels.
    pub fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            pixels: vec![Rgb::BLACK; width * height],
            width,
            height,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels in the buffer.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True only for a buffer with a zero dimension.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The color at a pixel.  Panics if the pixel lies outside the buffer.
    pub fn get(&self, pixel: Pixel) -> Rgb {
        self.pixels[self.index(pixel)]
    }

    /// Paints a single pixel.  Panics if the pixel lies outside the buffer.
    pub fn set(&mut self, pixel: Pixel, color: Rgb) {
        let i = self.index(pixel);
        self.pixels[i] = color;
    }

    /// Paints every pixel the same color.
    pub fn fill_with(&mut self, color: Rgb) {
        for p in self.pixels.iter_mut() {
            *p = color;
        }
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// All pixels, row-major and mutable.  The slice can be written
    /// through but never resized.
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// The buffer packed as `RGBRGB...` bytes, ready for an encoder
    /// or a texture upload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &Rgb(r, g, b) in &self.pixels {
            bytes.extend_from_slice(&[r, g, b]);
        }
        bytes
    }

    fn index(&self, pixel: Pixel) -> usize {
        assert!(
            pixel.0 < self.width && pixel.1 < self.height,
            "pixel {:?} outside {}x{} buffer",
            pixel,
            self.width,
            self.height
        );
        pixel.1 * self.width + pixel.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffers_are_black() {
        let buffer = PixelBuffer::new(3, 2);
        assert_eq!(buffer.len(), 6);
        assert!(buffer.pixels().iter().all(|&p| p == Rgb::BLACK));
    }

    #[test]
    fn set_and_get_are_row_major() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set(Pixel(2, 1), Rgb(9, 8, 7));
        assert_eq!(buffer.get(Pixel(2, 1)), Rgb(9, 8, 7));
        assert_eq!(buffer.pixels()[5], Rgb(9, 8, 7));
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_pixels_panic() {
        let buffer = PixelBuffer::new(3, 2);
        buffer.get(Pixel(3, 0));
    }

    #[test]
    fn bytes_are_packed_rgb() {
        let mut buffer = PixelBuffer::new(2, 1);
        buffer.set(Pixel(0, 0), Rgb(1, 2, 3));
        buffer.set(Pixel(1, 0), Rgb(4, 5, 6));
        assert_eq!(buffer.to_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn fill_with_keeps_the_length() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.fill_with(Rgb(1, 1, 1));
        assert_eq!(buffer.len(), 16);
        assert!(buffer.pixels().iter().all(|&p| p == Rgb(1, 1, 1)));
    }
}
