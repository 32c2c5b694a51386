//! Borrowed, read-only RGBA pixel buffers

use crate::color::rgba::Rgba;
use crate::io::error::{Result, invalid_parameter};

/// Read-only view over a decoded raster: row-major RGBA bytes, four per pixel
///
/// The byte slice stays owned by the caller; the pipeline only ever reads it.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap a raw RGBA byte slice with its pixel dimensions
    ///
    /// # Errors
    ///
    /// Returns an invalid-parameter error if the slice length is not
    /// `width * height * 4`.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(invalid_parameter(
                "buffer",
                &data.len(),
                &format!("expected {expected} bytes for {width}x{height} RGBA"),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Color at pixel coordinates, `None` outside the raster
    pub fn color_at(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        self.data.get(offset..offset + 4).map(Rgba::from_bytes)
    }

    /// Iterate all pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + 'a {
        self.data.chunks_exact(4).map(Rgba::from_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::PixelBuffer;

    #[test]
    fn test_rejects_mismatched_length() {
        let bytes = [0u8; 12];
        assert!(PixelBuffer::new(&bytes, 2, 2).is_err());
        assert!(PixelBuffer::new(&bytes, 3, 1).is_ok());
    }

    #[test]
    fn test_color_at_reads_row_major() {
        let bytes = [
            1, 2, 3, 255, 4, 5, 6, 255, //
            7, 8, 9, 255, 10, 11, 12, 255,
        ];
        let buffer = PixelBuffer::new(&bytes, 2, 2).unwrap();
        let bottom_left = buffer.color_at(0, 1).unwrap();
        assert_eq!((bottom_left.red, bottom_left.green), (7, 8));
        assert!(buffer.color_at(2, 0).is_none());
    }
}
