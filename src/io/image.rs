//! PNG loading into the flat RGBA buffer the pipeline reads

use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::io::error::{Result, TraceError};

/// A decoded raster image owning its RGBA bytes
#[derive(Debug, Clone)]
pub struct LoadedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl LoadedImage {
    /// Decode a PNG file into an owned RGBA byte buffer
    ///
    /// Any source color type is converted to 8-bit RGBA.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or decoded.
    pub fn from_png_path(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| TraceError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let width = rgba.width() as usize;
        let height = rgba.height() as usize;
        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Build an image from raw RGBA bytes
    ///
    /// # Errors
    ///
    /// Returns an error when the byte length does not match the dimensions.
    pub fn from_rgba_bytes(data: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        // Validate eagerly so the stored buffer is always consistent
        PixelBuffer::new(&data, width, height)?;
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

    /// Borrow the image as the pipeline's read-only pixel view
    ///
    /// # Errors
    ///
    /// Returns an error when the stored buffer is inconsistent, which
    /// cannot happen for images built through the constructors.
    pub fn as_buffer(&self) -> Result<PixelBuffer<'_>> {
        PixelBuffer::new(&self.data, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::LoadedImage;

    #[test]
    fn test_from_rgba_bytes_validates_length() {
        assert!(LoadedImage::from_rgba_bytes(vec![0; 16], 2, 2).is_ok());
        assert!(LoadedImage::from_rgba_bytes(vec![0; 15], 2, 2).is_err());
    }

    #[test]
    fn test_as_buffer_exposes_dimensions() {
        let image = LoadedImage::from_rgba_bytes(vec![255; 32], 4, 2).unwrap();
        let buffer = image.as_buffer().unwrap();
        assert_eq!(buffer.width(), 4);
        assert_eq!(buffer.height(), 2);
    }
}
