//! Core image buffer type.

use crate::error::{CodecError, Result};

/// Packed interleaved 8-bit RGB image.
///
/// The buffer holds exactly `3 * width * height` bytes in R, G, B order,
/// row-major with no padding.
#[derive(Debug, Clone)]
pub struct RgbImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbImage {
    /// Create an image from packed RGB bytes.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(CodecError::BufferMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed RGB pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb() {
        let img = RgbImage::from_rgb(2, 2, vec![0u8; 12]).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        assert_eq!(img.data().len(), 12);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let result = RgbImage::from_rgb(0, 4, vec![]);
        assert!(matches!(
            result,
            Err(CodecError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_buffer_mismatch_rejected() {
        let result = RgbImage::from_rgb(2, 2, vec![0u8; 11]);
        assert!(matches!(result, Err(CodecError::BufferMismatch { .. })));
    }
}
