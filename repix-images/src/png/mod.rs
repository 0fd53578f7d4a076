//! PNG image decoding.
//!
//! Supports non-interlaced, 8-bit-per-sample PNGs in all five color types
//! (grayscale, RGB, indexed, grayscale+alpha, RGBA). Decoded output is
//! always packed 8-bit RGB; alpha channels are dropped.

mod decoder;
pub mod filter;

pub use decoder::{PngDecoder, PngHeader};

use byteorder::{BigEndian, ByteOrder};

/// PNG signature bytes.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// PNG color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    /// Grayscale.
    Grayscale = 0,
    /// RGB.
    Rgb = 2,
    /// Indexed color.
    Indexed = 3,
    /// Grayscale with alpha.
    GrayscaleAlpha = 4,
    /// RGBA.
    Rgba = 6,
}

impl ColorType {
    /// Create color type from its IHDR value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ColorType::Grayscale),
            2 => Some(ColorType::Rgb),
            3 => Some(ColorType::Indexed),
            4 => Some(ColorType::GrayscaleAlpha),
            6 => Some(ColorType::Rgba),
            _ => None,
        }
    }

    /// Samples per pixel. At bit depth 8 this is also bytes per pixel.
    pub fn channels(&self) -> usize {
        match self {
            ColorType::Grayscale | ColorType::Indexed => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }
}

/// PNG chunk type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkType([u8; 4]);

impl ChunkType {
    /// IHDR - image header.
    pub const IHDR: Self = Self(*b"IHDR");
    /// PLTE - palette.
    pub const PLTE: Self = Self(*b"PLTE");
    /// IDAT - image data.
    pub const IDAT: Self = Self(*b"IDAT");
    /// IEND - image trailer.
    pub const IEND: Self = Self(*b"IEND");

    /// Create from the four type bytes of a chunk header.
    pub fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Read a big-endian u32 from the start of `data`.
#[inline]
pub(crate) fn read_u32_be(data: &[u8]) -> u32 {
    BigEndian::read_u32(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_type() {
        assert_eq!(ColorType::from_u8(0), Some(ColorType::Grayscale));
        assert_eq!(ColorType::from_u8(3), Some(ColorType::Indexed));
        assert_eq!(ColorType::from_u8(6), Some(ColorType::Rgba));
        assert_eq!(ColorType::from_u8(1), None);
        assert_eq!(ColorType::from_u8(5), None);

        assert_eq!(ColorType::Grayscale.channels(), 1);
        assert_eq!(ColorType::GrayscaleAlpha.channels(), 2);
        assert_eq!(ColorType::Rgba.channels(), 4);
    }

    #[test]
    fn test_chunk_type_display() {
        assert_eq!(format!("{}", ChunkType::IHDR), "IHDR");
        assert_eq!(format!("{}", ChunkType::IDAT), "IDAT");
    }
}
