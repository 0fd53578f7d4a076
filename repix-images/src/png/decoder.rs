//! PNG decoder implementation.

use super::filter::{unfilter_row, FilterType};
use super::{read_u32_be, ChunkType, ColorType, PNG_SIGNATURE};
use crate::error::{CodecError, Result};
use crate::image::RgbImage;
use crate::inflate::zlib_decompress;
use tracing::debug;

/// Parsed IHDR fields.
#[derive(Debug, Clone)]
pub struct PngHeader {
    /// Image width.
    pub width: u32,
    /// Image height.
    pub height: u32,
    /// Bits per sample. Only 8 is accepted.
    pub bit_depth: u8,
    /// Color type.
    pub color_type: ColorType,
}

impl PngHeader {
    /// Bytes per pixel at the accepted bit depth.
    fn bytes_per_pixel(&self) -> usize {
        self.color_type.channels()
    }

    /// Bytes per scanline, excluding the filter prefix byte.
    fn scanline_bytes(&self) -> usize {
        (self.width as usize * self.bytes_per_pixel() * self.bit_depth as usize).div_ceil(8)
    }
}

/// PNG decoder.
///
/// One decoder instance serves one conversion; `decode` resets all
/// accumulated state before parsing.
pub struct PngDecoder {
    header: Option<PngHeader>,
    palette: Vec<u8>,
    compressed: Vec<u8>,
}

impl PngDecoder {
    /// Create a new PNG decoder.
    pub fn new() -> Self {
        Self {
            header: None,
            palette: Vec::new(),
            compressed: Vec::new(),
        }
    }

    /// Parsed header of the last decoded image.
    pub fn header(&self) -> Option<&PngHeader> {
        self.header.as_ref()
    }

    /// Decode a PNG byte stream into packed RGB.
    pub fn decode(&mut self, data: &[u8]) -> Result<RgbImage> {
        if data.len() < 8 || data[0..8] != PNG_SIGNATURE {
            return Err(CodecError::InvalidSignature);
        }

        self.header = None;
        self.palette.clear();
        self.compressed.clear();

        self.parse_chunks(&data[8..])?;

        let header = self
            .header
            .as_ref()
            .ok_or_else(|| CodecError::MalformedChunk("missing IHDR".into()))?;

        let inflated = zlib_decompress(&self.compressed)?;
        let raw = defilter(&inflated, header)?;
        let rgb = self.to_rgb(&raw, header)?;

        debug!(
            width = header.width,
            height = header.height,
            color_type = ?header.color_type,
            "PNG decoded"
        );

        RgbImage::from_rgb(header.width, header.height, rgb)
    }

    /// Walk the chunk sequence after the signature.
    fn parse_chunks(&mut self, mut data: &[u8]) -> Result<()> {
        let mut first = true;

        while data.len() >= 12 {
            let length = read_u32_be(&data[0..4]) as usize;
            let chunk_type = ChunkType::new([data[4], data[5], data[6], data[7]]);

            if data.len() < 12 + length {
                return Err(CodecError::MalformedChunk(format!(
                    "truncated {chunk_type} chunk"
                )));
            }

            if first && chunk_type != ChunkType::IHDR {
                return Err(CodecError::MalformedChunk(format!(
                    "first chunk is {chunk_type}, expected IHDR"
                )));
            }
            first = false;

            let payload = &data[8..8 + length];
            // The trailing 4-byte CRC is treated as opaque.

            if chunk_type == ChunkType::IHDR {
                self.parse_ihdr(payload)?;
            } else if chunk_type == ChunkType::PLTE {
                if !length.is_multiple_of(3) {
                    return Err(CodecError::MalformedChunk(format!(
                        "PLTE length {length} not divisible by 3"
                    )));
                }
                self.palette = payload.to_vec();
            } else if chunk_type == ChunkType::IDAT {
                self.compressed.extend_from_slice(payload);
            } else if chunk_type == ChunkType::IEND {
                break;
            }
            // Any other chunk, ancillary or unknown, is skipped.

            data = &data[12 + length..];
        }

        Ok(())
    }

    /// Parse and validate the IHDR payload.
    fn parse_ihdr(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != 13 {
            return Err(CodecError::MalformedChunk(format!(
                "IHDR length {} is not 13",
                data.len()
            )));
        }

        let width = read_u32_be(&data[0..4]);
        let height = read_u32_be(&data[4..8]);
        let bit_depth = data[8];
        let color_type = ColorType::from_u8(data[9])
            .ok_or_else(|| CodecError::UnsupportedPng(format!("color type {}", data[9])))?;
        let compression = data[10];
        let filter = data[11];
        let interlace = data[12];

        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions { width, height });
        }
        if bit_depth != 8 {
            return Err(CodecError::UnsupportedPng(format!(
                "bit depth {bit_depth}"
            )));
        }
        if compression != 0 {
            return Err(CodecError::UnsupportedPng(format!(
                "compression method {compression}"
            )));
        }
        if filter != 0 {
            return Err(CodecError::UnsupportedPng(format!(
                "filter method {filter}"
            )));
        }
        if interlace != 0 {
            return Err(CodecError::UnsupportedPng("interlaced image".into()));
        }

        self.header = Some(PngHeader {
            width,
            height,
            bit_depth,
            color_type,
        });

        Ok(())
    }

    /// Convert the defiltered byte matrix to packed RGB.
    fn to_rgb(&self, raw: &[u8], header: &PngHeader) -> Result<Vec<u8>> {
        let pixels = header.width as usize * header.height as usize;
        let mut rgb = Vec::with_capacity(pixels * 3);

        match header.color_type {
            ColorType::Grayscale => {
                for &v in raw {
                    rgb.extend_from_slice(&[v, v, v]);
                }
            }
            ColorType::Rgb => rgb.extend_from_slice(raw),
            ColorType::Indexed => {
                let entries = self.palette.len() / 3;
                for &idx in raw {
                    let base = idx as usize * 3;
                    if base + 3 > self.palette.len() {
                        return Err(CodecError::InvalidPaletteIndex {
                            index: idx,
                            entries,
                        });
                    }
                    rgb.extend_from_slice(&self.palette[base..base + 3]);
                }
            }
            ColorType::GrayscaleAlpha => {
                for pair in raw.chunks_exact(2) {
                    rgb.extend_from_slice(&[pair[0], pair[0], pair[0]]);
                }
            }
            ColorType::Rgba => {
                for quad in raw.chunks_exact(4) {
                    rgb.extend_from_slice(&quad[0..3]);
                }
            }
        }

        Ok(rgb)
    }
}

impl Default for PngDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconstruct raw pixel bytes from the inflated, filtered stream.
fn defilter(inflated: &[u8], header: &PngHeader) -> Result<Vec<u8>> {
    let scanline = header.scanline_bytes();
    let height = header.height as usize;
    let bpp = header.bytes_per_pixel();

    let expected = height * (1 + scanline);
    if inflated.len() < expected {
        return Err(CodecError::DefilterUnderflow {
            expected,
            actual: inflated.len(),
        });
    }

    let mut output = vec![0u8; height * scanline];

    for y in 0..height {
        let src = y * (1 + scanline);
        let filter = FilterType::from_u8(inflated[src]).ok_or_else(|| {
            CodecError::MalformedIdat(format!("unknown scanline filter {}", inflated[src]))
        })?;

        let row_start = y * scanline;
        let (done, rest) = output.split_at_mut(row_start);
        let current = &mut rest[..scanline];
        current.copy_from_slice(&inflated[src + 1..src + 1 + scanline]);

        let previous = if y > 0 {
            Some(&done[row_start - scanline..])
        } else {
            None
        };
        unfilter_row(filter, current, previous, bpp);
    }

    Ok(output)
}
