// Allow common patterns in codec/DSP code
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

//! PNG decoding and baseline JPEG encoding.
//!
//! This crate turns a still image in the PNG container into a
//! self-contained JFIF/JPEG byte stream at a chosen quality:
//!
//! - PNG decoding: chunk parsing, DEFLATE decompression of the zlib-wrapped
//!   `IDAT` stream, scanline defiltering, and conversion of every supported
//!   color type to packed 8-bit RGB.
//! - JPEG encoding: forward DCT, quality-scaled quantization, and
//!   Huffman entropy coding with standard tables, emitted as a baseline
//!   JFIF 1.1 stream with 4:4:4 sampling.
//!
//! Only 8-bit, non-interlaced PNGs are accepted; alpha channels are dropped.
//!
//! ## Example
//!
//! ```no_run
//! # let png_data: Vec<u8> = vec![];
//! let jpeg = repix_images::convert(&png_data, 85)?;
//! # Ok::<(), repix_images::CodecError>(())
//! ```

#![warn(missing_docs)]

mod error;
mod image;

pub mod inflate;
pub mod jpeg;
pub mod png;

pub use error::{CodecError, Result};
pub use image::RgbImage;
pub use jpeg::JpegEncoder;
pub use png::{PngDecoder, PngHeader};

/// Decode a PNG byte stream and re-encode it as a baseline JPEG.
///
/// `quality` is clamped to 1..=100. Decoding errors surface as
/// [`CodecError`]; encoding cannot fail once a valid RGB buffer exists.
pub fn convert(png_data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let mut decoder = PngDecoder::new();
    let image = decoder.decode(png_data)?;
    Ok(JpegEncoder::new(quality).encode(&image))
}
