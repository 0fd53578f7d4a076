//! Codec error types.

use thiserror::Error;

/// Errors produced by the PNG decode pipeline.
///
/// JPEG encoding has no runtime failure modes once a valid RGB buffer and
/// positive dimensions exist, so no encode-side variants are needed.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The first eight bytes are not the PNG signature.
    #[error("invalid PNG signature")]
    InvalidSignature,

    /// A chunk header or payload is structurally invalid.
    #[error("malformed chunk: {0}")]
    MalformedChunk(String),

    /// The image uses a PNG feature outside the supported subset.
    #[error("unsupported PNG: {0}")]
    UnsupportedPng(String),

    /// The concatenated IDAT stream is not a usable zlib container.
    #[error("malformed IDAT stream: {0}")]
    MalformedIdat(String),

    /// The compressed stream ended mid-read.
    #[error("truncated input: unexpected end of compressed data")]
    TruncatedInput,

    /// A DEFLATE block header carried the reserved block type.
    #[error("invalid DEFLATE block type {0}")]
    InvalidBlockType(u32),

    /// A Huffman bit path left the code table.
    #[error("invalid Huffman code")]
    InvalidCode,

    /// A decoded symbol has no meaning at this point in the stream.
    #[error("invalid symbol {0} in compressed stream")]
    InvalidSymbol(u16),

    /// The inflated stream is shorter than the filtered image requires.
    #[error("defilter underflow: expected {expected} bytes, got {actual}")]
    DefilterUnderflow {
        /// Bytes the filtered image needs: `height * (1 + scanline_bytes)`.
        expected: usize,
        /// Bytes the inflater actually produced.
        actual: usize,
    },

    /// An indexed pixel referenced an entry past the end of the palette.
    #[error("palette index {index} out of range for {entries} entries")]
    InvalidPaletteIndex {
        /// The out-of-range index.
        index: u8,
        /// Number of palette entries present.
        entries: usize,
    },

    /// Width or height is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// A pixel buffer does not match the dimensions it was paired with.
    #[error("buffer mismatch: expected {expected} bytes, got {actual}")]
    BufferMismatch {
        /// Bytes the dimensions imply.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// File open/read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Codec result type.
pub type Result<T> = std::result::Result<T, CodecError>;
