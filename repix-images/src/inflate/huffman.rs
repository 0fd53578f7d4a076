//! Canonical Huffman decoding for DEFLATE alphabets.

use super::bits::BitReader;
use crate::error::{CodecError, Result};

/// DEFLATE codes never exceed 15 bits.
const MAX_BITS: usize = 15;

/// Canonical Huffman decoder built from an array of code lengths.
///
/// Codes are assigned per RFC 1951 §3.2.2: shorter codes sort first, and
/// codes of equal length are consecutive in symbol order. Instead of a node
/// trie, the decoder keeps one `(first_code, first_index, count)` triple per
/// code length plus a flat symbol array, so decoding needs one comparison
/// per bit and no allocation.
///
/// An all-zero length array builds an empty decoder that fails every decode.
#[derive(Debug, Clone)]
pub struct HuffmanDecoder {
    first_code: [u32; MAX_BITS + 1],
    first_index: [usize; MAX_BITS + 1],
    counts: [u16; MAX_BITS + 1],
    symbols: Vec<u16>,
}

impl HuffmanDecoder {
    /// Build a decoder from per-symbol code lengths. A length of zero means
    /// the symbol is absent.
    pub fn from_lengths(lengths: &[u8]) -> Self {
        let mut counts = [0u16; MAX_BITS + 1];
        for &len in lengths {
            counts[len as usize] += 1;
        }
        counts[0] = 0;

        // First canonical code and first symbol slot of each length.
        let mut first_code = [0u32; MAX_BITS + 1];
        let mut first_index = [0usize; MAX_BITS + 1];
        let mut code = 0u32;
        let mut index = 0usize;
        for bits in 1..=MAX_BITS {
            code = (code + counts[bits - 1] as u32) << 1;
            first_code[bits] = code;
            first_index[bits] = index;
            index += counts[bits] as usize;
        }

        let mut next_index = first_index;
        let mut symbols = vec![0u16; index];
        for (sym, &len) in lengths.iter().enumerate() {
            if len > 0 {
                symbols[next_index[len as usize]] = sym as u16;
                next_index[len as usize] += 1;
            }
        }

        Self {
            first_code,
            first_index,
            counts,
            symbols,
        }
    }

    /// Decode one symbol, reading one bit per code level.
    ///
    /// Each new bit extends the accumulated code at the least significant
    /// end, which walks the canonical tree root-first. A path that leaves
    /// the table fails with `InvalidCode`.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut code = 0u32;
        for bits in 1..=MAX_BITS {
            code = (code << 1) | reader.read_bit()?;

            let count = self.counts[bits] as u32;
            let offset = code.wrapping_sub(self.first_code[bits]);
            if offset < count {
                return Ok(self.symbols[self.first_index[bits] + offset as usize]);
            }
        }

        Err(CodecError::InvalidCode)
    }
}
