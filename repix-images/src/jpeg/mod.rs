//! Baseline JPEG encoding.
//!
//! Emits sequential-DCT baseline streams (ITU T.81) inside a JFIF 1.1
//! envelope, with 4:4:4 sampling, the standard Annex K Huffman tables, and
//! quality-scaled standard quantization tables.

mod dct;
mod encoder;
mod huffman;

pub use encoder::JpegEncoder;

/// Zig-zag scan order: `ZIGZAG[i]` is the natural (row-major) index of
/// zig-zag position `i`.
pub const ZIGZAG: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10,
    17, 24, 32, 25, 18, 11, 4, 5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6, 7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Standard JPEG quantization tables and quality scaling.
pub mod quantization {
    /// Luminance quantization table (Annex K.1, quality 50).
    pub const LUMINANCE_50: [u8; 64] = [
        16, 11, 10, 16, 24, 40, 51, 61,
        12, 12, 14, 19, 26, 58, 60, 55,
        14, 13, 16, 24, 40, 57, 69, 56,
        14, 17, 22, 29, 51, 87, 80, 62,
        18, 22, 37, 56, 68, 109, 103, 77,
        24, 35, 55, 64, 81, 104, 113, 92,
        49, 64, 78, 87, 103, 121, 120, 101,
        72, 92, 95, 98, 112, 100, 103, 99,
    ];

    /// Chrominance quantization table (Annex K.1, quality 50).
    pub const CHROMINANCE_50: [u8; 64] = [
        17, 18, 24, 47, 99, 99, 99, 99,
        18, 21, 26, 66, 99, 99, 99, 99,
        24, 26, 56, 99, 99, 99, 99, 99,
        47, 66, 99, 99, 99, 99, 99, 99,
        99, 99, 99, 99, 99, 99, 99, 99,
        99, 99, 99, 99, 99, 99, 99, 99,
        99, 99, 99, 99, 99, 99, 99, 99,
        99, 99, 99, 99, 99, 99, 99, 99,
    ];

    /// Scale a base table for a quality setting of 1..=100.
    pub fn scale_table(table: &[u8; 64], quality: u8) -> [u8; 64] {
        let quality = quality.clamp(1, 100) as u32;
        let scale = if quality < 50 {
            5000 / quality
        } else {
            200 - quality * 2
        };

        let mut result = [0u8; 64];
        for i in 0..64 {
            result[i] = ((table[i] as u32 * scale + 50) / 100).clamp(1, 255) as u8;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_is_permutation() {
        let mut seen = [false; 64];
        for &idx in &ZIGZAG {
            assert!(!seen[idx]);
            seen[idx] = true;
        }
        assert_eq!(ZIGZAG[0], 0);
        assert_eq!(ZIGZAG[1], 1);
        assert_eq!(ZIGZAG[2], 8);
        assert_eq!(ZIGZAG[63], 63);
    }

    #[test]
    fn test_quality_scaling() {
        // Quality 50 leaves the base table unchanged.
        let t = quantization::scale_table(&quantization::LUMINANCE_50, 50);
        assert_eq!(t, quantization::LUMINANCE_50);

        // Higher quality lowers divisors, lower quality raises them.
        let hi = quantization::scale_table(&quantization::LUMINANCE_50, 90);
        let lo = quantization::scale_table(&quantization::LUMINANCE_50, 10);
        assert!(hi[0] < quantization::LUMINANCE_50[0]);
        assert!(lo[0] > quantization::LUMINANCE_50[0]);
    }

    #[test]
    fn test_quality_100_floors_at_one() {
        let t = quantization::scale_table(&quantization::LUMINANCE_50, 100);
        assert!(t.iter().all(|&v| v == 1));
    }

    #[test]
    fn test_quality_bounds() {
        // Out-of-range inputs are clamped, never divide by zero.
        let t = quantization::scale_table(&quantization::LUMINANCE_50, 0);
        assert!(t.iter().all(|&v| v >= 1));
        let t = quantization::scale_table(&quantization::CHROMINANCE_50, 255);
        assert!(t.iter().all(|&v| (1..=255).contains(&v)));
    }
}
