//! PNG scanline filters.
//!
//! Each scanline is prefixed by a filter type byte; reconstruction inverts
//! the predictor with modulo-256 arithmetic. The encode-direction filter is
//! kept for round-trip verification.

/// PNG filter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// No filter.
    None = 0,
    /// Difference from the byte one pixel to the left.
    Sub = 1,
    /// Difference from the byte above.
    Up = 2,
    /// Difference from the mean of left and above.
    Average = 3,
    /// Difference from the Paeth predictor of left, above, above-left.
    Paeth = 4,
}

impl FilterType {
    /// Create from the scanline prefix byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FilterType::None),
            1 => Some(FilterType::Sub),
            2 => Some(FilterType::Up),
            3 => Some(FilterType::Average),
            4 => Some(FilterType::Paeth),
            _ => None,
        }
    }
}

/// Reconstruct a filtered scanline in place.
///
/// `previous` is the already-reconstructed scanline above, absent on the
/// first row. `bpp` is the byte offset to the corresponding byte of the
/// pixel to the left.
pub fn unfilter_row(
    filter: FilterType,
    current: &mut [u8],
    previous: Option<&[u8]>,
    bpp: usize,
) {
    match filter {
        FilterType::None => {}
        FilterType::Sub => {
            for x in bpp..current.len() {
                current[x] = current[x].wrapping_add(current[x - bpp]);
            }
        }
        FilterType::Up => {
            if let Some(prev) = previous {
                for x in 0..current.len() {
                    current[x] = current[x].wrapping_add(prev[x]);
                }
            }
        }
        FilterType::Average => {
            for x in 0..current.len() {
                let a = if x >= bpp { current[x - bpp] as u16 } else { 0 };
                let b = previous.map(|p| p[x] as u16).unwrap_or(0);
                current[x] = current[x].wrapping_add(((a + b) / 2) as u8);
            }
        }
        FilterType::Paeth => {
            for x in 0..current.len() {
                let a = if x >= bpp { current[x - bpp] } else { 0 };
                let b = previous.map(|p| p[x]).unwrap_or(0);
                let c = if x >= bpp {
                    previous.map(|p| p[x - bpp]).unwrap_or(0)
                } else {
                    0
                };
                current[x] = current[x].wrapping_add(paeth_predictor(a, b, c));
            }
        }
    }
}

/// Apply a filter to a scanline (the encoder direction).
pub fn filter_row(
    filter: FilterType,
    current: &[u8],
    previous: Option<&[u8]>,
    bpp: usize,
    output: &mut [u8],
) {
    match filter {
        FilterType::None => output.copy_from_slice(current),
        FilterType::Sub => {
            for x in 0..current.len() {
                let a = if x >= bpp { current[x - bpp] } else { 0 };
                output[x] = current[x].wrapping_sub(a);
            }
        }
        FilterType::Up => {
            for x in 0..current.len() {
                let b = previous.map(|p| p[x]).unwrap_or(0);
                output[x] = current[x].wrapping_sub(b);
            }
        }
        FilterType::Average => {
            for x in 0..current.len() {
                let a = if x >= bpp { current[x - bpp] as u16 } else { 0 };
                let b = previous.map(|p| p[x] as u16).unwrap_or(0);
                output[x] = current[x].wrapping_sub(((a + b) / 2) as u8);
            }
        }
        FilterType::Paeth => {
            for x in 0..current.len() {
                let a = if x >= bpp { current[x - bpp] } else { 0 };
                let b = previous.map(|p| p[x]).unwrap_or(0);
                let c = if x >= bpp {
                    previous.map(|p| p[x - bpp]).unwrap_or(0)
                } else {
                    0
                };
                output[x] = current[x].wrapping_sub(paeth_predictor(a, b, c));
            }
        }
    }
}

/// Paeth predictor: whichever of left, above, above-left lies closest to
/// `a + b - c`. Ties prefer `a`, then `b`.
#[inline]
pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}
