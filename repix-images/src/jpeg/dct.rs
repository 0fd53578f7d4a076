//! Forward DCT for JPEG encoding.
//!
//! Scaled-output AAN (Arai-Agui-Nakajima) 8-point DCT applied as a row
//! pass then a column pass. Outputs carry the AAN scale factors; the
//! encoder folds a uniform 1/8 into its quantization divisor rather than
//! the exact per-coefficient factors.

/// cos(4π/16) = 1/√2
const C4: f32 = 0.707106781;
/// cos(6π/16)
const C6: f32 = 0.382683433;
/// √2·cos(6π/16)
const R2C6: f32 = 0.541196100;
/// √2·cos(2π/16)
const R2C2: f32 = 1.306562965;

/// Transform one 8×8 block in place, rows first, then columns.
pub fn forward_dct(block: &mut [f32; 64]) {
    for row in 0..8 {
        dct_1d(block, row * 8, 1);
    }
    for col in 0..8 {
        dct_1d(block, col, 8);
    }
}

/// One 8-point AAN pass over elements `start, start+stride, ..`.
fn dct_1d(block: &mut [f32; 64], start: usize, stride: usize) {
    let at = |i: usize| start + i * stride;

    let tmp0 = block[at(0)] + block[at(7)];
    let tmp7 = block[at(0)] - block[at(7)];
    let tmp1 = block[at(1)] + block[at(6)];
    let tmp6 = block[at(1)] - block[at(6)];
    let tmp2 = block[at(2)] + block[at(5)];
    let tmp5 = block[at(2)] - block[at(5)];
    let tmp3 = block[at(3)] + block[at(4)];
    let tmp4 = block[at(3)] - block[at(4)];

    // Even part
    let tmp10 = tmp0 + tmp3;
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    block[at(0)] = tmp10 + tmp11;
    block[at(4)] = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * C4;
    block[at(2)] = tmp13 + z1;
    block[at(6)] = tmp13 - z1;

    // Odd part
    let tmp10 = tmp4 + tmp5;
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    let z5 = (tmp10 - tmp12) * C6;
    let z2 = R2C6 * tmp10 + z5;
    let z4 = R2C2 * tmp12 + z5;
    let z3 = tmp11 * C4;

    let z11 = tmp7 + z3;
    let z13 = tmp7 - z3;

    block[at(5)] = z13 + z2;
    block[at(3)] = z13 - z2;
    block[at(1)] = z11 + z4;
    block[at(7)] = z11 - z4;
}
