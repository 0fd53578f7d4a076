//! Baseline JPEG encoder implementation.

use super::dct::forward_dct;
use super::huffman::{
    bit_size, HuffmanEncoder, AC_CHROMINANCE, AC_LUMINANCE, DC_CHROMINANCE, DC_LUMINANCE,
};
use super::{quantization, ZIGZAG};
use crate::image::RgbImage;
use tracing::debug;

/// Baseline JPEG encoder.
///
/// Emits a three-component JFIF 1.1 stream with 4:4:4 sampling, standard
/// Huffman tables and quality-scaled standard quantization tables. Tables
/// are built once per encoder; DC predictors are reset for every image, so
/// one encoder may serve several conversions.
pub struct JpegEncoder {
    quality: u8,
    lum_quant: [u8; 64],
    chr_quant: [u8; 64],
    dc_lum: HuffmanEncoder,
    ac_lum: HuffmanEncoder,
    dc_chr: HuffmanEncoder,
    ac_chr: HuffmanEncoder,
}

impl JpegEncoder {
    /// Create an encoder for a quality setting, clamped to 1..=100.
    pub fn new(quality: u8) -> Self {
        let quality = quality.clamp(1, 100);
        Self {
            quality,
            lum_quant: quantization::scale_table(&quantization::LUMINANCE_50, quality),
            chr_quant: quantization::scale_table(&quantization::CHROMINANCE_50, quality),
            dc_lum: HuffmanEncoder::from_spec(&DC_LUMINANCE),
            ac_lum: HuffmanEncoder::from_spec(&AC_LUMINANCE),
            dc_chr: HuffmanEncoder::from_spec(&DC_CHROMINANCE),
            ac_chr: HuffmanEncoder::from_spec(&AC_CHROMINANCE),
        }
    }

    /// The clamped quality this encoder was built for.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode an RGB image as a baseline JPEG byte stream.
    pub fn encode(&self, image: &RgbImage) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(&[0xFF, 0xD8]); // SOI
        self.write_app0(&mut out);
        self.write_dqt(&mut out);
        self.write_sof0(&mut out, image.width() as u16, image.height() as u16);
        self.write_dht(&mut out);
        self.write_sos(&mut out);
        self.encode_scan(image, &mut out);
        out.extend_from_slice(&[0xFF, 0xD9]); // EOI

        debug!(
            quality = self.quality,
            bytes = out.len(),
            "JPEG stream assembled"
        );

        out
    }

    /// APP0/JFIF 1.1: no density units, 1x1 aspect, no thumbnail.
    fn write_app0(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0xFF, 0xE0]);
        write_u16(out, 16);
        out.extend_from_slice(b"JFIF\0");
        out.extend_from_slice(&[0x01, 0x01]); // version 1.1
        out.push(0x00); // density units
        write_u16(out, 1); // X density
        write_u16(out, 1); // Y density
        out.extend_from_slice(&[0x00, 0x00]); // thumbnail 0x0
    }

    /// Two DQT segments; tables are serialized in zig-zag order.
    fn write_dqt(&self, out: &mut Vec<u8>) {
        for (id, table) in [(0u8, &self.lum_quant), (1u8, &self.chr_quant)] {
            out.extend_from_slice(&[0xFF, 0xDB]);
            write_u16(out, 67);
            out.push(id); // 8-bit precision, table id
            for i in 0..64 {
                out.push(table[ZIGZAG[i]]);
            }
        }
    }

    /// SOF0: baseline, 8-bit precision, three components, 4:4:4.
    fn write_sof0(&self, out: &mut Vec<u8>, width: u16, height: u16) {
        out.extend_from_slice(&[0xFF, 0xC0]);
        write_u16(out, 17);
        out.push(8); // sample precision
        write_u16(out, height);
        write_u16(out, width);
        out.push(3); // component count
        out.extend_from_slice(&[1, 0x11, 0]); // Y: 1x1 sampling, quant table 0
        out.extend_from_slice(&[2, 0x11, 1]); // Cb: 1x1 sampling, quant table 1
        out.extend_from_slice(&[3, 0x11, 1]); // Cr: 1x1 sampling, quant table 1
    }

    /// Four DHT segments: DC-0, DC-1, AC-0, AC-1.
    fn write_dht(&self, out: &mut Vec<u8>) {
        for (class_id, spec) in [
            (0x00u8, &DC_LUMINANCE),
            (0x01, &DC_CHROMINANCE),
            (0x10, &AC_LUMINANCE),
            (0x11, &AC_CHROMINANCE),
        ] {
            out.extend_from_slice(&[0xFF, 0xC4]);
            write_u16(out, (2 + 1 + 16 + spec.values.len()) as u16);
            out.push(class_id);
            out.extend_from_slice(&spec.bits[1..=16]);
            out.extend_from_slice(spec.values);
        }
    }

    /// SOS: three components, full spectral selection, no approximation.
    fn write_sos(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0xFF, 0xDA]);
        write_u16(out, 12);
        out.push(3);
        out.extend_from_slice(&[1, 0x00]); // Y: DC table 0, AC table 0
        out.extend_from_slice(&[2, 0x11]); // Cb: DC table 1, AC table 1
        out.extend_from_slice(&[3, 0x11]); // Cr: DC table 1, AC table 1
        out.extend_from_slice(&[0x00, 0x3F, 0x00]); // Ss=0, Se=63, Ah/Al=0
    }

    /// Entropy-code the image, one Y/Cb/Cr block triple per 8x8 tile.
    fn encode_scan(&self, image: &RgbImage, out: &mut Vec<u8>) {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let rgb = image.data();

        let mut writer = BitWriter::new();
        let mut dc_y = 0i32;
        let mut dc_cb = 0i32;
        let mut dc_cr = 0i32;

        let mut block_y = [0.0f32; 64];
        let mut block_cb = [0.0f32; 64];
        let mut block_cr = [0.0f32; 64];

        for tile_y in (0..height).step_by(8) {
            for tile_x in (0..width).step_by(8) {
                // Edge tiles replicate the last row/column.
                for by in 0..8 {
                    for bx in 0..8 {
                        let py = (tile_y + by).min(height - 1);
                        let px = (tile_x + bx).min(width - 1);
                        let idx = (py * width + px) * 3;

                        let r = rgb[idx] as f32;
                        let g = rgb[idx + 1] as f32;
                        let b = rgb[idx + 2] as f32;

                        // BT.601 conversion, luma level-shifted by -128.
                        let i = by * 8 + bx;
                        block_y[i] = 0.299 * r + 0.587 * g + 0.114 * b - 128.0;
                        block_cb[i] = -0.168736 * r - 0.331264 * g + 0.5 * b;
                        block_cr[i] = 0.5 * r - 0.418688 * g - 0.081312 * b;
                    }
                }

                self.encode_block(&mut block_y, &self.lum_quant, &mut dc_y, &self.dc_lum, &self.ac_lum, &mut writer);
                self.encode_block(&mut block_cb, &self.chr_quant, &mut dc_cb, &self.dc_chr, &self.ac_chr, &mut writer);
                self.encode_block(&mut block_cr, &self.chr_quant, &mut dc_cr, &self.dc_chr, &self.ac_chr, &mut writer);
            }
        }

        writer.flush();
        out.extend_from_slice(&writer.bytes);
    }

    /// DCT, quantize, and entropy-code one 8x8 block.
    fn encode_block(
        &self,
        block: &mut [f32; 64],
        quant: &[u8; 64],
        dc_pred: &mut i32,
        dc_table: &HuffmanEncoder,
        ac_table: &HuffmanEncoder,
        writer: &mut BitWriter,
    ) {
        forward_dct(block);

        // Quantize straight into zig-zag order; the uniform 8 absorbs the
        // AAN output scale collectively.
        let mut coeffs = [0i32; 64];
        for i in 0..64 {
            let natural = ZIGZAG[i];
            let value = block[natural] / (quant[natural] as f32 * 8.0);
            coeffs[i] = if value >= 0.0 {
                (value + 0.5) as i32
            } else {
                (value - 0.5) as i32
            };
        }

        // DC: differential against the previous block of this component.
        let diff = coeffs[0] - *dc_pred;
        *dc_pred = coeffs[0];

        let size = bit_size(diff);
        let (code, len) = dc_table.encode(size);
        writer.write_bits(code as u32, len);
        if size > 0 {
            writer.write_magnitude(diff, size);
        }

        // AC: run-length coded with ZRL for 16-zero spans and a final EOB.
        let mut zero_run = 0u8;
        for i in 1..64 {
            let coeff = coeffs[i];
            if coeff == 0 {
                zero_run += 1;
                continue;
            }

            while zero_run >= 16 {
                let (code, len) = ac_table.encode(0xF0);
                writer.write_bits(code as u32, len);
                zero_run -= 16;
            }

            let size = bit_size(coeff);
            let (code, len) = ac_table.encode((zero_run << 4) | size);
            writer.write_bits(code as u32, len);
            writer.write_magnitude(coeff, size);

            zero_run = 0;
        }

        if zero_run > 0 {
            let (code, len) = ac_table.encode(0x00);
            writer.write_bits(code as u32, len);
        }
    }
}

/// Append a big-endian u16 (segment lengths, dimensions, densities).
fn write_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// MSB-first bit packer with 0xFF byte stuffing.
struct BitWriter {
    bytes: Vec<u8>,
    bit_buffer: u32,
    bit_count: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append `count` bits, most significant first.
    fn write_bits(&mut self, value: u32, count: u8) {
        if count == 0 {
            return;
        }

        self.bit_buffer = (self.bit_buffer << count) | (value & ((1u32 << count) - 1));
        self.bit_count += count as u32;

        while self.bit_count >= 8 {
            self.bit_count -= 8;
            let byte = ((self.bit_buffer >> self.bit_count) & 0xFF) as u8;
            self.bytes.push(byte);
            if byte == 0xFF {
                self.bytes.push(0x00);
            }
        }
    }

    /// Append the signed-magnitude bits of a coefficient. Negative values
    /// are emitted as `(value - 1)` masked to `size` bits, per T.81.
    fn write_magnitude(&mut self, value: i32, size: u8) {
        let bits = if value < 0 { value - 1 } else { value };
        self.write_bits((bits & ((1i32 << size) - 1)) as u32, size);
    }

    /// Pad any residual bits with ones to a byte boundary.
    fn flush(&mut self) {
        if self.bit_count > 0 {
            let pad = 8 - self.bit_count as u8;
            self.write_bits((1u32 << pad) - 1, pad);
        }
    }
}
