//! End-to-end conversion tests against in-memory PNG fixtures.

use repix_images::inflate::adler32;
use repix_images::png::filter::{filter_row, FilterType};
use repix_images::png::PNG_SIGNATURE;
use repix_images::{convert, CodecError, JpegEncoder, PngDecoder};

/// Serialize one chunk. The CRC field is opaque to the decoder, so it is
/// left zeroed.
fn chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0u8; 4]);
    out
}

fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);
    chunk(b"IHDR", &payload)
}

/// Wrap `raw` in a zlib container using stored DEFLATE blocks.
fn stored_zlib(raw: &[u8]) -> Vec<u8> {
    let mut out = vec![0x78, 0x9C];
    if raw.is_empty() {
        out.extend_from_slice(&[0x01, 0x00, 0x00, 0xFF, 0xFF]);
    } else {
        let mut chunks = raw.chunks(0xFFFF).peekable();
        while let Some(block) = chunks.next() {
            out.push(if chunks.peek().is_none() { 0x01 } else { 0x00 });
            out.extend_from_slice(&(block.len() as u16).to_le_bytes());
            out.extend_from_slice(&(!(block.len() as u16)).to_le_bytes());
            out.extend_from_slice(block);
        }
    }
    out.extend_from_slice(&adler32(raw).to_be_bytes());
    out
}

/// Assemble a complete PNG from already-filtered scanline data.
fn build_png(
    width: u32,
    height: u32,
    color_type: u8,
    palette: Option<&[u8]>,
    filtered: &[u8],
) -> Vec<u8> {
    let mut png = PNG_SIGNATURE.to_vec();
    png.extend(ihdr(width, height, 8, color_type, 0));
    if let Some(p) = palette {
        png.extend(chunk(b"PLTE", p));
    }
    png.extend(chunk(b"IDAT", &stored_zlib(filtered)));
    png.extend(chunk(b"IEND", &[]));
    png
}

/// The entropy-coded bytes between the SOS header and EOI.
fn entropy_segment(jpeg: &[u8]) -> &[u8] {
    let sos = jpeg
        .windows(2)
        .position(|w| w == [0xFF, 0xDA])
        .expect("SOS marker present");
    // Marker, 12-byte segment, then coded data up to EOI.
    &jpeg[sos + 2 + 12..jpeg.len() - 2]
}

#[test]
fn one_red_pixel_converts_to_valid_jpeg() {
    let png = build_png(1, 1, 2, None, &[0, 255, 0, 0]);

    let jpeg = convert(&png, 85).unwrap();
    assert_eq!(&jpeg[0..4], &[0xFF, 0xD8, 0xFF, 0xE0]);
    assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    assert_eq!(&jpeg[6..11], b"JFIF\0");
}

#[test]
fn constant_gray_collapses_to_dc_and_eob() {
    // Every scanline: filter 0 then eight 128s.
    let mut filtered = Vec::new();
    for _ in 0..8 {
        filtered.push(0);
        filtered.extend_from_slice(&[128u8; 8]);
    }
    let png = build_png(8, 8, 0, None, &filtered);

    let mut decoder = PngDecoder::new();
    let image = decoder.decode(&png).unwrap();
    assert!(image.data().iter().all(|&v| v == 128));

    // Three blocks of {DC size-0 code, EOB} fit in exactly two bytes.
    let jpeg = JpegEncoder::new(85).encode(&image);
    assert_eq!(entropy_segment(&jpeg).len(), 2);
}

#[test]
fn indexed_pixels_map_through_palette() {
    let palette = [255, 0, 0, 0, 255, 0, 0, 0, 255];
    let png = build_png(3, 1, 3, Some(&palette), &[0, 0, 1, 2]);

    let mut decoder = PngDecoder::new();
    let image = decoder.decode(&png).unwrap();
    assert_eq!(image.data(), &palette);
}

#[test]
fn out_of_range_palette_index_fails() {
    let palette = [255, 0, 0, 0, 255, 0, 0, 0, 255];
    let png = build_png(3, 1, 3, Some(&palette), &[0, 0, 5, 2]);

    let mut decoder = PngDecoder::new();
    assert!(matches!(
        decoder.decode(&png),
        Err(CodecError::InvalidPaletteIndex { index: 5, entries: 3 })
    ));
}

#[test]
fn dynamic_huffman_block_with_repeat_codes() {
    // A hand-built dynamic block whose code-length declarations exercise
    // the repeat symbols 16, 17, and 18.
    //
    // Literal/length lengths: L[0]=2, L[10..=13]=3, L[256]=2, rest absent.
    // Canonical codes: 0 -> 00, 256 -> 01, 10..=13 -> 100,101,110,111.
    // Code-length alphabet: symbols {0,2,3,16,17,18}, all length 3, coded
    // canonically as 000,001,010,011,100,101.
    let raw: &[u8] = &[0, 10, 11, 12, 0, 10, 11, 12];

    let mut sink = BitSink::default();
    sink.push_bits(1, 1); // BFINAL
    sink.push_bits(2, 2); // BTYPE=10 (dynamic)
    sink.push_bits(0, 5); // HLIT: 257 lit/len lengths
    sink.push_bits(0, 5); // HDIST: 1 distance length
    sink.push_bits(12, 4); // HCLEN: 16 code-length lengths

    // Code-length code lengths in transmission order
    // (16,17,18,0,8,7,9,6,10,5,11,4,12,3,13,2).
    for len in [3, 3, 3, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0, 3] {
        sink.push_bits(len, 3);
    }

    const CL_0: (u32, u8) = (0b000, 3);
    const CL_2: (u32, u8) = (0b001, 3);
    const CL_3: (u32, u8) = (0b010, 3);
    const CL_16: (u32, u8) = (0b011, 3);
    const CL_17: (u32, u8) = (0b100, 3);
    const CL_18: (u32, u8) = (0b101, 3);

    sink.push_code(CL_2); // L[0] = 2
    sink.push_code(CL_17); // 9 zeros (symbols 1..=9)
    sink.push_bits(6, 3);
    sink.push_code(CL_3); // L[10] = 3
    sink.push_code(CL_16); // repeat length 3 for symbols 11..=13
    sink.push_bits(0, 2);
    sink.push_code(CL_18); // 138 zeros (symbols 14..=151)
    sink.push_bits(127, 7);
    sink.push_code(CL_18); // 104 zeros (symbols 152..=255)
    sink.push_bits(93, 7);
    sink.push_code(CL_2); // L[256] = 2
    sink.push_code(CL_0); // single absent distance code

    // "0 10 11 12" twice, then end-of-block.
    for _ in 0..2 {
        sink.push_code((0b00, 2));
        sink.push_code((0b100, 3));
        sink.push_code((0b101, 3));
        sink.push_code((0b110, 3));
    }
    sink.push_code((0b01, 2));
    let deflate = sink.finish();

    let mut idat = vec![0x78, 0x9C];
    idat.extend_from_slice(&deflate);
    idat.extend_from_slice(&adler32(raw).to_be_bytes());

    let mut png = PNG_SIGNATURE.to_vec();
    png.extend(ihdr(3, 2, 8, 0, 0));
    png.extend(chunk(b"IDAT", &idat));
    png.extend(chunk(b"IEND", &[]));

    let mut decoder = PngDecoder::new();
    let image = decoder.decode(&png).unwrap();
    assert_eq!(
        image.data(),
        &[10, 10, 10, 11, 11, 11, 12, 12, 12, 10, 10, 10, 11, 11, 11, 12, 12, 12]
    );
}

#[test]
fn all_five_filter_types_reconstruct() {
    // RGB, 4 pixels wide, five rows, one per filter type.
    let width = 4usize;
    let height = 5usize;
    let bpp = 3usize;
    let scanline = width * bpp;

    let mut raw = Vec::new();
    for y in 0..height {
        for x in 0..scanline {
            raw.push(((y * 41 + x * 17) % 256) as u8);
        }
    }

    let mut filtered = Vec::new();
    for y in 0..height {
        let current = &raw[y * scanline..(y + 1) * scanline];
        let previous = if y > 0 {
            Some(&raw[(y - 1) * scanline..y * scanline])
        } else {
            None
        };
        let filter = FilterType::from_u8(y as u8).unwrap();
        let mut row = vec![0u8; scanline];
        filter_row(filter, current, previous, bpp, &mut row);
        filtered.push(y as u8);
        filtered.extend_from_slice(&row);
    }

    let png = build_png(width as u32, height as u32, 2, None, &filtered);
    let mut decoder = PngDecoder::new();
    let image = decoder.decode(&png).unwrap();
    assert_eq!(image.data(), &raw[..]);
}

#[test]
fn alpha_channels_are_dropped() {
    // 2x1 RGBA: opaque red, transparent green.
    let filtered = [0, 255, 0, 0, 255, 0, 255, 0, 0];
    let png = build_png(2, 1, 6, None, &filtered);

    let mut decoder = PngDecoder::new();
    let image = decoder.decode(&png).unwrap();
    assert_eq!(image.data(), &[255, 0, 0, 0, 255, 0]);

    // 2x1 gray+alpha.
    let filtered = [0, 40, 255, 200, 0];
    let png = build_png(2, 1, 4, None, &filtered);
    let image = decoder.decode(&png).unwrap();
    assert_eq!(image.data(), &[40, 40, 40, 200, 200, 200]);
}

#[test]
fn invalid_signature_is_rejected() {
    let mut png = build_png(1, 1, 0, None, &[0, 77]);
    png[0] ^= 0xFF;

    assert!(matches!(
        convert(&png, 85),
        Err(CodecError::InvalidSignature)
    ));
}

#[test]
fn unsupported_pngs_are_rejected() {
    // 16-bit depth.
    let mut png = PNG_SIGNATURE.to_vec();
    png.extend(ihdr(1, 1, 16, 0, 0));
    png.extend(chunk(b"IEND", &[]));
    let mut decoder = PngDecoder::new();
    assert!(matches!(
        decoder.decode(&png),
        Err(CodecError::UnsupportedPng(_))
    ));

    // Adam7 interlacing.
    let mut png = PNG_SIGNATURE.to_vec();
    png.extend(ihdr(1, 1, 8, 0, 1));
    png.extend(chunk(b"IEND", &[]));
    assert!(matches!(
        decoder.decode(&png),
        Err(CodecError::UnsupportedPng(_))
    ));
}

#[test]
fn truncated_idat_underflows_defilter() {
    // 4x4 grayscale needs 4 * 5 = 20 filtered bytes; provide one row.
    let png = build_png(4, 4, 0, None, &[0, 1, 2, 3, 4]);

    let mut decoder = PngDecoder::new();
    assert!(matches!(
        decoder.decode(&png),
        Err(CodecError::DefilterUnderflow { .. })
    ));
}

#[test]
fn unknown_chunks_are_skipped() {
    let mut png = PNG_SIGNATURE.to_vec();
    png.extend(ihdr(1, 1, 8, 0, 0));
    png.extend(chunk(b"gAMA", &45455u32.to_be_bytes()));
    png.extend(chunk(b"tEXt", b"Comment\0fixture"));
    png.extend(chunk(b"IDAT", &stored_zlib(&[0, 200])));
    png.extend(chunk(b"IEND", &[]));

    let mut decoder = PngDecoder::new();
    let image = decoder.decode(&png).unwrap();
    assert_eq!(image.data(), &[200, 200, 200]);
}

#[test]
fn entropy_segment_has_no_bare_ff() {
    // Noisy content at quality 100 produces a dense entropy segment.
    let width = 16u32;
    let height = 16u32;
    let mut filtered = Vec::new();
    let mut state = 0x2545_F491u32;
    for _ in 0..height {
        filtered.push(0);
        for _ in 0..width * 3 {
            // xorshift keeps the fixture deterministic
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            filtered.push((state >> 24) as u8);
        }
    }
    let png = build_png(width, height, 2, None, &filtered);

    let jpeg = convert(&png, 100).unwrap();
    let scan = entropy_segment(&jpeg);
    assert!(!scan.is_empty());

    let mut i = 0;
    while i < scan.len() {
        if scan[i] == 0xFF {
            assert_eq!(scan[i + 1], 0x00, "bare 0xFF at offset {i}");
            i += 2;
        } else {
            i += 1;
        }
    }
}

#[test]
fn quality_changes_output_size() {
    let width = 16u32;
    let height = 16u32;
    let mut filtered = Vec::new();
    for y in 0..height {
        filtered.push(0);
        for x in 0..width * 3 {
            filtered.push(((x * 7 + y * 31) % 256) as u8);
        }
    }
    let png = build_png(width, height, 2, None, &filtered);

    let low = convert(&png, 10).unwrap();
    let high = convert(&png, 95).unwrap();
    assert!(high.len() > low.len());
}

/// LSB-first bit sink used to assemble DEFLATE test streams.
#[derive(Default)]
struct BitSink {
    bytes: Vec<u8>,
    acc: u32,
    count: u8,
}

impl BitSink {
    /// Append `n` bits LSB-first (header fields, extra bits).
    fn push_bits(&mut self, value: u32, n: u8) {
        for i in 0..n {
            self.acc |= ((value >> i) & 1) << self.count;
            self.count += 1;
            if self.count == 8 {
                self.bytes.push(self.acc as u8);
                self.acc = 0;
                self.count = 0;
            }
        }
    }

    /// Append a Huffman code, most significant bit first.
    fn push_code(&mut self, (code, len): (u32, u8)) {
        for i in (0..len).rev() {
            self.push_bits((code >> i) & 1, 1);
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.count > 0 {
            self.bytes.push(self.acc as u8);
        }
        self.bytes
    }
}
