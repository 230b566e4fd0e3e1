//! Baseline JPEG encoder.
//!
//! Implements baseline sequential DCT encoding (SOF0) with fixed Annex K
//! Huffman tables, 4:4:4 per-block color, and three quality tiers that
//! select the quantization matrices. The segment sequence is fixed: SOI,
//! APP0/JFIF, a comment, two quantization tables, the frame header, four
//! Huffman tables, the scan header, entropy-coded data, EOI.

pub mod dct;
pub mod huffman;
pub mod quantize;

use crate::bits::{BitWriterMsb, ByteSink, SliceSink, StagedWriter};
use crate::color::{extract_block, PixelFormat};
use crate::error::{Error, Result};

use dct::forward_dct_8x8;
use huffman::{encode_block, HuffmanSpec, HuffmanTables, CHROMA_AC, CHROMA_DC, LUMA_AC, LUMA_DC};
use quantize::{quantize_block, QuantizationTables};

/// Maximum supported image dimension for JPEG.
const MAX_DIMENSION: u32 = 65535;

/// JPEG markers.
const SOI: u16 = 0xFFD8; // Start of Image
const EOI: u16 = 0xFFD9; // End of Image
const APP0: u16 = 0xFFE0; // JFIF marker
const COM: u16 = 0xFFFE; // Comment
const DQT: u16 = 0xFFDB; // Define Quantization Table
const SOF0: u16 = 0xFFC0; // Start of Frame (baseline DCT)
const DHT: u16 = 0xFFC4; // Define Huffman Table
const SOS: u16 = 0xFFDA; // Start of Scan

/// Comment segment payload.
const COMMENT: &[u8] = b"Created by Tiny JPEG Encoder";

/// Encode raw pixel data as JPEG.
///
/// # Arguments
///
/// * `data` - Raw pixel data (row-major order)
/// * `options` - Encoding options (dimensions, pixel format, quality tier)
///
/// # Returns
///
/// Complete JPEG file as bytes.
///
/// # Example
///
/// ```rust
/// use snapjpeg::jpeg::{encode, JpegOptions};
/// use snapjpeg::PixelFormat;
///
/// let pixels = vec![255, 0, 0]; // 1x1 RGB red pixel
/// let options = JpegOptions::builder(1, 1)
///     .pixel_format(PixelFormat::Rgb888)
///     .quality(1)
///     .build();
/// let jpeg_bytes = encode(&pixels, &options).unwrap();
/// ```
#[must_use = "encoding produces a JPEG file that should be used"]
pub fn encode(data: &[u8], options: &JpegOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    encode_into(&mut output, data, options)?;
    Ok(output)
}

/// JPEG encoding options.
///
/// Use [`JpegOptions::builder`] to create options with a fluent API.
///
/// # Example
///
/// ```rust
/// use snapjpeg::jpeg::{encode, JpegOptions};
/// use snapjpeg::PixelFormat;
///
/// let pixels = vec![0u8; 2]; // 1x1 RGB565 pixel
/// let options = JpegOptions::builder(1, 1)
///     .pixel_format(PixelFormat::Rgb565)
///     .quality(3)
///     .build();
/// let jpeg_bytes = encode(&pixels, &options).unwrap();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JpegOptions {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Layout of the source pixel buffer.
    pub pixel_format: PixelFormat,
    /// Quality tier 1-3: 1 = smallest output, 2 = lower compression,
    /// 3 = near-lossless (all quantization divisors 1).
    pub quality: u8,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            // Dimensions must be set via builder
            width: 0,
            height: 0,
            pixel_format: PixelFormat::Rgb888,
            quality: 1,
        }
    }
}

impl JpegOptions {
    /// Create a builder for [`JpegOptions`].
    ///
    /// The source dimensions are required; pixel format defaults to
    /// [`PixelFormat::Rgb888`], quality to tier 1.
    pub fn builder(width: u32, height: u32) -> JpegOptionsBuilder {
        JpegOptionsBuilder::new(width, height)
    }
}

/// Builder for [`JpegOptions`].
#[derive(Debug, Clone)]
pub struct JpegOptionsBuilder {
    options: JpegOptions,
}

impl JpegOptionsBuilder {
    /// Create a new builder with image dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            options: JpegOptions {
                width,
                height,
                ..Default::default()
            },
        }
    }

    /// Set the layout of the pixel data.
    pub fn pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.options.pixel_format = pixel_format;
        self
    }

    /// Set the quality tier (1-3). Validated at encode time.
    pub fn quality(mut self, quality: u8) -> Self {
        self.options.quality = quality;
        self
    }

    /// Build the [`JpegOptions`].
    #[must_use]
    pub fn build(self) -> JpegOptions {
        self.options
    }
}

/// Encode raw pixel data as JPEG into a caller-provided buffer.
///
/// The `output` buffer will be cleared and reused, allowing callers to
/// avoid repeated allocations across multiple encodes.
#[must_use = "this `Result` may indicate an encoding error"]
pub fn encode_into(output: &mut Vec<u8>, data: &[u8], options: &JpegOptions) -> Result<()> {
    let expected_len = validate(data, options)?;

    output.clear();
    output.reserve(expected_len / 4);

    encode_stream(output, data, options)?;
    Ok(())
}

/// Encode raw pixel data as JPEG into a fixed-capacity buffer.
///
/// Returns the number of bytes written. Fails with
/// [`Error::OutputTooSmall`] when the buffer cannot hold the stream; after
/// a failure the buffer holds no valid JPEG (a prefix of one may have been
/// written).
#[must_use = "this `Result` may indicate an encoding error"]
pub fn encode_to_slice(data: &[u8], options: &JpegOptions, output: &mut [u8]) -> Result<usize> {
    validate(data, options)?;
    let sink = encode_stream(SliceSink::new(output), data, options)?;
    Ok(sink.len())
}

/// Rejects invalid parameters before any byte is produced. Returns the
/// expected pixel data length.
fn validate(data: &[u8], options: &JpegOptions) -> Result<usize> {
    let width = options.width;
    let height = options.height;

    // Validate quality tier
    if options.quality == 0 || options.quality > 3 {
        return Err(Error::InvalidQuality(options.quality));
    }

    // Validate dimensions
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::ImageTooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }

    // Validate data length
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(options.pixel_format.bytes_per_pixel()))
        .ok_or(Error::InvalidDataLength {
            expected: usize::MAX,
            actual: data.len(),
        })?;
    if data.len() != expected_len {
        return Err(Error::InvalidDataLength {
            expected: expected_len,
            actual: data.len(),
        });
    }

    Ok(expected_len)
}

/// Runs the full segment sequence against an already-validated input and
/// returns the sink once every staged byte has reached it.
fn encode_stream<S: ByteSink>(sink: S, data: &[u8], options: &JpegOptions) -> Result<S> {
    let quant_tables = QuantizationTables::with_tier(options.quality);
    let huff_tables = HuffmanTables::standard();

    let mut out = StagedWriter::new(sink);

    write_soi(&mut out)?;
    write_app0(&mut out)?;
    write_comment(&mut out)?;
    write_dqt(&mut out, &quant_tables)?;
    write_sof0(&mut out, options.width as u16, options.height as u16)?;
    write_dht(&mut out)?;
    write_sos(&mut out)?;

    encode_scan(&mut out, data, options, &quant_tables, &huff_tables)?;

    write_eoi(&mut out)?;
    out.finish()
}

fn write_soi<S: ByteSink>(out: &mut StagedWriter<S>) -> Result<()> {
    out.write_u16_be(SOI)
}

fn write_eoi<S: ByteSink>(out: &mut StagedWriter<S>) -> Result<()> {
    out.write_u16_be(EOI)
}

fn write_app0<S: ByteSink>(out: &mut StagedWriter<S>) -> Result<()> {
    out.write_u16_be(APP0)?;

    // Length (16 bytes including length field)
    out.write_u16_be(16)?;

    // JFIF identifier
    out.write(b"JFIF\0")?;

    // Version 1.02
    out.write_u16_be(0x0102)?;

    // Units: 1 = dots per inch
    out.write_u8(1)?;

    // X and Y density: 96 DPI
    out.write_u16_be(96)?;
    out.write_u16_be(96)?;

    // Thumbnail dimensions (0x0 = no thumbnail)
    out.write_u8(0)?;
    out.write_u8(0)
}

fn write_comment<S: ByteSink>(out: &mut StagedWriter<S>) -> Result<()> {
    out.write_u16_be(COM)?;
    out.write_u16_be(2 + COMMENT.len() as u16)?;
    out.write(COMMENT)
}

fn write_dqt<S: ByteSink>(out: &mut StagedWriter<S>, tables: &QuantizationTables) -> Result<()> {
    // Luminance table
    out.write_u16_be(DQT)?;
    out.write_u16_be(67)?; // Length: 2 + 1 + 64
    out.write_u8(0)?; // Table 0, 8-bit precision
    out.write(&tables.luminance)?;

    // Chrominance table
    out.write_u16_be(DQT)?;
    out.write_u16_be(67)?;
    out.write_u8(1)?; // Table 1, 8-bit precision
    out.write(&tables.chrominance)
}

fn write_sof0<S: ByteSink>(out: &mut StagedWriter<S>, width: u16, height: u16) -> Result<()> {
    out.write_u16_be(SOF0)?;

    // Length: 8 + 3 components x 3 bytes
    out.write_u16_be(17)?;

    // Precision: 8 bits
    out.write_u8(8)?;

    // Height before width, per the frame header layout
    out.write_u16_be(height)?;
    out.write_u16_be(width)?;

    // Three components, 1x1 sampling each (4:4:4)
    out.write_u8(3)?;
    for (component_id, quant_table) in [(1u8, 0u8), (2, 1), (3, 1)] {
        out.write_u8(component_id)?;
        out.write_u8(0x11)?;
        out.write_u8(quant_table)?;
    }
    Ok(())
}

fn write_dht<S: ByteSink>(out: &mut StagedWriter<S>) -> Result<()> {
    // Luminance DC and AC, then chrominance DC and AC
    write_huffman_table(out, 0x00, &LUMA_DC)?;
    write_huffman_table(out, 0x10, &LUMA_AC)?;
    write_huffman_table(out, 0x01, &CHROMA_DC)?;
    write_huffman_table(out, 0x11, &CHROMA_AC)
}

fn write_huffman_table<S: ByteSink>(
    out: &mut StagedWriter<S>,
    class_and_id: u8,
    spec: &HuffmanSpec,
) -> Result<()> {
    out.write_u16_be(DHT)?;

    // Length: 2 + 1 + 16 + num_values
    out.write_u16_be(2 + 1 + 16 + spec.values.len() as u16)?;

    // Table class (high nibble) and destination (low nibble)
    out.write_u8(class_and_id)?;

    // Number of codes of each length, then the values
    out.write(&spec.bits)?;
    out.write(spec.values)
}

fn write_sos<S: ByteSink>(out: &mut StagedWriter<S>) -> Result<()> {
    out.write_u16_be(SOS)?;

    // Length: 6 + 2 x 3 components
    out.write_u16_be(12)?;

    out.write_u8(3)?;

    // Y uses DC/AC tables 0, chroma uses tables 1
    for (component_id, table_selectors) in [(1u8, 0x00u8), (2, 0x11), (3, 0x11)] {
        out.write_u8(component_id)?;
        out.write_u8(table_selectors)?;
    }

    // Spectral selection 0..63, no successive approximation
    out.write_u8(0)?;
    out.write_u8(63)?;
    out.write_u8(0)
}

/// Encodes the entropy-coded scan: row-major 8x8 tiles, Y then Cb then Cr
/// per tile, each channel against its own DC predictor.
fn encode_scan<S: ByteSink>(
    out: &mut StagedWriter<S>,
    data: &[u8],
    options: &JpegOptions,
    quant_tables: &QuantizationTables,
    huff_tables: &HuffmanTables,
) -> Result<()> {
    let width = options.width as usize;
    let height = options.height as usize;

    // Calculate padded dimensions
    let padded_width = (width + 7) & !7;
    let padded_height = (height + 7) & !7;

    let mut writer = BitWriterMsb::new(out);

    // Previous DC values for differential encoding
    let mut prev_dc_y = 0i16;
    let mut prev_dc_cb = 0i16;
    let mut prev_dc_cr = 0i16;

    for origin_y in (0..padded_height).step_by(8) {
        for origin_x in (0..padded_width).step_by(8) {
            let (mut y_block, mut cb_block, mut cr_block) = extract_block(
                data,
                width,
                height,
                origin_x,
                origin_y,
                options.pixel_format,
            );

            forward_dct_8x8(&mut y_block);
            let y_quant = quantize_block(&y_block, &quant_tables.luminance_table);
            prev_dc_y = encode_block(&mut writer, &y_quant, prev_dc_y, true, huff_tables)?;

            forward_dct_8x8(&mut cb_block);
            let cb_quant = quantize_block(&cb_block, &quant_tables.chrominance_table);
            prev_dc_cb = encode_block(&mut writer, &cb_quant, prev_dc_cb, false, huff_tables)?;

            forward_dct_8x8(&mut cr_block);
            let cr_quant = quantize_block(&cr_block, &quant_tables.chrominance_table);
            prev_dc_cr = encode_block(&mut writer, &cr_quant, prev_dc_cr, false, huff_tables)?;
        }
    }

    writer.flush_to_byte_boundary()
}
