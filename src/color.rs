//! Pixel formats and YCbCr color conversion.
//!
//! Source pixels arrive packed in one of three layouts and are converted to
//! studio-range YCbCr with BT.601 weights before the DCT. Luma is level
//! shifted by -128 during conversion; the chroma differences are already
//! centered on zero and need no shift.

/// Layout of the source pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 16 bits per pixel, little-endian words. The low 5 bits widen
    /// to red, the middle 6 to green, and the top 5 to blue.
    Rgb565,
    /// 3 bytes per pixel, R then G then B.
    Rgb888,
    /// 4 bytes per pixel, R, G, B, then an alpha byte that is ignored.
    Rgba8888,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 2,
            PixelFormat::Rgb888 => 3,
            PixelFormat::Rgba8888 => 4,
        }
    }
}

/// Converts one RGB pixel to (Y - 128, Cb, Cr) with BT.601 weights.
///
/// The luma term carries the JPEG level shift so DCT input is centered on
/// zero; both chroma terms land in -128.0..=127.5 without further shifting.
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;
    let y = 0.299 * r + 0.587 * g + 0.114 * b - 128.0;
    let cb = -0.1687 * r - 0.3313 * g + 0.5 * b;
    let cr = 0.5 * r - 0.4187 * g - 0.0813 * b;
    (y, cb, cr)
}

/// Reads the pixel at index `idx` (in pixels, row-major) as 8-bit RGB.
fn load_rgb(data: &[u8], idx: usize, format: PixelFormat) -> (u8, u8, u8) {
    match format {
        PixelFormat::Rgb565 => {
            let offset = idx * 2;
            let word = u16::from_le_bytes([data[offset], data[offset + 1]]);
            let r = ((word & 0x001F) << 3) as u8;
            let g = ((word & 0x07E0) >> 3) as u8;
            let b = ((word & 0xF800) >> 8) as u8;
            (r, g, b)
        }
        PixelFormat::Rgb888 => {
            let offset = idx * 3;
            (data[offset], data[offset + 1], data[offset + 2])
        }
        PixelFormat::Rgba8888 => {
            let offset = idx * 4;
            (data[offset], data[offset + 1], data[offset + 2])
        }
    }
}

/// Extracts one 8x8 tile starting at pixel `(origin_x, origin_y)` as three
/// parallel YCbCr blocks.
///
/// Tiles that extend past the right or bottom image edge replicate the last
/// valid column and row; blocks are never zero padded.
pub fn extract_block(
    data: &[u8],
    width: usize,
    height: usize,
    origin_x: usize,
    origin_y: usize,
    format: PixelFormat,
) -> ([f32; 64], [f32; 64], [f32; 64]) {
    let mut y_block = [0.0f32; 64];
    let mut cb_block = [0.0f32; 64];
    let mut cr_block = [0.0f32; 64];

    for dy in 0..8 {
        for dx in 0..8 {
            let x = (origin_x + dx).min(width - 1);
            let y = (origin_y + dy).min(height - 1);
            let idx = dy * 8 + dx;

            let (r, g, b) = load_rgb(data, y * width + x, format);
            let (yc, cb, cr) = rgb_to_ycbcr(r, g, b);
            y_block[idx] = yc;
            cb_block[idx] = cb;
            cr_block[idx] = cr;
        }
    }

    (y_block, cb_block, cr_block)
}
