//! In-place and buffer-to-buffer shuffles for packed interleaved rasters.
//!
//! These operate on 4:2:2-style layouts where a 4-byte word holds two
//! 16-bit units that share their even bytes (UYVY: `U Y0 V Y1`). Mirroring
//! and rotation therefore move whole words and reroute the per-pixel luma
//! bytes; shared chroma rides along with its word, nearest-neighbor style.
//! No colorspace math happens here.

use crate::error::{Error, Result};

/// Clockwise rotation amount for [`rotate_uyvy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Cw90,
    Cw180,
    Cw270,
}

/// Mirrors each row of a packed 16-bit-per-pixel buffer in place.
///
/// Words swap end to end across the row, and the two units of each word
/// trade their odd (luma-position) bytes, so a UYVY row reads back in
/// reverse pixel order with chroma staying on its word. With an odd number
/// of words per row the center word keeps its byte order, and an odd
/// trailing unit is left untouched.
pub fn mirror_rows_in_place(data: &mut [u8], width: u32, height: u32) -> Result<()> {
    let width = width as usize;
    let height = height as usize;

    let expected = width * height * 2;
    if data.len() != expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: data.len(),
        });
    }
    if width < 4 {
        return Ok(());
    }

    for row in data.chunks_exact_mut(width * 2) {
        let mut a = 0;
        let mut b = (width / 2 - 1) * 4;
        while a < b {
            // Words trade places; odd bytes cross over so each unit keeps
            // its own sample.
            row.swap(a, b);
            row.swap(a + 1, b + 3);
            row.swap(a + 2, b + 2);
            row.swap(a + 3, b + 1);
            a += 4;
            b -= 4;
        }
    }
    Ok(())
}

/// Rotates a packed UYVY image clockwise into `dst`.
///
/// `width` and `height` describe the source; both must be even so that
/// macropixels and output row pairs line up. For 90 and 270 degrees the
/// result is a `height x width` image, for 180 degrees dimensions are
/// unchanged; `dst` always holds `width * height * 2` bytes. Luma moves
/// exactly; each output word keeps the chroma of the source word its luma
/// mostly came from.
pub fn rotate_uyvy(
    src: &[u8],
    dst: &mut [u8],
    width: u32,
    height: u32,
    rotation: Rotation,
) -> Result<()> {
    let width = width as usize;
    let height = height as usize;

    if width % 2 != 0 || height % 2 != 0 {
        return Err(Error::InvalidDimensions {
            width: width as u32,
            height: height as u32,
        });
    }
    let expected = width * height * 2;
    if src.len() != expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: src.len(),
        });
    }
    if dst.len() != expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: dst.len(),
        });
    }

    let src_stride = width * 2;
    match rotation {
        Rotation::Cw90 => {
            // Each source column pair becomes an output row pair; source
            // rows are walked bottom-up.
            let dst_stride = height * 2;
            for pair in 0..width / 2 {
                let top = 2 * pair * dst_stride;
                let bottom = top + dst_stride;
                for n in 0..height / 2 {
                    let g0 = (height - 1 - 2 * n) * src_stride + pair * 4;
                    let g1 = (height - 2 - 2 * n) * src_stride + pair * 4;
                    let d0 = top + n * 4;
                    let d1 = bottom + n * 4;
                    // The top output row carries the even source column's
                    // luma, the bottom row the odd column's.
                    dst[d0] = src[g0];
                    dst[d0 + 1] = src[g0 + 1];
                    dst[d0 + 2] = src[g0 + 2];
                    dst[d0 + 3] = src[g1 + 1];
                    dst[d1] = src[g1];
                    dst[d1 + 1] = src[g0 + 3];
                    dst[d1 + 2] = src[g1 + 2];
                    dst[d1 + 3] = src[g1 + 3];
                }
            }
        }
        Rotation::Cw180 => {
            // Rows reverse top to bottom and mirror within themselves.
            let pairs = width / 2;
            for out_row in 0..height {
                let s_row = (height - 1 - out_row) * src_stride;
                let d_row = out_row * src_stride;
                for n in 0..pairs {
                    let s = s_row + (pairs - 1 - n) * 4;
                    let d = d_row + n * 4;
                    dst[d] = src[s];
                    dst[d + 1] = src[s + 3];
                    dst[d + 2] = src[s + 2];
                    dst[d + 3] = src[s + 1];
                }
            }
        }
        Rotation::Cw270 => {
            // Mirror image of the 90 degree walk: source columns are taken
            // right to left, source rows top-down.
            let dst_stride = height * 2;
            for pair in 0..width / 2 {
                let top = 2 * pair * dst_stride;
                let bottom = top + dst_stride;
                let src_pair = width / 2 - 1 - pair;
                for n in 0..height / 2 {
                    let g0 = (2 * n) * src_stride + src_pair * 4;
                    let g1 = (2 * n + 1) * src_stride + src_pair * 4;
                    let d0 = top + n * 4;
                    let d1 = bottom + n * 4;
                    // Here the top output row carries the odd source
                    // column's luma.
                    dst[d0] = src[g0];
                    dst[d0 + 1] = src[g0 + 3];
                    dst[d0 + 2] = src[g0 + 2];
                    dst[d0 + 3] = src[g1 + 3];
                    dst[d1] = src[g1];
                    dst[d1 + 1] = src[g0 + 1];
                    dst[d1 + 2] = src[g1 + 2];
                    dst[d1 + 3] = src[g1 + 1];
                }
            }
        }
    }
    Ok(())
}
