//! Decoder boundary for block-based JPEG decompressors.
//!
//! The decompressor itself is an external collaborator; this module fixes
//! the two surfaces it is driven through. A [`ScanSource`] pulls compressed
//! bytes on demand, a [`RectSink`] receives decoded rectangles as they
//! complete. The [`DecodeFrame`] context travels through every callback, so
//! a decode holds no state outside its own call chain and concurrent
//! decodes cannot interfere.
//!
//! [`SliceSource`] and [`FrameBuffer`] are the in-memory implementations:
//! feed a JPEG byte slice in, assemble rectangles into one packed pixel
//! buffer out.

use crate::color::PixelFormat;

/// Output geometry for one decode, passed through every callback.
#[derive(Debug, Clone, Copy)]
pub struct DecodeFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl DecodeFrame {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        DecodeFrame {
            width,
            height,
            format,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Bytes per packed output row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Total bytes of a packed full-frame buffer.
    pub fn buffer_len(&self) -> usize {
        self.stride() * self.height as usize
    }
}

/// Rectangle of decoded pixels in frame coordinates, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    /// Pixel columns covered. Meaningful only when `right >= left`.
    pub fn width(&self) -> usize {
        (self.right - self.left + 1) as usize
    }

    /// Pixel rows covered. Meaningful only when `bottom >= top`.
    pub fn height(&self) -> usize {
        (self.bottom - self.top + 1) as usize
    }
}

/// Pull source of compressed JPEG bytes.
///
/// The decompressor calls [`fill`](ScanSource::fill) whenever it needs more
/// of the stream; a `None` destination means the bytes are skipped rather
/// than copied, which is how decoders seek past segments they ignore.
pub trait ScanSource {
    /// Provides up to `count` bytes, copying them into `destination` when
    /// one is given (it must be at least `count` long). Returns how many
    /// bytes were provided; fewer than `count` means the stream has ended.
    fn fill(&mut self, destination: Option<&mut [u8]>, count: usize) -> usize;
}

/// Push receiver for decoded rectangles.
pub trait RectSink {
    /// Accepts one rectangle; `pixels` holds its rows top to bottom with no
    /// padding between them, `frame.bytes_per_pixel()` bytes per pixel.
    /// Returning `false` tells the decompressor to stop.
    fn deliver(&mut self, frame: &DecodeFrame, rect: &Rect, pixels: &[u8]) -> bool;
}

/// [`ScanSource`] over an in-memory byte slice.
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data, pos: 0 }
    }

    /// Bytes consumed so far, skipped ones included.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl ScanSource for SliceSource<'_> {
    fn fill(&mut self, destination: Option<&mut [u8]>, count: usize) -> usize {
        let provided = count.min(self.data.len() - self.pos);
        if let Some(dest) = destination {
            dest[..provided].copy_from_slice(&self.data[self.pos..self.pos + provided]);
        }
        self.pos += provided;
        provided
    }
}

/// [`RectSink`] that assembles rectangles into one packed frame buffer.
pub struct FrameBuffer {
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Allocates a zeroed buffer sized for `frame`.
    pub fn new(frame: &DecodeFrame) -> Self {
        FrameBuffer {
            pixels: vec![0; frame.buffer_len()],
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

impl RectSink for FrameBuffer {
    fn deliver(&mut self, frame: &DecodeFrame, rect: &Rect, pixels: &[u8]) -> bool {
        // A rectangle outside the frame or with too few pixel bytes aborts
        // the decode instead of corrupting the buffer.
        if rect.right < rect.left || rect.bottom < rect.top {
            return false;
        }
        if rect.right >= frame.width || rect.bottom >= frame.height {
            return false;
        }
        let bpp = frame.bytes_per_pixel();
        let src_stride = rect.width() * bpp;
        if pixels.len() < src_stride * rect.height() || self.pixels.len() < frame.buffer_len() {
            return false;
        }

        let dst_stride = frame.stride();
        let mut src = 0;
        let mut dst = (rect.top as usize * frame.width as usize + rect.left as usize) * bpp;
        for _ in rect.top..=rect.bottom {
            self.pixels[dst..dst + src_stride].copy_from_slice(&pixels[src..src + src_stride]);
            src += src_stride;
            dst += dst_stride;
        }
        true
    }
}
