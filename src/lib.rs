//! # snapjpeg
//!
//! A small baseline JPEG encoder for raw framebuffer pixels, written
//! entirely in safe Rust.
//!
//! - **JPEG**: Baseline sequential DCT (SOF0), fixed spec-default Huffman
//!   tables, three quality tiers, 4:4:4 per-block color. Output is a
//!   standard JFIF stream any decoder reads.
//! - **Pixel formats**: packed RGB565, RGB888, and RGBA8888 input, with
//!   edge replication for dimensions that are not multiples of 8.
//! - **Bounded output**: encode into a growable `Vec<u8>` or a
//!   fixed-capacity slice for allocation-free embedded use.
//! - **Raster utilities**: in-place 16-bit mirroring and UYVY rotation,
//!   a planar rescaler interface, and the callback boundary for driving an
//!   external block-based JPEG decoder.
//!
//! ## Quickstart
//!
//! ```rust
//! use snapjpeg::jpeg::{encode, JpegOptions};
//! use snapjpeg::PixelFormat;
//!
//! # fn main() -> snapjpeg::Result<()> {
//! // 2x2 RGB888 pixels (red, green / blue, yellow)
//! let pixels = vec![
//!     255, 0, 0, 0, 255, 0, //
//!     0, 0, 255, 255, 255, 0,
//! ];
//! let options = JpegOptions::builder(2, 2)
//!     .pixel_format(PixelFormat::Rgb888)
//!     .quality(2)
//!     .build();
//! let jpeg_bytes = encode(&pixels, &options)?;
//! assert!(jpeg_bytes.starts_with(&[0xFF, 0xD8]));
//! # Ok(())
//! # }
//! ```
//!
//! ### Buffer reuse
//!
//! ```rust
//! use snapjpeg::jpeg::{encode_into, JpegOptions};
//!
//! # fn main() -> snapjpeg::Result<()> {
//! let pixels = vec![128u8; 8 * 8 * 3];
//! let options = JpegOptions::builder(8, 8).build();
//!
//! let mut buffer = Vec::new();
//! for _ in 0..3 {
//!     encode_into(&mut buffer, &pixels, &options)?;
//! }
//! assert!(!buffer.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ### Fixed-capacity output
//!
//! ```rust
//! use snapjpeg::jpeg::{encode_to_slice, JpegOptions};
//!
//! # fn main() -> snapjpeg::Result<()> {
//! let pixels = vec![128u8; 8 * 8 * 3];
//! let options = JpegOptions::builder(8, 8).build();
//!
//! let mut buffer = [0u8; 4096];
//! let written = encode_to_slice(&pixels, &options, &mut buffer)?;
//! assert!(buffer[..written].ends_with(&[0xFF, 0xD9]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//! - `cli`: Command-line encoder binary.
//!
//! ## Notes
//! - Quality tiers trade size for fidelity: 1 compresses hardest, 3 is
//!   near-lossless (all quantization divisors are 1).
//! - Prefer `encode_into` or `encode_to_slice` when encoding repeatedly to
//!   avoid allocations.
//! - Encoding is deterministic: the same pixels and options always produce
//!   byte-identical output.

#![forbid(unsafe_code)]

pub mod bits;
pub mod color;
pub mod decode;
pub mod error;
pub mod jpeg;
pub mod raster;
pub mod resize;

pub use color::PixelFormat;
pub use error::{Error, Result};
