//! Error types for encoding operations.

use std::fmt;

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Quality tier outside the supported `1..=3` range.
    InvalidQuality(u8),
    /// Width or height is zero.
    InvalidDimensions { width: u32, height: u32 },
    /// Image dimensions exceed what a baseline JPEG frame header can describe.
    ImageTooLarge { width: u32, height: u32, max: u32 },
    /// Pixel data length does not match `width * height * bytes_per_pixel`.
    InvalidDataLength { expected: usize, actual: usize },
    /// A bounded output buffer cannot hold the encoded stream.
    OutputTooSmall { needed: usize, capacity: usize },
    /// A symbol with no assigned Huffman code was reached during entropy
    /// coding. This indicates a corrupted code table, not bad input.
    MissingHuffmanCode(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidQuality(q) => {
                write!(f, "invalid quality tier {q}, must be 1, 2, or 3")
            }
            Error::InvalidDimensions { width, height } => {
                write!(f, "invalid image dimensions {width}x{height}")
            }
            Error::ImageTooLarge { width, height, max } => {
                write!(f, "image {width}x{height} exceeds maximum dimension {max}")
            }
            Error::InvalidDataLength { expected, actual } => {
                write!(f, "pixel data length {actual} does not match expected {expected}")
            }
            Error::OutputTooSmall { needed, capacity } => {
                write!(f, "output buffer of {capacity} bytes too small, need at least {needed}")
            }
            Error::MissingHuffmanCode(symbol) => {
                write!(f, "no Huffman code assigned for symbol {symbol:#04x}")
            }
        }
    }
}

impl std::error::Error for Error {}
