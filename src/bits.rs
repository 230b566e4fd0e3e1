//! Byte sinks and bit-level output for JPEG encoding.
//!
//! Encoded bytes flow through a small staging buffer before reaching the
//! destination: [`BitWriterMsb`] packs variable-length codes into bytes,
//! [`StagedWriter`] batches bytes and spills them to a [`ByteSink`] when the
//! staging buffer fills. The sink is either a growable `Vec<u8>` or a
//! caller-provided bounded slice.

use crate::error::{Error, Result};

/// Staging buffer size in bytes. The buffer spills to the sink once
/// `STAGE_CAPACITY - 1` bytes are resident.
const STAGE_CAPACITY: usize = 1024;

/// Destination for encoded bytes.
///
/// Implementations either always accept bytes (`Vec<u8>`) or enforce a
/// capacity limit ([`SliceSink`]). A failed write aborts the encode; partial
/// output is not valid JPEG.
pub trait ByteSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

impl ByteSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }
}

/// Bounded sink over a caller-provided buffer.
///
/// Rejects writes that would exceed the buffer with
/// [`Error::OutputTooSmall`], reporting how many bytes had been required up
/// to that point.
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        SliceSink { buf, len: 0 }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl ByteSink for SliceSink<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.len + bytes.len();
        if end > self.buf.len() {
            return Err(Error::OutputTooSmall {
                needed: end,
                capacity: self.buf.len(),
            });
        }
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

/// Buffered writer over a [`ByteSink`].
///
/// Bytes accumulate in a fixed staging buffer and spill to the sink once
/// `STAGE_CAPACITY - 1` are resident, so the sink sees a few large writes
/// instead of one per byte. Call [`finish`](StagedWriter::finish) to spill
/// the remainder and recover the sink; dropping the writer discards staged
/// bytes, which only happens when the encode has already failed.
pub struct StagedWriter<S: ByteSink> {
    sink: S,
    staged: [u8; STAGE_CAPACITY],
    len: usize,
}

impl<S: ByteSink> StagedWriter<S> {
    pub fn new(sink: S) -> Self {
        StagedWriter {
            sink,
            staged: [0; STAGE_CAPACITY],
            len: 0,
        }
    }

    /// Appends `bytes`, spilling to the sink each time the staging buffer
    /// fills. Oversized writes are handled by looping, not recursing.
    pub fn write(&mut self, mut bytes: &[u8]) -> Result<()> {
        while !bytes.is_empty() {
            let room = (STAGE_CAPACITY - 1) - self.len;
            let take = bytes.len().min(room);
            self.staged[self.len..self.len + take].copy_from_slice(&bytes[..take]);
            self.len += take;
            bytes = &bytes[take..];
            if self.len == STAGE_CAPACITY - 1 {
                self.spill()?;
            }
        }
        Ok(())
    }

    pub fn write_u8(&mut self, byte: u8) -> Result<()> {
        self.write(&[byte])
    }

    /// Writes a 16-bit value big-endian, as JPEG header fields require.
    pub fn write_u16_be(&mut self, value: u16) -> Result<()> {
        self.write(&value.to_be_bytes())
    }

    fn spill(&mut self) -> Result<()> {
        if self.len > 0 {
            self.sink.write(&self.staged[..self.len])?;
            self.len = 0;
        }
        Ok(())
    }

    /// Spills any staged bytes and returns the sink.
    pub fn finish(mut self) -> Result<S> {
        self.spill()?;
        Ok(self.sink)
    }
}

/// Packs Huffman codes and value bits into the output stream, MSB first.
///
/// Bits collect in a 32-bit accumulator; whenever eight or more are
/// resident the top byte drains to the underlying writer, and a literal
/// `0xFF` is followed by a stuffed `0x00` so entropy-coded data can never
/// alias a marker.
pub struct BitWriterMsb<'a, S: ByteSink> {
    out: &'a mut StagedWriter<S>,
    accumulator: u32,
    bit_count: u8,
}

impl<'a, S: ByteSink> BitWriterMsb<'a, S> {
    pub fn new(out: &'a mut StagedWriter<S>) -> Self {
        BitWriterMsb {
            out,
            accumulator: 0,
            bit_count: 0,
        }
    }

    /// Appends the `count` (0..=16) least-significant bits of `value`,
    /// most-significant bit first.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        debug_assert!(count <= 16);
        if count == 0 {
            return Ok(());
        }
        let value = value & ((1u32 << count) - 1);
        self.bit_count += count;
        debug_assert!(self.bit_count <= 32);
        self.accumulator |= value << (32 - self.bit_count);

        while self.bit_count >= 8 {
            let byte = (self.accumulator >> 24) as u8;
            self.out.write_u8(byte)?;
            if byte == 0xFF {
                self.out.write_u8(0x00)?;
            }
            self.accumulator <<= 8;
            self.bit_count -= 8;
        }
        Ok(())
    }

    /// Pads any pending 1..=7 bits with zeros to reach a byte boundary.
    /// Emits nothing when the stream is already aligned.
    pub fn flush_to_byte_boundary(&mut self) -> Result<()> {
        if self.bit_count > 0 {
            self.write_bits(0, 8 - self.bit_count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_bits(writes: &[(u32, u8)], flush: bool) -> Vec<u8> {
        let mut staged = StagedWriter::new(Vec::new());
        let mut writer = BitWriterMsb::new(&mut staged);
        for &(value, count) in writes {
            writer.write_bits(value, count).unwrap();
        }
        if flush {
            writer.flush_to_byte_boundary().unwrap();
        }
        staged.finish().unwrap()
    }

    #[test]
    fn bits_pack_msb_first() {
        // 101 0110 1 -> 0xAD
        let out = collect_bits(&[(0b101, 3), (0b0110, 4), (0b1, 1)], false);
        assert_eq!(out, vec![0xAD]);
    }

    #[test]
    fn partial_byte_needs_flush() {
        let out = collect_bits(&[(0b101, 3)], false);
        assert!(out.is_empty());

        // Trailing bits pad with zeros: 101 00000 -> 0xA0.
        let out = collect_bits(&[(0b101, 3)], true);
        assert_eq!(out, vec![0xA0]);
    }

    #[test]
    fn flush_on_aligned_stream_emits_nothing() {
        let out = collect_bits(&[(0x5A, 8)], true);
        assert_eq!(out, vec![0x5A]);
    }

    #[test]
    fn literal_ff_is_stuffed() {
        let out = collect_bits(&[(0xFF, 8), (0x12, 8)], false);
        assert_eq!(out, vec![0xFF, 0x00, 0x12]);
    }

    #[test]
    fn stuffing_applies_across_split_writes() {
        // 0xFF assembled from two writes still gets stuffed.
        let out = collect_bits(&[(0b1111, 4), (0b1111, 4)], false);
        assert_eq!(out, vec![0xFF, 0x00]);
    }

    #[test]
    fn sixteen_bit_writes_drain_both_bytes() {
        let out = collect_bits(&[(0xBEEF, 16)], false);
        assert_eq!(out, vec![0xBE, 0xEF]);
    }

    #[test]
    fn excess_value_bits_are_masked() {
        let out = collect_bits(&[(0xFFFF_FFAA, 8)], false);
        assert_eq!(out, vec![0xAA]);
    }

    #[test]
    fn staged_writer_spills_large_writes_in_order() {
        let mut staged = StagedWriter::new(Vec::new());
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        staged.write(&data).unwrap();
        let sink = staged.finish().unwrap();
        assert_eq!(sink, data);
    }

    #[test]
    fn staged_writer_spills_many_small_writes_in_order() {
        let mut staged = StagedWriter::new(Vec::new());
        let data: Vec<u8> = (0..3000u32).map(|i| (i % 17) as u8).collect();
        for &b in &data {
            staged.write_u8(b).unwrap();
        }
        let sink = staged.finish().unwrap();
        assert_eq!(sink, data);
    }

    #[test]
    fn slice_sink_reports_overflow() {
        let mut buf = [0u8; 4];
        let mut sink = SliceSink::new(&mut buf);
        sink.write(&[1, 2, 3]).unwrap();
        let err = sink.write(&[4, 5]).unwrap_err();
        assert_eq!(
            err,
            Error::OutputTooSmall {
                needed: 5,
                capacity: 4
            }
        );
    }

    #[test]
    fn slice_sink_tracks_written_length() {
        let mut buf = [0u8; 8];
        let mut sink = SliceSink::new(&mut buf);
        sink.write(&[9, 8, 7]).unwrap();
        assert_eq!(sink.len(), 3);
        assert_eq!(&buf[..3], &[9, 8, 7]);
    }
}
