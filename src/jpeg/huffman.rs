//! Canonical Huffman tables and entropy coding for quantized blocks.
//!
//! The four table specifications (luma/chroma x DC/AC) are the ITU-T T.81
//! Annex K defaults. Expansion to per-symbol codes follows Annex C exactly:
//! consecutive codes within a bit length, left shift on each length
//! increase. A deviation anywhere produces a stream no decoder can read.

use crate::bits::{BitWriterMsb, ByteSink};
use crate::error::{Error, Result};

/// Zero-run-length-16 AC symbol: fifteen zeros, size zero.
const ZRL: u8 = 0xF0;
/// End-of-block AC symbol.
const EOB: u8 = 0x00;

/// Canonical table specification: code count per bit length 1..=16, then
/// the symbol values in code order. These are the exact byte layouts DHT
/// segments carry.
pub struct HuffmanSpec {
    pub bits: [u8; 16],
    pub values: &'static [u8],
}

pub const LUMA_DC: HuffmanSpec = HuffmanSpec {
    bits: [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0],
    values: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
};

pub const CHROMA_DC: HuffmanSpec = HuffmanSpec {
    bits: [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0],
    values: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
};

pub const LUMA_AC: HuffmanSpec = HuffmanSpec {
    bits: [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 0x7D],
    values: &[
        0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61,
        0x07, 0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08, 0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52,
        0xD1, 0xF0, 0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x25,
        0x26, 0x27, 0x28, 0x29, 0x2A, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45,
        0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64,
        0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x83,
        0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99,
        0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6,
        0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3,
        0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8,
        0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA,
    ],
};

pub const CHROMA_AC: HuffmanSpec = HuffmanSpec {
    bits: [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 0x77],
    values: &[
        0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61,
        0x71, 0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91, 0xA1, 0xB1, 0xC1, 0x09, 0x23, 0x33,
        0x52, 0xF0, 0x15, 0x62, 0x72, 0xD1, 0x0A, 0x16, 0x24, 0x34, 0xE1, 0x25, 0xF1, 0x17, 0x18,
        0x19, 0x1A, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44,
        0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x63,
        0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A,
        0x82, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97,
        0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4,
        0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xCA,
        0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7,
        0xE8, 0xE9, 0xEA, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA,
    ],
};

/// One expanded table: code and bit length indexed by symbol value.
/// Symbols absent from the specification keep length 0.
#[derive(Clone)]
pub struct CodeTable {
    codes: [u16; 256],
    lengths: [u8; 256],
}

impl CodeTable {
    /// Expands a canonical specification (JPEG Annex C, figures C.1-C.3).
    fn from_spec(spec: &HuffmanSpec) -> Self {
        // C.1: one code length per symbol position, bucket by bucket.
        let mut sizes = [0u8; 256];
        let mut count = 0;
        for (i, &n) in spec.bits.iter().enumerate() {
            for _ in 0..n {
                sizes[count] = (i + 1) as u8;
                count += 1;
            }
        }
        debug_assert_eq!(count, spec.values.len());

        // C.2: consecutive code values within a length, left shift when the
        // length grows.
        let mut codes = [0u16; 256];
        let mut code: u32 = 0;
        let mut length: u8 = 0;
        for k in 0..count {
            while length < sizes[k] {
                code <<= 1;
                length += 1;
            }
            debug_assert!(code < (1 << length));
            codes[k] = code as u16;
            code += 1;
        }

        // C.3: reindex by symbol value.
        let mut table = CodeTable {
            codes: [0; 256],
            lengths: [0; 256],
        };
        for k in 0..count {
            let symbol = spec.values[k] as usize;
            debug_assert_eq!(table.lengths[symbol], 0);
            table.codes[symbol] = codes[k];
            table.lengths[symbol] = sizes[k];
        }
        table
    }

    /// Looks up the code for `symbol`, failing on symbols the table never
    /// assigned (a corrupted-table condition, not bad image data).
    pub fn code(&self, symbol: u8) -> Result<(u16, u8)> {
        let length = self.lengths[symbol as usize];
        if length == 0 {
            return Err(Error::MissingHuffmanCode(symbol));
        }
        Ok((self.codes[symbol as usize], length))
    }
}

/// The four expanded tables used by one encode.
pub struct HuffmanTables {
    pub luma_dc: CodeTable,
    pub luma_ac: CodeTable,
    pub chroma_dc: CodeTable,
    pub chroma_ac: CodeTable,
}

impl HuffmanTables {
    /// Expands the fixed default specifications.
    pub fn standard() -> Self {
        HuffmanTables {
            luma_dc: CodeTable::from_spec(&LUMA_DC),
            luma_ac: CodeTable::from_spec(&LUMA_AC),
            chroma_dc: CodeTable::from_spec(&CHROMA_DC),
            chroma_ac: CodeTable::from_spec(&CHROMA_AC),
        }
    }
}

impl Default for HuffmanTables {
    fn default() -> Self {
        Self::standard()
    }
}

/// Number of bits needed to represent `|value|`; the JPEG VLI category.
#[inline]
fn category_i16(value: i16) -> u8 {
    let abs_val = value.unsigned_abs();
    if abs_val == 0 {
        0
    } else {
        (16 - abs_val.leading_zeros()) as u8
    }
}

/// VLI encoding of a nonzero value: the low `category` bits after the
/// negative bias (negative values are decremented before masking, so -1
/// codes as 0 in one bit).
#[inline]
fn variable_length_int(value: i16) -> (u16, u8) {
    let category = category_i16(value);
    let bits = if value < 0 {
        (value - 1) as u16
    } else {
        value as u16
    };
    (bits & ((1u16 << category) - 1), category)
}

/// Entropy codes one quantized, zigzag-ordered block.
///
/// The DC coefficient is coded as the difference from `prev_dc`; AC
/// coefficients as (zero-run, category) symbols with ZRL for runs of 16 and
/// a single EOB unless coefficient 63 itself is nonzero. Returns the
/// block's DC value for the caller to carry as the next predictor.
pub fn encode_block<S: ByteSink>(
    writer: &mut BitWriterMsb<'_, S>,
    block: &[i16; 64],
    prev_dc: i16,
    is_luminance: bool,
    tables: &HuffmanTables,
) -> Result<i16> {
    let (dc_table, ac_table) = if is_luminance {
        (&tables.luma_dc, &tables.luma_ac)
    } else {
        (&tables.chroma_dc, &tables.chroma_ac)
    };

    let dc = block[0];
    let diff = dc - prev_dc;
    if diff != 0 {
        let (bits, category) = variable_length_int(diff);
        let (code, len) = dc_table.code(category)?;
        writer.write_bits(code as u32, len)?;
        writer.write_bits(bits as u32, category)?;
    } else {
        let (code, len) = dc_table.code(0)?;
        writer.write_bits(code as u32, len)?;
    }

    let mut last_nonzero = 0;
    for i in (1..64).rev() {
        if block[i] != 0 {
            last_nonzero = i;
            break;
        }
    }

    let mut i = 1;
    while i <= last_nonzero {
        // Runs of 16 zeros emit ZRL; the loop bound guarantees a nonzero
        // coefficient terminates the inner scan.
        let mut zero_run: u8 = 0;
        while block[i] == 0 {
            zero_run += 1;
            i += 1;
            if zero_run == 16 {
                let (code, len) = ac_table.code(ZRL)?;
                writer.write_bits(code as u32, len)?;
                zero_run = 0;
            }
        }

        let (bits, category) = variable_length_int(block[i]);
        let symbol = (zero_run << 4) | category;
        let (code, len) = ac_table.code(symbol)?;
        writer.write_bits(code as u32, len)?;
        writer.write_bits(bits as u32, category)?;
        i += 1;
    }

    if last_nonzero != 63 {
        let (code, len) = ac_table.code(EOB)?;
        writer.write_bits(code as u32, len)?;
    }

    Ok(dc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::StagedWriter;

    fn encode_to_bytes(block: &[i16; 64], prev_dc: i16, is_luminance: bool) -> (Vec<u8>, i16) {
        let tables = HuffmanTables::standard();
        let mut staged = StagedWriter::new(Vec::new());
        let mut writer = BitWriterMsb::new(&mut staged);
        let dc = encode_block(&mut writer, block, prev_dc, is_luminance, &tables).unwrap();
        writer.flush_to_byte_boundary().unwrap();
        (staged.finish().unwrap(), dc)
    }

    #[test]
    fn categories_match_bit_widths() {
        assert_eq!(category_i16(0), 0);
        assert_eq!(category_i16(1), 1);
        assert_eq!(category_i16(-1), 1);
        assert_eq!(category_i16(2), 2);
        assert_eq!(category_i16(-3), 2);
        assert_eq!(category_i16(4), 3);
        assert_eq!(category_i16(255), 8);
        assert_eq!(category_i16(-256), 9);
        assert_eq!(category_i16(1023), 10);
    }

    #[test]
    fn vli_bias_complements_negatives() {
        assert_eq!(variable_length_int(1), (1, 1));
        assert_eq!(variable_length_int(-1), (0, 1));
        assert_eq!(variable_length_int(2), (0b10, 2));
        assert_eq!(variable_length_int(-2), (0b01, 2));
        assert_eq!(variable_length_int(-3), (0b00, 2));
        assert_eq!(variable_length_int(5), (0b101, 3));
        assert_eq!(variable_length_int(-5), (0b010, 3));
    }

    #[test]
    fn canonical_codes_match_known_values() {
        let tables = HuffmanTables::standard();
        // Luma DC category 0 is the first two-bit code: 00.
        assert_eq!(tables.luma_dc.code(0).unwrap(), (0b00, 2));
        // Categories 1 and 2 follow consecutively at three bits.
        assert_eq!(tables.luma_dc.code(1).unwrap(), (0b010, 3));
        assert_eq!(tables.luma_dc.code(2).unwrap(), (0b011, 3));
        // Luma AC EOB is the four-bit code 1010; ZRL is 11111111001.
        assert_eq!(tables.luma_ac.code(EOB).unwrap(), (0b1010, 4));
        assert_eq!(tables.luma_ac.code(ZRL).unwrap(), (0b11111111001, 11));
        // Chroma DC starts with three two-bit codes.
        assert_eq!(tables.chroma_dc.code(0).unwrap(), (0b00, 2));
        assert_eq!(tables.chroma_dc.code(2).unwrap(), (0b10, 2));
    }

    #[test]
    fn expansion_is_deterministic() {
        let a = HuffmanTables::standard();
        let b = HuffmanTables::standard();
        for symbol in 0..=255u8 {
            assert_eq!(a.luma_ac.code(symbol).ok(), b.luma_ac.code(symbol).ok());
            assert_eq!(a.chroma_ac.code(symbol).ok(), b.chroma_ac.code(symbol).ok());
        }
    }

    #[test]
    fn unassigned_symbols_are_rejected() {
        let tables = HuffmanTables::standard();
        // DC tables only assign categories 0..=11.
        assert_eq!(
            tables.luma_dc.code(12).unwrap_err(),
            Error::MissingHuffmanCode(12)
        );
        // AC tables never assign (run 1, size 0) or (run 0, size 11).
        assert!(tables.luma_ac.code(0x10).is_err());
        assert!(tables.luma_ac.code(0x0B).is_err());
    }

    #[test]
    fn all_zero_block_is_dc_code_plus_eob() {
        let block = [0i16; 64];
        let (bytes, dc) = encode_to_bytes(&block, 0, true);
        assert_eq!(dc, 0);
        // DC symbol 0 (00) + EOB (1010) + zero padding = 00101000.
        assert_eq!(bytes, vec![0b0010_1000]);
    }

    #[test]
    fn dc_only_block_still_emits_eob() {
        let mut block = [0i16; 64];
        block[0] = 2;
        let (bytes, dc) = encode_to_bytes(&block, 0, true);
        assert_eq!(dc, 2);
        // DC category 2 (011) + bits 10 + EOB (1010) + padding.
        assert_eq!(bytes, vec![0b0111_0101, 0b0000_0000]);
    }

    #[test]
    fn dc_codes_against_predictor() {
        let mut block = [0i16; 64];
        block[0] = 5;
        // Same DC as predictor: difference 0 codes as DC symbol 0.
        let (bytes, dc) = encode_to_bytes(&block, 5, true);
        assert_eq!(dc, 5);
        assert_eq!(bytes, vec![0b0010_1000]);
    }

    /// Removes stuffed zero bytes, asserting every 0xFF has one.
    fn destuff(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            out.push(bytes[i]);
            if bytes[i] == 0xFF {
                assert_eq!(bytes.get(i + 1), Some(&0x00), "unstuffed 0xFF at {i}");
                i += 1;
            }
            i += 1;
        }
        out
    }

    struct BitReader<'a> {
        bytes: &'a [u8],
        pos: usize,
    }

    impl BitReader<'_> {
        fn read_bit(&mut self) -> u16 {
            let bit = (self.bytes[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            self.pos += 1;
            bit as u16
        }

        fn skip(&mut self, n: u8) {
            self.pos += n as usize;
        }

        fn read_symbol(&mut self, table: &CodeTable) -> u8 {
            let mut code = 0u16;
            let mut len = 0u8;
            loop {
                code = (code << 1) | self.read_bit();
                len += 1;
                assert!(len <= 16, "no symbol matches prefix {code:b}");
                for sym in 0..=255u8 {
                    if table.code(sym) == Ok((code, len)) {
                        return sym;
                    }
                }
            }
        }

        fn bits_left(&self) -> usize {
            self.bytes.len() * 8 - self.pos
        }
    }

    #[test]
    fn trailing_nonzero_at_63_suppresses_eob() {
        let tables = HuffmanTables::standard();

        // 62 zeros then a 1 at index 63: three ZRL groups, a (14, 1)
        // symbol, and no EOB because the block ends itself.
        let mut block = [0i16; 64];
        block[63] = 1;
        let stream = destuff(&encode_to_bytes(&block, 0, true).0);
        let mut reader = BitReader {
            bytes: &stream,
            pos: 0,
        };
        assert_eq!(reader.read_symbol(&tables.luma_dc), 0);
        for _ in 0..3 {
            assert_eq!(reader.read_symbol(&tables.luma_ac), ZRL);
        }
        assert_eq!(reader.read_symbol(&tables.luma_ac), 0xE1);
        reader.skip(1);
        // Only zero padding remains.
        assert!(reader.bits_left() < 8);

        // Same shape one index earlier: the (13, 1) symbol is followed by
        // exactly one EOB.
        let mut block = [0i16; 64];
        block[62] = 1;
        let stream = destuff(&encode_to_bytes(&block, 0, true).0);
        let mut reader = BitReader {
            bytes: &stream,
            pos: 0,
        };
        assert_eq!(reader.read_symbol(&tables.luma_dc), 0);
        for _ in 0..3 {
            assert_eq!(reader.read_symbol(&tables.luma_ac), ZRL);
        }
        assert_eq!(reader.read_symbol(&tables.luma_ac), 0xD1);
        reader.skip(1);
        assert_eq!(reader.read_symbol(&tables.luma_ac), EOB);
        assert!(reader.bits_left() < 8);
    }

    #[test]
    fn zero_runs_of_sixteen_code_as_zrl() {
        // Nonzero at 1, then 16 zeros, then nonzero at 18.
        let mut block = [0i16; 64];
        block[1] = 1;
        block[18] = -1;
        let (bytes, _) = encode_to_bytes(&block, 0, true);

        // DC 0 (2 bits) + AC(0,1)=00 (2) + 1 value bit + ZRL (11) +
        // AC(0,1)=00 (2) + 1 value bit + EOB (4) = 23 bits -> 3 bytes.
        assert_eq!(bytes.len(), 3);
        let all_bits = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], 0]);
        // 00 00 1 11111111001 00 0 1010 0...
        let expected: u32 = 0b00_00_1_11111111001_00_0_1010_0 << 8;
        assert_eq!(all_bits, expected);
    }
}
