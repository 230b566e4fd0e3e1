//! Quantization tables and coefficient quantization.
//!
//! Each quality tier derives two integer divisor matrices (luma and chroma)
//! from fixed base tables, then precomputes per-coefficient f32 reciprocals
//! that also fold in the DCT's `8 * aan[x] * aan[y]` output scaling. The hot
//! path is then one multiply, one floor, and a zigzag store per coefficient.

/// Base luminance divisors, ITU-T T.81 Annex K.1.
const BASE_LUMA: [u8; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Base chrominance divisors. Not the Annex K.2 chroma table; the entries
/// are K.1 luma values in a rotated order, kept verbatim for bitstream
/// compatibility.
const BASE_CHROMA: [u8; 64] = [
    16, 12, 14, 14, 18, 24, 49, 72, //
    11, 10, 16, 24, 40, 51, 61, 12, //
    13, 17, 22, 35, 64, 92, 14, 16, //
    22, 37, 55, 78, 95, 19, 24, 29, //
    56, 64, 87, 98, 26, 40, 51, 68, //
    81, 103, 112, 58, 57, 87, 109, 104, //
    121, 100, 60, 69, 80, 103, 113, 120, //
    103, 55, 56, 62, 77, 92, 101, 99,
];

/// Zigzag position for each natural (row-major) coefficient index.
const ZIGZAG: [u8; 64] = [
    0, 1, 5, 6, 14, 15, 27, 28, //
    2, 4, 7, 13, 16, 26, 29, 42, //
    3, 8, 12, 17, 25, 30, 41, 43, //
    9, 11, 18, 24, 31, 40, 44, 53, //
    10, 19, 23, 32, 39, 45, 52, 54, //
    20, 22, 33, 38, 46, 51, 55, 60, //
    21, 34, 37, 47, 50, 56, 59, 61, //
    35, 36, 48, 49, 57, 58, 62, 63,
];

/// AAN DCT output scale factor per 1-D frequency index.
const AAN_SCALE: [f32; 8] = [
    1.0,
    1.387039845,
    1.306562965,
    1.175875602,
    1.0,
    0.785694958,
    0.541196100,
    0.275899379,
];

/// Active quantization state for one encode: the integer divisor matrices
/// in table storage order (these bytes go straight into DQT segments) and
/// the reciprocal tables consumed per block.
pub struct QuantizationTables {
    pub luminance: [u8; 64],
    pub chrominance: [u8; 64],
    pub luminance_table: [f32; 64],
    pub chrominance_table: [f32; 64],
}

impl QuantizationTables {
    /// Builds the tables for a quality tier in `1..=3`.
    ///
    /// Tier 1 uses the base matrices unscaled, tier 2 divides every entry
    /// by 10, tier 3 sets every divisor to 1 (near-lossless). Scaled
    /// entries clamp to a minimum of 1.
    pub fn with_tier(tier: u8) -> Self {
        debug_assert!((1..=3).contains(&tier));
        let (luminance, chrominance) = match tier {
            3 => ([1u8; 64], [1u8; 64]),
            _ => {
                let factor = if tier == 2 { 10 } else { 1 };
                let mut luma = [0u8; 64];
                let mut chroma = [0u8; 64];
                for i in 0..64 {
                    luma[i] = (BASE_LUMA[i] / factor).max(1);
                    chroma[i] = (BASE_CHROMA[i] / factor).max(1);
                }
                (luma, chroma)
            }
        };

        QuantizationTables {
            luminance,
            chrominance,
            luminance_table: reciprocal_table(&luminance),
            chrominance_table: reciprocal_table(&chrominance),
        }
    }
}

/// Reciprocals for the divisor matrix, with the DCT scaling folded in.
///
/// The divisor for natural index `(x, y)` is looked up through the zigzag
/// table; the matrix bytes and this lookup are a consistent pair with how
/// DQT serializes the matrix.
fn reciprocal_table(matrix: &[u8; 64]) -> [f32; 64] {
    let mut table = [0.0f32; 64];
    for y in 0..8 {
        for x in 0..8 {
            let i = y * 8 + x;
            table[i] =
                1.0 / (8.0 * AAN_SCALE[x] * AAN_SCALE[y] * matrix[ZIGZAG[i] as usize] as f32);
        }
    }
    table
}

/// Quantizes one DCT block and reorders it into zigzag order.
///
/// Rounding is `floor(x + 1024 + 0.5) - 1024`: nearest integer with halves
/// rounding toward positive infinity, not half-to-even. The exact form is
/// part of the output contract.
pub fn quantize_block(block: &[f32; 64], table: &[f32; 64]) -> [i16; 64] {
    let mut out = [0i16; 64];
    for i in 0..64 {
        let scaled = block[i] * table[i];
        let val = (scaled + 1024.0 + 0.5).floor() - 1024.0;
        out[ZIGZAG[i] as usize] = val as i16;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_one_keeps_base_matrices() {
        let tables = QuantizationTables::with_tier(1);
        assert_eq!(tables.luminance, BASE_LUMA);
        assert_eq!(tables.chrominance, BASE_CHROMA);
    }

    #[test]
    fn tier_two_divides_by_ten_with_floor_one() {
        let tables = QuantizationTables::with_tier(2);
        for i in 0..64 {
            assert_eq!(tables.luminance[i], (BASE_LUMA[i] / 10).max(1));
            assert_eq!(tables.chrominance[i], (BASE_CHROMA[i] / 10).max(1));
        }
        // Entries below 10 clamp to 1 rather than 0.
        assert_eq!(tables.luminance[1], 1);
    }

    #[test]
    fn tier_three_is_all_ones() {
        let tables = QuantizationTables::with_tier(3);
        assert!(tables.luminance.iter().all(|&v| v == 1));
        assert!(tables.chrominance.iter().all(|&v| v == 1));
    }

    #[test]
    fn reciprocals_fold_dct_scaling() {
        let tables = QuantizationTables::with_tier(3);
        // All divisors 1, so the DC reciprocal is exactly 1/8.
        assert_eq!(tables.luminance_table[0], 1.0 / 8.0);
        // Index (1, 0) divides by the first AAN factor as well.
        let expected = 1.0 / (8.0 * AAN_SCALE[1]);
        assert!((tables.luminance_table[1] - expected).abs() < 1e-7);

        let tables = QuantizationTables::with_tier(1);
        // DC divisor is BASE_LUMA[0] = 16 via the zigzag lookup.
        assert_eq!(tables.luminance_table[0], 1.0 / 128.0);
    }

    #[test]
    fn rounding_halves_go_toward_positive_infinity() {
        let identity = [1.0f32; 64];
        let mut block = [0.0f32; 64];
        block[0] = 2.5;
        block[1] = -2.5;
        block[2] = 2.4;
        block[3] = -2.6;
        let out = quantize_block(&block, &identity);
        assert_eq!(out[ZIGZAG[0] as usize], 3);
        assert_eq!(out[ZIGZAG[1] as usize], -2);
        assert_eq!(out[ZIGZAG[2] as usize], 2);
        assert_eq!(out[ZIGZAG[3] as usize], -3);
    }

    #[test]
    fn coefficients_store_at_zigzag_positions() {
        let identity = [1.0f32; 64];
        let mut block = [0.0f32; 64];
        block[8] = 7.0; // natural (0, 1)
        block[2] = 9.0; // natural (2, 0)
        let out = quantize_block(&block, &identity);
        assert_eq!(out[2], 7);
        assert_eq!(out[5], 9);
        assert_eq!(out.iter().filter(|&&v| v != 0).count(), 2);
    }

    #[test]
    fn zigzag_is_a_permutation() {
        let mut seen = [false; 64];
        for &pos in &ZIGZAG {
            assert!(!seen[pos as usize]);
            seen[pos as usize] = true;
        }
    }
}
