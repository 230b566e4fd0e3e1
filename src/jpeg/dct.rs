//! Forward 8x8 DCT using the AAN fast algorithm.
//!
//! Two 1-D passes (rows, then columns) of the Arai-Agui-Nakajima
//! decomposition: 29 additions and 5 multiplications per lane. Outputs are
//! deliberately not orthonormalized; each coefficient carries an extra
//! factor of `8 * aan[u] * aan[v]` that the quantizer folds into its
//! reciprocal table.

/// Transforms one 8x8 sample block to frequency space in place.
///
/// Input samples are expected centered on zero (luma level shifted by -128,
/// chroma differences as-is).
pub fn forward_dct_8x8(block: &mut [f32; 64]) {
    for row in 0..8 {
        transform_lane(block, row * 8, 1);
    }
    for col in 0..8 {
        transform_lane(block, col, 8);
    }
}

/// One 8-point AAN butterfly over `block[base + i * stride]` for i in 0..8.
fn transform_lane(block: &mut [f32; 64], base: usize, stride: usize) {
    let at = |i: usize| base + i * stride;

    let tmp0 = block[at(0)] + block[at(7)];
    let tmp7 = block[at(0)] - block[at(7)];
    let tmp1 = block[at(1)] + block[at(6)];
    let tmp6 = block[at(1)] - block[at(6)];
    let tmp2 = block[at(2)] + block[at(5)];
    let tmp5 = block[at(2)] - block[at(5)];
    let tmp3 = block[at(3)] + block[at(4)];
    let tmp4 = block[at(3)] - block[at(4)];

    // Even part.
    let tmp10 = tmp0 + tmp3;
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    block[at(0)] = tmp10 + tmp11;
    block[at(4)] = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * 0.707106781;
    block[at(2)] = tmp13 + z1;
    block[at(6)] = tmp13 - z1;

    // Odd part.
    let tmp10 = tmp4 + tmp5;
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    let z5 = (tmp10 - tmp12) * 0.382683433;
    let z2 = 0.541196100 * tmp10 + z5;
    let z4 = 1.306562965 * tmp12 + z5;
    let z3 = tmp11 * 0.707106781;

    let z11 = tmp7 + z3;
    let z13 = tmp7 - z3;

    block[at(5)] = z13 + z2;
    block[at(3)] = z13 - z2;
    block[at(1)] = z11 + z4;
    block[at(7)] = z11 - z4;
}
