//! Arai-Agui-Nakajima scaled inverse DCT.
//!
//! The two-pass (rows, then columns) factorization and its scaling
//! constants are carried over unchanged from a still image decoder's
//! floating point IDCT; the difference here is what happens to the result
//! afterwards. There, every sample is an AC-centered residual that gets a
//! `+128` level shift and an immediate clamp to `u8` baked into the same
//! function. Here the DC coefficient already carries the block's absolute
//! level (reconstructed separately, see `macroblock::reconstruct_dc`), so
//! this function hands back raw floats and leaves clamping to the caller,
//! which does it once after motion compensation has already added a
//! prediction on top for non-intra blocks.
#![allow(clippy::excessive_precision, clippy::unreadable_literal)]

const A: [f32; 5] = [
    std::f32::consts::FRAC_1_SQRT_2,
    0.541196100146196984399723,
    std::f32::consts::FRAC_1_SQRT_2,
    1.306562964876376527856643,
    0.382683432365089771728460,
];

const S: [f32; 8] = [
    2.82842712474619,
    3.92314112161292,
    3.69551813004514,
    3.32587844921018,
    2.82842712474619,
    2.22228093207840,
    1.53073372946035,
    0.78036128806451,
];

/// One-dimensional AAN IDCT over 8 values starting at `vector[base]` with
/// stride `stride`, written back in place.
#[inline]
fn idct_1d(vector: &mut [f32; 64], base: usize, stride: usize)
{
    let at = |k: usize| vector[base + k * stride];

    let v15 = at(0) * S[0];
    let v26 = at(1) * S[1];
    let v21 = at(2) * S[2];
    let v28 = at(3) * S[3];
    let v16 = at(4) * S[4];
    let v25 = at(5) * S[5];
    let v22 = at(6) * S[6];
    let v27 = at(7) * S[7];

    let v19 = (v25 - v28) * 0.5;
    let v20 = (v26 - v27) * 0.5;
    let v23 = (v26 + v27) * 0.5;
    let v24 = (v25 + v28) * 0.5;

    let v7 = (v23 + v24) * 0.5;
    let v11 = (v21 + v22) * 0.5;
    let v13 = (v23 - v24) * 0.5;
    let v17 = (v21 - v22) * 0.5;

    let v8 = (v15 + v16) * 0.5;
    let v9 = (v15 - v16) * 0.5;

    let v18 = (v19 - v20) * A[4];
    let v12 = (v19 * A[3] - v18) * -1.0;
    let v14 = (v18 - v20 * A[1]) * -1.0;

    let v6 = v14 - v7;
    let v5 = v13 / A[2] - v6;
    let v4 = -v5 - v12;
    let v10 = v17 / A[0] - v11;

    let v0 = (v8 + v11) * 0.5;
    let v1 = (v9 + v10) * 0.5;
    let v2 = (v9 - v10) * 0.5;
    let v3 = (v8 - v11) * 0.5;

    vector[base] = (v0 + v7) * 0.5;
    vector[base + stride] = (v1 + v6) * 0.5;
    vector[base + 2 * stride] = (v2 + v5) * 0.5;
    vector[base + 3 * stride] = (v3 + v4) * 0.5;
    vector[base + 4 * stride] = (v3 - v4) * 0.5;
    vector[base + 5 * stride] = (v2 - v5) * 0.5;
    vector[base + 6 * stride] = (v1 - v6) * 0.5;
    vector[base + 7 * stride] = (v0 - v7) * 0.5;
}

/// Inverse DCT of an 8x8 block stored in raster order, in place.
///
/// A block whose only non-zero coefficient is `block[0] = d` becomes a
/// uniform plane of value `d / 8` everywhere, which is what the intra DC
/// reconstruction and dequantization routines rely on when producing the
/// scaled absolute DC level.
pub(crate) fn inverse_dct(block: &mut [f32; 64])
{
    for row in 0..8
    {
        idct_1d(block, row * 8, 1);
    }

    for col in 0..8
    {
        idct_1d(block, col, 8);
    }
}
