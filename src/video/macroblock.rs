//! Macroblock and block level syntax: address increments, macroblock type,
//! motion vectors, coded block pattern, and the six 8x8 block coefficient
//! decodes that make up a macroblock's residual (or, for intra macroblocks,
//! its full content).
use crate::errors::DecodeErrors;
use crate::frame::Frame;
use crate::bitreader::BitReader;

use super::idct;
use super::tables;
use super::tables::{DCT_ESCAPE, EOB};
use super::{PictureType, VideoDecoder};

const STUFFING: i32 = 34;
const ESCAPE: i32 = 35;

/// Decode one macroblock (and any macroblocks skipped to reach it) and
/// write its reconstructed samples into `frame`.
pub(crate) fn decode(dec: &mut VideoDecoder, reader: &mut BitReader, frame: &mut Frame) -> Result<(), DecodeErrors>
{
    let increment = decode_address_increment(dec, reader)?;

    if increment > 1
    {
        if dec.picture_type == PictureType::Intra
        {
            return Err(DecodeErrors::MalformedHeader(
                "macroblock_address_increment skipped macroblocks in an I-picture".to_string(),
            ));
        }

        for skipped in 1..increment
        {
            let address = dec.macroblock_address + skipped;
            copy_skipped_macroblock(dec, frame, address);
        }

        dec.motion_forward = (0, 0);
    }

    dec.macroblock_address += increment;

    let mb_type = if dec.picture_type == PictureType::Intra
    {
        dec.mb_type_i.decode(reader)?
    }
    else
    {
        dec.mb_type_p.decode(reader)?
    };

    let intra = mb_type & 0b0_0001 != 0;
    let pattern_coded = mb_type & 0b0_0010 != 0;
    let motion_forward = mb_type & 0b0_1000 != 0;
    let quant = mb_type & 0b1_0000 != 0;

    if quant
    {
        dec.quantizer_scale = reader.consume(5) as i32;
    }

    let motion = if motion_forward
    {
        Some(decode_motion_vector(dec, reader)?)
    }
    else
    {
        None
    };

    if intra
    {
        dec.past_intra_address = dec.macroblock_address;
    }

    let cbp = if intra
    {
        0x3F
    }
    else if pattern_coded
    {
        dec.code_block_pattern.decode(reader)?
    }
    else
    {
        0
    };

    let (mb_x, mb_y) = mb_origin(dec, dec.macroblock_address);

    for block_index in 0..6
    {
        let coded = intra || (cbp >> (5 - block_index)) & 1 == 1;

        let mut block = [0.0f32; 64];

        if intra
        {
            decode_intra_block(dec, reader, block_index, &mut block)?;
        }
        else if coded
        {
            decode_non_intra_block(dec, reader, block_index, &mut block)?;
        }

        idct::inverse_dct(&mut block);

        write_block(dec, frame, mb_x, mb_y, block_index, &block, intra, motion);
    }

    Ok(())
}

/// `macroblock_address_increment`, absorbing stuffing and escape codes.
fn decode_address_increment(dec: &mut VideoDecoder, reader: &mut BitReader) -> Result<i32, DecodeErrors>
{
    let mut increment = 0;

    loop
    {
        let v = dec.mb_address_increment.decode(reader)?;

        match v
        {
            STUFFING => continue,
            ESCAPE => increment += 33,
            _ =>
            {
                increment += v;
                return Ok(increment);
            }
        }
    }
}

fn mb_origin(dec: &VideoDecoder, address: i32) -> (usize, usize)
{
    let mb_width = i32::from(dec.mb_width);
    let x = (address % mb_width) * 16;
    let y = (address / mb_width) * 16;
    (x as usize, y as usize)
}

/// A macroblock the bitstream skipped entirely: copy the co-located
/// macroblock from the reference frame unchanged (zero motion, no
/// residual).
fn copy_skipped_macroblock(dec: &VideoDecoder, frame: &mut Frame, address: i32)
{
    let (x, y) = mb_origin(dec, address);

    let Some(reference) = dec.reference.as_ref()
    else
    {
        return;
    };

    for plane in 0..3
    {
        let width = frame.width;
        let height = frame.height;
        let src = reference.plane(plane);
        let dst = frame.plane_mut(plane);

        for row in 0..16
        {
            for col in 0..16
            {
                let py = y + row;
                let px = x + col;

                if py < height && px < width
                {
                    dst[py * width + px] = src[py * width + px];
                }
            }
        }
    }
}

/// Decode a forward motion vector component pair (horizontal, vertical) and
/// fold it into the running predictor.
///
/// `full_pel_forward` scales both components identically; the system this
/// was ported from only scaled the vertical component, a long-standing bug
/// that is not reproduced here (see the design notes).
fn decode_motion_vector(dec: &mut VideoDecoder, reader: &mut BitReader) -> Result<(i32, i32), DecodeErrors>
{
    let dh = decode_motion_component(dec, reader)?;
    let dv = decode_motion_component(dec, reader)?;

    let scale = if dec.full_pel_forward { 2 } else { 1 };

    let (pred_h, pred_v) = dec.motion_forward;
    // forward_f = 2^(forward_f_code - 1); the valid range is
    // [-16*forward_f, 16*forward_f - 1], so the wrap bound is 16*forward_f,
    // not 16*2^forward_f_code.
    let high = 16 << (dec.forward_f_code - 1);

    let mut h = pred_h + dh * scale;
    let mut v = pred_v + dv * scale;

    if h < -high
    {
        h += 2 * high;
    }
    else if h >= high
    {
        h -= 2 * high;
    }

    if v < -high
    {
        v += 2 * high;
    }
    else if v >= high
    {
        v -= 2 * high;
    }

    dec.motion_forward = (h, v);
    Ok((h, v))
}

fn decode_motion_component(dec: &VideoDecoder, reader: &mut BitReader) -> Result<i32, DecodeErrors>
{
    let code = dec.motion_code.decode(reader)?;

    if dec.forward_f_code <= 1 || code == 0
    {
        return Ok(code);
    }

    let r_size = dec.forward_f_code - 1;
    let f = 1 << r_size;
    let residual = reader.consume(r_size as u32);

    if residual < 0
    {
        return Err(DecodeErrors::UnexpectedEndOfStream);
    }

    let residual = residual as i32;

    Ok(if code > 0
    {
        (code - 1) * f + residual + 1
    }
    else
    {
        -((-code - 1) * f + residual + 1)
    })
}

/// Quantizer matrix entry for `block_index` (0..=3 luma, 4 Cb, 5 Cr) at
/// raster position `raster`, honoring whichever matrix the current
/// macroblock type uses.
fn quantizer_value(dec: &VideoDecoder, intra: bool, raster: usize) -> i32
{
    i32::from(if intra
    {
        dec.intra_quantizer_matrix[raster]
    }
    else
    {
        dec.non_intra_quantizer_matrix[raster]
    })
}

/// Dequantize one AC coefficient, applying the mandatory "oddification"
/// that nudges every non-zero result to an odd value, then saturating to
/// the 12-bit signed range the syntax allows.
fn dequantize(level: i32, quantizer_scale: i32, matrix_entry: i32) -> i32
{
    if level == 0
    {
        return 0;
    }

    let mut value = (2 * level * quantizer_scale * matrix_entry) / 16;

    if value == 0
    {
        return 0;
    }

    if value % 2 == 0
    {
        value -= value.signum();
    }

    value.clamp(-2048, 2047)
}

fn decode_intra_block(
    dec: &mut VideoDecoder, reader: &mut BitReader, block_index: i32, out: &mut [f32; 64],
) -> Result<(), DecodeErrors>
{
    let plane = plane_of(block_index);

    let size = if plane == 0
    {
        dec.dct_size_luminance.decode(reader)?
    }
    else
    {
        dec.dct_size_chrominance.decode(reader)?
    };

    let diff = if size == 0
    {
        0
    }
    else
    {
        let bits = reader.consume(size as u32);

        if bits < 0
        {
            return Err(DecodeErrors::UnexpectedEndOfStream);
        }

        let bits = bits as i32;
        let half = 1 << (size - 1);

        if bits >= half
        {
            bits
        }
        else
        {
            bits - (1 << size) + 1
        }
    };

    let gap = dec.macroblock_address - dec.past_intra_address;
    let predictor = if gap > 1 { 1024 } else { dec.dct_dc_past[plane] };
    // dct_dc_past (and the 128 reset value, as 128*8) are tracked in ×8
    // units so intra DC reconstruction stays in the same fixed-point scale
    // the inverse quantizer and IDCT expect; the differential itself is in
    // sample units and must be scaled up to match.
    let dc_value = predictor + diff * 8;

    dec.dct_dc_past[plane] = dc_value;
    out[0] = dc_value as f32;

    decode_coefficients(dec, reader, true, plane, out)
}

fn decode_non_intra_block(
    dec: &mut VideoDecoder, reader: &mut BitReader, block_index: i32, out: &mut [f32; 64],
) -> Result<(), DecodeErrors>
{
    let plane = plane_of(block_index);
    decode_coefficients(dec, reader, false, plane, out)
}

fn plane_of(block_index: i32) -> usize
{
    match block_index
    {
        0..=3 => 0,
        4 => 1,
        _ => 2,
    }
}

/// Decode the run-length coded AC coefficients (or, for a non-intra block,
/// all coefficients including position zero) into `out`, already in raster
/// order.
fn decode_coefficients(
    dec: &mut VideoDecoder, reader: &mut BitReader, intra: bool, plane: usize, out: &mut [f32; 64],
) -> Result<(), DecodeErrors>
{
    let mut scan_pos = if intra { 1 } else { 0 };

    loop
    {
        let symbol = dec.dct_coeff.decode(reader)?;

        let (run, level) = if symbol == EOB && scan_pos == 0
        {
            // dct_coeff_first (Table B.15): the bit pattern that means
            // end-of-block everywhere else means run 0, level 1 (sign in
            // the bit that follows) as the very first coefficient of a
            // non-intra block, since a coded block can't be empty.
            let sign = reader.consume(1);

            if sign < 0
            {
                return Err(DecodeErrors::UnexpectedEndOfStream);
            }

            (0, if sign == 1 { -1 } else { 1 })
        }
        else if symbol == EOB
        {
            return Ok(());
        }
        else if symbol == DCT_ESCAPE
        {
            let run = reader.consume(6);
            let level_bits = reader.consume(8);

            if run < 0 || level_bits < 0
            {
                return Err(DecodeErrors::UnexpectedEndOfStream);
            }

            let run = run as i32;
            let level_bits = level_bits as i32;

            // The 8-bit escape level has MPEG-1 extensions for magnitudes
            // that don't fit: 0 means "read another 8 bits, unsigned,
            // large positive"; 128 means the same but negated; anything
            // else above 128 is already the two's-complement negative
            // form of an 8-bit signed value.
            let level = if level_bits == 0
            {
                let extra = reader.consume(8);

                if extra < 0
                {
                    return Err(DecodeErrors::UnexpectedEndOfStream);
                }

                extra as i32
            }
            else if level_bits == 128
            {
                let extra = reader.consume(8);

                if extra < 0
                {
                    return Err(DecodeErrors::UnexpectedEndOfStream);
                }

                extra as i32 - 256
            }
            else if level_bits > 128
            {
                level_bits - 256
            }
            else
            {
                level_bits
            };

            (run, level)
        }
        else
        {
            let run = (symbol >> 8) & 0xFF;
            let level_abs = symbol & 0xFF;
            let sign = reader.consume(1);

            if sign < 0
            {
                return Err(DecodeErrors::UnexpectedEndOfStream);
            }

            (run, if sign == 1 { -level_abs } else { level_abs })
        };

        scan_pos += run;

        if scan_pos >= 64
        {
            return Err(DecodeErrors::InvalidVlc("dct_coeff run ran past the end of the block"));
        }

        let raster = tables::ZIG_ZAG[scan_pos as usize];
        let matrix_entry = quantizer_value(dec, intra, raster);
        out[raster] = dequantize(level, dec.quantizer_scale, matrix_entry) as f32;

        scan_pos += 1;
    }
}

/// Clamp, optionally add motion-compensated prediction, and write one 8x8
/// block into `frame`.
///
/// Chroma blocks are replicated 2x2 into the frame's luma-resolution
/// chroma planes: each decoded chroma sample covers a 2x2 pixel footprint.
fn write_block(
    dec: &VideoDecoder, frame: &mut Frame, mb_x: usize, mb_y: usize, block_index: i32, block: &[f32; 64], intra: bool,
    motion: Option<(i32, i32)>,
)
{
    let plane = plane_of(block_index);

    let (block_x, block_y, sub) = match block_index
    {
        0 => (mb_x, mb_y, 1),
        1 => (mb_x + 8, mb_y, 1),
        2 => (mb_x, mb_y + 8, 1),
        3 => (mb_x + 8, mb_y + 8, 1),
        _ => (mb_x / 2, mb_y / 2, 2),
    };

    let width = frame.width;
    let height = frame.height;

    for row in 0..8
    {
        for col in 0..8
        {
            let residual = block[row * 8 + col];

            let sample = if intra
            {
                residual
            }
            else
            {
                let predicted = predict_sample(dec, plane, block_x + col, block_y + row, sub, motion);
                predicted + residual
            };

            let sample = sample.round().clamp(0.0, 255.0) as u8;

            for dy in 0..sub
            {
                for dx in 0..sub
                {
                    let py = (block_y + row) * sub + dy;
                    let px = (block_x + col) * sub + dx;

                    if py < height && px < width
                    {
                        frame.plane_mut(plane)[py * width + px] = sample;
                    }
                }
            }
        }
    }
}

/// Half-pel motion-compensated prediction: averages the up-to-four
/// reference samples a half-pel offset straddles.
///
/// `x`/`y` are in the caller's block-iteration grid (pixels for luma, the
/// reduced 8-samples-per-macroblock grid for chroma); `sub` converts that
/// back to the frame's actual (luma-resolution, for both planes) pixel
/// grid. The same motion vector is applied to chroma as to luma: both
/// planes live in the same upsampled coordinate space by construction, so
/// no separate chroma motion-vector scaling is needed.
fn predict_sample(dec: &VideoDecoder, plane: usize, x: usize, y: usize, sub: usize, motion: Option<(i32, i32)>) -> f32
{
    let Some((mv_h, mv_v)) = motion
    else
    {
        return 0.0;
    };

    let Some(reference) = dec.reference.as_ref()
    else
    {
        return 0.0;
    };

    let plane_w = reference.width as i32;
    let plane_h = reference.height as i32;

    let full_x = (x * sub) as i32 * 2 + mv_h;
    let full_y = (y * sub) as i32 * 2 + mv_v;

    let x0 = (full_x / 2).clamp(0, plane_w - 1);
    let y0 = (full_y / 2).clamp(0, plane_h - 1);
    let x1 = ((full_x + 1) / 2).clamp(0, plane_w - 1);
    let y1 = ((full_y + 1) / 2).clamp(0, plane_h - 1);

    let data = reference.plane(plane);
    let sample = |xx: i32, yy: i32| f32::from(data[yy as usize * plane_w as usize + xx as usize]);

    (sample(x0, y0) + sample(x1, y0) + sample(x0, y1) + sample(x1, y1)) / 4.0
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::options::DecoderOptions;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn reader_over(bits: &str) -> BitReader
    {
        let mut writer_bytes = Vec::new();
        let mut buf = 0u8;
        let mut count = 0u32;

        for c in bits.bytes()
        {
            buf = (buf << 1) | (c - b'0');
            count += 1;

            if count == 8
            {
                writer_bytes.push(buf);
                buf = 0;
                count = 0;
            }
        }

        if count != 0
        {
            buf <<= 8 - count;
            writer_bytes.push(buf);
        }

        let src = Rc::new(RefCell::new(Some(writer_bytes)));

        BitReader::new(Box::new(move |out: &mut Vec<u8>| match src.borrow_mut().take()
        {
            Some(bytes) =>
            {
                out.extend_from_slice(&bytes);
                true
            }
            None => false,
        }))
    }

    fn codeword_for(magnitude: i32) -> String
    {
        tables::motion_code_table()
            .into_iter()
            .find(|(_, v)| *v == magnitude)
            .map(|(c, _)| c)
            .unwrap()
    }

    /// Testable property: a forward motion vector component reconstructs by
    /// adding the decoded delta to the running predictor and wrapping into
    /// `[-16*forward_f, 16*forward_f - 1]`, `forward_f = 2^(forward_f_code -
    /// 1)`. With `forward_f_code = 1` (`forward_f = 1`) and a predictor of
    /// 0, a decoded magnitude of 16 must wrap to -16 rather than landing
    /// exactly on the (exclusive) upper bound.
    #[test]
    fn motion_vector_wraps_at_the_forward_f_scaled_bound()
    {
        let mut dec = VideoDecoder::new(DecoderOptions::new());
        dec.forward_f_code = 1;
        dec.motion_forward = (0, 0);

        let bits = format!("{}{}", codeword_for(16), codeword_for(0));
        let mut reader = reader_over(&bits);

        let (h, v) = decode_motion_vector(&mut dec, &mut reader).unwrap();

        assert_eq!(h, -16);
        assert_eq!(v, 0);
    }

    #[test]
    fn dequantize_rounds_even_results_to_odd()
    {
        assert_eq!(dequantize(1, 8, 16), 15);
        assert_eq!(dequantize(0, 8, 16), 0);
        assert_eq!(dequantize(-1, 8, 16), -15);
    }

    #[test]
    fn dequantize_saturates_to_twelve_bit_range()
    {
        assert_eq!(dequantize(1000, 31, 83), 2047);
        assert_eq!(dequantize(-1000, 31, 83), -2048);
    }
}
