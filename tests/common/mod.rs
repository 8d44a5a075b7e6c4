//! Hand-assembled MPEG-1 program streams used to exercise the demuxer and
//! video decoder without a real sample file on disk.
use std::cell::RefCell;
use std::rc::Rc;

use mpeg1_video::BitReader;

/// Accumulates bits MSB-first into a byte buffer.
pub struct BitWriter
{
    bytes:    Vec<u8>,
    bit_buf:  u32,
    bit_count: u32,
}

impl BitWriter
{
    pub fn new() -> BitWriter
    {
        BitWriter {
            bytes: Vec::new(),
            bit_buf: 0,
            bit_count: 0,
        }
    }

    /// Append the low `nbits` bits of `value`, MSB first.
    pub fn push(&mut self, value: u32, nbits: u32) -> &mut Self
    {
        for i in (0..nbits).rev()
        {
            let bit = (value >> i) & 1;
            self.bit_buf = (self.bit_buf << 1) | bit;
            self.bit_count += 1;

            if self.bit_count == 8
            {
                self.bytes.push(self.bit_buf as u8);
                self.bit_buf = 0;
                self.bit_count = 0;
            }
        }

        self
    }

    /// Append a codeword written as a string of `'0'`/`'1'` characters.
    pub fn push_code(&mut self, code: &str) -> &mut Self
    {
        for c in code.bytes()
        {
            self.push(u32::from(c - b'0'), 1);
        }

        self
    }

    /// Append a `00 00 01 xx` start code, byte-aligning first.
    pub fn start_code(&mut self, code: u8) -> &mut Self
    {
        self.align();
        self.bytes.extend_from_slice(&[0x00, 0x00, 0x01, code]);
        self
    }

    pub fn align(&mut self) -> &mut Self
    {
        if self.bit_count != 0
        {
            self.bit_buf <<= 8 - self.bit_count;
            self.bytes.push(self.bit_buf as u8);
            self.bit_buf = 0;
            self.bit_count = 0;
        }

        self
    }

    pub fn into_bytes(mut self) -> Vec<u8>
    {
        self.align();
        self.bytes
    }
}

/// A `BitReader` fed the entirety of `bytes` on its first refill.
pub fn reader_over(bytes: Vec<u8>) -> BitReader
{
    let src = Rc::new(RefCell::new(Some(bytes)));

    BitReader::new(Box::new(move |buf: &mut Vec<u8>| match src.borrow_mut().take()
    {
        Some(bytes) =>
        {
            buf.extend_from_slice(&bytes);
            true
        }
        None => false,
    }))
}

/// One 16x16 (single macroblock) all-intra, all-zero-residual picture's
/// worth of video elementary stream syntax: sequence header, one I-picture,
/// one slice, one macroblock, a sequence end code.
///
/// Every DC differential and AC run is zero; with the decoder's first
/// macroblock always starting with `past_intra_address` far enough behind
/// to force the 1024 predictor, every plane ends up flat at sample value
/// 128.
pub fn flat_gray_video_stream() -> Vec<u8>
{
    let mut w = BitWriter::new();

    w.start_code(0xB3); // sequence_header_code
    w.push(16, 12); // width
    w.push(16, 12); // height
    w.push(1, 4); // aspect_ratio_information (square pixels)
    w.push(5, 4); // frame_rate_code (30 fps)
    w.push(0x3FFFF, 18); // bit_rate (variable)
    w.push(1, 1); // marker_bit
    w.push(0, 10); // vbv_buffer_size
    w.push(0, 1); // constrained_parameters_flag
    w.push(0, 1); // load_intra_quantizer_matrix
    w.push(0, 1); // load_non_intra_quantizer_matrix

    w.start_code(0x00); // picture_start_code
    w.push(0, 10); // temporal_reference
    w.push(1, 3); // picture_coding_type = I
    w.push(0xFFFF, 16); // vbv_delay
    w.push(0, 1); // extra_bit_picture = 0 (terminates the loop)

    w.start_code(0x01); // slice_start_code, vertical position 0
    w.push(8, 5); // quantizer_scale
    w.push(0, 1); // extra_bit_slice = 0

    w.push_code("1"); // macroblock_address_increment = 1
    w.push_code("1"); // macroblock_type (I, no quant): intra

    for block_index in 0..6
    {
        if block_index < 4
        {
            w.push_code("100"); // dct_dc_size_luminance = 0 (no differential)
        }
        else
        {
            w.push_code("00"); // dct_dc_size_chrominance = 0 (no differential)
        }

        w.push_code("10"); // dct_coeff EOB
    }

    w.start_code(0xB7); // sequence_end_code

    w.into_bytes()
}
