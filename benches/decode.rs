use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mpeg1_video::{BitReader, DecoderOptions, VideoDecoder};

/// Minimal MSB-first bit packer, just enough to hand-assemble a synthetic
/// elementary stream for benchmarking without a sample file on disk.
struct BitWriter
{
    bytes:     Vec<u8>,
    bit_buf:   u32,
    bit_count: u32,
}

impl BitWriter
{
    fn new() -> BitWriter
    {
        BitWriter { bytes: Vec::new(), bit_buf: 0, bit_count: 0 }
    }

    fn push(&mut self, value: u32, nbits: u32) -> &mut Self
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

    fn push_code(&mut self, code: &str) -> &mut Self
    {
        for c in code.bytes()
        {
            self.push(u32::from(c - b'0'), 1);
        }

        self
    }

    fn start_code(&mut self, code: u8) -> &mut Self
    {
        self.align();
        self.bytes.extend_from_slice(&[0x00, 0x00, 0x01, code]);
        self
    }

    fn align(&mut self) -> &mut Self
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

    fn into_bytes(mut self) -> Vec<u8>
    {
        self.align();
        self.bytes
    }
}

/// A handful of all-intra, all-zero-residual macroblocks covering a 64x48
/// (4x3 macroblock) picture, repeated for a few frames.
fn synthetic_stream(frame_count: u32) -> Vec<u8>
{
    let mut w = BitWriter::new();

    w.start_code(0xB3);
    w.push(64, 12);
    w.push(48, 12);
    w.push(1, 4);
    w.push(5, 4);
    w.push(0x3FFFF, 18);
    w.push(1, 1);
    w.push(0, 10);
    w.push(0, 1);
    w.push(0, 1);
    w.push(0, 1);

    for _ in 0..frame_count
    {
        w.start_code(0x00);
        w.push(0, 10);
        w.push(1, 3);
        w.push(0xFFFF, 16);
        w.push(0, 1);

        w.start_code(0x01);
        w.push(8, 5);
        w.push(0, 1);

        for mb in 0..12
        {
            w.push_code(if mb == 0 { "1" } else { "1" }); // macroblock_address_increment = 1 each time
            w.push_code("1"); // macroblock_type: intra

            for _ in 0..6
            {
                w.push_code("00"); // dct_dc_size = 0
                w.push_code("10"); // EOB
            }
        }
    }

    w.start_code(0xB7);
    w.into_bytes()
}

fn reader_over(bytes: Vec<u8>) -> BitReader
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

fn decode_stream(bytes: Vec<u8>) -> usize
{
    let mut reader = reader_over(bytes);
    let mut decoder = VideoDecoder::new(DecoderOptions::new());
    let mut frames = 0;

    decoder.decode_frames(&mut reader, |_| frames += 1).unwrap();
    frames
}

fn criterion_benchmark(c: &mut Criterion)
{
    let stream = synthetic_stream(8);

    c.bench_function("decode 8 all-intra 64x48 frames", |b| {
        b.iter(|| black_box(decode_stream(stream.clone())))
    });
}

criterion_group!(name = benches;
    config = {
        let c = Criterion::default();
        c.measurement_time(Duration::from_secs(10))
    };
    targets = criterion_benchmark);
criterion_main!(benches);
