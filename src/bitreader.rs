//! A refillable, bit-granular reader over a byte buffer.
//!
//! This is the lowest layer of the decoder: every syntax element, from a
//! 2-bit PTS/DTS flag to a 32-bit VBV delay, is read through here. The buffer
//! grows by calling a user-supplied refill closure whenever a request can't
//! be satisfied by what's already buffered; the closure either appends fresh
//! bytes to the buffer and returns `true`, or returns `false` to signal that
//! the underlying source is exhausted.
//!
//! Sizes are capped at 32 bits per `consume`/`peek` call, which is all the
//! MPEG-1 systems and video syntax ever needs in one read.
#![allow(clippy::cast_possible_truncation, clippy::cast_lossless)]

/// Returned by [`BitReader::consume`] and [`BitReader::peek`] when the
/// request could not be satisfied even after refilling.
pub const SENTINEL: i64 = -1;

/// Closure type the reader calls to grow its buffer.
///
/// Implementations append freshly read bytes to `buf` and return `true`, or
/// return `false` once there is nothing left to append. The closure owns
/// whatever state it needs to find more bytes (a file handle, a reference
/// back into a demuxer) by capture; the reader itself stays generic over "a
/// capability that can refill me" rather than an opaque `void*` + callback
/// pair.
pub type RefillFn = Box<dyn FnMut(&mut Vec<u8>) -> bool>;

/// A MSB-first bit reader over a growable byte buffer.
pub struct BitReader
{
    data:       Vec<u8>,
    bit_index:  usize,
    ended:      bool,
    start_code: i32,
    refill:     RefillFn,
}

impl BitReader
{
    /// Create a new reader backed by `refill`.
    pub fn new(refill: RefillFn) -> BitReader
    {
        BitReader {
            data: Vec::new(),
            bit_index: 0,
            ended: false,
            start_code: -1,
            refill,
        }
    }

    #[inline]
    fn total_bits(&self) -> usize
    {
        self.data.len() * 8
    }

    /// The start code found by the most recent [`Self::next_start_code`]
    /// call, or `-1` if none has been found yet (or the stream ended first).
    #[inline]
    pub fn start_code(&self) -> i32
    {
        self.start_code
    }

    /// Whether the refill closure has reported end-of-stream.
    ///
    /// Note this can still be `false` immediately before a read that turns
    /// out to fail; `ended` only becomes `true` once a refill has actually
    /// been attempted and come up empty.
    #[inline]
    pub fn is_ended(&self) -> bool
    {
        self.ended
    }

    /// Check whether `n` more bits are available, refilling if not.
    pub fn has_remaining(&mut self, n: u32) -> bool
    {
        if self.bit_index + n as usize <= self.total_bits()
        {
            return true;
        }

        while !self.ended && self.bit_index + n as usize > self.total_bits()
        {
            if !(self.refill)(&mut self.data)
            {
                self.ended = true;
            }
        }

        self.bit_index + n as usize <= self.total_bits()
    }

    /// Read `n` bits (1..=32) MSB-first and advance the cursor.
    ///
    /// Returns [`SENTINEL`] if the stream cannot be refilled to contain `n`
    /// bits.
    pub fn consume(&mut self, n: u32) -> i64
    {
        if n == 0
        {
            return 0;
        }

        if !self.has_remaining(n)
        {
            return SENTINEL;
        }

        let mut acc: i64 = 0;
        let mut remaining = n;

        while remaining > 0
        {
            let byte_idx = self.bit_index / 8;
            let bit_off = (self.bit_index % 8) as u32;
            let available = 8 - bit_off;
            let take = available.min(remaining);

            let byte = u32::from(self.data[byte_idx]);
            let shift = available - take;
            let mask = (1u32 << take) - 1;
            let bits = (byte >> shift) & mask;

            acc = (acc << take) | i64::from(bits);

            self.bit_index += take as usize;
            remaining -= take;
        }

        acc
    }

    /// As [`Self::consume`] but does not advance the cursor.
    pub fn peek(&mut self, n: u32) -> i64
    {
        if !self.has_remaining(n)
        {
            return SENTINEL;
        }

        let save = self.bit_index;
        let v = self.consume(n);
        self.bit_index = save;
        v
    }

    /// Advance by `n` bits if available; a silent no-op otherwise.
    pub fn skip(&mut self, n: u32)
    {
        if self.has_remaining(n)
        {
            self.bit_index += n as usize;
        }
    }

    /// Round the cursor up to the next byte boundary.
    pub fn align(&mut self)
    {
        let rem = self.bit_index % 8;

        if rem != 0
        {
            self.bit_index += 8 - rem;
        }
    }

    /// After aligning, consume consecutive bytes equal to `b`.
    ///
    /// Returns the number of bytes skipped.
    pub fn skip_bytes_while(&mut self, b: u8) -> usize
    {
        self.align();

        let mut count = 0;

        while self.has_remaining(8) && self.data[self.bit_index / 8] == b
        {
            self.bit_index += 8;
            count += 1;
        }

        count
    }

    /// Align to a byte, then scan forward for the three-byte prefix
    /// `00 00 01`.
    ///
    /// On success, [`Self::start_code`] is set to the byte following the
    /// prefix and the cursor is left just after it. On exhaustion,
    /// `start_code` is set to `-1`.
    ///
    /// This checks all three distinct bytes of the prefix; a well known bug
    /// in the system this was ported from compared `data[i]` against zero
    /// three times instead of checking `data[i]`, `data[i+1]`, `data[i+2]`,
    /// which made the "prefix" check trivially true for any zero byte. It
    /// went unnoticed because the demuxer only ever hands this reader
    /// packet-payload-aligned video data. That bug is not reproduced here.
    pub fn next_start_code(&mut self)
    {
        self.align();

        loop
        {
            if !self.has_remaining(32)
            {
                self.start_code = -1;
                return;
            }

            let i = self.bit_index / 8;

            if self.data[i] == 0 && self.data[i + 1] == 0 && self.data[i + 2] == 1
            {
                self.start_code = i32::from(self.data[i + 3]);
                self.bit_index = (i + 4) * 8;
                return;
            }

            self.bit_index += 8;
        }
    }

    /// Peek at the next aligned byte trio; `true` iff it is *not* `00 00 01`.
    ///
    /// Rounds up to the next byte boundary first rather than truncating:
    /// callers use this mid-syntax-element, where the cursor usually sits a
    /// few bits into the current byte, to check whether only padding
    /// remains before the next start code.
    pub fn no_start_code(&mut self) -> bool
    {
        let i = (self.bit_index + 7) / 8;

        if !self.has_remaining((i * 8 - self.bit_index) as u32 + 24)
        {
            return true;
        }

        !(self.data[i] == 0 && self.data[i + 1] == 0 && self.data[i + 2] == 1)
    }
}
