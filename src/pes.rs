//! Packetised Elementary Stream (PES) framing as carried inside an MPEG-1
//! program stream.

use crate::bitreader::{BitReader, SENTINEL};
use crate::errors::DecodeErrors;

/// Packet start code for the (single, by design) video elementary stream.
pub(crate) const VIDEO_PACKET: i32 = 0xE0;
/// Packet start code for the audio elementary stream; its payload is skipped
/// wholesale since audio decoding is out of scope.
pub(crate) const AUDIO_PACKET: i32 = 0xC0;

/// Result of parsing a PES packet header: how many payload bytes follow, and
/// the presentation timestamp if one was present.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PesHeader
{
    pub remaining: u16,
    pub pts:       f64,
}

/// Parse a PES header immediately following the packet start-code byte.
///
/// `reader` must be positioned right after the `00 00 01 SC` prefix that
/// identified this as a video or audio packet.
pub(crate) fn parse_pes_header(reader: &mut BitReader) -> Result<PesHeader, DecodeErrors>
{
    let length = reader.consume(16);

    if length == SENTINEL
    {
        return Err(DecodeErrors::UnexpectedEndOfStream);
    }

    let mut remaining = length;

    // Stuffing bytes; each one consumed decrements the remaining length.
    while reader.peek(8) == 0xFF
    {
        reader.consume(8);
        remaining -= 1;
    }

    // Optional 2-bit '01' STD marker. Rare in practice; matched byte-for-byte
    // with the system this was ported from rather than re-derived from the
    // systems-layer spec, since real encoders essentially never emit it.
    if reader.peek(2) == 0b01
    {
        reader.consume(2);
        reader.skip_bytes_while(16);
        remaining -= 2;
    }

    // The two-bit PTS/DTS flag sits in the low half of a nibble whose top two
    // bits are a fixed '00' prefix (the full patterns are 0010/0011/0000);
    // reading all four bits here is what keeps the payload that follows
    // byte-aligned, rather than reading only the low two bits as the
    // discriminator alone would.
    let nibble = reader.consume(4);
    let flag = nibble & 0b11;

    let pts = match flag
    {
        0b11 =>
        {
            let pts = decode_timestamp(reader)?;
            reader.skip(40);
            remaining -= 10;
            pts
        }
        0b10 =>
        {
            let pts = decode_timestamp(reader)?;
            remaining -= 5;
            pts
        }
        0b00 =>
        {
            reader.skip(4);
            remaining -= 1;
            -1.0
        }
        _ => return Err(DecodeErrors::MalformedHeader("invalid PTS/DTS flag in PES header".to_string())),
    };

    Ok(PesHeader {
        remaining: remaining.max(0) as u16,
        pts,
    })
}

/// Decode a 33-bit timestamp split `3 + 1 + 15 + 1 + 15 + 1`, the three
/// single-bit fields being marker bits that are read and discarded.
fn decode_timestamp(reader: &mut BitReader) -> Result<f64, DecodeErrors>
{
    let top = reader.consume(3);
    reader.consume(1);
    let mid = reader.consume(15);
    reader.consume(1);
    let low = reader.consume(15);
    reader.consume(1);

    if top == SENTINEL || mid == SENTINEL || low == SENTINEL
    {
        return Err(DecodeErrors::UnexpectedEndOfStream);
    }

    let value = (top << 30) | (mid << 15) | low;

    Ok(value as f64 / 90000.0)
}
