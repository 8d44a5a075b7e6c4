//! Contains the error taxonomy produced while demultiplexing and decoding an
//! MPEG-1 program stream.
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;

/// Common decode errors.
///
/// The decoder is best-effort: once one of these is returned from
/// [`crate::video::VideoDecoder::decode_frames`] or
/// [`crate::demux::Demuxer::next_packet`], no further frames will be produced.
/// Non-fatal anomalies (B-pictures, unknown start codes, stuffing bytes) are
/// silently skipped rather than surfaced here.
#[allow(clippy::module_name_repetitions)]
pub enum DecodeErrors
{
    /// The backing file could not be opened.
    FileOpenError(io::Error),
    /// A `consume`/`has_remaining` call on a [`crate::bitreader::BitReader`]
    /// could not be satisfied even after refilling.
    UnexpectedEndOfStream,
    /// A header field carried a value the syntax forbids, e.g.
    /// `forward_f_code == 0` or an illegal PTS/DTS marker combination.
    MalformedHeader(String),
    /// A VLC tree walk hit the `-1` "illegal code" sentinel.
    InvalidVlc(&'static str),
    /// A computed macroblock row/column fell outside the `mb_width x
    /// mb_height` grid implied by the active sequence header.
    GeometryError(String),
}

impl Debug for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::FileOpenError(e) => write!(f, "Could not open input file: {}", e),
            Self::UnexpectedEndOfStream =>
            {
                write!(f, "Ran out of bits before the current syntax element finished decoding")
            }
            Self::MalformedHeader(reason) => write!(f, "Malformed header: {}", reason),
            Self::InvalidVlc(table) => write!(f, "Illegal variable length code in `{}` table", table),
            Self::GeometryError(reason) => write!(f, "Macroblock geometry error: {}", reason),
        }
    }
}

impl Display for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        Debug::fmt(self, f)
    }
}

impl Error for DecodeErrors {}

impl From<io::Error> for DecodeErrors
{
    fn from(e: io::Error) -> Self
    {
        DecodeErrors::FileOpenError(e)
    }
}
