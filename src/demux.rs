//! Splits an MPEG-1 program stream into its physical (file) layer and a
//! virtual, packet-spliced bit reader over the video elementary stream.
use std::cell::RefCell;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

use crate::bitreader::BitReader;
use crate::errors::DecodeErrors;
use crate::pes::{parse_pes_header, AUDIO_PACKET, VIDEO_PACKET};

/// Block size used when refilling the physical reader from the backing file.
const FILE_BLOCK: usize = 32 * 1024;

/// Owns the backing file and exposes a [`BitReader`] that only ever sees
/// video elementary stream bytes.
///
/// The physical reader is shared (via `Rc<RefCell<..>>`) between the
/// `Demuxer` and the closure driving the video reader's refills, since the
/// video refill needs to scan the program stream for the next matching
/// packet on demand.
pub struct Demuxer
{
    physical: Rc<RefCell<BitReader>>,
    video:    BitReader,
}

impl Demuxer
{
    /// Open `path` as an MPEG-1 program stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Demuxer, DecodeErrors>
    {
        let file = File::open(path)?;
        Ok(Demuxer::from_file(file))
    }

    /// Build a demuxer over an already-open file handle.
    pub fn from_file(mut file: File) -> Demuxer
    {
        let file_refill = Box::new(move |buf: &mut Vec<u8>| {
            let mut chunk = [0u8; FILE_BLOCK];

            match file.read(&mut chunk)
            {
                Ok(0) | Err(_) => false,
                Ok(n) =>
                {
                    buf.extend_from_slice(&chunk[..n]);
                    true
                }
            }
        });

        let physical = Rc::new(RefCell::new(BitReader::new(file_refill)));
        let physical_for_video = physical.clone();

        let video_refill = Box::new(move |buf: &mut Vec<u8>| {
            // An explicit loop rather than recursion: every iteration either
            // finds a matching packet and returns, or consumes one
            // non-matching packet (typically audio) and tries again. This
            // terminates because the physical reader's stream is finite.
            loop
            {
                let mut phys = physical_for_video.borrow_mut();

                phys.next_start_code();
                let sc = phys.start_code();

                if sc == -1
                {
                    return false;
                }

                if sc != VIDEO_PACKET && sc != AUDIO_PACKET
                {
                    // Not a packet start code at all (could be a system
                    // header or pack start code); keep scanning.
                    continue;
                }

                let header = match parse_pes_header(&mut phys)
                {
                    Ok(h) => h,
                    Err(_) => return false,
                };

                if sc != VIDEO_PACKET
                {
                    phys.skip(u32::from(header.remaining) * 8);
                    continue;
                }

                buf.reserve(usize::from(header.remaining));

                for _ in 0..header.remaining
                {
                    let byte = phys.consume(8);

                    if byte < 0
                    {
                        return false;
                    }

                    buf.push(byte as u8);
                }

                return true;
            }
        });

        Demuxer {
            physical,
            video: BitReader::new(video_refill),
        }
    }

    /// The video elementary stream reader, fed lazily from PES packets.
    pub fn video(&mut self) -> &mut BitReader
    {
        &mut self.video
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::io::Write;

    fn build_program_stream(payload: &[u8]) -> Vec<u8>
    {
        let mut out = Vec::new();
        out.extend_from_slice(&[0x00, 0x00, 0x01, 0xE0]);
        let length = (payload.len() + 1) as u16; // +1 for the flag/reserved byte
        out.extend_from_slice(&length.to_be_bytes());
        out.push(0b0000_1111); // no PTS/DTS
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn splices_video_payload_out_of_program_stream()
    {
        let payload = [0x00, 0x00, 0x01, 0xB3, 0xAA, 0xBB];
        let stream = build_program_stream(&payload);

        let dir = std::env::temp_dir();
        let path = dir.join(format!("mpeg1-video-test-{:p}.bin", &stream));
        {
            let mut f = File::create(&path).unwrap();
            f.write_all(&stream).unwrap();
        }

        let mut demux = Demuxer::open(&path).unwrap();
        let video = demux.video();
        video.next_start_code();
        assert_eq!(video.start_code(), 0xB3);
        assert_eq!(video.consume(8), 0xAA);
        assert_eq!(video.consume(8), 0xBB);

        let _ = std::fs::remove_file(&path);
    }
}
