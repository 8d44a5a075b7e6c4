//! A pure Rust decoder for MPEG-1 video elementary streams, extracted from
//! an MPEG-1 program stream.
//!
//! ```no_run
//! use mpeg1_video::{Demuxer, DecoderOptions, VideoDecoder};
//!
//! let mut demuxer = Demuxer::open("movie.mpg")?;
//! let mut decoder = VideoDecoder::new(DecoderOptions::new());
//!
//! decoder.decode_frames(demuxer.video(), |frame| {
//!     println!("decoded {}x{} frame", frame.width, frame.height);
//! })?;
//! # Ok::<(), mpeg1_video::DecodeErrors>(())
//! ```
//!
//! Audio decoding, RGB conversion and B-picture support are out of scope;
//! see the crate's design notes for why.
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

mod bitreader;
mod demux;
mod errors;
mod frame;
mod options;
mod pes;
mod video;

pub use bitreader::BitReader;
pub use demux::Demuxer;
pub use errors::DecodeErrors;
pub use frame::Frame;
pub use options::{DecoderOptions, MAX_DIMENSION};
pub use video::{SequenceInfo, VideoDecoder};
