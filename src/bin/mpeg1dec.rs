//! Command-line front end: decode an MPEG-1 program stream's video and
//! print a one-line summary per frame.
#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mpeg1_video::{DecoderOptions, Demuxer, VideoDecoder, MAX_DIMENSION};

#[derive(Parser)]
#[clap(name = "mpeg1dec", about = "Decode the video elementary stream of an MPEG-1 program stream")]
struct Args
{
    /// Path to an MPEG-1 program stream (.mpg/.m2v)
    input: PathBuf,

    /// Enable verbose (debug-level) logging
    #[clap(short, long)]
    verbose: bool,

    /// Reject sequences larger than this before decoding any pictures
    #[clap(long, default_value_t = MAX_DIMENSION)]
    max_width: u16,

    #[clap(long, default_value_t = MAX_DIMENSION)]
    max_height: u16,
}

fn main() -> ExitCode
{
    let args = Args::parse();

    if args.verbose
    {
        std::env::set_var("RUST_LOG", "debug");
    }

    pretty_env_logger::init();

    let options = DecoderOptions::new().set_max_width(args.max_width).set_max_height(args.max_height);

    match run(&args.input, options)
    {
        Ok(frame_count) =>
        {
            println!("decoded {frame_count} frames");
            ExitCode::SUCCESS
        }
        Err(e) =>
        {
            eprintln!("mpeg1dec: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &std::path::Path, options: DecoderOptions) -> Result<u64, mpeg1_video::DecodeErrors>
{
    let mut demuxer = Demuxer::open(input)?;
    let mut decoder = VideoDecoder::new(options);
    let mut frame_count = 0u64;

    decoder.decode_frames(demuxer.video(), |frame| {
        frame_count += 1;
        info!("frame {}: {}x{}", frame_count, frame.width, frame.height);
    })?;

    Ok(frame_count)
}
