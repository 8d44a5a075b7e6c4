//! MPEG-1 video elementary stream decoding: sequence, group-of-pictures,
//! picture and slice syntax. Macroblock and block level decoding lives in
//! [`macroblock`]; the inverse DCT in [`idct`]; static tables and VLC
//! construction in [`tables`] and [`vlc`].
mod idct;
mod macroblock;
mod tables;
mod vlc;

use crate::bitreader::BitReader;
use crate::errors::DecodeErrors;
use crate::frame::Frame;
use crate::options::DecoderOptions;
use vlc::VlcTable;

const PICTURE_START_CODE: i32 = 0x00;
const SLICE_MIN: i32 = 0x01;
const SLICE_MAX: i32 = 0xAF;
const USER_DATA_START_CODE: i32 = 0xB2;
const SEQUENCE_HEADER_CODE: i32 = 0xB3;
const EXTENSION_START_CODE: i32 = 0xB5;
const SEQUENCE_END_CODE: i32 = 0xB7;
const GROUP_START_CODE: i32 = 0xB8;

/// `picture_coding_type`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum PictureType
{
    Intra,
    Predicted,
}

/// Per-picture summary handed out alongside each decoded [`Frame`].
#[derive(Copy, Clone, Debug, Default)]
pub struct SequenceInfo
{
    pub width:        u16,
    pub height:       u16,
    pub frame_rate:   f64,
    pub aspect_ratio: f64,
}

/// Decodes a video elementary stream, one [`Frame`] at a time, into a caller
/// supplied hook.
///
/// Holds every piece of state a macroblock decode needs: the active
/// quantizer matrices (which a sequence header may replace), the VLC tables
/// (built once, since the table contents never change mid-stream), the
/// reference frame used for motion compensation, and the running
/// DC/motion-vector predictors that get reset at slice boundaries.
pub struct VideoDecoder
{
    options: DecoderOptions,

    width:  u16,
    height: u16,
    mb_width:  u16,
    mb_height: u16,
    aspect_ratio: f64,
    frame_rate:   f64,

    intra_quantizer_matrix:     [u8; 64],
    non_intra_quantizer_matrix: [u8; 64],

    mb_address_increment: VlcTable,
    mb_type_i: VlcTable,
    mb_type_p: VlcTable,
    dct_size_luminance: VlcTable,
    dct_size_chrominance: VlcTable,
    motion_code: VlcTable,
    code_block_pattern: VlcTable,
    dct_coeff: VlcTable,

    reference: Option<Frame>,

    picture_type: PictureType,
    quantizer_scale: i32,
    full_pel_forward: bool,
    forward_f_code: i32,

    macroblock_address: i32,
    past_intra_address: i32,
    dct_dc_past: [i32; 3],
    motion_forward: (i32, i32),
}

impl VideoDecoder
{
    #[must_use]
    pub fn new(options: DecoderOptions) -> VideoDecoder
    {
        let motion_code_owned = tables::motion_code_table();
        let motion_code_refs: Vec<(&str, i32)> = motion_code_owned.iter().map(|(c, v)| (c.as_str(), *v)).collect();

        let dct_coeff_owned = tables::dct_coeff_table();
        let dct_coeff_refs: Vec<(&str, i32)> = dct_coeff_owned.iter().map(|(c, v)| (c.as_str(), *v)).collect();

        VideoDecoder {
            options,
            width: 0,
            height: 0,
            mb_width: 0,
            mb_height: 0,
            aspect_ratio: 0.0,
            frame_rate: 0.0,
            intra_quantizer_matrix: tables::DEFAULT_INTRA_QUANTIZER_MATRIX,
            non_intra_quantizer_matrix: tables::DEFAULT_NON_INTRA_QUANTIZER_MATRIX,
            mb_address_increment: VlcTable::build("macroblock_address_increment", tables::MACROBLOCK_ADDRESS_INCREMENT),
            mb_type_i: VlcTable::build("macroblock_type_i", tables::MACROBLOCK_TYPE_I),
            mb_type_p: VlcTable::build("macroblock_type_p", tables::MACROBLOCK_TYPE_P),
            dct_size_luminance: VlcTable::build("dct_dc_size_luminance", tables::DCT_SIZE_LUMINANCE),
            dct_size_chrominance: VlcTable::build("dct_dc_size_chrominance", tables::DCT_SIZE_CHROMINANCE),
            motion_code: VlcTable::build("motion_code", &motion_code_refs),
            code_block_pattern: VlcTable::build("coded_block_pattern", tables::CODE_BLOCK_PATTERN),
            dct_coeff: VlcTable::build("dct_coeff", &dct_coeff_refs),
            reference: None,
            picture_type: PictureType::Intra,
            quantizer_scale: 1,
            full_pel_forward: false,
            forward_f_code: 0,
            macroblock_address: -1,
            past_intra_address: -2,
            dct_dc_past: [1024, 1024, 1024],
            motion_forward: (0, 0),
        }
    }

    /// Summary of the most recently parsed sequence header.
    #[must_use]
    pub fn sequence_info(&self) -> SequenceInfo
    {
        SequenceInfo {
            width: self.width,
            height: self.height,
            frame_rate: self.frame_rate,
            aspect_ratio: self.aspect_ratio,
        }
    }

    /// Decode every picture in the stream served by `reader`, calling
    /// `on_frame` once per reconstructed frame in bitstream order.
    ///
    /// Bitstream order only matches display order because B-pictures (which
    /// would require reordering around their reference pictures) are
    /// unsupported; see the crate's design notes.
    pub fn decode_frames<F>(&mut self, reader: &mut BitReader, mut on_frame: F) -> Result<(), DecodeErrors>
    where
        F: FnMut(&Frame),
    {
        let mut pending: Option<i32> = None;

        loop
        {
            let sc = match pending.take()
            {
                Some(sc) => sc,
                None =>
                {
                    reader.next_start_code();
                    reader.start_code()
                }
            };

            if sc == -1
            {
                return Ok(());
            }

            match sc
            {
                SEQUENCE_HEADER_CODE => self.sequence_header(reader)?,
                GROUP_START_CODE => self.group_of_pictures_header(reader)?,
                PICTURE_START_CODE =>
                {
                    let (frame, next) = self.picture(reader)?;
                    on_frame(&frame);
                    self.reference = Some(frame);
                    pending = Some(next);
                }
                SEQUENCE_END_CODE => return Ok(()),
                USER_DATA_START_CODE | EXTENSION_START_CODE =>
                {
                    reader.next_start_code();
                    pending = Some(reader.start_code());
                }
                _ =>
                {}
            }
        }
    }

    fn sequence_header(&mut self, reader: &mut BitReader) -> Result<(), DecodeErrors>
    {
        let width = reader.consume(12);
        let height = reader.consume(12);

        if width < 0 || height < 0
        {
            return Err(DecodeErrors::UnexpectedEndOfStream);
        }

        if width as u16 > self.options.get_max_width() || height as u16 > self.options.get_max_height()
        {
            return Err(DecodeErrors::GeometryError(format!(
                "sequence dimensions {width}x{height} exceed configured maximum"
            )));
        }

        if self.options.get_strict_mode() && (width % 16 != 0 || height % 16 != 0)
        {
            return Err(DecodeErrors::GeometryError(format!(
                "sequence dimensions {width}x{height} are not macroblock-aligned"
            )));
        }

        self.width = width as u16;
        self.height = height as u16;
        self.mb_width = (self.width + 15) / 16;
        self.mb_height = (self.height + 15) / 16;

        let aspect_ratio_code = reader.consume(4);
        let frame_rate_code = reader.consume(4);
        self.aspect_ratio = tables::ASPECT_RATIO[aspect_ratio_code as usize];
        self.frame_rate = tables::FRAME_RATE[frame_rate_code as usize];

        reader.consume(18); // bit_rate
        reader.consume(1); // marker_bit
        reader.consume(10); // vbv_buffer_size
        reader.consume(1); // constrained_parameters_flag

        if reader.consume(1) == 1
        {
            let mut matrix = [0u8; 64];
            for slot in &mut matrix
            {
                *slot = reader.consume(8) as u8;
            }
            self.intra_quantizer_matrix = matrix;
        }

        if reader.consume(1) == 1
        {
            let mut matrix = [0u8; 64];
            for slot in &mut matrix
            {
                *slot = reader.consume(8) as u8;
            }
            self.non_intra_quantizer_matrix = matrix;
        }

        debug!(
            "sequence_header: {}x{} @ {:.2} fps, sar {:.4}",
            self.width,
            self.height,
            self.frame_rate,
            self.aspect_ratio
        );

        Ok(())
    }

    fn group_of_pictures_header(&mut self, reader: &mut BitReader) -> Result<(), DecodeErrors>
    {
        reader.consume(25); // time_code
        reader.consume(1); // closed_gop
        reader.consume(1); // broken_link
        trace!("group_of_pictures header parsed");
        Ok(())
    }

    fn picture(&mut self, reader: &mut BitReader) -> Result<(Frame, i32), DecodeErrors>
    {
        self.picture_header(reader)?;

        if self.width == 0 || self.height == 0
        {
            return Err(DecodeErrors::MalformedHeader(
                "picture_header seen before a sequence_header".to_string(),
            ));
        }

        let mut frame = Frame::new(usize::from(self.width), usize::from(self.height));

        loop
        {
            reader.next_start_code();
            let sc = reader.start_code();

            if !(SLICE_MIN..=SLICE_MAX).contains(&sc)
            {
                return Ok((frame, sc));
            }

            self.slice(reader, sc, &mut frame)?;
        }
    }

    fn picture_header(&mut self, reader: &mut BitReader) -> Result<(), DecodeErrors>
    {
        reader.consume(10); // temporal_reference
        let coding_type = reader.consume(3);
        reader.consume(16); // vbv_delay

        self.picture_type = match coding_type
        {
            1 => PictureType::Intra,
            2 => PictureType::Predicted,
            3 => return Err(DecodeErrors::MalformedHeader("B-pictures are not supported".to_string())),
            _ => return Err(DecodeErrors::MalformedHeader(format!("invalid picture_coding_type {coding_type}"))),
        };

        if self.picture_type == PictureType::Predicted
        {
            self.full_pel_forward = reader.consume(1) == 1;
            self.forward_f_code = reader.consume(3) as i32;
        }

        // extra_bit_picture / extra_information_picture
        while reader.consume(1) == 1
        {
            reader.consume(8);
        }

        trace!("picture_header: type={:?}", self.picture_type);
        Ok(())
    }

    fn slice(&mut self, reader: &mut BitReader, slice_start_code: i32, frame: &mut Frame) -> Result<(), DecodeErrors>
    {
        self.quantizer_scale = reader.consume(5) as i32;

        // extra_bit_slice / extra_information_slice
        while reader.consume(1) == 1
        {
            reader.consume(8);
        }

        let vertical_position = slice_start_code - SLICE_MIN;
        self.macroblock_address = vertical_position * i32::from(self.mb_width) - 1;
        self.past_intra_address = -2;
        self.dct_dc_past = [1024, 1024, 1024];
        self.motion_forward = (0, 0);

        while reader.no_start_code()
        {
            macroblock::decode(self, reader, frame)?;
        }

        Ok(())
    }
}
