//! Decoder configuration.
//!
//! Mirrors the donor crate's options struct: a small set of knobs that guard
//! against pathological input without changing wire-format semantics.

/// Options controlling how lenient the decoder is about malformed input.
///
/// Built with the same chained-setter style the rest of the ecosystem uses:
///
/// ```
/// use mpeg1_video::DecoderOptions;
///
/// let options = DecoderOptions::new()
///     .set_max_width(1920)
///     .set_max_height(1080)
///     .set_strict_mode(true);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecoderOptions
{
    max_width:   u16,
    max_height:  u16,
    strict_mode: bool,
}

/// Widest/tallest sequence header this decoder will allocate frame buffers
/// for, absent an explicit [`DecoderOptions::set_max_width`] /
/// [`DecoderOptions::set_max_height`] override.
pub const MAX_DIMENSION: u16 = 16384;

impl Default for DecoderOptions
{
    fn default() -> Self
    {
        DecoderOptions {
            max_width:   MAX_DIMENSION,
            max_height:  MAX_DIMENSION,
            strict_mode: false,
        }
    }
}

impl DecoderOptions
{
    /// Create a new set of options with the library defaults.
    #[must_use]
    pub fn new() -> DecoderOptions
    {
        DecoderOptions::default()
    }

    /// Set the maximum sequence width this decoder will accept.
    #[must_use]
    pub fn set_max_width(mut self, max_width: u16) -> Self
    {
        self.max_width = max_width;
        self
    }

    /// Set the maximum sequence height this decoder will accept.
    #[must_use]
    pub fn set_max_height(mut self, max_height: u16) -> Self
    {
        self.max_height = max_height;
        self
    }

    /// When set, promotes anomalies that are normally just logged (extra
    /// bytes before a marker, a second sequence header disagreeing with the
    /// `start_code` bug path described in the design notes) to hard errors.
    #[must_use]
    pub fn set_strict_mode(mut self, strict: bool) -> Self
    {
        self.strict_mode = strict;
        self
    }

    pub(crate) fn get_max_width(self) -> u16
    {
        self.max_width
    }

    pub(crate) fn get_max_height(self) -> u16
    {
        self.max_height
    }

    pub(crate) fn get_strict_mode(self) -> bool
    {
        self.strict_mode
    }
}
