//! Reconstructed picture storage.

/// A fully (or partially, while being built) reconstructed picture.
///
/// Chroma planes are stored at luma resolution: each 8x8 chroma block is
/// written into a 2x2-replicated 16x16 region rather than kept at the
/// half-resolution 4:2:0 storage a more RGB-conversion-friendly design would
/// use. Prediction, reconstruction and any downstream RGB conversion must
/// agree on this choice; see the design notes on chroma upsampling.
#[derive(Clone, Debug, Default)]
pub struct Frame
{
    pub width:  usize,
    pub height: usize,
    pub y:      Vec<u8>,
    pub cb:     Vec<u8>,
    pub cr:     Vec<u8>,
}

impl Frame
{
    /// Allocate a blank frame of the given pixel dimensions.
    pub fn new(width: usize, height: usize) -> Frame
    {
        let size = width * height;

        Frame {
            width,
            height,
            y: vec![0; size],
            cb: vec![0; size],
            cr: vec![0; size],
        }
    }

    #[inline]
    pub(crate) fn plane_mut(&mut self, index: usize) -> &mut [u8]
    {
        match index
        {
            0 => &mut self.y,
            1 => &mut self.cb,
            _ => &mut self.cr,
        }
    }

    #[inline]
    pub(crate) fn plane(&self, index: usize) -> &[u8]
    {
        match index
        {
            0 => &self.y,
            1 => &self.cb,
            _ => &self.cr,
        }
    }
}
