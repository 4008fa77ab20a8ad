use crate::types::{PixelFormat, Size};

/// One plane of pixel rows, `bytes_per_row` apart.
pub struct Plane<'a> {
    pub data: &'a [u8],
    pub bytes_per_row: usize,
}

/// The frame a video source is presenting, borrowed from the source (zero-copy).
///
/// Packed formats carry a single plane.
pub trait Frame {
    fn pixel_format(&self) -> PixelFormat;
    fn size(&self) -> Size;
    fn planes(&self) -> &[Plane<'_>];
}
