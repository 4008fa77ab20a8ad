/// Pixel layouts a [`Frame`](crate::frame::Frame) can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    Rgba8,
    Bgra8,
    Nv12,
}

impl PixelFormat {
    /// Number of planes a frame of this format carries.
    pub fn plane_count(&self) -> usize {
        match self {
            Self::Rgba8 | Self::Bgra8 => 1,
            Self::Nv12 => 2,
        }
    }

    /// Length in bytes of one unpadded row of the first plane.
    ///
    /// For NV12 that is the luma plane, one byte per pixel.
    pub fn row_bytes(&self, width: u32) -> usize {
        match self {
            Self::Rgba8 | Self::Bgra8 => width as usize * 4,
            Self::Nv12 => width as usize,
        }
    }
}

/// Pixel dimensions of a frame or surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A destination region on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub size: Size,
}

impl Rect {
    /// The rectangle covering a whole surface of `size`.
    pub fn full(size: Size) -> Self {
        Self { x: 0, y: 0, size }
    }
}

/// How much media data a video source has buffered.
///
/// Levels follow the HTML media element's `readyState`. A frame is only
/// guaranteed to be drawable from [`ReadyState::HAVE_CURRENT_DATA`] upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ReadyState(pub u8);

impl ReadyState {
    pub const HAVE_NOTHING: ReadyState = ReadyState(0);
    pub const HAVE_METADATA: ReadyState = ReadyState(1);
    pub const HAVE_CURRENT_DATA: ReadyState = ReadyState(2);
    pub const HAVE_FUTURE_DATA: ReadyState = ReadyState(3);
    pub const HAVE_ENOUGH_DATA: ReadyState = ReadyState(4);

    /// Whether a frame can be decoded and drawn at this level.
    pub fn is_decodable(&self) -> bool {
        *self >= Self::HAVE_CURRENT_DATA
    }
}

impl From<u8> for ReadyState {
    fn from(level: u8) -> Self {
        Self(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodable_threshold() {
        assert!(!ReadyState::HAVE_NOTHING.is_decodable());
        assert!(!ReadyState::HAVE_METADATA.is_decodable());
        assert!(ReadyState::HAVE_CURRENT_DATA.is_decodable());
        assert!(ReadyState::from(4).is_decodable());
    }

    #[test]
    fn first_plane_rows() {
        assert_eq!(PixelFormat::Bgra8.row_bytes(640), 2560);
        assert_eq!(PixelFormat::Nv12.row_bytes(640), 640);
        assert_eq!(PixelFormat::Nv12.plane_count(), 2);
    }

    #[test]
    fn empty_sizes() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(640, 0).is_empty());
        assert!(!Size::new(640, 360).is_empty());
    }
}
