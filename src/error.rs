use thiserror::Error;

use crate::types::PixelFormat;

/// Top-level crate error.
///
/// [`FrameBuffer::query`](crate::buffer::FrameBuffer::query) never returns
/// these; they come out of surface and poster backends and are logged and
/// absorbed by the buffer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("unsupported pixel format: {0:?}")]
    UnsupportedFormat(PixelFormat),

    #[error("invalid frame data: {0}")]
    InvalidFrame(&'static str),

    #[error("failed to load poster {reference}: {reason}")]
    PosterLoad { reference: String, reason: String },

    #[error("poster load abandoned before completing")]
    PosterCanceled,

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for surface and poster operations.
pub type Result<T> = std::result::Result<T, Error>;
