//! CPU surfaces and posters backed by the `image` crate.

pub mod frame;
pub mod poster;
pub mod surface;

pub use frame::RasterFrame;
pub use poster::RasterPosterLoader;
pub use surface::{RasterAllocator, RasterImage, RasterSurface};
