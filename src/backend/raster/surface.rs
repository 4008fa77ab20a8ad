use std::path::Path;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::backend::raster::frame::to_rgba;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::surface::{Image, Surface, SurfaceAllocator};
use crate::types::{Rect, Size};

/// A decoded RGBA image, typically a poster.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// An image filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    /// Decode an encoded image (PNG, JPEG), guessing the format from its contents.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(image::load_from_memory(bytes)?.into_rgba8()))
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl Image for RasterImage {
    fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }

    fn pixels(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

/// An in-memory RGBA surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    pixels: RgbaImage,
}

impl RasterSurface {
    pub fn new(size: Size) -> Self {
        Self {
            pixels: RgbaImage::new(size.width, size.height),
        }
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl Surface for RasterSurface {
    type Staged = RgbaImage;

    fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }

    fn stage_frame(&self, frame: &dyn Frame) -> Result<RgbaImage> {
        to_rgba(frame)
    }

    fn stage_image(&self, image: &dyn Image) -> Result<RgbaImage> {
        let size = image.size();
        RgbaImage::from_raw(size.width, size.height, image.pixels().to_vec())
            .ok_or(Error::InvalidFrame("image pixels do not match image size"))
    }

    fn clear(&mut self, rect: Rect) {
        let width = self.pixels.width() as usize;
        let x_start = rect.x.min(self.pixels.width()) as usize;
        let x_end = rect
            .x
            .saturating_add(rect.size.width)
            .min(self.pixels.width()) as usize;
        let y_end = rect
            .y
            .saturating_add(rect.size.height)
            .min(self.pixels.height()) as usize;
        if x_start >= x_end {
            return;
        }

        let buf: &mut [u8] = &mut self.pixels;
        for y in rect.y as usize..y_end {
            let row = y * width * 4;
            buf[row + x_start * 4..row + x_end * 4].fill(0);
        }
    }

    fn draw(&mut self, staged: RgbaImage, rect: Rect) {
        if rect.size.is_empty() {
            return;
        }

        let scaled = if staged.dimensions() == (rect.size.width, rect.size.height) {
            staged
        } else {
            imageops::resize(&staged, rect.size.width, rect.size.height, FilterType::Triangle)
        };
        imageops::replace(&mut self.pixels, &scaled, rect.x as i64, rect.y as i64);
    }
}

/// Allocates [`RasterSurface`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterAllocator;

impl SurfaceAllocator for RasterAllocator {
    type Surface = RasterSurface;

    fn allocate(&self, size: Size) -> RasterSurface {
        RasterSurface::new(size)
    }
}
