use arrayvec::ArrayVec;
use image::RgbaImage;

use crate::error::{Error, Result};
use crate::frame::{Frame, Plane};
use crate::types::{PixelFormat, Size};

/// Maximum number of planes any supported format uses.
const MAX_PLANES: usize = 2;

/// A frame borrowed from caller-owned memory.
pub struct RasterFrame<'a> {
    planes: ArrayVec<Plane<'a>, MAX_PLANES>,
    pixel_format: PixelFormat,
    size: Size,
}

impl<'a> RasterFrame<'a> {
    /// Wrap tightly packed rows of a single-plane format (RGBA, BGRA).
    pub fn packed(data: &'a [u8], pixel_format: PixelFormat, size: Size) -> Self {
        Self::with_stride(data, pixel_format.row_bytes(size.width), pixel_format, size)
    }

    /// Wrap single-plane rows that are `bytes_per_row` apart (row padding allowed).
    pub fn with_stride(
        data: &'a [u8],
        bytes_per_row: usize,
        pixel_format: PixelFormat,
        size: Size,
    ) -> Self {
        let mut planes = ArrayVec::new();
        planes.push(Plane {
            data,
            bytes_per_row,
        });
        RasterFrame {
            planes,
            pixel_format,
            size,
        }
    }

    /// Wrap an NV12 frame: a full-size luma plane and a half-size interleaved CbCr plane.
    pub fn nv12(luma: Plane<'a>, chroma: Plane<'a>, size: Size) -> Self {
        let mut planes = ArrayVec::new();
        planes.push(luma);
        planes.push(chroma);
        RasterFrame {
            planes,
            pixel_format: PixelFormat::Nv12,
            size,
        }
    }
}

impl<'a> Frame for RasterFrame<'a> {
    fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    fn size(&self) -> Size {
        self.size
    }

    fn planes(&self) -> &[Plane<'_>] {
        &self.planes
    }
}

/// Check that `plane` holds `rows` rows of at least `row_len` bytes.
fn check_plane(plane: &Plane<'_>, row_len: usize, rows: usize) -> Result<()> {
    if plane.bytes_per_row < row_len {
        return Err(Error::InvalidFrame("row stride shorter than frame width"));
    }
    if plane.data.len() < plane.bytes_per_row * (rows - 1) + row_len {
        return Err(Error::InvalidFrame("plane shorter than frame height"));
    }
    Ok(())
}

/// Convert any supported frame into an owned RGBA image, dropping row padding.
pub(crate) fn to_rgba(frame: &dyn Frame) -> Result<RgbaImage> {
    let size = frame.size();
    if size.is_empty() {
        return Err(Error::InvalidFrame("frame has zero area"));
    }

    let pixel_format = frame.pixel_format();
    let planes = frame.planes();
    if planes.len() < pixel_format.plane_count() {
        return Err(Error::InvalidFrame("frame is missing planes"));
    }

    let pixels = match pixel_format {
        PixelFormat::Rgba8 | PixelFormat::Bgra8 => {
            packed_to_rgba(&planes[0], pixel_format, size)?
        }
        PixelFormat::Nv12 => nv12_to_rgba(&planes[0], &planes[1], size)?,
    };

    RgbaImage::from_raw(size.width, size.height, pixels)
        .ok_or(Error::InvalidFrame("pixel buffer does not match frame size"))
}

fn packed_to_rgba(plane: &Plane<'_>, pixel_format: PixelFormat, size: Size) -> Result<Vec<u8>> {
    let row_len = pixel_format.row_bytes(size.width);
    let rows = size.height as usize;
    check_plane(plane, row_len, rows)?;

    let mut pixels = Vec::with_capacity(row_len * rows);
    for row in plane.data.chunks(plane.bytes_per_row).take(rows) {
        pixels.extend_from_slice(&row[..row_len]);
    }

    if pixel_format == PixelFormat::Bgra8 {
        for px in pixels.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }
    Ok(pixels)
}

/// BT.601 limited-range YCbCr to RGBA.
fn nv12_to_rgba(luma: &Plane<'_>, chroma: &Plane<'_>, size: Size) -> Result<Vec<u8>> {
    let width = size.width as usize;
    let height = size.height as usize;
    let chroma_width = width.div_ceil(2);
    let chroma_height = height.div_ceil(2);
    check_plane(luma, width, height)?;
    check_plane(chroma, chroma_width * 2, chroma_height)?;

    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let luma_row = &luma.data[y * luma.bytes_per_row..][..width];
        let chroma_row = &chroma.data[(y / 2) * chroma.bytes_per_row..][..chroma_width * 2];
        for (x, &sample) in luma_row.iter().enumerate() {
            let c = sample as i32 - 16;
            let d = chroma_row[(x / 2) * 2] as i32 - 128;
            let e = chroma_row[(x / 2) * 2 + 1] as i32 - 128;

            let r = (298 * c + 409 * e + 128) >> 8;
            let g = (298 * c - 100 * d - 208 * e + 128) >> 8;
            let b = (298 * c + 516 * d + 128) >> 8;
            pixels.extend_from_slice(&[
                r.clamp(0, 255) as u8,
                g.clamp(0, 255) as u8,
                b.clamp(0, 255) as u8,
                255,
            ]);
        }
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_row_padding() {
        // 2x2 RGBA with 4 bytes of padding per row.
        let data = [
            1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0, //
            3, 3, 3, 3, 4, 4, 4, 4, 0, 0, 0, 0,
        ];
        let frame = RasterFrame::with_stride(&data, 12, PixelFormat::Rgba8, Size::new(2, 2));
        let image = to_rgba(&frame).unwrap();
        assert_eq!(image.get_pixel(1, 0).0, [2, 2, 2, 2]);
        assert_eq!(image.get_pixel(0, 1).0, [3, 3, 3, 3]);
    }

    #[test]
    fn swizzles_bgra() {
        let data = [10, 20, 30, 255];
        let frame = RasterFrame::packed(&data, PixelFormat::Bgra8, Size::new(1, 1));
        assert_eq!(to_rgba(&frame).unwrap().get_pixel(0, 0).0, [30, 20, 10, 255]);
    }

    #[test]
    fn rejects_short_planes() {
        let data = [0u8; 12];
        let frame = RasterFrame::packed(&data, PixelFormat::Rgba8, Size::new(2, 2));
        assert!(matches!(to_rgba(&frame), Err(Error::InvalidFrame(_))));
    }

    #[test]
    fn converts_nv12() {
        // 3x2: left two columns white, right column black; neutral chroma.
        let luma = [235, 235, 16, 235, 235, 16];
        let chroma = [128, 128, 128, 128];
        let frame = RasterFrame::nv12(
            Plane {
                data: &luma,
                bytes_per_row: 3,
            },
            Plane {
                data: &chroma,
                bytes_per_row: 4,
            },
            Size::new(3, 2),
        );

        let image = to_rgba(&frame).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(2, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn nv12_needs_a_chroma_plane() {
        let luma = [16u8; 4];
        let frame = RasterFrame::packed(&luma, PixelFormat::Nv12, Size::new(2, 2));
        assert!(matches!(to_rgba(&frame), Err(Error::InvalidFrame(_))));
    }
}
