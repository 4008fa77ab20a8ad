use crate::error::Result;
use crate::frame::Frame;
use crate::types::{Rect, Size};

/// A still image that can be drawn into a [`Surface`], such as a decoded poster.
pub trait Image {
    fn size(&self) -> Size;

    /// Tightly packed RGBA8 pixels, row-major.
    fn pixels(&self) -> &[u8];
}

/// An off-screen 2D pixel buffer.
///
/// Drawing happens in two steps. `stage_*` converts a source into the
/// surface's native pixels and may fail; it never touches the surface.
/// [`draw`](Surface::draw) then writes staged pixels and cannot fail, so a
/// bad source never costs the surface its current contents.
pub trait Surface {
    /// Pixels ready to be drawn into this surface.
    type Staged;

    fn size(&self) -> Size;
    fn stage_frame(&self, frame: &dyn Frame) -> Result<Self::Staged>;
    fn stage_image(&self, image: &dyn Image) -> Result<Self::Staged>;
    fn clear(&mut self, rect: Rect);

    /// Draw staged pixels into `rect`, scaling them to fill it.
    fn draw(&mut self, staged: Self::Staged, rect: Rect);
}

/// Creates surfaces on demand.
pub trait SurfaceAllocator {
    type Surface: Surface;

    fn allocate(&self, size: Size) -> Self::Surface;
}
