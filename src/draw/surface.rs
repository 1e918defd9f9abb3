//! Fixed-size raster buffers backed by Cairo ARGB32 image surfaces.
//!
//! A [`RasterSurface`] is used both for the decoded source image and for the
//! transparent mask layer painted on top of it. Snapshots are full pixel copies
//! that stay valid regardless of later mutations.

use super::Color;
use crate::input::SurfacePoint;
use cairo::{Context, Format, ImageSurface, LineCap, LineJoin, Operator};
use image::RgbaImage;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Largest width or height Cairo accepts for an image surface.
pub const MAX_DIMENSION: u32 = 32767;

/// Errors raised by raster operations.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("snapshot is {snapshot_width}x{snapshot_height}, surface is {width}x{height}")]
    SizeMismatch {
        snapshot_width: u32,
        snapshot_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),
}

/// Immutable full copy of a surface's pixel buffer.
///
/// Cloning is cheap; the pixel data is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    width: u32,
    height: u32,
    stride: usize,
    pixels: Arc<[u8]>,
}

impl SurfaceSnapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the copied buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for SurfaceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceSnapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Addressable 2D pixel buffer with stroke, snapshot and PNG encoding support.
pub struct RasterSurface {
    surface: ImageSurface,
    width: u32,
    height: u32,
}

impl RasterSurface {
    /// Allocates a fully transparent surface.
    pub fn allocate(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        // Cairo zero-fills new image surfaces.
        let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
        Ok(Self {
            surface,
            width,
            height,
        })
    }

    /// Builds a surface holding the pixels of a decoded RGBA image.
    pub fn from_rgba(image: &RgbaImage) -> Result<Self, SurfaceError> {
        let mut raster = Self::allocate(image.width(), image.height())?;
        let stride = raster.surface.stride() as usize;
        {
            let mut data = raster.surface.data()?;
            for (y, row) in image.rows().enumerate() {
                let offset = y * stride;
                for (x, pixel) in row.enumerate() {
                    let [r, g, b, a] = pixel.0;
                    let start = offset + x * 4;
                    data[start..start + 4].copy_from_slice(&premultiply(r, g, b, a).to_ne_bytes());
                }
            }
        }
        Ok(raster)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the point lies within the surface bounds.
    pub fn contains(&self, point: SurfacePoint) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.width as f64
            && point.y < self.height as f64
    }

    /// Strokes a round-capped, round-joined segment blended over existing content.
    pub fn draw_segment(
        &mut self,
        from: SurfacePoint,
        to: SurfacePoint,
        size: f64,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let ctx = Context::new(&self.surface)?;
        ctx.set_operator(Operator::Over);
        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        ctx.set_line_width(size);
        ctx.set_line_cap(LineCap::Round);
        ctx.set_line_join(LineJoin::Round);
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
        ctx.stroke()?;
        Ok(())
    }

    /// Resets every pixel to fully transparent.
    ///
    /// Callers that want the clear to be undoable push a snapshot first.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        let ctx = Context::new(&self.surface)?;
        ctx.set_operator(Operator::Clear);
        ctx.paint()?;
        Ok(())
    }

    /// Copies the current pixel buffer.
    pub fn snapshot(&mut self) -> Result<SurfaceSnapshot, SurfaceError> {
        self.surface.flush();
        let stride = self.surface.stride() as usize;
        let data = self.surface.data()?;
        Ok(SurfaceSnapshot {
            width: self.width,
            height: self.height,
            stride,
            pixels: Arc::from(&data[..]),
        })
    }

    /// Replaces the pixel buffer with a prior snapshot of the same size.
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot) -> Result<(), SurfaceError> {
        if snapshot.width != self.width || snapshot.height != self.height {
            return Err(SurfaceError::SizeMismatch {
                snapshot_width: snapshot.width,
                snapshot_height: snapshot.height,
                width: self.width,
                height: self.height,
            });
        }
        self.surface.flush();
        let mut data = self.surface.data()?;
        data.copy_from_slice(&snapshot.pixels);
        Ok(())
    }

    /// Encodes the surface as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut buffer = Vec::new();
        self.surface.write_to_png(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads a premultiplied ARGB32 pixel, or `None` outside the surface.
    pub fn pixel(&mut self, x: u32, y: u32) -> Result<Option<u32>, SurfaceError> {
        if x >= self.width || y >= self.height {
            return Ok(None);
        }
        self.surface.flush();
        let stride = self.surface.stride() as usize;
        let data = self.surface.data()?;
        let start = y as usize * stride + x as usize * 4;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&data[start..start + 4]);
        Ok(Some(u32::from_ne_bytes(bytes)))
    }

    pub(crate) fn as_cairo(&self) -> &ImageSurface {
        &self.surface
    }
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

fn premultiply(r: u8, g: u8, b: u8, a: u8) -> u32 {
    let mul = |c: u8| (c as u32 * a as u32 + 127) / 255;
    (a as u32) << 24 | mul(r) << 16 | mul(g) << 8 | mul(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, RED};
    use image::Rgba;

    fn point(x: f64, y: f64) -> SurfacePoint {
        SurfacePoint { x, y }
    }

    #[test]
    fn allocate_starts_transparent() {
        let mut surface = RasterSurface::allocate(8, 4).unwrap();
        assert_eq!(surface.width(), 8);
        assert_eq!(surface.height(), 4);
        assert!(surface.snapshot().unwrap().is_blank());
    }

    #[test]
    fn snapshot_copies_whole_buffer() {
        let mut surface = RasterSurface::allocate(10, 4).unwrap();
        let snapshot = surface.snapshot().unwrap();
        assert_eq!((snapshot.width(), snapshot.height()), (10, 4));
        assert_eq!(snapshot.byte_len(), 10 * 4 * 4);
    }

    #[test]
    fn allocate_rejects_empty_dimensions() {
        assert!(matches!(
            RasterSurface::allocate(0, 10),
            Err(SurfaceError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn draw_segment_paints_along_the_line() {
        let mut surface = RasterSurface::allocate(20, 20).unwrap();
        surface
            .draw_segment(point(2.0, 10.0), point(18.0, 10.0), 4.0, RED)
            .unwrap();

        let center = surface.pixel(10, 10).unwrap().unwrap();
        assert_eq!(center >> 24, 0xFF);
        assert_eq!((center >> 16) & 0xFF, 0xFF);
        assert_eq!(surface.pixel(10, 1).unwrap(), Some(0));
    }

    #[test]
    fn round_caps_extend_past_endpoints() {
        let mut surface = RasterSurface::allocate(20, 20).unwrap();
        surface
            .draw_segment(point(10.0, 10.0), point(10.0, 10.0), 6.0, BLUE)
            .unwrap();
        let dot = surface.pixel(10, 10).unwrap().unwrap();
        assert_eq!(dot >> 24, 0xFF);
        assert_eq!(dot & 0xFF, 0xFF);
    }

    #[test]
    fn snapshot_is_independent_of_later_mutation() {
        let mut surface = RasterSurface::allocate(10, 10).unwrap();
        let before = surface.snapshot().unwrap();
        surface
            .draw_segment(point(0.0, 0.0), point(9.0, 9.0), 3.0, RED)
            .unwrap();
        assert!(before.is_blank());
        assert!(!surface.snapshot().unwrap().is_blank());

        surface.restore(&before).unwrap();
        assert_eq!(surface.snapshot().unwrap(), before);
    }

    #[test]
    fn restore_rejects_mismatched_snapshot() {
        let mut small = RasterSurface::allocate(4, 4).unwrap();
        let mut large = RasterSurface::allocate(8, 8).unwrap();
        let snapshot = small.snapshot().unwrap();
        assert!(matches!(
            large.restore(&snapshot),
            Err(SurfaceError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut surface = RasterSurface::allocate(10, 10).unwrap();
        surface
            .draw_segment(point(1.0, 1.0), point(8.0, 8.0), 5.0, RED)
            .unwrap();
        surface.clear().unwrap();
        assert!(surface.snapshot().unwrap().is_blank());
    }

    #[test]
    fn from_rgba_premultiplies_pixels() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        let mut surface = RasterSurface::from_rgba(&image).unwrap();
        assert_eq!(surface.pixel(0, 0).unwrap(), Some(0xFFFF_0000));
        assert_eq!(surface.pixel(1, 0).unwrap(), Some(0));
    }

    #[test]
    fn png_encoding_has_signature() {
        let surface = RasterSurface::allocate(3, 3).unwrap();
        let png = surface.to_png().unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
