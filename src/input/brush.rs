//! Global brush configuration shared by every image in a session.

use crate::draw::Color;

/// Smallest brush diameter in pixels.
pub const MIN_BRUSH_SIZE: u32 = 1;
/// Largest brush diameter in pixels.
pub const MAX_BRUSH_SIZE: u32 = 50;

/// Active brush settings.
///
/// Read by the stroke recorder on every segment, so changes apply to the next
/// segment drawn, including mid-stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushConfig {
    size: u32,
    color: Color,
}

impl BrushConfig {
    /// Creates a brush, clamping `size` to the valid range and forcing an opaque color.
    pub fn new(size: u32, color: Color) -> Self {
        Self {
            size: size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
            color: color.opaque(),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Stroke width handed to the raster surface.
    pub fn line_width(&self) -> f64 {
        self.size as f64
    }

    /// Sets the brush size, clamped to 1-50. Returns the applied size.
    pub fn set_size(&mut self, size: u32) -> u32 {
        let clamped = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        if clamped != size {
            log::debug!("Brush size {} clamped to {}", size, clamped);
        }
        self.size = clamped;
        clamped
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color.opaque();
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self::new(10, crate::draw::RED)
    }
}
