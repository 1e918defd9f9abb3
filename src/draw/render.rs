//! Cairo-based composition of the base image and mask layer.

use super::color::Color;
use super::surface::{RasterSurface, SurfaceError};
use crate::viewport::ViewportState;

/// Composes the visible viewport into a new surface.
///
/// The base image is painted first, then the mask layer on top, both scaled by
/// the viewport zoom and shifted by the pan offset. Areas outside the content
/// are filled with `background`.
///
/// # Arguments
/// * `base` - Decoded source image, if available
/// * `mask` - Mask layer for the same image
/// * `viewport` - Current zoom and pan
/// * `width` - Output width in screen pixels
/// * `height` - Output height in screen pixels
/// * `background` - Fill color for uncovered areas
pub fn render_view(
    base: Option<&RasterSurface>,
    mask: &RasterSurface,
    viewport: &ViewportState,
    width: u32,
    height: u32,
    background: Color,
) -> Result<RasterSurface, SurfaceError> {
    let output = RasterSurface::allocate(width, height)?;
    let ctx = cairo::Context::new(output.as_cairo())?;

    ctx.set_source_rgba(background.r, background.g, background.b, background.a);
    ctx.paint()?;

    ctx.translate(-viewport.pan_x, -viewport.pan_y);
    ctx.scale(viewport.zoom, viewport.zoom);

    if let Some(base) = base {
        render_layer(&ctx, base)?;
    }
    render_layer(&ctx, mask)?;

    // Release the context's reference before handing the surface out.
    drop(ctx);
    Ok(output)
}

fn render_layer(ctx: &cairo::Context, layer: &RasterSurface) -> Result<(), SurfaceError> {
    ctx.set_source_surface(layer.as_cairo(), 0.0, 0.0)?;
    ctx.paint()?;
    Ok(())
}
