//! Raster primitives for mask editing (Cairo-based).
//!
//! This module defines the pixel-level types used by the editor:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`RasterSurface`]: fixed-size pixel buffer with stroke/snapshot/restore
//! - [`SurfaceSnapshot`]: immutable full-buffer copy used by undo history
//! - [`render_view`]: composition of base image and mask under a viewport

pub mod color;
pub mod render;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use render::render_view;
pub use surface::{RasterSurface, SurfaceError, SurfaceSnapshot};

pub use color::{BLACK, BLUE, GREEN, RED, TRANSPARENT, WHITE, YELLOW};
