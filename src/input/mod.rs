//! Pointer input types, brush configuration and the stroke state machine.
//!
//! This module turns pointer events (already mapped to surface coordinates by
//! the viewport) into line segments on the mask surface.

pub mod brush;
pub mod events;
pub mod stroke;

// Re-export commonly used types at module level
pub use brush::{BrushConfig, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
pub use events::{Modifiers, PointerButton, PointerButtons, ScreenPoint, SurfacePoint};
pub use stroke::{StrokeRecorder, StrokeState};
