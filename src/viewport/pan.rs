//! Drag-to-pan gesture tracking.

use crate::input::ScreenPoint;

/// Tracks the last pointer position of an active pan drag.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanGesture {
    last: Option<ScreenPoint>,
}

impl PanGesture {
    pub fn begin(&mut self, at: ScreenPoint) {
        self.last = Some(at);
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    /// Records a new pointer position and returns the delta from the previous one.
    pub fn advance(&mut self, to: ScreenPoint) -> Option<(f64, f64)> {
        let last = self.last.as_mut()?;
        let delta = (to.x - last.x, to.y - last.y);
        *last = to;
        Some(delta)
    }

    /// Ends the gesture. Returns true if one was active.
    pub fn end(&mut self) -> bool {
        self.last.take().is_some()
    }
}
