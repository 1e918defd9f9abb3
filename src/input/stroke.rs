//! Freehand stroke state machine (`Idle -> Drawing -> Idle`).

use super::brush::BrushConfig;
use super::events::{PointerButtons, SurfacePoint};
use crate::draw::{RasterSurface, SurfaceError};

/// Current stroke state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    /// No stroke in progress
    Idle,
    /// Primary button held; segments are drawn from `last` to each new point
    Drawing {
        /// Most recent recorded point, in surface coordinates
        last: SurfacePoint,
        /// Segments drawn so far in this stroke
        segments: usize,
    },
}

/// Captures one pointer-down/move/up gesture as line segments on the mask.
///
/// The recorder never touches history; the caller pushes the undo snapshot
/// before calling [`StrokeRecorder::begin`], so one stroke is one undo step.
#[derive(Debug)]
pub struct StrokeRecorder {
    state: StrokeState,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self {
            state: StrokeState::Idle,
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    /// Starts a path at `at`. Any stroke already in progress is replaced.
    pub fn begin(&mut self, at: SurfacePoint) {
        self.state = StrokeState::Drawing {
            last: at,
            segments: 0,
        };
    }

    /// Strokes a segment to `to` using the live brush configuration.
    ///
    /// Returns `Ok(false)` without drawing when idle or when anything other than
    /// the primary button alone is held.
    pub fn extend(
        &mut self,
        to: SurfacePoint,
        buttons: PointerButtons,
        brush: &BrushConfig,
        surface: &mut RasterSurface,
    ) -> Result<bool, SurfaceError> {
        let StrokeState::Drawing { last, segments } = &mut self.state else {
            return Ok(false);
        };
        if !buttons.is_primary_only() {
            return Ok(false);
        }

        surface.draw_segment(*last, to, brush.line_width(), brush.color())?;
        *last = to;
        *segments += 1;
        Ok(true)
    }

    /// Ends the current stroke, returning how many segments it drew.
    pub fn finish(&mut self) -> Option<usize> {
        match std::mem::replace(&mut self.state, StrokeState::Idle) {
            StrokeState::Drawing { segments, .. } => Some(segments),
            StrokeState::Idle => None,
        }
    }
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new()
    }
}
