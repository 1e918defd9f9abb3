use crate::draw::SurfaceError;
use crate::input::{Modifiers, PointerButton, PointerButtons, ScreenPoint};
use crate::viewport::WheelOutcome;

use super::MaskEditor;

impl MaskEditor {
    /// Processes a pointer button press.
    ///
    /// # Behavior
    /// - Secondary: starts a pan gesture; any stroke in progress is finished
    /// - Primary over the mask: pushes one undo snapshot and starts a stroke
    /// - Primary outside the mask, during a pan, or with no active surface: ignored
    pub fn on_pointer_down(
        &mut self,
        at: ScreenPoint,
        button: PointerButton,
    ) -> Result<(), SurfaceError> {
        match button {
            PointerButton::Secondary => {
                self.finish_stroke();
                self.viewport.begin_pan(at);
            }
            PointerButton::Primary => {
                if self.viewport.is_panning() || self.recorder.is_drawing() {
                    return Ok(());
                }
                let point = self.viewport.to_surface_coords(at);
                let Some(active) = self.session.active() else {
                    return Ok(());
                };
                if !active.mask().contains(point) {
                    return Ok(());
                }
                if self.session.push_history()? {
                    self.recorder.begin(point);
                }
            }
            PointerButton::Auxiliary => {}
        }
        Ok(())
    }

    /// Processes pointer motion with the given buttons held.
    ///
    /// While panning only the scroll offset changes. While drawing, a segment
    /// is stroked if the primary button alone is held. Returns true if the view
    /// or the mask changed.
    pub fn on_pointer_move(
        &mut self,
        to: ScreenPoint,
        buttons: PointerButtons,
    ) -> Result<bool, SurfaceError> {
        if self.viewport.is_panning() {
            return Ok(self.viewport.drag_pan(to));
        }
        if !self.recorder.is_drawing() {
            return Ok(false);
        }

        if !self.session.has_active_surface() {
            self.finish_stroke();
            return Ok(false);
        }

        let point = self.viewport.to_surface_coords(to);
        let Some(active) = self.session.active_mut() else {
            return Ok(false);
        };
        self.recorder
            .extend(point, buttons, &self.brush, active.mask_mut())
    }

    /// Processes a pointer button release.
    ///
    /// Releasing any button ends both the stroke and the pan in progress.
    pub fn on_pointer_up(&mut self, button: PointerButton) {
        self.finish_stroke();
        if self.viewport.end_pan() {
            log::debug!("Pan ended by {:?} release at {:?}", button, self.viewport.state());
        }
    }

    /// Pointer left the drawable region: ends both strokes and pans.
    pub fn on_pointer_leave(&mut self) {
        self.finish_stroke();
        self.viewport.end_pan();
    }

    /// Processes a wheel event; zooms with Ctrl/Meta held, scrolls otherwise.
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64, modifiers: Modifiers) -> WheelOutcome {
        let outcome = self.viewport.on_wheel(delta_x, delta_y, modifiers);
        if let WheelOutcome::Zoomed(zoom) = outcome {
            log::debug!("Wheel zoom -> {:.1}", zoom);
        }
        outcome
    }

    pub(super) fn finish_stroke(&mut self) {
        if let Some(segments) = self.recorder.finish() {
            log::debug!("Stroke finished with {} segment(s)", segments);
        }
    }
}
