//! Viewport transform: zoom, pan offset and screen/surface coordinate mapping.
//!
//! The visible element shows surface content scaled by the zoom factor and
//! scrolled by the pan offset:
//!
//! ```text
//! screen = surface * zoom - pan
//! surface = (screen + pan) / zoom
//! ```
//!
//! The scrollable content grows with zoom, so one screen pixel covers
//! `1 / zoom` surface pixels and pointer precision increases when zoomed in.
//! Viewport state is global to the session and is not reset on navigation.

mod pan;

pub use pan::PanGesture;

use crate::input::{Modifiers, ScreenPoint, SurfacePoint};

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;
/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 8.0;
/// Zoom change per discrete wheel input.
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

/// Zoom factor and pan (scroll) offset.
///
/// Pan is unconstrained; content may be scrolled entirely out of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// What a wheel event did to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    /// Zoom changed to the contained factor
    Zoomed(f64),
    /// Pan offset moved by the wheel deltas
    Scrolled,
    /// Nothing changed (zero delta)
    Ignored,
}

/// Maps pointer input onto the viewport and owns the pan gesture.
#[derive(Debug)]
pub struct ViewportController {
    state: ViewportState,
    zoom_step: f64,
    pan: PanGesture,
}

impl ViewportController {
    /// Creates a controller, clamping the initial zoom.
    pub fn new(initial: ViewportState, zoom_step: f64) -> Self {
        let mut controller = Self {
            state: ViewportState {
                zoom: 1.0,
                ..initial
            },
            zoom_step,
            pan: PanGesture::default(),
        };
        controller.set_zoom(initial.zoom);
        controller
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn zoom_step(&self) -> f64 {
        self.zoom_step
    }

    /// Sets the zoom factor, clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    ///
    /// Non-finite values are ignored. Returns the applied zoom.
    pub fn set_zoom(&mut self, value: f64) -> f64 {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite zoom value {}", value);
            return self.state.zoom;
        }
        self.state.zoom = round_zoom(value.clamp(ZOOM_MIN, ZOOM_MAX));
        self.state.zoom
    }

    /// Changes zoom by `steps` increments of the configured step.
    pub fn step_zoom(&mut self, steps: i32) -> f64 {
        self.set_zoom(self.state.zoom + steps as f64 * self.zoom_step)
    }

    /// Adjusts the scroll offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.state.pan_x += dx;
        self.state.pan_y += dy;
    }

    /// Translates a screen position into surface coordinates.
    pub fn to_surface_coords(&self, point: ScreenPoint) -> SurfacePoint {
        SurfacePoint {
            x: (point.x + self.state.pan_x) / self.state.zoom,
            y: (point.y + self.state.pan_y) / self.state.zoom,
        }
    }

    /// Translates a surface position into screen coordinates.
    pub fn to_screen_coords(&self, point: SurfacePoint) -> ScreenPoint {
        ScreenPoint {
            x: point.x * self.state.zoom - self.state.pan_x,
            y: point.y * self.state.zoom - self.state.pan_y,
        }
    }

    /// Handles a wheel event.
    ///
    /// With the zoom modifier held, each event changes zoom by one step
    /// (scrolling down zooms out). Otherwise the deltas scroll the view.
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64, modifiers: Modifiers) -> WheelOutcome {
        if modifiers.zooms() {
            if delta_y > 0.0 {
                WheelOutcome::Zoomed(self.step_zoom(-1))
            } else if delta_y < 0.0 {
                WheelOutcome::Zoomed(self.step_zoom(1))
            } else {
                WheelOutcome::Ignored
            }
        } else if delta_x != 0.0 || delta_y != 0.0 {
            self.pan_by(delta_x, delta_y);
            WheelOutcome::Scrolled
        } else {
            WheelOutcome::Ignored
        }
    }

    /// Starts a pan gesture at `at`.
    pub fn begin_pan(&mut self, at: ScreenPoint) {
        self.pan.begin(at);
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_active()
    }

    /// Applies pointer movement during a pan gesture.
    ///
    /// Dragging moves the content with the pointer, so the scroll offset moves
    /// opposite to the pointer delta. Returns false when no pan is active.
    pub fn drag_pan(&mut self, to: ScreenPoint) -> bool {
        match self.pan.advance(to) {
            Some((dx, dy)) => {
                self.pan_by(-dx, -dy);
                true
            }
            None => false,
        }
    }

    /// Ends the pan gesture. Returns true if one was active.
    pub fn end_pan(&mut self) -> bool {
        self.pan.end()
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportState::default(), DEFAULT_ZOOM_STEP)
    }
}

// Wheel steps accumulate float error (0.1 * n); keep zoom on a fine grid.
fn round_zoom(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut viewport = ViewportController::default();
        assert_eq!(viewport.set_zoom(15.0), 8.0);
        assert_eq!(viewport.set_zoom(-2.0), 0.1);
        assert_eq!(viewport.set_zoom(2.5), 2.5);
    }

    #[test]
    fn non_finite_zoom_is_ignored() {
        let mut viewport = ViewportController::default();
        viewport.set_zoom(3.0);
        assert_eq!(viewport.set_zoom(f64::NAN), 3.0);
        assert_eq!(viewport.set_zoom(f64::INFINITY), 3.0);
    }

    #[test]
    fn initial_zoom_is_clamped() {
        let viewport = ViewportController::new(
            ViewportState {
                zoom: 40.0,
                pan_x: 3.0,
                pan_y: 4.0,
            },
            DEFAULT_ZOOM_STEP,
        );
        assert_eq!(viewport.zoom(), ZOOM_MAX);
        assert_eq!(viewport.state().pan_x, 3.0);
    }

    #[test]
    fn wheel_with_ctrl_steps_zoom() {
        let mut viewport = ViewportController::default();
        for _ in 0..10 {
            viewport.on_wheel(0.0, -120.0, Modifiers::ctrl());
        }
        assert_eq!(viewport.zoom(), 2.0);

        assert_eq!(
            viewport.on_wheel(0.0, 120.0, Modifiers::ctrl()),
            WheelOutcome::Zoomed(1.9)
        );
        assert_eq!(viewport.state().pan_x, 0.0);
        assert_eq!(viewport.state().pan_y, 0.0);
    }

    #[test]
    fn wheel_zoom_stops_at_bounds() {
        let mut viewport = ViewportController::default();
        viewport.set_zoom(0.1);
        viewport.on_wheel(0.0, 1.0, Modifiers::ctrl());
        assert_eq!(viewport.zoom(), ZOOM_MIN);

        viewport.set_zoom(8.0);
        viewport.on_wheel(0.0, -1.0, Modifiers::ctrl());
        assert_eq!(viewport.zoom(), ZOOM_MAX);
    }

    #[test]
    fn wheel_without_modifier_scrolls() {
        let mut viewport = ViewportController::default();
        assert_eq!(
            viewport.on_wheel(5.0, 40.0, Modifiers::default()),
            WheelOutcome::Scrolled
        );
        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(viewport.state().pan_x, 5.0);
        assert_eq!(viewport.state().pan_y, 40.0);
    }

    #[test]
    fn coordinates_account_for_zoom_and_pan() {
        let mut viewport = ViewportController::default();
        viewport.set_zoom(2.0);
        viewport.pan_by(10.0, 20.0);

        let surface = viewport.to_surface_coords(ScreenPoint::new(30.0, 40.0));
        assert_eq!(surface, SurfacePoint::new(20.0, 30.0));
        assert_eq!(
            viewport.to_screen_coords(surface),
            ScreenPoint::new(30.0, 40.0)
        );
    }

    #[test]
    fn pan_is_unconstrained() {
        let mut viewport = ViewportController::default();
        viewport.pan_by(-5000.0, 99999.0);
        assert_eq!(viewport.state().pan_x, -5000.0);
        assert_eq!(viewport.state().pan_y, 99999.0);
    }

    #[test]
    fn drag_pan_scrolls_opposite_to_pointer() {
        let mut viewport = ViewportController::default();
        assert!(!viewport.drag_pan(ScreenPoint::new(1.0, 1.0)));

        viewport.begin_pan(ScreenPoint::new(100.0, 100.0));
        assert!(viewport.drag_pan(ScreenPoint::new(90.0, 120.0)));
        assert_eq!(viewport.state().pan_x, 10.0);
        assert_eq!(viewport.state().pan_y, -20.0);

        assert!(viewport.drag_pan(ScreenPoint::new(80.0, 120.0)));
        assert_eq!(viewport.state().pan_x, 20.0);

        assert!(viewport.end_pan());
        assert!(!viewport.end_pan());
    }
}
