//! Event-driven editing façade.
//!
//! [`MaskEditor`] routes pointer, wheel and command events between the
//! viewport, the stroke recorder and the session. It never blocks: decode and
//! export work is queued as pending requests that the driver takes and hands
//! to the background managers.

mod actions;
mod pointer;

use crate::config::Config;
use crate::draw::Color;
use crate::export::ExportSnapshot;
use crate::input::{BrushConfig, StrokeRecorder};
use crate::session::{DecodeRequest, Session};
use crate::viewport::{ViewportController, ViewportState};
use std::fmt;

/// Summary of the editor state for status display.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorStatus {
    pub current_index: Option<usize>,
    pub image_count: usize,
    pub current_name: Option<String>,
    pub awaiting_decode: bool,
    pub zoom: f64,
    pub brush_size: u32,
    pub brush_color: Color,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub saved_masks: usize,
}

impl fmt::Display for EditorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.current_index, &self.current_name) {
            (Some(index), Some(name)) => {
                write!(f, "{}/{} {}", index + 1, self.image_count, name)?
            }
            _ => write!(f, "no images")?,
        }
        if self.awaiting_decode {
            write!(f, " (loading)")?;
        }
        write!(
            f,
            " | zoom {:.0}% | brush {}px {} | undo {} redo {} | {} saved",
            self.zoom * 100.0,
            self.brush_size,
            self.brush_color.to_hex(),
            self.undo_depth,
            self.redo_depth,
            self.saved_masks
        )
    }
}

/// Editing state for one session: images, brush, viewport and the live stroke.
///
/// Brush and viewport are shared by every image and are not reset on navigation.
#[derive(Debug)]
pub struct MaskEditor {
    session: Session,
    brush: BrushConfig,
    viewport: ViewportController,
    recorder: StrokeRecorder,
    mask_prefix: String,
    pending_decode: Option<DecodeRequest>,
    pending_export: Option<ExportSnapshot>,
}

impl MaskEditor {
    /// Creates an editor with explicit defaults.
    ///
    /// # Arguments
    /// * `brush` - Initial brush size and color
    /// * `viewport` - Viewport controller carrying the initial zoom and wheel step
    /// * `history_depth` - Undo steps kept per image (0 = unlimited)
    /// * `mask_prefix` - File name prefix for masks in exported archives
    pub fn with_defaults(
        brush: BrushConfig,
        viewport: ViewportController,
        history_depth: usize,
        mask_prefix: impl Into<String>,
    ) -> Self {
        Self {
            session: Session::new(history_depth),
            brush,
            viewport,
            recorder: StrokeRecorder::new(),
            mask_prefix: mask_prefix.into(),
            pending_decode: None,
            pending_export: None,
        }
    }

    /// Creates an editor from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let brush = BrushConfig::new(config.brush.default_size, config.brush.default_color.to_color());
        let viewport = ViewportController::new(
            ViewportState {
                zoom: config.viewport.default_zoom,
                ..ViewportState::default()
            },
            config.viewport.zoom_step,
        );
        Self::with_defaults(
            brush,
            viewport,
            config.history.max_depth,
            config.export.mask_prefix.clone(),
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }

    /// Returns true while a decode request is waiting to be dispatched.
    pub fn has_pending_decode(&self) -> bool {
        self.pending_decode.is_some()
    }

    /// Takes the queued decode request, if any.
    pub fn take_pending_decode(&mut self) -> Option<DecodeRequest> {
        self.pending_decode.take()
    }

    /// Takes the queued export snapshot, if any.
    pub fn take_pending_export(&mut self) -> Option<ExportSnapshot> {
        self.pending_export.take()
    }

    /// Current state summary.
    pub fn status(&self) -> EditorStatus {
        let current_index = self.session.current_index();
        let current_name = self.session.current_entry().map(|e| e.name().to_string());
        let history = self.session.history();
        let (undo_depth, redo_depth) = match current_index {
            Some(index) => (history.undo_depth(index), history.redo_depth(index)),
            None => (0, 0),
        };
        let saved_masks = current_name
            .as_deref()
            .map_or(0, |name| self.session.masks().count(name));

        EditorStatus {
            current_index,
            image_count: self.session.len(),
            current_name,
            awaiting_decode: self.session.is_awaiting_decode(),
            zoom: self.viewport.zoom(),
            brush_size: self.brush.size(),
            brush_color: self.brush.color(),
            undo_depth,
            redo_depth,
            saved_masks,
        }
    }
}

impl Default for MaskEditor {
    fn default() -> Self {
        Self::with_defaults(
            BrushConfig::default(),
            ViewportController::default(),
            0,
            crate::export::archive::DEFAULT_MASK_PREFIX,
        )
    }
}
