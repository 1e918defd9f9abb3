use crate::draw::{Color, RasterSurface, SurfaceError, WHITE, render_view};
use crate::export::ExportSnapshot;
use crate::session::{DecodeCompletion, DecodeStatus, ImportedFile};

use super::MaskEditor;

impl MaskEditor {
    /// Appends a batch of files to the session.
    ///
    /// Returns the number of images now loaded. Queues a decode when the
    /// session was empty.
    pub fn load_images(&mut self, files: impl IntoIterator<Item = ImportedFile>) -> usize {
        if let Some(request) = self.session.load_images(files) {
            self.pending_decode = Some(request);
        }
        self.session.len()
    }

    /// Advances to the next image (clamped).
    pub fn next_image(&mut self) {
        self.navigate(1);
    }

    /// Goes back to the previous image (clamped).
    pub fn prev_image(&mut self) {
        self.navigate(-1);
    }

    /// Moves by `delta` images, clamped to the session bounds.
    pub fn navigate(&mut self, delta: isize) {
        self.finish_stroke();
        if let Some(request) = self.session.navigate(delta) {
            self.pending_decode = Some(request);
        }
    }

    /// Selects the image at `index` (clamped).
    pub fn goto_image(&mut self, index: usize) {
        self.finish_stroke();
        if let Some(request) = self.session.set_current_index(index) {
            self.pending_decode = Some(request);
        }
    }

    /// Applies a finished background decode.
    pub fn apply_decode(&mut self, completion: DecodeCompletion) -> DecodeStatus {
        let status = self.session.apply_decode(completion);
        if matches!(status, DecodeStatus::Applied { .. }) {
            self.finish_stroke();
        }
        status
    }

    pub fn undo(&mut self) -> Result<bool, SurfaceError> {
        self.finish_stroke();
        self.session.undo()
    }

    pub fn redo(&mut self) -> Result<bool, SurfaceError> {
        self.finish_stroke();
        self.session.redo()
    }

    /// Clears the active mask; undoable.
    pub fn clear_mask(&mut self) -> Result<bool, SurfaceError> {
        self.finish_stroke();
        self.session.clear_mask()
    }

    /// Saves the current mask for the active image.
    pub fn save_mask(&mut self) -> Result<Option<usize>, SurfaceError> {
        self.session.save_mask()
    }

    /// Captures the session for export and queues it for the driver.
    ///
    /// Editing may continue immediately; later saves are not part of this export.
    pub fn request_export(&mut self) -> &ExportSnapshot {
        let snapshot = ExportSnapshot::capture(&self.session, &self.mask_prefix);
        log::info!(
            "Export requested: {} image(s), {} mask(s)",
            snapshot.image_count(),
            snapshot.mask_count()
        );
        self.pending_export.insert(snapshot)
    }

    /// Sets the zoom factor, clamped to 0.1-8.0. Returns the applied zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.viewport.set_zoom(zoom)
    }

    /// Scrolls the view by the given offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    /// Sets the brush size, clamped to 1-50. Returns the applied size.
    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.brush.set_size(size)
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.brush.set_color(color);
    }

    /// Composes the active image and mask under the current viewport.
    ///
    /// Returns `None` when no image surface is active.
    pub fn render_view(&self, width: u32, height: u32) -> Result<Option<RasterSurface>, SurfaceError> {
        let Some(active) = self.session.active() else {
            return Ok(None);
        };
        let state = self.viewport.state();
        render_view(Some(active.base()), active.mask(), &state, width, height, WHITE).map(Some)
    }
}
