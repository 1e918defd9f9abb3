//! Headless driver that replays event scripts against a [`MaskEditor`].
//!
//! The driver owns the Tokio runtime and both background managers. After each
//! step it dispatches queued decode/export work and applies whatever decodes
//! and export results have already finished, without waiting. It blocks on a
//! pending decode only before a step that edits the mask, and at the end of
//! the run. Navigation steps can therefore outrun their decodes, and the
//! session drops the completions that arrive stale.
//!
//! A raster error inside one editing step is logged and the step is skipped;
//! the rest of the script still runs.

use crate::config::Config;
use crate::draw::SurfaceError;
use crate::draw::surface::MAX_DIMENSION;
use crate::editor::{EditorStatus, MaskEditor};
use crate::export::{
    ArchiveSaveConfig, ExportDestination, ExportManager, ExportOutcome,
};
use crate::input::{PointerButton, PointerButtons, ScreenPoint};
use crate::script::{Script, ScriptStep};
use crate::session::{DecodeCompletion, DecodeManager, DecodeStatus, ImportedFile};
use crate::util;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one export triggered by a script.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportReport {
    Saved {
        path: Option<PathBuf>,
        images: usize,
        masks: usize,
    },
    Failed(String),
}

/// Summary of a script run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub steps: usize,
    pub exports: Vec<ExportReport>,
    /// Images that could not be decoded, with the reason
    pub failures: Vec<(String, String)>,
    pub status: EditorStatus,
}

impl RunReport {
    pub fn failed_exports(&self) -> usize {
        self.exports
            .iter()
            .filter(|e| matches!(e, ExportReport::Failed(_)))
            .count()
    }
}

/// Owns the editor and the background decode/export machinery.
pub struct App {
    editor: MaskEditor,
    decode_manager: DecodeManager,
    export_manager: ExportManager,
    save_config: ArchiveSaveConfig,
    export_in_progress: bool,
    exports: Vec<ExportReport>,
    /// Tokio runtime for background decode and export work
    tokio_runtime: tokio::runtime::Runtime,
}

impl App {
    /// Creates a driver from configuration.
    ///
    /// `output_dir` overrides the configured export directory.
    pub fn new(config: &Config, output_dir: Option<PathBuf>) -> Result<Self> {
        let tokio_runtime = tokio::runtime::Runtime::new()
            .context("Failed to create Tokio runtime for background work")?;
        let decode_manager = DecodeManager::new(tokio_runtime.handle());
        let export_manager = ExportManager::new(tokio_runtime.handle());

        let mut save_config = config.archive_save_config();
        if let Some(dir) = output_dir {
            save_config.directory = dir;
        }
        log::debug!(
            "Archives will be written to {}",
            save_config.directory.join(&save_config.archive_name).display()
        );

        Ok(Self {
            editor: MaskEditor::from_config(config),
            decode_manager,
            export_manager,
            save_config,
            export_in_progress: false,
            exports: Vec::new(),
            tokio_runtime,
        })
    }

    pub fn editor(&self) -> &MaskEditor {
        &self.editor
    }

    /// Replays every step of `script` and waits for outstanding exports.
    pub fn run_script(&mut self, script: &Script) -> Result<RunReport> {
        for (i, step) in script.steps.iter().enumerate() {
            log::debug!("Step {}: {:?}", i + 1, step);
            if step.needs_active_surface() {
                self.settle_decodes(true)?;
            }
            self.apply_step(step)
                .with_context(|| format!("Script step {} failed", i + 1))?;
            self.dispatch_pending()?;
            self.settle_decodes(false)?;
            self.collect_export(false);
        }
        self.settle_decodes(true)?;
        self.collect_export(true);

        let failures = self
            .editor
            .session()
            .failures()
            .into_iter()
            .map(|(name, reason)| (name.to_string(), reason.to_string()))
            .collect();

        Ok(RunReport {
            steps: script.steps.len(),
            exports: std::mem::take(&mut self.exports),
            failures,
            status: self.editor.status(),
        })
    }

    fn apply_step(&mut self, step: &ScriptStep) -> Result<()> {
        let editor = &mut self.editor;
        match step {
            ScriptStep::Load { paths } => {
                let files = paths
                    .iter()
                    .map(|path| {
                        ImportedFile::read(path)
                            .with_context(|| format!("Failed to read image {}", path.display()))
                    })
                    .collect::<Result<Vec<_>>>()?;
                editor.load_images(files);
            }
            ScriptStep::PointerDown { x, y, button } => {
                skip_failed_edit(
                    "Pointer down",
                    editor.on_pointer_down(ScreenPoint::new(*x, *y), *button),
                );
            }
            ScriptStep::PointerMove { x, y, buttons } => {
                skip_failed_edit(
                    "Pointer move",
                    editor.on_pointer_move(
                        ScreenPoint::new(*x, *y),
                        ScriptStep::held_buttons(buttons),
                    ),
                );
            }
            ScriptStep::PointerUp { button } => editor.on_pointer_up(*button),
            ScriptStep::PointerLeave => editor.on_pointer_leave(),
            ScriptStep::Stroke { points } => {
                skip_failed_edit("Stroke", replay_stroke(editor, points));
            }
            ScriptStep::Wheel { dx, dy, modifiers } => {
                editor.on_wheel(*dx, *dy, *modifiers);
            }
            ScriptStep::Zoom { value } => {
                editor.set_zoom(*value);
            }
            ScriptStep::Pan { dx, dy } => editor.pan_by(*dx, *dy),
            ScriptStep::BrushSize { size } => {
                editor.set_brush_size(*size);
            }
            ScriptStep::BrushColor { color } => {
                let parsed = util::name_to_color(color)
                    .with_context(|| format!("Unknown brush color '{}'", color))?;
                editor.set_brush_color(parsed);
            }
            ScriptStep::Undo => {
                skip_failed_edit("Undo", editor.undo());
            }
            ScriptStep::Redo => {
                skip_failed_edit("Redo", editor.redo());
            }
            ScriptStep::Clear => {
                skip_failed_edit("Clear", editor.clear_mask());
            }
            ScriptStep::SaveMask => {
                if let Some(None) = skip_failed_edit("Save mask", editor.save_mask()) {
                    log::warn!("Save ignored: no image is ready");
                }
            }
            ScriptStep::Next => editor.next_image(),
            ScriptStep::Prev => editor.prev_image(),
            ScriptStep::Goto { index } => editor.goto_image(*index),
            ScriptStep::Export => {
                editor.request_export();
            }
        }
        Ok(())
    }

    /// Hands queued decode and export work to the background managers.
    fn dispatch_pending(&mut self) -> Result<()> {
        if let Some(request) = self.editor.take_pending_decode() {
            self.decode_manager.request(request)?;
        }

        if let Some(snapshot) = self.editor.take_pending_export() {
            // One result slot: collect the previous export before starting another.
            self.collect_export(true);
            self.export_manager
                .request_export(snapshot, ExportDestination::File(self.save_config.clone()))?;
            self.export_in_progress = true;
        }
        Ok(())
    }

    /// Applies finished decodes. With `wait`, blocks until the current image
    /// is resolved.
    fn settle_decodes(&mut self, wait: bool) -> Result<()> {
        while let Some(completion) = self.decode_manager.try_next() {
            self.apply_completion(completion);
        }
        while wait && self.editor.session().is_awaiting_decode() {
            let completion = self
                .tokio_runtime
                .block_on(self.decode_manager.next())
                .context("Decode manager stopped")?;
            self.apply_completion(completion);
        }
        Ok(())
    }

    fn apply_completion(&mut self, completion: DecodeCompletion) {
        match self.editor.apply_decode(completion) {
            DecodeStatus::Applied {
                index,
                width,
                height,
            } => log::debug!("Image {} ready ({}x{})", index, width, height),
            DecodeStatus::Stale { index } => {
                log::debug!("Ignored stale decode for image {}", index)
            }
            DecodeStatus::Failed { name, error, .. } => {
                log::error!("Could not load '{}': {}", name, error)
            }
        }
    }

    fn collect_export(&mut self, wait: bool) {
        if !self.export_in_progress {
            return;
        }
        let outcome = if wait {
            Some(self.tokio_runtime.block_on(self.export_manager.wait_for_result()))
        } else {
            self.export_manager.try_take_result()
        };
        let Some(outcome) = outcome else {
            return;
        };

        self.export_in_progress = false;
        self.tokio_runtime.block_on(self.export_manager.reset());
        let report = match outcome {
            ExportOutcome::Success(result) => ExportReport::Saved {
                path: result.saved_path,
                images: result.image_count,
                masks: result.mask_count,
            },
            ExportOutcome::Failed(message) => ExportReport::Failed(message),
        };
        self.exports.push(report);
    }

    /// Renders the current view to a PNG file.
    ///
    /// Without an explicit size the whole image is rendered at the current
    /// zoom. Returns false when no image is active.
    pub fn write_preview(&self, path: &Path, size: Option<(u32, u32)>) -> Result<bool> {
        let Some(active) = self.editor.session().active() else {
            log::warn!("No active image; preview not written");
            return Ok(false);
        };
        let zoom = self.editor.viewport().zoom();
        let scaled = |extent: u32| ((extent as f64 * zoom).ceil() as u32).clamp(1, MAX_DIMENSION);
        let (width, height) =
            size.unwrap_or_else(|| (scaled(active.mask().width()), scaled(active.mask().height())));

        let Some(view) = self.editor.render_view(width, height)? else {
            return Ok(false);
        };
        fs::write(path, view.to_png()?)
            .with_context(|| format!("Failed to write preview to {}", path.display()))?;
        log::info!("Preview written to {} ({}x{})", path.display(), width, height);
        Ok(true)
    }
}

/// Logs a failed edit and drops its result.
fn skip_failed_edit<T>(action: &str, result: Result<T, SurfaceError>) -> Option<T> {
    result
        .map_err(|error| log::warn!("{} failed, step skipped: {}", action, error))
        .ok()
}

fn replay_stroke(editor: &mut MaskEditor, points: &[[f64; 2]]) -> Result<(), SurfaceError> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };
    editor.on_pointer_down(ScriptStep::point(*first), PointerButton::Primary)?;
    let moved = rest.iter().try_for_each(|point| {
        editor
            .on_pointer_move(ScriptStep::point(*point), PointerButtons::PRIMARY)
            .map(|_| ())
    });
    // Release even after a failed segment.
    editor.on_pointer_up(PointerButton::Primary);
    moved
}
