//! JSON event scripts for headless editing runs.
//!
//! A script is a list of steps mirroring the input events and commands the
//! editor understands:
//!
//! ```json
//! {
//!   "steps": [
//!     { "action": "load", "paths": ["a.png", "b.jpg"] },
//!     { "action": "brush_size", "size": 12 },
//!     { "action": "pointer_down", "x": 10, "y": 10 },
//!     { "action": "pointer_move", "x": 40, "y": 10, "buttons": ["primary"] },
//!     { "action": "pointer_up" },
//!     { "action": "save_mask" },
//!     { "action": "export" }
//!   ]
//! }
//! ```
//!
//! Relative paths in `load` steps are resolved against the script's directory.

use crate::input::{Modifiers, PointerButton, PointerButtons, ScreenPoint};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One scripted event or command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Import a batch of image files
    Load { paths: Vec<PathBuf> },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: PointerButton,
    },
    PointerMove {
        x: f64,
        y: f64,
        /// Buttons held during the move; defaults to the primary button
        #[serde(default = "primary_held")]
        buttons: Vec<PointerButton>,
    },
    PointerUp {
        #[serde(default = "primary")]
        button: PointerButton,
    },
    PointerLeave,
    /// Press, drag through every point, release (primary button)
    Stroke { points: Vec<[f64; 2]> },
    Wheel {
        #[serde(default)]
        dx: f64,
        dy: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Zoom { value: f64 },
    Pan { dx: f64, dy: f64 },
    BrushSize { size: u32 },
    /// Named color or `#RRGGBB`
    BrushColor { color: String },
    Undo,
    Redo,
    Clear,
    SaveMask,
    Next,
    Prev,
    Goto { index: usize },
    Export,
}

impl ScriptStep {
    /// Held buttons of a `pointer_move` step as a bitmask.
    pub fn held_buttons(buttons: &[PointerButton]) -> PointerButtons {
        buttons.iter().copied().collect()
    }

    /// Converts a `[x, y]` pair to a screen point.
    pub fn point([x, y]: [f64; 2]) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    /// True for steps that edit or read the mask of the current image.
    pub fn needs_active_surface(&self) -> bool {
        matches!(
            self,
            ScriptStep::PointerDown { .. }
                | ScriptStep::PointerMove { .. }
                | ScriptStep::Stroke { .. }
                | ScriptStep::Undo
                | ScriptStep::Redo
                | ScriptStep::Clear
                | ScriptStep::SaveMask
        )
    }
}

fn primary() -> PointerButton {
    PointerButton::Primary
}

fn primary_held() -> Vec<PointerButton> {
    vec![PointerButton::Primary]
}

/// A parsed event script.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Parses a script from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse event script")
    }

    /// Reads a script file, resolving relative image paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script from {}", path.display()))?;
        let mut script = Self::parse(&text)
            .with_context(|| format!("Invalid script {}", path.display()))?;

        if let Some(base) = path.parent() {
            script.resolve_paths(base);
        }
        log::info!("Loaded script {} ({} steps)", path.display(), script.steps.len());
        Ok(script)
    }

    /// Makes every relative `load` path relative to `base` instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        for step in &mut self.steps {
            if let ScriptStep::Load { paths } = step {
                for path in paths.iter_mut() {
                    if path.is_relative() {
                        *path = base.join(&*path);
                    }
                }
            }
        }
    }
}
