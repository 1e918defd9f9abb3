//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::export::archive::{DEFAULT_ARCHIVE_NAME, DEFAULT_MASK_PREFIX};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Brush settings applied when the editor starts.
///
/// Brush size and color are shared by every image and can be changed while
/// editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrushSettings {
    /// Initial brush diameter in pixels (valid range: 1 - 50)
    #[serde(default = "default_brush_size")]
    pub default_size: u32,

    /// Initial brush color - a named color, `"#RRGGBB"`, or an RGB array
    /// like `[255, 0, 0]`
    #[serde(default)]
    pub default_color: ColorSpec,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            default_size: default_brush_size(),
            default_color: ColorSpec::default(),
        }
    }
}

/// Viewport zoom settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ViewportSettings {
    /// Initial zoom factor (valid range: 0.1 - 8.0)
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Zoom change per wheel step with Ctrl/Meta held (valid range: 0.01 - 1.0)
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            default_zoom: default_zoom(),
            zoom_step: default_zoom_step(),
        }
    }
}

/// Undo history settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistorySettings {
    /// Maximum undo steps kept per image; 0 keeps every step
    #[serde(default)]
    pub max_depth: usize,
}

/// Archive export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExportSettings {
    /// File name of the exported archive (overwritten on each export)
    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    /// Directory archives are written to; `~` expands to the home directory
    #[serde(default = "default_output_directory")]
    pub output_directory: String,

    /// Prefix of numbered mask files inside each image folder
    #[serde(default = "default_mask_prefix")]
    pub mask_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            archive_name: default_archive_name(),
            output_directory: default_output_directory(),
            mask_prefix: default_mask_prefix(),
        }
    }
}

fn default_brush_size() -> u32 {
    10
}

fn default_zoom() -> f64 {
    1.0
}

fn default_zoom_step() -> f64 {
    0.1
}

pub(super) fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

fn default_output_directory() -> String {
    "~/Pictures/MaskStudio".to_string()
}

pub(super) fn default_mask_prefix() -> String {
    DEFAULT_MASK_PREFIX.to_string()
}
