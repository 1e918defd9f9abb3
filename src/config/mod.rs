//! Configuration file support for maskstudio.
//!
//! This module handles loading and validating user settings from the
//! configuration file located at `~/.config/maskstudio/config.toml`. Settings
//! include brush defaults, viewport zoom, undo depth, and archive export.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{BrushSettings, ExportSettings, HistorySettings, ViewportSettings};

use crate::export::ArchiveSaveConfig;
use crate::export::file::expand_tilde;
use crate::input::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::viewport::{ZOOM_MAX, ZOOM_MIN};
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// All fields have sensible defaults and will use those if not specified in
/// the config file.
///
/// # Example TOML
/// ```toml
/// [brush]
/// default_size = 10
/// default_color = "red"
///
/// [viewport]
/// default_zoom = 1.0
/// zoom_step = 0.1
///
/// [history]
/// max_depth = 0
///
/// [export]
/// archive_name = "masks_by_image.zip"
/// output_directory = "~/Pictures/MaskStudio"
/// mask_prefix = "mask"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Initial brush size and color
    #[serde(default)]
    pub brush: BrushSettings,

    /// Initial zoom and wheel zoom step
    #[serde(default)]
    pub viewport: ViewportSettings,

    /// Undo history limits
    #[serde(default)]
    pub history: HistorySettings,

    /// Archive export location and naming
    #[serde(default)]
    pub export: ExportSettings,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or reset to the
    /// default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `brush.default_size`: 1 - 50
    /// - `viewport.default_zoom`: 0.1 - 8.0
    /// - `viewport.zoom_step`: 0.01 - 1.0
    /// - `export.archive_name` / `export.mask_prefix`: non-empty, no path separators
    fn validate_and_clamp(&mut self) {
        if !(MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).contains(&self.brush.default_size) {
            log::warn!(
                "Invalid brush default_size {}, clamping to {}-{} range",
                self.brush.default_size,
                MIN_BRUSH_SIZE,
                MAX_BRUSH_SIZE
            );
            self.brush.default_size = self.brush.default_size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        }

        if !self.viewport.default_zoom.is_finite() {
            log::warn!(
                "Invalid viewport default_zoom {}, using 1.0",
                self.viewport.default_zoom
            );
            self.viewport.default_zoom = 1.0;
        } else if !(ZOOM_MIN..=ZOOM_MAX).contains(&self.viewport.default_zoom) {
            log::warn!(
                "Invalid viewport default_zoom {:.2}, clamping to {:.1}-{:.1} range",
                self.viewport.default_zoom,
                ZOOM_MIN,
                ZOOM_MAX
            );
            self.viewport.default_zoom = self.viewport.default_zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }

        if !self.viewport.zoom_step.is_finite() {
            log::warn!("Invalid viewport zoom_step {}, using 0.1", self.viewport.zoom_step);
            self.viewport.zoom_step = 0.1;
        } else if !(0.01..=1.0).contains(&self.viewport.zoom_step) {
            log::warn!(
                "Invalid viewport zoom_step {:.3}, clamping to 0.01-1.0 range",
                self.viewport.zoom_step
            );
            self.viewport.zoom_step = self.viewport.zoom_step.clamp(0.01, 1.0);
        }

        if !is_plain_file_name(&self.export.archive_name) {
            log::warn!(
                "Invalid export archive_name '{}', falling back to '{}'",
                self.export.archive_name,
                types::default_archive_name()
            );
            self.export.archive_name = types::default_archive_name();
        }

        if !is_plain_file_name(&self.export.mask_prefix) {
            log::warn!(
                "Invalid export mask_prefix '{}', falling back to '{}'",
                self.export.mask_prefix,
                types::default_mask_prefix()
            );
            self.export.mask_prefix = types::default_mask_prefix();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/maskstudio/config.toml`
    /// (respecting `XDG_CONFIG_HOME`).
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("maskstudio");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Where exported archives are written, with `~` expanded.
    pub fn archive_save_config(&self) -> ArchiveSaveConfig {
        ArchiveSaveConfig {
            directory: expand_tilde(&self.export.output_directory),
            archive_name: self.export.archive_name.clone(),
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Color, RED};

    fn load_str(contents: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        Config::load_from(&path).unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = load_str("");
        assert_eq!(config, Config::default());
        assert_eq!(config.brush.default_size, 10);
        assert_eq!(config.brush.default_color.to_color(), RED);
        assert_eq!(config.viewport.default_zoom, 1.0);
        assert_eq!(config.viewport.zoom_step, 0.1);
        assert_eq!(config.history.max_depth, 0);
        assert_eq!(config.export.archive_name, "masks_by_image.zip");
        assert_eq!(config.export.mask_prefix, "mask");
    }

    #[test]
    fn values_are_read_from_sections() {
        let config = load_str(
            r#"
            [brush]
            default_size = 24
            default_color = [0, 128, 255]

            [viewport]
            default_zoom = 2.5

            [history]
            max_depth = 20

            [export]
            archive_name = "out.zip"
            output_directory = "/tmp/masks"
            "#,
        );
        assert_eq!(config.brush.default_size, 24);
        assert_eq!(config.brush.default_color.to_color(), Color::from_rgb8(0, 128, 255));
        assert_eq!(config.viewport.default_zoom, 2.5);
        assert_eq!(config.history.max_depth, 20);

        let save = config.archive_save_config();
        assert_eq!(save.directory, PathBuf::from("/tmp/masks"));
        assert_eq!(save.archive_name, "out.zip");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = load_str(
            r#"
            [brush]
            default_size = 500

            [viewport]
            default_zoom = 15.0
            zoom_step = 0.0
            "#,
        );
        assert_eq!(config.brush.default_size, 50);
        assert_eq!(config.viewport.default_zoom, 8.0);
        assert_eq!(config.viewport.zoom_step, 0.01);

        let config = load_str("[brush]\ndefault_size = 0\n[viewport]\ndefault_zoom = -2.0\n");
        assert_eq!(config.brush.default_size, 1);
        assert_eq!(config.viewport.default_zoom, 0.1);
    }

    #[test]
    fn invalid_export_names_fall_back() {
        let config = load_str("[export]\narchive_name = \"../evil.zip\"\nmask_prefix = \"  \"\n");
        assert_eq!(config.export.archive_name, "masks_by_image.zip");
        assert_eq!(config.export.mask_prefix, "mask");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[brush\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = Config::default().to_toml().unwrap();
        assert!(text.contains("[brush]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn schema_lists_sections() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        for section in ["brush", "viewport", "history", "export"] {
            assert!(schema.contains(section), "schema missing {section}");
        }
    }
}
