//! Utility functions for color names and file naming.
//!
//! This module provides:
//! - Color name/hex mapping for configuration and scripts
//! - File name helpers used for image identity and archive layout

use crate::draw::{Color, color::*};

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system and event scripts. Accepts `#RRGGBB` hex
/// strings in addition to names.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "white", "black"
///
/// # Returns
/// - `Some(Color)` if the name matches a predefined color or valid hex string
/// - `None` otherwise
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        other => Color::from_hex(other),
    }
}

// ============================================================================
// File Names
// ============================================================================

/// Removes the last extension from a file name.
///
/// `"photo.final.png"` becomes `"photo.final"`. Names without an extension, or
/// whose only dot is leading (`".hidden"`), are returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => name,
    }
}

/// Returns `name`, or `"stem (n).ext"` with the first `n >= 2` for which
/// `taken` returns false.
pub fn disambiguate(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }

    let stem = strip_extension(name);
    let ext = &name[stem.len()..];
    (2..)
        .map(|n| format!("{stem} ({n}){ext}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}
