//! Generic pointer event types shared by the viewport and the stroke recorder.

use serde::{Deserialize, Serialize};

/// Position in the visible viewport element, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Position on a raster surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

impl SurfacePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pointer button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Primary button (draws on the mask)
    Primary,
    /// Secondary button (drags the viewport)
    Secondary,
    /// Auxiliary/middle button (currently unused)
    Auxiliary,
}

/// Set of pointer buttons held during a move event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(2);
    pub const AUXILIARY: Self = Self(4);

    /// Returns true if `button` is held.
    pub fn contains(self, button: PointerButton) -> bool {
        self.0 & Self::from(button).0 != 0
    }

    /// Returns true when the primary button is the only one held.
    pub fn is_primary_only(self) -> bool {
        self == Self::PRIMARY
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Adds `button` to the set.
    pub fn with(self, button: PointerButton) -> Self {
        Self(self.0 | Self::from(button).0)
    }
}

impl From<PointerButton> for PointerButtons {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => Self::PRIMARY,
            PointerButton::Secondary => Self::SECONDARY,
            PointerButton::Auxiliary => Self::AUXILIARY,
        }
    }
}

impl FromIterator<PointerButton> for PointerButtons {
    fn from_iter<I: IntoIterator<Item = PointerButton>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Keyboard modifier state accompanying wheel input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Modifier state with only Ctrl held.
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// Whether wheel input should zoom instead of scroll (Ctrl, or Cmd on macOS).
    pub fn zooms(&self) -> bool {
        self.ctrl || self.meta
    }
}
