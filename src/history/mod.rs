//! Per-image undo/redo stacks of raster snapshots.
//!
//! Stacks are keyed by the image's position in the session, not by its name.
//! Sessions are append-only so earlier indices never shift; if removal is ever
//! added, history must be re-keyed by image identity.

use crate::draw::{RasterSurface, SurfaceError, SurfaceSnapshot};
use std::collections::HashMap;

/// Opaque full copy of a mask surface at a point in time.
pub type HistoryEntry = SurfaceSnapshot;

#[derive(Debug, Default)]
struct Stacks {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

/// Undo/redo stacks for every image index that has been edited.
#[derive(Debug, Default)]
pub struct HistoryManager {
    stacks: HashMap<usize, Stacks>,
    /// Maximum undo entries per index (0 = unlimited)
    max_depth: usize,
}

impl HistoryManager {
    /// Creates a history manager keeping at most `max_depth` undo steps per image.
    ///
    /// A depth of 0 keeps every step.
    pub fn new(max_depth: usize) -> Self {
        Self {
            stacks: HashMap::new(),
            max_depth,
        }
    }

    /// Records `entry` as the newest undo step for `index` and clears its redo stack.
    pub fn push(&mut self, index: usize, entry: HistoryEntry) {
        let stacks = self.stacks.entry(index).or_default();
        stacks.undo.push(entry);
        stacks.redo.clear();

        if self.max_depth > 0 && stacks.undo.len() > self.max_depth {
            let excess = stacks.undo.len() - self.max_depth;
            stacks.undo.drain(..excess);
            log::debug!("History for image {} trimmed by {} entries", index, excess);
        }
    }

    /// Snapshots `surface` and pushes it for `index`.
    pub fn record(&mut self, index: usize, surface: &mut RasterSurface) -> Result<(), SurfaceError> {
        let snapshot = surface.snapshot()?;
        let bytes = snapshot.byte_len();
        self.push(index, snapshot);
        log::debug!(
            "History push for image {} ({} bytes, undo depth {})",
            index,
            bytes,
            self.undo_depth(index)
        );
        Ok(())
    }

    /// Restores the most recent undo step for `index` onto `surface`.
    ///
    /// The surface's current content moves to the redo stack. Returns `Ok(false)`
    /// when there is nothing to undo. `surface` must be the mask of `index`.
    pub fn undo(&mut self, index: usize, surface: &mut RasterSurface) -> Result<bool, SurfaceError> {
        let Some(stacks) = self.stacks.get_mut(&index) else {
            return Ok(false);
        };
        transfer(&mut stacks.undo, &mut stacks.redo, surface)
    }

    /// Mirror of [`HistoryManager::undo`].
    pub fn redo(&mut self, index: usize, surface: &mut RasterSurface) -> Result<bool, SurfaceError> {
        let Some(stacks) = self.stacks.get_mut(&index) else {
            return Ok(false);
        };
        transfer(&mut stacks.redo, &mut stacks.undo, surface)
    }

    pub fn undo_depth(&self, index: usize) -> usize {
        self.stacks.get(&index).map_or(0, |s| s.undo.len())
    }

    pub fn redo_depth(&self, index: usize) -> usize {
        self.stacks.get(&index).map_or(0, |s| s.redo.len())
    }
}

// Moves the newest entry of `from` onto the surface, saving the current content to `to`.
fn transfer(
    from: &mut Vec<HistoryEntry>,
    to: &mut Vec<HistoryEntry>,
    surface: &mut RasterSurface,
) -> Result<bool, SurfaceError> {
    let Some(target) = from.last() else {
        return Ok(false);
    };
    let current = surface.snapshot()?;
    surface.restore(target)?;
    from.pop();
    to.push(current);
    Ok(true)
}
