//! Ordered image collection, active surfaces and per-image editing state.

use super::decode::{DecodeCompletion, DecodeError, DecodeRequest, DecodedImage};
use super::entry::{DecodeState, ImageEntry, ImportedFile, MaskRecord};
use crate::draw::{RasterSurface, SurfaceError};
use crate::history::HistoryManager;
use crate::util;

/// Surfaces materialized for the active image.
///
/// At most one exists at a time; it is discarded on every navigation and
/// rebuilt when the decode for the new index completes.
#[derive(Debug)]
pub struct ActiveImage {
    index: usize,
    base: RasterSurface,
    mask: RasterSurface,
}

impl ActiveImage {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Decoded source pixels.
    pub fn base(&self) -> &RasterSurface {
        &self.base
    }

    pub fn mask(&self) -> &RasterSurface {
        &self.mask
    }

    pub fn mask_mut(&mut self) -> &mut RasterSurface {
        &mut self.mask
    }
}

/// Result of applying a decode completion.
#[derive(Debug)]
pub enum DecodeStatus {
    /// Surfaces were allocated for the active image
    Applied {
        index: usize,
        width: u32,
        height: u32,
    },
    /// The completion belongs to an earlier navigation and was dropped
    Stale { index: usize },
    /// The active image could not be decoded; the session continues
    Failed {
        index: usize,
        name: String,
        error: DecodeError,
    },
}

/// In-memory editing run over a sequence of images.
///
/// Images are only ever appended, so indices are stable for the life of the
/// session and history can be keyed by index.
#[derive(Debug)]
pub struct Session {
    entries: Vec<ImageEntry>,
    current_index: usize,
    /// Bumped on every decode request; completions from older generations are stale
    generation: u64,
    awaiting_decode: bool,
    active: Option<ActiveImage>,
    history: HistoryManager,
    masks: MaskRecord,
}

impl Session {
    /// Creates an empty session keeping at most `history_depth` undo steps per image.
    pub fn new(history_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_index: 0,
            generation: 0,
            awaiting_decode: false,
            active: None,
            history: HistoryManager::new(history_depth),
            masks: MaskRecord::default(),
        }
    }

    /// Appends files to the end of the session, preserving their order.
    ///
    /// Names already present are disambiguated so identity stays unique. When
    /// the session was empty the first new image becomes current and its decode
    /// request is returned.
    pub fn load_images(
        &mut self,
        files: impl IntoIterator<Item = ImportedFile>,
    ) -> Option<DecodeRequest> {
        let was_empty = self.entries.is_empty();
        let mut added = 0;

        for file in files {
            let name = util::disambiguate(&file.name, |candidate| {
                self.entries.iter().any(|entry| entry.name() == candidate)
            });
            if name != file.name {
                log::warn!("Duplicate image name '{}' imported as '{}'", file.name, name);
            }
            self.entries.push(ImageEntry::new(name, file.bytes));
            added += 1;
        }

        log::info!(
            "Imported {} image(s); session now holds {}",
            added,
            self.entries.len()
        );

        if was_empty && !self.entries.is_empty() {
            self.current_index = 0;
            return self.request_active_decode();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    /// Index of the current image, or `None` for an empty session.
    pub fn current_index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.current_index)
    }

    pub fn current_entry(&self) -> Option<&ImageEntry> {
        self.current_index().and_then(|i| self.entries.get(i))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a decode for the current image is outstanding.
    pub fn is_awaiting_decode(&self) -> bool {
        self.awaiting_decode
    }

    /// Makes `index` (clamped to the valid range) the current image.
    ///
    /// Discards the active surfaces and returns a decode request for the new
    /// image. Returns `None` for an empty session, or when the index is already
    /// current and its surfaces exist or are being decoded.
    pub fn set_current_index(&mut self, index: usize) -> Option<DecodeRequest> {
        if self.entries.is_empty() {
            return None;
        }
        let clamped = index.min(self.entries.len() - 1);
        if clamped == self.current_index && (self.active.is_some() || self.awaiting_decode) {
            return None;
        }

        self.current_index = clamped;
        self.active = None;
        self.request_active_decode()
    }

    /// Moves by `delta` images, clamped to the session bounds.
    pub fn navigate(&mut self, delta: isize) -> Option<DecodeRequest> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() as isize - 1;
        let target = (self.current_index as isize).saturating_add(delta).clamp(0, last);
        self.set_current_index(target as usize)
    }

    fn request_active_decode(&mut self) -> Option<DecodeRequest> {
        let index = self.current_index;
        let entry = self.entries.get_mut(index)?;
        if matches!(entry.state(), DecodeState::Failed(_)) {
            entry.set_state(DecodeState::Pending);
        }

        self.generation += 1;
        self.awaiting_decode = true;
        log::debug!(
            "Requesting decode of '{}' (index {}, generation {})",
            entry.name(),
            index,
            self.generation
        );

        Some(DecodeRequest {
            index,
            generation: self.generation,
            name: entry.name().to_string(),
            bytes: entry.bytes().clone(),
        })
    }

    /// Applies a finished decode if it is still for the active navigation.
    ///
    /// On success the base surface is filled with the source pixels and a fresh
    /// transparent mask of the same size is allocated. Failures mark the entry
    /// as failed without affecting other images.
    pub fn apply_decode(&mut self, completion: DecodeCompletion) -> DecodeStatus {
        if completion.generation != self.generation || completion.index != self.current_index {
            log::debug!(
                "Dropping stale decode of '{}' (generation {}, current {})",
                completion.name,
                completion.generation,
                self.generation
            );
            return DecodeStatus::Stale {
                index: completion.index,
            };
        }
        self.awaiting_decode = false;

        let index = completion.index;
        let name = completion.name;
        let surfaces = completion.result.and_then(|decoded| {
            allocate_surfaces(&decoded).map_err(|source| DecodeError::Surface {
                name: name.clone(),
                source,
            })
        });

        match surfaces {
            Ok((base, mask)) => {
                let (width, height) = (base.width(), base.height());
                if let Some(entry) = self.entries.get_mut(index) {
                    entry.set_state(DecodeState::Ready { width, height });
                }
                self.active = Some(ActiveImage { index, base, mask });
                log::info!("Loaded '{}' ({}x{})", name, width, height);
                DecodeStatus::Applied {
                    index,
                    width,
                    height,
                }
            }
            Err(error) => {
                log::warn!("Image '{}' could not be loaded: {}", name, error);
                if let Some(entry) = self.entries.get_mut(index) {
                    entry.set_state(DecodeState::Failed(error.to_string()));
                }
                self.active = None;
                DecodeStatus::Failed { index, name, error }
            }
        }
    }

    pub fn active(&self) -> Option<&ActiveImage> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveImage> {
        self.active.as_mut()
    }

    pub fn has_active_surface(&self) -> bool {
        self.active.is_some()
    }

    /// Pushes the current mask onto the active image's undo stack.
    ///
    /// Returns `Ok(false)` when no surface is active.
    pub fn push_history(&mut self) -> Result<bool, SurfaceError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(false);
        };
        self.history.record(active.index, &mut active.mask)?;
        Ok(true)
    }

    /// Undoes the last edit on the active image. No-op without history or surface.
    pub fn undo(&mut self) -> Result<bool, SurfaceError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(false);
        };
        let undone = self.history.undo(active.index, &mut active.mask)?;
        if undone {
            log::debug!("Undo on image {}", active.index);
        }
        Ok(undone)
    }

    /// Redoes the last undone edit on the active image.
    pub fn redo(&mut self) -> Result<bool, SurfaceError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(false);
        };
        let redone = self.history.redo(active.index, &mut active.mask)?;
        if redone {
            log::debug!("Redo on image {}", active.index);
        }
        Ok(redone)
    }

    /// Clears the active mask as an undoable edit.
    pub fn clear_mask(&mut self) -> Result<bool, SurfaceError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(false);
        };
        self.history.record(active.index, &mut active.mask)?;
        active.mask.clear()?;
        log::debug!("Cleared mask for image {}", active.index);
        Ok(true)
    }

    /// Encodes the active mask and appends it to the image's saved masks.
    ///
    /// Leaves the surface and history untouched. Returns the image's new mask
    /// count, or `None` when no surface is active.
    pub fn save_mask(&mut self) -> Result<Option<usize>, SurfaceError> {
        let Some(active) = self.active.as_ref() else {
            return Ok(None);
        };
        let Some(entry) = self.entries.get(active.index) else {
            return Ok(None);
        };

        let encoded = active.mask.to_png()?;
        let bytes = encoded.len();
        let count = self.masks.append(entry.name(), encoded);
        log::info!(
            "Saved mask {} for '{}' ({} bytes)",
            count,
            entry.name(),
            bytes
        );
        Ok(Some(count))
    }

    pub fn masks(&self) -> &MaskRecord {
        &self.masks
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Images whose last decode failed, with the reason.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.state() {
                DecodeState::Failed(reason) => Some((entry.name(), reason.as_str())),
                _ => None,
            })
            .collect()
    }
}

fn allocate_surfaces(
    decoded: &DecodedImage,
) -> Result<(RasterSurface, RasterSurface), SurfaceError> {
    let base = RasterSurface::from_rgba(&decoded.pixels)?;
    let mask = RasterSurface::allocate(decoded.width(), decoded.height())?;
    Ok((base, mask))
}

impl Default for Session {
    fn default() -> Self {
        Self::new(0)
    }
}
