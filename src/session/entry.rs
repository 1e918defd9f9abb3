//! Loaded images and their saved masks.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A raster file handed to the session by the user.
#[derive(Debug, Clone)]
pub struct ImportedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImportedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file from disk, using its file name as the image name.
    pub fn read(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Decode progress of an image entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeState {
    /// Not decoded yet, or a decode is in flight
    Pending,
    /// Decoded at least once; dimensions are known
    Ready { width: u32, height: u32 },
    /// The last decode attempt failed
    Failed(String),
}

/// One image in the session.
///
/// The name is unique within the session and is the image's identity for saved
/// masks. Source bytes never change after import.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    name: String,
    bytes: Arc<[u8]>,
    state: DecodeState,
}

impl ImageEntry {
    pub(crate) fn new(name: String, bytes: Vec<u8>) -> Self {
        Self {
            name,
            bytes: Arc::from(bytes),
            state: DecodeState::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn state(&self) -> &DecodeState {
        &self.state
    }

    /// Decoded pixel dimensions, once known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self.state {
            DecodeState::Ready { width, height } => Some((width, height)),
            _ => None,
        }
    }

    pub(crate) fn set_state(&mut self, state: DecodeState) {
        self.state = state;
    }
}

/// Encoded masks saved per image name, in save order.
///
/// Entries are immutable once saved; undo/redo never touch them.
#[derive(Debug, Default, Clone)]
pub struct MaskRecord {
    masks: HashMap<String, Vec<Arc<[u8]>>>,
}

impl MaskRecord {
    /// Appends an encoded mask for `name`. Returns the new mask count for that image.
    pub fn append(&mut self, name: &str, encoded: Vec<u8>) -> usize {
        let list = self.masks.entry(name.to_string()).or_default();
        list.push(Arc::from(encoded));
        list.len()
    }

    /// Saved masks for `name`, oldest first.
    pub fn get(&self, name: &str) -> &[Arc<[u8]>] {
        self.masks.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, name: &str) -> usize {
        self.get(name).len()
    }

    /// Total masks saved across all images.
    pub fn total(&self) -> usize {
        self.masks.values().map(Vec::len).sum()
    }
}
