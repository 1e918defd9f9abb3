//! Archive layout: one folder per image holding its source and saved masks.

use super::types::ExportError;
use crate::session::Session;
use crate::util;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default archive file name.
pub const DEFAULT_ARCHIVE_NAME: &str = "masks_by_image.zip";
/// Default prefix of numbered mask files (`mask_1.png`, `mask_2.png`, ...).
pub const DEFAULT_MASK_PREFIX: &str = "mask";

/// One image and its saved masks, as captured at export time.
#[derive(Debug, Clone)]
pub struct ExportItem {
    pub name: String,
    pub source: Arc<[u8]>,
    pub masks: Vec<Arc<[u8]>>,
}

/// Immutable copy of the session state needed to build an archive.
///
/// Byte buffers are shared with the session; saved masks never change, so the
/// snapshot stays consistent while the session keeps being edited.
#[derive(Debug, Clone, Default)]
pub struct ExportSnapshot {
    pub items: Vec<ExportItem>,
    pub mask_prefix: String,
}

impl ExportSnapshot {
    /// Captures every image in session order with its saved masks.
    pub fn capture(session: &Session, mask_prefix: &str) -> Self {
        let items = session
            .entries()
            .iter()
            .map(|entry| ExportItem {
                name: entry.name().to_string(),
                source: entry.bytes().clone(),
                masks: session.masks().get(entry.name()).to_vec(),
            })
            .collect();
        Self {
            items,
            mask_prefix: mask_prefix.to_string(),
        }
    }

    pub fn image_count(&self) -> usize {
        self.items.len()
    }

    pub fn mask_count(&self) -> usize {
        self.items.iter().map(|item| item.masks.len()).sum()
    }
}

fn entry_options() -> SimpleFileOptions {
    // Sources and masks are already compressed raster files.
    SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
}

/// Builds the zip archive for `snapshot`.
///
/// Each image gets a folder named after it with the extension stripped,
/// containing the original bytes under the original name and each mask as
/// `<prefix>_<n>.png` in save order. Images without masks still get a folder.
/// Colliding folder names are disambiguated (`cat`, `cat (2)`).
pub fn build_archive(snapshot: &ExportSnapshot) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut folders: HashSet<String> = HashSet::new();

    for item in &snapshot.items {
        let folder = util::disambiguate(util::strip_extension(&item.name), |candidate| {
            folders.contains(candidate)
        });
        folders.insert(folder.clone());

        writer.add_directory(format!("{folder}/"), entry_options())?;
        writer.start_file(format!("{folder}/{}", item.name), entry_options())?;
        writer.write_all(&item.source)?;

        for (i, mask) in item.masks.iter().enumerate() {
            writer.start_file(
                format!("{folder}/{}_{}.png", snapshot.mask_prefix, i + 1),
                entry_options(),
            )?;
            writer.write_all(mask)?;
        }

        log::debug!(
            "Archived '{}' into folder '{}' with {} mask(s)",
            item.name,
            folder,
            item.masks.len()
        );
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
