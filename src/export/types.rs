//! Data types for archive export.

use super::file::ArchiveSaveConfig;
use crate::draw::SurfaceError;
use std::path::PathBuf;
use thiserror::Error;

/// Where a finished archive should go.
#[derive(Debug, Clone)]
pub enum ExportDestination {
    /// Keep the archive bytes in the result only.
    Memory,
    /// Also write the archive to disk.
    File(ArchiveSaveConfig),
}

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Encoded zip archive.
    pub archive_data: Vec<u8>,
    /// Path where the archive was saved (if saved).
    pub saved_path: Option<PathBuf>,
    /// Number of image folders in the archive.
    pub image_count: usize,
    /// Number of mask files in the archive.
    pub mask_count: usize,
}

/// Outcome of an export request (success or failure).
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    Success(ExportResult),
    Failed(String),
}

/// Errors that can occur while exporting. All are recoverable; the session
/// is never modified by an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Archive encoding failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mask encoding failed: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Export manager not running")]
    NotRunning,

    #[error("Export task failed: {0}")]
    Task(String),
}

/// Status of an export operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// No export has been requested yet.
    Idle,
    /// Encoding or saving is in progress.
    InProgress,
    /// Export completed successfully.
    Success,
    /// Export failed.
    Failed(String),
}
