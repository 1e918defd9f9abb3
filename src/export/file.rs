//! File saving for exported archives.

use super::archive::DEFAULT_ARCHIVE_NAME;
use super::types::ExportError;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for archive saving.
#[derive(Debug, Clone)]
pub struct ArchiveSaveConfig {
    /// Directory to save archives to.
    pub directory: PathBuf,
    /// Archive file name (fixed, no timestamp).
    pub archive_name: String,
}

impl Default for ArchiveSaveConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("MaskStudio"),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

/// Ensure the save directory exists, creating it if necessary.
///
/// # Returns
/// The canonicalized path to the directory
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Save archive bytes, replacing any previous archive of the same name.
///
/// # Returns
/// Path to the saved file
pub fn save_archive(archive_data: &[u8], config: &ArchiveSaveConfig) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&config.directory)?;
    let file_path = directory.join(&config.archive_name);

    log::info!(
        "Saving archive to: {} ({} bytes)",
        file_path.display(),
        archive_data.len()
    );

    fs::write(&file_path, archive_data)?;

    let written_size = fs::metadata(&file_path)?.len();
    log::debug!("File written: {} bytes", written_size);

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
