//! Packaging of source images and saved masks into a zip archive.
//!
//! The archive holds one folder per image, named after the image without its
//! extension, containing the original file and every saved mask in order.

pub mod archive;
pub mod file;
pub mod types;

mod dependencies;
mod manager;
mod pipeline;
#[cfg(test)]
mod tests;

pub use archive::{ExportItem, ExportSnapshot, build_archive};
pub use dependencies::{ArchiveSaver, ExportDependencies};
pub use file::ArchiveSaveConfig;
pub use manager::ExportManager;
pub use types::{ExportDestination, ExportError, ExportOutcome, ExportResult, ExportStatus};
