use std::{path::PathBuf, sync::Arc};

use crate::export::{
    file::{self, ArchiveSaveConfig},
    types::ExportError,
};

/// Abstraction over writing finished archives to storage.
pub trait ArchiveSaver: Send + Sync {
    fn save(&self, archive_data: &[u8], config: &ArchiveSaveConfig) -> Result<PathBuf, ExportError>;
}

/// Dependencies used by the export pipeline. The saver can be mocked in tests.
#[derive(Clone)]
pub struct ExportDependencies {
    pub saver: Arc<dyn ArchiveSaver>,
}

impl Default for ExportDependencies {
    fn default() -> Self {
        Self {
            saver: Arc::new(DefaultArchiveSaver),
        }
    }
}

struct DefaultArchiveSaver;

impl ArchiveSaver for DefaultArchiveSaver {
    fn save(&self, archive_data: &[u8], config: &ArchiveSaveConfig) -> Result<PathBuf, ExportError> {
        file::save_archive(archive_data, config)
    }
}
