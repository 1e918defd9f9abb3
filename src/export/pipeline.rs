use std::{fmt, path::PathBuf, sync::Arc};

use crate::export::{
    archive::{ExportSnapshot, build_archive},
    dependencies::{ArchiveSaver, ExportDependencies},
    file::ArchiveSaveConfig,
    types::{ExportDestination, ExportError, ExportResult},
};
use tokio::task;

#[derive(Clone)]
pub(crate) struct ExportRequest {
    pub(crate) snapshot: ExportSnapshot,
    pub(crate) destination: ExportDestination,
}

impl fmt::Debug for ExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportRequest")
            .field("images", &self.snapshot.image_count())
            .field("masks", &self.snapshot.mask_count())
            .field("destination", &self.destination)
            .finish()
    }
}

pub(crate) async fn perform_export(
    request: ExportRequest,
    dependencies: Arc<ExportDependencies>,
) -> Result<ExportResult, ExportError> {
    let image_count = request.snapshot.image_count();
    let mask_count = request.snapshot.mask_count();
    log::info!(
        "Starting export: {} image(s), {} mask(s)",
        image_count,
        mask_count
    );

    let snapshot = request.snapshot;
    let archive_data = task::spawn_blocking(move || build_archive(&snapshot))
        .await
        .map_err(|e| ExportError::Task(format!("Archive task failed: {}", e)))??;

    log::debug!("Encoded archive ({} bytes)", archive_data.len());

    let saved_path = match request.destination {
        ExportDestination::Memory => None,
        ExportDestination::File(config) => Some(
            save_archive(
                Arc::clone(&dependencies.saver),
                archive_data.clone(),
                config,
            )
            .await?,
        ),
    };

    Ok(ExportResult {
        archive_data,
        saved_path,
        image_count,
        mask_count,
    })
}

async fn save_archive(
    saver: Arc<dyn ArchiveSaver>,
    archive_data: Vec<u8>,
    config: ArchiveSaveConfig,
) -> Result<PathBuf, ExportError> {
    task::spawn_blocking(move || saver.save(&archive_data, &config))
        .await
        .map_err(|e| ExportError::Task(format!("Save task failed: {}", e)))?
}
