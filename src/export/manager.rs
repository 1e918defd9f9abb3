use std::sync::Arc;

use tokio::sync::{Mutex, Notify, mpsc};

use crate::export::{
    archive::ExportSnapshot,
    dependencies::ExportDependencies,
    pipeline::{ExportRequest, perform_export},
    types::{ExportDestination, ExportError, ExportOutcome, ExportStatus},
};

/// Shared state for running exports off the editing thread.
///
/// Requests are processed one at a time in submission order. The editor keeps
/// accepting input while an archive is being built.
#[derive(Clone)]
pub struct ExportManager {
    /// Channel for sending export requests.
    request_tx: mpsc::UnboundedSender<ExportRequest>,
    /// Shared status of the current export operation.
    status: Arc<Mutex<ExportStatus>>,
    /// Shared result of the last export (if any).
    last_result: Arc<Mutex<Option<ExportOutcome>>>,
    /// Signalled whenever a result is stored.
    finished: Arc<Notify>,
}

impl ExportManager {
    /// Create a new export manager.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        Self::with_dependencies(runtime_handle, ExportDependencies::default())
    }

    /// Create an export manager with custom dependencies (useful for testing).
    pub fn with_dependencies(
        runtime_handle: &tokio::runtime::Handle,
        dependencies: ExportDependencies,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ExportRequest>();
        let status = Arc::new(Mutex::new(ExportStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));
        let finished = Arc::new(Notify::new());
        let dependencies = Arc::new(dependencies);

        let status_clone = status.clone();
        let result_clone = last_result.clone();
        let finished_clone = finished.clone();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Processing export request: {:?}", request);

                *status_clone.lock().await = ExportStatus::InProgress;

                let outcome = match perform_export(request, dependencies.clone()).await {
                    Ok(result) => {
                        log::info!("Export successful: {:?}", result.saved_path);
                        *status_clone.lock().await = ExportStatus::Success;
                        ExportOutcome::Success(result)
                    }
                    Err(e) => {
                        let error_message = e.to_string();
                        log::error!("Export failed: {}", error_message);
                        *status_clone.lock().await = ExportStatus::Failed(error_message.clone());
                        ExportOutcome::Failed(error_message)
                    }
                };
                *result_clone.lock().await = Some(outcome);
                finished_clone.notify_one();
            }
        });

        Self {
            request_tx,
            status,
            last_result,
            finished,
        }
    }

    /// Request an archive export.
    ///
    /// Non-blocking; the archive is built in the background from `snapshot`.
    pub fn request_export(
        &self,
        snapshot: ExportSnapshot,
        destination: ExportDestination,
    ) -> Result<(), ExportError> {
        self.request_tx
            .send(ExportRequest {
                snapshot,
                destination,
            })
            .map_err(|_| ExportError::NotRunning)
    }

    /// Get the current export status.
    pub async fn get_status(&self) -> ExportStatus {
        self.status.lock().await.clone()
    }

    /// Get the result of the last export and clear it.
    pub async fn take_result(&self) -> Option<ExportOutcome> {
        self.last_result.lock().await.take()
    }

    /// Try to get the result without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<ExportOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Wait until an export result is available and take it.
    pub async fn wait_for_result(&self) -> ExportOutcome {
        loop {
            if let Some(outcome) = self.take_result().await {
                return outcome;
            }
            self.finished.notified().await;
        }
    }

    /// Reset status to idle once a result has been collected.
    pub async fn reset(&self) {
        *self.status.lock().await = ExportStatus::Idle;
    }
}

#[cfg(test)]
impl ExportManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<ExportRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            status: Arc::new(Mutex::new(ExportStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
            finished: Arc::new(Notify::new()),
        }
    }
}
