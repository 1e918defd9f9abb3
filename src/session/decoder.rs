use tokio::sync::mpsc;
use tokio::task;

use super::decode::{DecodeCompletion, DecodeError, DecodeRequest};

/// Runs image decodes off the event loop.
///
/// Requests are processed in order on a background task; completions are
/// collected by the owner with [`DecodeManager::try_next`] or
/// [`DecodeManager::next`] and handed to the session, which discards stale ones.
pub struct DecodeManager {
    /// Channel for sending decode requests.
    request_tx: mpsc::UnboundedSender<DecodeRequest>,
    /// Channel delivering finished decodes.
    completion_rx: mpsc::UnboundedReceiver<DecodeCompletion>,
}

impl DecodeManager {
    /// Create a new decode manager.
    ///
    /// This spawns a background task that decodes images on the blocking pool.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<DecodeRequest>();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel::<DecodeCompletion>();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Processing decode request: {:?}", request);

                let (index, generation, name) =
                    (request.index, request.generation, request.name.clone());
                let completion = match task::spawn_blocking(move || request.run()).await {
                    Ok(completion) => completion,
                    Err(e) => DecodeCompletion {
                        index,
                        generation,
                        name,
                        result: Err(DecodeError::Worker(format!("decode task failed: {}", e))),
                    },
                };

                if completion_tx.send(completion).is_err() {
                    log::debug!("Decode completion receiver dropped; stopping decoder");
                    break;
                }
            }
        });

        Self {
            request_tx,
            completion_rx,
        }
    }

    /// Queue a decode. Returns immediately.
    pub fn request(&self, request: DecodeRequest) -> Result<(), DecodeError> {
        self.request_tx
            .send(request)
            .map_err(|_| DecodeError::Worker("decode manager not running".to_string()))
    }

    /// Take a finished decode without waiting.
    pub fn try_next(&mut self) -> Option<DecodeCompletion> {
        self.completion_rx.try_recv().ok()
    }

    /// Wait for the next finished decode.
    pub async fn next(&mut self) -> Option<DecodeCompletion> {
        self.completion_rx.recv().await
    }
}
