use crate::application::run_blocking;
use crate::domain::{
    errors::{PipelineError, Stage},
    events::PipelineEvent,
    persistence::{
        entity::{Capability, Confirmation, SaveOutcome, SaveRequest, StoredImageHandle},
        state::{SaveFlow, SaveFlowState},
    },
    session::PipelineSession,
};
use crate::infrastructure::{
    platform::{
        clock::Clock,
        notifier::Notifier,
        permissions::PermissionBroker,
        prompts::{ConfirmationPrompt, SAVE_PROMPT_MESSAGE, SAVE_PROMPT_TITLE},
    },
    storage::{png::encode_png, traits::ImageStore},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Permission-gated, user-confirmed save of the displayed image.
///
/// # Flow
/// 1. Ask for write-media permission; denial ends the flow with a notice
/// 2. Ask the user to confirm; "No" ends the flow without side effects
/// 3. Encode PNG and hand it to the store, which publishes atomically
///
/// Saves are serialized: a second long-press waits for the first save to
/// finish instead of racing it for the same display name.
pub struct SaveImageUseCase {
    permissions: Arc<dyn PermissionBroker>,
    prompt: Arc<dyn ConfirmationPrompt>,
    store: Arc<dyn ImageStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    flow: Mutex<SaveFlow>,
}

impl SaveImageUseCase {
    pub fn new(
        permissions: Arc<dyn PermissionBroker>,
        prompt: Arc<dyn ConfirmationPrompt>,
        store: Arc<dyn ImageStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!("Initializing SaveImageUseCase");
        Self {
            permissions,
            prompt,
            store,
            notifier,
            clock,
            flow: Mutex::new(SaveFlow::new()),
        }
    }

    /// States visited by the most recent save, ending in `Idle`.
    pub async fn last_states(&self) -> Vec<SaveFlowState> {
        self.flow.lock().await.history().to_vec()
    }

    #[instrument(skip(self, session, cancel), fields(session_id = %session.id))]
    pub async fn execute(
        &self,
        session: &PipelineSession,
        cancel: &CancellationToken,
    ) -> Result<SaveOutcome, PipelineError> {
        let mut flow = self.flow.lock().await;
        *flow = SaveFlow::new();

        // Snapshot: the screen may change while dialogs are open.
        let Some(image) = session.current_image().cloned() else {
            let err = PipelineError::WriteFailure("no image is currently displayed".to_string());
            return Err(self.save_failed(session.id, err));
        };

        flow.advance(SaveFlowState::PermissionRequested)?;
        let decision = self.permissions.request(Capability::WriteMedia).await;
        if !decision.is_granted() {
            flow.advance(SaveFlowState::PermissionDenied)?;
            flow.finish()?;
            let err = PipelineError::PermissionDenied(Capability::WriteMedia);
            warn!("Write permission denied, nothing saved");
            self.notifier.notify(PipelineEvent::notice(err.user_message()));
            self.notifier.notify(PipelineEvent::PermissionDenied {
                capability: Capability::WriteMedia,
            });
            return Err(err);
        }
        flow.advance(SaveFlowState::PermissionGranted)?;

        flow.advance(SaveFlowState::ConfirmationRequested)?;
        let answer = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                flow.abandon();
                return Err(PipelineError::Cancelled(Stage::Write));
            }
            answer = self.prompt.confirm(SAVE_PROMPT_TITLE, SAVE_PROMPT_MESSAGE) => answer,
        };
        if answer == Confirmation::Declined {
            flow.advance(SaveFlowState::ConfirmationDeclined)?;
            flow.finish()?;
            info!("Save declined by user");
            self.notifier.notify(PipelineEvent::SaveDeclined {
                session_id: session.id,
            });
            return Ok(SaveOutcome::Declined);
        }
        flow.advance(SaveFlowState::ConfirmationAccepted)?;

        if cancel.is_cancelled() {
            flow.abandon();
            return Err(PipelineError::Cancelled(Stage::Write));
        }
        flow.advance(SaveFlowState::Writing)?;

        let request = SaveRequest::png(image, self.clock.now());
        match self.write(request, cancel).await {
            Ok(handle) => {
                flow.advance(SaveFlowState::Saved)?;
                flow.finish()?;
                info!(uri = %handle.uri, "Image Saved");
                self.notifier.notify(PipelineEvent::notice("Image Saved"));
                self.notifier.notify(PipelineEvent::Saved {
                    session_id: session.id,
                    handle: handle.clone(),
                });
                Ok(SaveOutcome::Saved(handle))
            }
            Err(PipelineError::Cancelled(stage)) => {
                flow.abandon();
                Err(PipelineError::Cancelled(stage))
            }
            Err(err) => {
                flow.advance(SaveFlowState::WriteFailed)?;
                flow.finish()?;
                Err(self.save_failed(session.id, err))
            }
        }
    }

    /// Encoding can be abandoned; once bytes reach the store the write runs
    /// to completion so the store can clean up after itself.
    async fn write(
        &self,
        request: SaveRequest,
        cancel: &CancellationToken,
    ) -> Result<StoredImageHandle, PipelineError> {
        let image = request.image.clone();
        let png = run_blocking(Stage::Write, cancel, move || {
            encode_png(&image).map_err(|e| PipelineError::WriteFailure(e.to_string()))
        })
        .await?;

        self.store.insert(&request, png).await.map_err(|e| {
            error!("Storage write failed for {}: {}", request.display_name, e);
            PipelineError::WriteFailure(format!("{:#}", e))
        })
    }

    fn save_failed(&self, session_id: Uuid, err: PipelineError) -> PipelineError {
        warn!("Save failed: {}", err);
        self.notifier.notify(PipelineEvent::notice(err.user_message()));
        self.notifier.notify(PipelineEvent::SaveFailed {
            session_id,
            reason: err.to_string(),
        });
        err
    }
}
