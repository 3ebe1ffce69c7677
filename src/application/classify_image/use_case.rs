use super::dto::{ClassifyImageRequest, ClassifyImageResponse};
use crate::application::run_blocking;
use crate::domain::{
    classification::{entity::TopPrediction, ranking::select},
    errors::{PipelineError, Stage},
    events::PipelineEvent,
    image::{
        entity::DecodedImage,
        value_objects::{AcquisitionInput, GALLERY_MIME_TYPES},
    },
    persistence::entity::Capability,
    session::PipelineSession,
};
use crate::infrastructure::{
    image_source::{
        adapter::ImageSourceAdapter,
        traits::{CaptureDevice, FilePicker, PickResult},
    },
    ml::traits::ModelProvider,
    platform::{notifier::Notifier, permissions::PermissionBroker},
    preprocess::normalize,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Acquire → normalize → classify → rank, for one user action.
///
/// Stages run strictly in order, each on the blocking pool. The session is
/// only touched once the outcome is known:
/// - success shows the image with its label
/// - a failure after decoding shows the image with no label
/// - decode failures and cancellation leave the session as it was
pub struct ClassifyImageUseCase {
    adapter: ImageSourceAdapter,
    models: Arc<dyn ModelProvider>,
    permissions: Arc<dyn PermissionBroker>,
    notifier: Arc<dyn Notifier>,
}

impl ClassifyImageUseCase {
    pub fn new(
        models: Arc<dyn ModelProvider>,
        permissions: Arc<dyn PermissionBroker>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        info!("Initializing ClassifyImageUseCase");
        Self {
            adapter: ImageSourceAdapter,
            models,
            permissions,
            notifier,
        }
    }

    /// Camera button: permission, capture, then classify.
    ///
    /// `Ok(None)` when the user backed out of the camera.
    pub async fn capture_and_classify(
        &self,
        camera: &dyn CaptureDevice,
        session: &mut PipelineSession,
        cancel: &CancellationToken,
    ) -> Result<Option<ClassifyImageResponse>, PipelineError> {
        self.require(Capability::Camera).await?;

        let frame = camera
            .capture()
            .await
            .map_err(|e| {
                self.fail(session.id, PipelineError::Decode(format!("capture failed: {}", e)))
            })?;
        let Some(frame) = frame else {
            debug!("camera capture dismissed");
            return Ok(None);
        };

        let request = ClassifyImageRequest {
            input: AcquisitionInput::Camera(frame),
        };
        self.execute(request, session, cancel).await.map(Some)
    }

    /// Gallery button: permission, picker, then classify.
    ///
    /// `Ok(None)` when the picker was dismissed.
    pub async fn pick_and_classify(
        &self,
        picker: &dyn FilePicker,
        session: &mut PipelineSession,
        cancel: &CancellationToken,
    ) -> Result<Option<ClassifyImageResponse>, PipelineError> {
        self.require(Capability::ReadMedia).await?;

        let picked = picker
            .pick(&GALLERY_MIME_TYPES)
            .await
            .map_err(|e| {
                let err = PipelineError::Decode(format!("could not open file: {}", e));
                self.fail(session.id, err)
            })?;
        let bytes = match picked {
            PickResult::Picked(bytes) => bytes,
            PickResult::Cancelled => {
                warn!("No image selected from gallery");
                return Ok(None);
            }
        };

        let request = ClassifyImageRequest {
            input: AcquisitionInput::Gallery(bytes),
        };
        self.execute(request, session, cancel).await.map(Some)
    }

    #[instrument(skip(self, request, session, cancel), fields(
        session_id = %session.id,
        source = ?request.input.source()
    ))]
    pub async fn execute(
        &self,
        request: ClassifyImageRequest,
        session: &mut PipelineSession,
        cancel: &CancellationToken,
    ) -> Result<ClassifyImageResponse, PipelineError> {
        let source = request.input.source();
        let adapter = self.adapter;

        let image = run_blocking(Stage::Decode, cancel, move || adapter.acquire(request.input))
            .await
            .map_err(|e| self.fail(session.id, e))?;

        match self.classify(&image, cancel).await {
            Ok(prediction) => {
                info!(label = prediction.label(), score = prediction.score(), "Classified image");
                let response = ClassifyImageResponse {
                    session_id: session.id,
                    source,
                    width: image.width(),
                    height: image.height(),
                    prediction: prediction.clone(),
                };
                self.notifier.notify(PipelineEvent::Classified {
                    session_id: session.id,
                    label: prediction.label().to_string(),
                    score: prediction.score(),
                });
                session.display(image, source, Some(prediction));
                Ok(response)
            }
            Err(e @ PipelineError::Cancelled(_)) => Err(self.fail(session.id, e)),
            Err(e) => {
                session.display(image, source, None);
                Err(self.fail(session.id, e))
            }
        }
    }

    /// Runs normalize → classify → rank on an already decoded image.
    pub async fn classify(
        &self,
        image: &DecodedImage,
        cancel: &CancellationToken,
    ) -> Result<TopPrediction, PipelineError> {
        let image = image.clone();
        let normalized = run_blocking(Stage::Preprocess, cancel, move || normalize(&image)).await?;

        let model = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled(Stage::Inference)),
            loaded = self.models.load() => loaded
                .map_err(|e| PipelineError::Inference(format!("model unavailable: {}", e)))?,
        };

        let results = run_blocking(Stage::Inference, cancel, move || {
            model
                .classify(&normalized)
                .map_err(|e| PipelineError::Inference(e.to_string()))
        })
        .await?;

        debug!(categories = results.len(), "ranking classifier output");
        select(results).into_top()
    }

    async fn require(&self, capability: Capability) -> Result<(), PipelineError> {
        if self.permissions.request(capability).await.is_granted() {
            return Ok(());
        }
        let err = PipelineError::PermissionDenied(capability);
        warn!(%capability, "Permission denied");
        self.notifier.notify(PipelineEvent::notice(err.user_message()));
        self.notifier
            .notify(PipelineEvent::PermissionDenied { capability });
        Err(err)
    }

    fn fail(&self, session_id: Uuid, err: PipelineError) -> PipelineError {
        match &err {
            PipelineError::Cancelled(stage) => {
                info!(%stage, "Classification cancelled");
            }
            _ => {
                warn!("Classification failed: {}", err);
                self.notifier
                    .notify(PipelineEvent::classification_failed(session_id, &err));
            }
        }
        err
    }
}
