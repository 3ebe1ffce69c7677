use crate::{
    application::{classify_image::use_case::ClassifyImageUseCase, save_image::use_case::SaveImageUseCase},
    config::Config,
    domain::events::PipelineEvent,
    infrastructure::{
        ml::{model_provider::OnnxModelProvider, traits::ModelProvider},
        platform::{
            clock::Clock, notifier::BroadcastNotifier, permissions::PermissionBroker,
            prompts::ConfirmationPrompt,
        },
        storage::{local_media_store::LocalMediaStore, traits::ImageStore},
    },
    presentation::search_link::search_url_for,
};
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Host-provided platform pieces the pipeline cannot create itself.
pub struct Collaborators {
    pub permissions: Arc<dyn PermissionBroker>,
    pub prompt: Arc<dyn ConfirmationPrompt>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub models: Arc<dyn ModelProvider>,
    pub store: Arc<dyn ImageStore>,
    pub events: BroadcastNotifier,
    pub classify: Arc<ClassifyImageUseCase>,
    pub save: Arc<SaveImageUseCase>,
}

impl AppContext {
    /// Wires the ONNX model provider and the local media store from `config`.
    ///
    /// The model itself is loaded lazily on the first classification.
    pub fn build(config: Config, collaborators: Collaborators) -> anyhow::Result<Self> {
        let models: Arc<dyn ModelProvider> =
            Arc::new(OnnxModelProvider::new(config.model_settings()?));
        let store: Arc<dyn ImageStore> = Arc::new(LocalMediaStore::new(&config.media_store_dir)?);
        Ok(Self::with_parts(config, models, store, collaborators))
    }

    pub fn with_parts(
        config: Config,
        models: Arc<dyn ModelProvider>,
        store: Arc<dyn ImageStore>,
        collaborators: Collaborators,
    ) -> Self {
        let events = BroadcastNotifier::new(EVENT_CHANNEL_CAPACITY);
        let notifier = Arc::new(events.clone());

        let classify = Arc::new(ClassifyImageUseCase::new(
            models.clone(),
            collaborators.permissions.clone(),
            notifier.clone(),
        ));
        let save = Arc::new(SaveImageUseCase::new(
            collaborators.permissions,
            collaborators.prompt,
            store.clone(),
            notifier,
            collaborators.clock,
        ));

        Self {
            config,
            models,
            store,
            events,
            classify,
            save,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    pub fn search_url_for(&self, label: &str) -> String {
        search_url_for(&self.config.search_base_url, label)
    }
}
