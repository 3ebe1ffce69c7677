use super::onnx_food_classifier::OnnxFoodClassifier;
use super::tensor::ModelInputSpec;
use super::traits::{FoodClassifier, ModelProvider};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub enabled: bool,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub input: ModelInputSpec,
}

/// Loads the ONNX model once, on first request, and hands out shared handles.
///
/// A failed load is not cached, so a later request tries again. The model is
/// released when the last handle and the provider are dropped.
pub struct OnnxModelProvider {
    settings: ModelSettings,
    model: OnceCell<Arc<OnnxFoodClassifier>>,
}

impl OnnxModelProvider {
    pub fn new(settings: ModelSettings) -> Self {
        Self {
            settings,
            model: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }
}

#[async_trait]
impl ModelProvider for OnnxModelProvider {
    async fn load(&self) -> anyhow::Result<Arc<dyn FoodClassifier>> {
        if !self.settings.enabled {
            anyhow::bail!("food classification is disabled");
        }

        let model = self
            .model
            .get_or_try_init(|| async {
                let settings = self.settings.clone();
                if !settings.model_path.exists() {
                    tracing::warn!(
                        "Food model not found at {}. Classification is unavailable.",
                        settings.model_path.display()
                    );
                    anyhow::bail!("model file {} not found", settings.model_path.display());
                }

                let classifier = tokio::task::spawn_blocking(move || {
                    OnnxFoodClassifier::new(
                        &settings.model_path,
                        &settings.labels_path,
                        settings.input,
                    )
                })
                .await??;
                Ok(Arc::new(classifier))
            })
            .await?;

        let model: Arc<dyn FoodClassifier> = model.clone();
        Ok(model)
    }
}
