use crate::domain::{
    classification::entity::ClassificationResult, image::entity::NormalizedTensorImage,
};
use async_trait::async_trait;
use std::sync::Arc;

pub trait FoodClassifier: Send + Sync {
    /// Score every category the model knows, in the model's label order.
    ///
    /// Blocking. Must be safe to call from several threads at once.
    fn classify(&self, image: &NormalizedTensorImage) -> anyhow::Result<Vec<ClassificationResult>>;
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Shared handle to the loaded model, loading it on first use.
    async fn load(&self) -> anyhow::Result<Arc<dyn FoodClassifier>>;
}
