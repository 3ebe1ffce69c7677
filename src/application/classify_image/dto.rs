use crate::domain::{
    classification::entity::TopPrediction,
    image::value_objects::{AcquisitionInput, ImageSource},
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ClassifyImageRequest {
    pub input: AcquisitionInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyImageResponse {
    pub session_id: Uuid,
    pub source: ImageSource,
    pub width: u32,
    pub height: u32,
    pub prediction: TopPrediction,
}

impl ClassifyImageResponse {
    pub fn label(&self) -> &str {
        self.prediction.label()
    }
}
