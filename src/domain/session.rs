use super::classification::entity::TopPrediction;
use super::image::{entity::DecodedImage, value_objects::ImageSource};
use uuid::Uuid;

/// What the screen currently shows: the last acquired image and its label.
///
/// Each classification action replaces the image and the label together, so
/// a label never outlives the image it was computed from.
#[derive(Debug, Clone)]
pub struct PipelineSession {
    pub id: Uuid,
    image: Option<DecodedImage>,
    source: Option<ImageSource>,
    prediction: Option<TopPrediction>,
}

impl Default for PipelineSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            image: None,
            source: None,
            prediction: None,
        }
    }

    /// Shows `image`. `prediction` is `None` when classification failed.
    pub fn display(
        &mut self,
        image: DecodedImage,
        source: ImageSource,
        prediction: Option<TopPrediction>,
    ) {
        self.image = Some(image);
        self.source = Some(source);
        self.prediction = prediction;
    }

    pub fn current_image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    pub fn source(&self) -> Option<ImageSource> {
        self.source
    }

    pub fn top_prediction(&self) -> Option<&TopPrediction> {
        self.prediction.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.prediction.as_ref().map(TopPrediction::label)
    }
}
