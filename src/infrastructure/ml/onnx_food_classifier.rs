use super::labels::load_labels;
use super::tensor::{InputData, ModelInputSpec, build_input};
use super::traits::FoodClassifier;
use crate::domain::{
    classification::entity::ClassificationResult, image::entity::NormalizedTensorImage,
};
use ort::{session::Session, value::Value};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Food classifier backed by an ONNX export of the bundled model.
pub struct OnnxFoodClassifier {
    // Session::run needs &mut; the mutex also serializes concurrent inference.
    session: Mutex<Session>,
    labels: Vec<String>,
    input: ModelInputSpec,
}

impl OnnxFoodClassifier {
    pub fn new(model_path: &Path, labels_path: &Path, input: ModelInputSpec) -> anyhow::Result<Self> {
        let labels = load_labels(labels_path)?;
        let session = Session::builder()?.commit_from_file(model_path)?;

        info!(
            model = %model_path.display(),
            labels = labels.len(),
            width = input.width,
            height = input.height,
            layout = %input.layout,
            element = %input.element,
            "Loaded food classification model"
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
            input,
        })
    }

    fn infer(&self, image: &NormalizedTensorImage) -> anyhow::Result<Vec<f32>> {
        let tensor = build_input(image, &self.input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to acquire session lock"))?;

        let outputs = match tensor.data {
            InputData::U8(data) => {
                let value = Value::from_array((tensor.shape, data))?;
                session.run(ort::inputs![value])?
            }
            InputData::F32(data) => {
                let value = Value::from_array((tensor.shape, data))?;
                session.run(ort::inputs![value])?
            }
        };

        let output = &outputs[0];
        let scores = match output.try_extract_tensor::<f32>() {
            Ok((_, data)) => probabilities(data),
            Err(_) => {
                let (_, data) = output.try_extract_tensor::<u8>()?;
                dequantize(data)
            }
        };
        Ok(scores)
    }
}

impl FoodClassifier for OnnxFoodClassifier {
    fn classify(&self, image: &NormalizedTensorImage) -> anyhow::Result<Vec<ClassificationResult>> {
        let scores = self.infer(image)?;
        debug!(categories = scores.len(), "inference complete");
        label_scores(&self.labels, scores)
    }
}

/// Pairs each label with its score; the model must emit one score per label.
fn label_scores(labels: &[String], scores: Vec<f32>) -> anyhow::Result<Vec<ClassificationResult>> {
    if scores.len() != labels.len() {
        anyhow::bail!(
            "model produced {} scores for {} labels",
            scores.len(),
            labels.len()
        );
    }

    labels
        .iter()
        .zip(scores)
        .map(|(label, score)| {
            ClassificationResult::new(label.clone(), score).map_err(anyhow::Error::from)
        })
        .collect()
}

/// Treats outputs already within `[0, 1]` as per-category confidences,
/// otherwise assumes logits.
fn probabilities(raw: &[f32]) -> Vec<f32> {
    let in_range = raw.iter().all(|v| (0.0..=1.0).contains(v));
    if in_range { raw.to_vec() } else { softmax(raw) }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max_val = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_vals: Vec<f32> = logits.iter().map(|x| (x - max_val).exp()).collect();
    let sum: f32 = exp_vals.iter().sum();
    exp_vals.iter().map(|x| (x / sum).clamp(0.0, 1.0)).collect()
}

/// Quantized models emit 0..=255 with scale 1/255 and zero point 0.
fn dequantize(raw: &[u8]) -> Vec<f32> {
    raw.iter().map(|&v| v as f32 / 255.0).collect()
}
