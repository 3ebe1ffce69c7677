use crate::domain::errors::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence the model assigns to one food category.
///
/// # Invariants
/// - `score` is finite and within `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClassificationResult")]
pub struct ClassificationResult {
    label: String,
    score: f32,
}

#[derive(Deserialize)]
struct RawClassificationResult {
    label: String,
    score: f32,
}

impl TryFrom<RawClassificationResult> for ClassificationResult {
    type Error = PipelineError;

    fn try_from(raw: RawClassificationResult) -> Result<Self, Self::Error> {
        Self::new(raw.label, raw.score)
    }
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, score: f32) -> Result<Self, PipelineError> {
        let label = label.into();
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(PipelineError::Inference(format!(
                "score {} for '{}' is outside [0, 1]",
                score, label
            )));
        }
        Ok(Self { label, score })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn score(&self) -> f32 {
        self.score
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3})", self.label, self.score)
    }
}

/// Highest-scoring result of one classification. Only the ranker builds these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPrediction(ClassificationResult);

impl TopPrediction {
    pub(crate) fn from_ranked(result: ClassificationResult) -> Self {
        Self(result)
    }

    pub fn label(&self) -> &str {
        self.0.label()
    }

    pub fn score(&self) -> f32 {
        self.0.score()
    }
}

impl fmt::Display for TopPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
