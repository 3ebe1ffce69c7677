//! Ordering and top-1 selection over classifier output.

use super::entity::{ClassificationResult, TopPrediction};
use crate::domain::errors::PipelineError;

/// Outcome of [`select`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Top(TopPrediction),
    /// The classifier emitted no categories. This is a failure, not "no food".
    Empty,
}

impl Selection {
    pub fn into_top(self) -> Result<TopPrediction, PipelineError> {
        match self {
            Selection::Top(top) => Ok(top),
            Selection::Empty => Err(PipelineError::EmptyResult),
        }
    }
}

/// Sorts by score, highest first. Equal scores keep the classifier's order.
pub fn rank(mut results: Vec<ClassificationResult>) -> Vec<ClassificationResult> {
    // `sort_by` is stable; scores are finite so `total_cmp` matches `partial_cmp`.
    results.sort_by(|a, b| b.score().total_cmp(&a.score()));
    results
}

pub fn select(results: Vec<ClassificationResult>) -> Selection {
    match rank(results).into_iter().next() {
        Some(best) => Selection::Top(TopPrediction::from_ranked(best)),
        None => Selection::Empty,
    }
}
