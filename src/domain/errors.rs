use super::persistence::{entity::Capability, state::TransitionError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Pipeline stage that suspends on blocking work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Decode,
    Preprocess,
    Inference,
    Write,
}

impl Stage {
    /// Wraps `reason` in the error variant that belongs to this stage.
    pub fn failure(self, reason: impl Into<String>) -> PipelineError {
        let reason = reason.into();
        match self {
            Stage::Decode => PipelineError::Decode(reason),
            Stage::Preprocess => PipelineError::Preprocess(reason),
            Stage::Inference => PipelineError::Inference(reason),
            Stage::Write => PipelineError::WriteFailure(reason),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decode => "decode",
            Stage::Preprocess => "preprocess",
            Stage::Inference => "inference",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Terminal failures of a single classification or save action.
///
/// Every variant ends the invocation that produced it. Nothing is retried;
/// the caller surfaces a message and lets the user trigger the action again.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Could not prepare image for the model: {0}")]
    Preprocess(String),
    #[error("Model inference failed: {0}")]
    Inference(String),
    #[error("The model returned no categories")]
    EmptyResult,
    #[error("Permission denied: {0}")]
    PermissionDenied(Capability),
    #[error("Could not save image: {0}")]
    WriteFailure(String),
    #[error("Cancelled during {0}")]
    Cancelled(Stage),
}

impl PipelineError {
    /// Permission denial is a user-correctable state, not a fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::PermissionDenied(_))
    }

    /// Short text suitable for a toast or snackbar.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Decode(_) => "That file is not an image we can read",
            PipelineError::Preprocess(_) => "That image is empty",
            PipelineError::Inference(_) => "Could not recognise this image",
            PipelineError::EmptyResult => "Could not recognise this image",
            PipelineError::PermissionDenied(Capability::WriteMedia) => {
                "Please allow permission to download image"
            }
            PipelineError::PermissionDenied(_) => "Permission Denied !! Try again",
            PipelineError::WriteFailure(_) => "Couldn't save the image",
            PipelineError::Cancelled(_) => "Cancelled",
        }
    }
}

impl From<TransitionError> for PipelineError {
    fn from(err: TransitionError) -> Self {
        PipelineError::WriteFailure(err.to_string())
    }
}
