use super::errors::PipelineError;
use super::persistence::entity::{Capability, StoredImageHandle};
use serde::Serialize;
use uuid::Uuid;

/// Messages for display collaborators, published as each action ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineEvent {
    Classified {
        session_id: Uuid,
        label: String,
        score: f32,
    },
    ClassificationFailed {
        session_id: Uuid,
        reason: String,
    },
    PermissionDenied {
        capability: Capability,
    },
    SaveDeclined {
        session_id: Uuid,
    },
    Saved {
        session_id: Uuid,
        handle: StoredImageHandle,
    },
    SaveFailed {
        session_id: Uuid,
        reason: String,
    },
    /// Short user-visible text, the equivalent of a toast.
    Notice {
        message: String,
    },
}

impl PipelineEvent {
    pub fn notice(message: impl Into<String>) -> Self {
        PipelineEvent::Notice {
            message: message.into(),
        }
    }

    pub fn classification_failed(session_id: Uuid, err: &PipelineError) -> Self {
        PipelineEvent::ClassificationFailed {
            session_id,
            reason: err.to_string(),
        }
    }
}
