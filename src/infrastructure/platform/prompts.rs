use crate::domain::persistence::entity::Confirmation;
use async_trait::async_trait;

pub const SAVE_PROMPT_TITLE: &str = "Download Image?";
pub const SAVE_PROMPT_MESSAGE: &str = "Do you want to download this image to your device?";

#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Show a yes/no dialog and wait for the answer.
    async fn confirm(&self, title: &str, message: &str) -> Confirmation;
}

/// Answers every prompt the same way. Used by headless hosts.
pub struct FixedAnswerPrompt(pub Confirmation);

#[async_trait]
impl ConfirmationPrompt for FixedAnswerPrompt {
    async fn confirm(&self, title: &str, _message: &str) -> Confirmation {
        tracing::debug!(title, answer = ?self.0, "auto-answering prompt");
        self.0
    }
}
