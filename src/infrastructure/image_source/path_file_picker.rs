use super::traits::{FilePicker, PickResult};
use async_trait::async_trait;
use std::path::PathBuf;

/// Picker for hosts where the file was chosen up front (drag and drop, a
/// path from a launcher). `None` behaves like a dismissed dialog.
pub struct PathFilePicker {
    path: Option<PathBuf>,
}

impl PathFilePicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FilePicker for PathFilePicker {
    async fn pick(&self, mime_types: &[&str]) -> anyhow::Result<PickResult> {
        let Some(path) = self.path.as_ref() else {
            return Ok(PickResult::Cancelled);
        };
        tracing::debug!(path = %path.display(), ?mime_types, "reading picked file");
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Ok(PickResult::Picked(data.into()))
    }
}
