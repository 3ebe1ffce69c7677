use crate::domain::image::value_objects::CameraFrame;
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone)]
pub enum PickResult {
    /// Full contents of the chosen file.
    Picked(Bytes),
    Cancelled,
}

#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Let the user choose one file among those matching `mime_types`.
    async fn pick(&self, mime_types: &[&str]) -> anyhow::Result<PickResult>;
}

#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Take a single preview frame. `None` when the user backed out.
    async fn capture(&self) -> anyhow::Result<Option<CameraFrame>>;
}
