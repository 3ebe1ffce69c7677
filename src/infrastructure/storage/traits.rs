use crate::domain::persistence::entity::{SaveRequest, StoredImageHandle};
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Register `data` under the request's display name.
    ///
    /// All or nothing: on error no file and no metadata entry remain.
    async fn insert(&self, request: &SaveRequest, data: Bytes) -> anyhow::Result<StoredImageHandle>;
    async fn list(&self) -> anyhow::Result<Vec<StoredImageHandle>>;
    async fn read(&self, handle: &StoredImageHandle) -> anyhow::Result<Bytes>;
    async fn delete(&self, handle: &StoredImageHandle) -> anyhow::Result<()>;
}
