//! Shared image collection on the local filesystem.
//!
//! Layout of the store directory:
//!
//! ```text
//! Food_Images1718000000.png         image bytes
//! Food_Images1718000000.png.json    metadata entry (what `list` returns)
//! ```
//!
//! Writes go through `object_store`'s staged uploads, so a reader never sees
//! a half-written file. An image counts as stored only once its metadata
//! entry exists; entries are published after the image.

use super::traits::ImageStore;
use crate::domain::persistence::entity::{SaveRequest, StoredImageHandle};
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutMode, PutOptions, PutPayload};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const ENTRY_SUFFIX: &str = ".json";
const MAX_NAME_ATTEMPTS: u32 = 1000;

pub struct LocalMediaStore {
    root: PathBuf,
    store: LocalFileSystem,
    /// Avoids `hard_link()`, which SELinux blocks in Android shared storage.
    android_safe: bool,
}

impl LocalMediaStore {
    /// Opens (and creates if needed) the collection at `root`.
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Self::new_with_android_safe(root, cfg!(target_os = "android"))
    }

    pub fn new_with_android_safe(root: impl Into<PathBuf>, android_safe: bool) -> anyhow::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create media directory {}", root.display()))?;

        let store = LocalFileSystem::new_with_prefix(&root)?.with_automatic_cleanup(true);
        Ok(Self {
            root,
            store,
            android_safe,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn location_for(&self, handle: &StoredImageHandle) -> anyhow::Result<ObjectPath> {
        let name = Path::new(&handle.file_name);
        if name.components().count() != 1 || handle.file_name.starts_with('.') {
            anyhow::bail!("'{}' is not an entry of this store", handle.file_name);
        }
        Ok(ObjectPath::from(handle.file_name.as_str()))
    }

    /// Writes `data` under `location` only if nothing is there yet.
    async fn create(&self, location: &ObjectPath, data: Bytes) -> object_store::Result<()> {
        if self.android_safe {
            match self.store.head(location).await {
                Ok(_) => {
                    return Err(object_store::Error::AlreadyExists {
                        path: location.to_string(),
                        source: "file already exists (Android-safe check)".into(),
                    });
                }
                Err(object_store::Error::NotFound { .. }) => {
                    self.store.put(location, PutPayload::from(data)).await?;
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }

        let opts = PutOptions {
            mode: PutMode::Create,
            ..Default::default()
        };
        self.store
            .put_opts(location, PutPayload::from(data), opts)
            .await?;
        Ok(())
    }

    /// Publishes under the first free name; never replaces an existing file.
    async fn create_unique(&self, stem: &str, extension: &str, data: Bytes) -> anyhow::Result<String> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 0 {
                format!("{}.{}", stem, extension)
            } else {
                format!("{} ({}).{}", stem, attempt, extension)
            };
            match self.create(&ObjectPath::from(file_name.as_str()), data.clone()).await {
                Ok(()) => {
                    if attempt > 0 {
                        debug!(%file_name, "display name taken, stored under a suffixed name");
                    }
                    return Ok(file_name);
                }
                Err(object_store::Error::AlreadyExists { .. }) => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to publish {}", file_name));
                }
            }
        }
        anyhow::bail!("no free file name for {} after {} attempts", stem, MAX_NAME_ATTEMPTS)
    }

    async fn register(&self, handle: &StoredImageHandle) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(handle)?;
        let entry = entry_location(&handle.file_name);
        self.store
            .put(&entry, PutPayload::from(json))
            .await
            .with_context(|| format!("failed to publish metadata {}", entry))?;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for LocalMediaStore {
    async fn insert(&self, request: &SaveRequest, data: Bytes) -> anyhow::Result<StoredImageHandle> {
        let extension = extension_for(request.mime_type)?;
        let byte_len = data.len() as u64;
        let sha256 = format!("{:x}", Sha256::digest(&data));

        let file_name = self
            .create_unique(request.display_name.as_str(), extension, data)
            .await?;
        let location = ObjectPath::from(file_name.as_str());

        let handle = StoredImageHandle {
            id: Uuid::now_v7(),
            uri: file_uri(&self.store.path_to_filesystem(&location)?),
            display_name: request.display_name.as_str().to_string(),
            file_name,
            mime_type: request.mime_type.to_string(),
            width: request.image.width(),
            height: request.image.height(),
            byte_len,
            sha256,
            created_at: Utc::now(),
        };

        if let Err(e) = self.register(&handle).await {
            error!("Metadata registration failed for {}: {:#}", handle.file_name, e);
            if let Err(cleanup) = self.store.delete(&location).await {
                warn!("Failed to remove unregistered image {}: {}", location, cleanup);
            }
            return Err(e);
        }

        info!(
            uri = %handle.uri,
            display_name = %handle.display_name,
            bytes = handle.byte_len,
            "Image stored"
        );
        Ok(handle)
    }

    async fn list(&self) -> anyhow::Result<Vec<StoredImageHandle>> {
        let listing = self.store.list_with_delimiter(None).await?;

        let mut handles = Vec::new();
        for meta in listing.objects {
            let Some(name) = meta.location.filename() else {
                continue;
            };
            if name.starts_with('.') || !name.ends_with(ENTRY_SUFFIX) {
                continue;
            }
            let parsed = match self.store.get(&meta.location).await {
                Ok(result) => result
                    .bytes()
                    .await
                    .map_err(anyhow::Error::from)
                    .and_then(|raw| {
                        serde_json::from_slice::<StoredImageHandle>(&raw).map_err(anyhow::Error::from)
                    }),
                Err(e) => Err(e.into()),
            };
            match parsed {
                Ok(handle) => handles.push(handle),
                Err(e) => warn!("Skipping unreadable media entry {}: {}", meta.location, e),
            }
        }
        handles.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(handles)
    }

    async fn read(&self, handle: &StoredImageHandle) -> anyhow::Result<Bytes> {
        let location = self.location_for(handle)?;
        let data = self
            .store
            .get(&location)
            .await
            .with_context(|| format!("failed to read {}", location))?
            .bytes()
            .await?;
        Ok(data)
    }

    async fn delete(&self, handle: &StoredImageHandle) -> anyhow::Result<()> {
        let location = self.location_for(handle)?;
        // Deregister first so a half-deleted entry is never listed.
        self.store.delete(&entry_location(&handle.file_name)).await?;
        self.store.delete(&location).await?;
        Ok(())
    }
}

fn extension_for(mime_type: &str) -> anyhow::Result<&'static str> {
    match mime_type {
        "image/png" => Ok("png"),
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        other => anyhow::bail!("unsupported MIME type {}", other),
    }
}

fn entry_location(file_name: &str) -> ObjectPath {
    ObjectPath::from(format!("{}{}", file_name, ENTRY_SUFFIX))
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}
