use super::value_objects::DisplayName;
use crate::domain::image::entity::DecodedImage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const PNG_MIME_TYPE: &str = "image/png";

/// Platform capability guarded by a runtime permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Camera,
    ReadMedia,
    WriteMedia,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Camera => "camera",
            Capability::ReadMedia => "read media",
            Capability::WriteMedia => "write media",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    Granted,
    Denied,
}

impl PermissionDecision {
    pub fn is_granted(self) -> bool {
        self == PermissionDecision::Granted
    }
}

/// The user's answer to the save dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

/// A confirmed request to persist the displayed image as PNG.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub image: DecodedImage,
    pub display_name: DisplayName,
    pub mime_type: &'static str,
    pub requested_at: DateTime<Utc>,
}

impl SaveRequest {
    pub fn png(image: DecodedImage, requested_at: DateTime<Utc>) -> Self {
        Self {
            image,
            display_name: DisplayName::for_timestamp(requested_at),
            mime_type: PNG_MIME_TYPE,
            requested_at,
        }
    }
}

/// Location and metadata of a fully written image.
///
/// Only returned once the bytes and the metadata entry are both in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImageHandle {
    pub id: Uuid,
    pub uri: String,
    pub display_name: String,
    /// May differ from `display_name` when another entry already holds that name.
    pub file_name: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: u64,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

/// How a save action ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(StoredImageHandle),
    Declined,
}
