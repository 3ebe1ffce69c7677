use super::entity::{DecodedImage, PixelFormat};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// MIME types the gallery picker is asked to offer.
///
/// The list only narrows what the picker shows; bytes coming back are still
/// decoded and validated.
pub const GALLERY_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Where an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Camera,
    Gallery,
}

/// Raw frame handed over by the capture subsystem.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Bytes,
}

impl CameraFrame {
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: impl Into<Bytes>) -> Self {
        Self {
            width,
            height,
            format,
            pixels: pixels.into(),
        }
    }
}

impl From<DecodedImage> for CameraFrame {
    fn from(image: DecodedImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: image.format(),
            pixels: image.pixels().clone(),
        }
    }
}

/// Input for one acquisition, tagged by path.
#[derive(Debug, Clone)]
pub enum AcquisitionInput {
    Camera(CameraFrame),
    /// Encoded file bytes read from the picker's handle.
    Gallery(Bytes),
}

impl AcquisitionInput {
    pub fn source(&self) -> ImageSource {
        match self {
            AcquisitionInput::Camera(_) => ImageSource::Camera,
            AcquisitionInput::Gallery(_) => ImageSource::Gallery,
        }
    }
}
