use super::codec::from_dynamic;
use crate::domain::{
    errors::PipelineError,
    image::{
        entity::DecodedImage,
        value_objects::{AcquisitionInput, CameraFrame},
    },
};
use tracing::{debug, warn};

/// Turns camera frames and gallery files into [`DecodedImage`]s.
///
/// Blocking: gallery decoding runs the full codec. Callers on an async
/// runtime should go through `spawn_blocking`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSourceAdapter;

impl ImageSourceAdapter {
    pub fn acquire(&self, input: AcquisitionInput) -> Result<DecodedImage, PipelineError> {
        match input {
            AcquisitionInput::Camera(frame) => self.wrap_frame(frame),
            AcquisitionInput::Gallery(bytes) => self.decode(&bytes),
        }
    }

    /// Takes the frame's declared format at face value.
    pub fn wrap_frame(&self, frame: CameraFrame) -> Result<DecodedImage, PipelineError> {
        debug!(
            width = frame.width,
            height = frame.height,
            format = %frame.format,
            "wrapping camera frame"
        );
        DecodedImage::from_raw(frame.width, frame.height, frame.format, frame.pixels)
    }

    /// Decodes encoded file bytes, sniffing the container from its magic number.
    ///
    /// The picker's MIME filter is not trusted; anything that fails to decode
    /// is rejected here.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, PipelineError> {
        if bytes.is_empty() {
            return Err(PipelineError::Decode("file is empty".to_string()));
        }

        let format = image::guess_format(bytes).map_err(|e| {
            warn!("Rejected gallery file of {} bytes: {}", bytes.len(), e);
            PipelineError::Decode(format!("unrecognised image format: {}", e))
        })?;

        let dynamic = image::load_from_memory_with_format(bytes, format).map_err(|e| {
            warn!("Failed to decode {:?} gallery file: {}", format, e);
            PipelineError::Decode(format!("invalid or corrupted {:?} data: {}", format, e))
        })?;

        debug!(
            ?format,
            width = dynamic.width(),
            height = dynamic.height(),
            "decoded gallery image"
        );
        from_dynamic(dynamic).map_err(|e| PipelineError::Decode(e.to_string()))
    }
}
