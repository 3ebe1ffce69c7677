use crate::domain::{
    errors::PipelineError,
    image::entity::{DecodedImage, NormalizedTensorImage, PixelFormat},
};

/// Converts any supported layout into packed RGB8.
///
/// Alpha is dropped, never premultiplied: colour bytes are copied unchanged so
/// that an opaque RGBA image and its RGB counterpart normalize identically.
pub fn normalize(image: &DecodedImage) -> Result<NormalizedTensorImage, PipelineError> {
    if image.is_empty() {
        return Err(PipelineError::Preprocess(format!(
            "image has degenerate geometry {}x{}",
            image.width(),
            image.height()
        )));
    }

    let src = image.pixels();
    let pixel_count = image.width() as usize * image.height() as usize;
    let mut rgb = Vec::with_capacity(pixel_count * NormalizedTensorImage::CHANNELS);

    match image.format() {
        PixelFormat::Rgb8 => rgb.extend_from_slice(src),
        PixelFormat::Rgba8 => {
            for px in src.chunks_exact(4) {
                rgb.extend_from_slice(&[px[0], px[1], px[2]]);
            }
        }
        PixelFormat::Bgra8 => {
            for px in src.chunks_exact(4) {
                rgb.extend_from_slice(&[px[2], px[1], px[0]]);
            }
        }
        PixelFormat::Luma8 => {
            for &l in src.iter() {
                rgb.extend_from_slice(&[l, l, l]);
            }
        }
        PixelFormat::LumaA8 => {
            for px in src.chunks_exact(2) {
                rgb.extend_from_slice(&[px[0], px[0], px[0]]);
            }
        }
    }

    NormalizedTensorImage::from_rgb(image.width(), image.height(), rgb)
}
