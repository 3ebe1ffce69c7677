//! Conversions between [`DecodedImage`] and the `image` crate's rasters.

use crate::domain::image::entity::{DecodedImage, PixelFormat};
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

/// Keeps 8-bit layouts as they are; wider formats are narrowed to RGBA8.
pub fn from_dynamic(image: DynamicImage) -> anyhow::Result<DecodedImage> {
    let (width, height) = (image.width(), image.height());
    let (format, pixels) = match image {
        DynamicImage::ImageLuma8(buf) => (PixelFormat::Luma8, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (PixelFormat::LumaA8, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (PixelFormat::Rgb8, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (PixelFormat::Rgba8, buf.into_raw()),
        other => (PixelFormat::Rgba8, other.to_rgba8().into_raw()),
    };
    Ok(DecodedImage::from_raw(width, height, format, pixels)?)
}

pub fn to_dynamic(image: &DecodedImage) -> anyhow::Result<DynamicImage> {
    let (width, height) = image.dimensions();
    let raw = image.pixels().to_vec();
    let mismatch = || anyhow::anyhow!("{}x{} {} buffer does not match", width, height, image.format());

    let dynamic = match image.format() {
        PixelFormat::Rgba8 => {
            DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, raw).ok_or_else(mismatch)?)
        }
        PixelFormat::Bgra8 => {
            let mut rgba = raw;
            for px in rgba.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
            DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, rgba).ok_or_else(mismatch)?)
        }
        PixelFormat::Rgb8 => {
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, raw).ok_or_else(mismatch)?)
        }
        PixelFormat::Luma8 => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, raw).ok_or_else(mismatch)?)
        }
        PixelFormat::LumaA8 => DynamicImage::ImageLumaA8(
            GrayAlphaImage::from_raw(width, height, raw).ok_or_else(mismatch)?,
        ),
    };
    Ok(dynamic)
}
