use crate::domain::errors::PipelineError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory layout of one pixel in a [`DecodedImage`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8-bit red, green, blue, alpha. Android's `ARGB_8888` in memory order.
    Rgba8,
    /// 8-bit blue, green, red, alpha, as delivered by most camera HALs.
    Bgra8,
    Rgb8,
    Luma8,
    LumaA8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::LumaA8 => 2,
            PixelFormat::Luma8 => 1,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 | PixelFormat::LumaA8
        )
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Rgba8 => "RGBA8",
            PixelFormat::Bgra8 => "BGRA8",
            PixelFormat::Rgb8 => "RGB8",
            PixelFormat::Luma8 => "L8",
            PixelFormat::LumaA8 => "LA8",
        };
        f.write_str(name)
    }
}

/// Immutable in-memory raster produced by the image source adapter.
///
/// The pixel buffer is reference counted, so clones are cheap and share the
/// same bytes. Transformations always build a new value.
///
/// # Invariants
/// - `pixels.len() == width * height * format.bytes_per_pixel()`
/// - Rows are tightly packed, top to bottom.
///
/// Zero-sized rasters are representable so that degenerate camera frames can
/// reach the preprocessor, which is where they are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Bytes,
}

impl DecodedImage {
    /// Wraps a raw pixel buffer after checking it matches the declared geometry.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: impl Into<Bytes>,
    ) -> Result<Self, PipelineError> {
        let pixels = pixels.into();
        let expected = expected_len(width, height, format).ok_or_else(|| {
            PipelineError::Decode(format!("{}x{} {} raster is too large", width, height, format))
        })?;

        if pixels.len() != expected {
            return Err(PipelineError::Decode(format!(
                "{}x{} {} raster needs {} bytes, got {}",
                width,
                height,
                format,
                expected,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &Bytes {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Tightly packed RGB8 raster in the channel order the classifier consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTensorImage {
    width: u32,
    height: u32,
    rgb: Bytes,
}

impl NormalizedTensorImage {
    pub const CHANNELS: usize = 3;

    pub fn from_rgb(width: u32, height: u32, rgb: impl Into<Bytes>) -> Result<Self, PipelineError> {
        let rgb = rgb.into();
        if width == 0 || height == 0 {
            return Err(PipelineError::Preprocess(format!(
                "image has degenerate geometry {}x{}",
                width, height
            )));
        }
        let expected = expected_len(width, height, PixelFormat::Rgb8).ok_or_else(|| {
            PipelineError::Preprocess(format!("{}x{} raster is too large", width, height))
        })?;
        if rgb.len() != expected {
            return Err(PipelineError::Preprocess(format!(
                "RGB buffer needs {} bytes, got {}",
                expected,
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgb(&self) -> &Bytes {
        &self.rgb
    }

    /// RGB triple at `(x, y)`. Panics when out of bounds, like `ImageBuffer::get_pixel`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        [self.rgb[offset], self.rgb[offset + 1], self.rgb[offset + 2]]
    }
}

fn expected_len(width: u32, height: u32, format: PixelFormat) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(format.bytes_per_pixel())
}
