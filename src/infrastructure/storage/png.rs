use crate::domain::image::entity::DecodedImage;
use crate::infrastructure::image_source::codec::to_dynamic;
use bytes::Bytes;
use image::ImageFormat;
use std::io::Cursor;
use tracing::debug;

/// Encodes the image losslessly as PNG, keeping its alpha channel if any.
pub fn encode_png(image: &DecodedImage) -> anyhow::Result<Bytes> {
    if image.is_empty() {
        anyhow::bail!(
            "cannot compress a {}x{} raster",
            image.width(),
            image.height()
        );
    }

    let dynamic = to_dynamic(image)?;
    let mut buffer = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| anyhow::anyhow!("PNG encoding failed: {}", e))?;

    let png = buffer.into_inner();
    debug!(
        width = image.width(),
        height = image.height(),
        bytes = png.len(),
        "PNG encoding complete"
    );
    Ok(png.into())
}
