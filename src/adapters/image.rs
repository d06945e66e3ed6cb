//! PNG decode/encode façade over the `image` crate (spec §6).
//!
//! The core only needs "give me RGBA pixels" and "give me PNG bytes
//! back"; cropping and layout belong to the image streamer, not here.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};

use crate::error::{Result, TuringError};

/// Decode an image file to RGBA8, converting from whatever the source
/// colour type is.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|err| TuringError::Adapter(err.to_string()))?;
    Ok(image.to_rgba8())
}

/// Re-encode an RGBA8 canvas as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| TuringError::Adapter(err.to_string()))?;
    Ok(buffer)
}
