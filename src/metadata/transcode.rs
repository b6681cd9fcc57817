use image::ImageFormat;
use std::io::Cursor;

use crate::error::{MetadataError, Result};

/// Decode a JPEG and re-encode it as a fresh PNG.
///
/// Only pixel data survives: EXIF, ICC profiles, comments and any other
/// segments of the original are dropped. The result is a minimal PNG with
/// the encoder's default chunks, ending in `IEND`.
pub fn jpeg_to_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(MetadataError::TranscodeFailure)?;

    log::debug!(
        "Decoded JPEG {}x{} ({:?}), re-encoding as PNG",
        img.width(),
        img.height(),
        img.color()
    );

    let mut out = Cursor::new(Vec::with_capacity(bytes.len()));
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(MetadataError::TranscodeFailure)?;
    Ok(out.into_inner())
}
