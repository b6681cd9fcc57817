use super::chunk::TextRecord;
use super::format::ContainerFormat;
use super::rewrite::insert_before_terminal;
use super::transcode::jpeg_to_png;
use crate::error::{MetadataError, Result};

/// Output of [`embed_prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedded {
    /// The complete PNG with the prompt chunk inserted.
    pub bytes: Vec<u8>,
    /// `true` if the input was a JPEG and `bytes` is a freshly encoded PNG.
    pub transcoded: bool,
}

/// Embed a prompt as a `tEXt` chunk with the `Prompt` keyword.
///
/// Strategy:
/// 1. Sniff the container format from the leading bytes
/// 2. JPEG input is decoded and re-encoded as PNG (original metadata is lost)
/// 3. The new chunk goes immediately before `IEND`
///
/// Existing prompt chunks are never replaced: embedding twice leaves two
/// records, and [`read_prompt`](super::read_prompt) returns the earlier one.
///
/// # Example
///
/// ```rust
/// use png_prompt::metadata::{embed_prompt, read_prompt};
///
/// let png = [
///     0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A,
///     0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
/// ];
/// let embedded = embed_prompt(&png, "a sunset").unwrap();
/// assert_eq!(read_prompt(&embedded.bytes).unwrap(), "a sunset");
/// ```
pub fn embed_prompt(bytes: &[u8], prompt: &str) -> Result<Embedded> {
    let record = TextRecord::prompt(prompt)?;
    embed_record(bytes, &record)
}

/// Embed an arbitrary keyword/text record. See [`embed_prompt`].
pub fn embed_record(bytes: &[u8], record: &TextRecord) -> Result<Embedded> {
    let converted = match ContainerFormat::classify(bytes) {
        ContainerFormat::Png => None,
        ContainerFormat::Jpeg => {
            log::debug!("Input is JPEG, converting to PNG before embedding");
            Some(jpeg_to_png(bytes)?)
        }
        ContainerFormat::Unrecognized => return Err(MetadataError::UnsupportedFormat),
    };
    let png = converted.as_deref().unwrap_or(bytes);

    let chunk = record.encode()?;
    let out = insert_before_terminal(png, &chunk)?;
    log::debug!(
        "Embedded {} record ({} bytes of text)",
        record.keyword,
        record.text.len()
    );

    Ok(Embedded {
        bytes: out,
        transcoded: converted.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::chunk::CHUNK_OVERHEAD;
    use crate::metadata::format::PNG_SIGNATURE;
    use crate::metadata::read_prompt;
    use crate::metadata::rewrite::IEND_CHUNK;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn minimal_png() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&IEND_CHUNK);
        bytes
    }

    fn sample_jpeg() -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 100, 50]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[test]
    fn embed_minimal_png_size() {
        let png = minimal_png();
        let embedded = embed_prompt(&png, "a sunset").unwrap();
        assert!(!embedded.transcoded);
        assert_eq!(embedded.bytes.len(), png.len() + CHUNK_OVERHEAD + 15);
        assert_eq!(read_prompt(&embedded.bytes).unwrap(), "a sunset");
    }

    #[test]
    fn embed_keeps_signature_and_iend() {
        let embedded = embed_prompt(&minimal_png(), "x").unwrap();
        let bytes = &embedded.bytes;
        assert!(bytes.starts_with(&PNG_SIGNATURE));
        assert!(bytes.ends_with(&IEND_CHUNK));
    }

    #[test]
    fn embed_jpeg_transcodes() {
        let embedded = embed_prompt(&sample_jpeg(), "a red square").unwrap();
        assert!(embedded.transcoded);
        assert_eq!(
            ContainerFormat::classify(&embedded.bytes),
            ContainerFormat::Png
        );
        assert_eq!(read_prompt(&embedded.bytes).unwrap(), "a red square");
    }

    #[test]
    fn embed_unrecognized_fails() {
        let err = embed_prompt(b"GIF89a......", "x").unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedFormat));
    }

    #[test]
    fn embed_rejects_null_in_prompt() {
        let err = embed_prompt(&minimal_png(), "a\0b").unwrap_err();
        assert!(matches!(err, MetadataError::InvalidText(_)));
    }

    #[test]
    fn embed_custom_record() {
        let record = TextRecord::new("Software", "png-prompt").unwrap();
        let embedded = embed_record(&minimal_png(), &record).unwrap();
        let err = read_prompt(&embedded.bytes).unwrap_err();
        assert!(matches!(err, MetadataError::RecordNotFound));
    }

    #[test]
    fn embed_is_pure() {
        let png = minimal_png();
        let a = embed_prompt(&png, "same").unwrap();
        let b = embed_prompt(&png, "same").unwrap();
        assert_eq!(a, b);
        assert_eq!(png, minimal_png());
    }
}
