/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG start-of-image marker.
pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Container format of an in-memory image, detected from its leading bytes.
///
/// Unlike [`ImageKind`](crate::pipeline::ImageKind), which trusts the file
/// extension, this looks at the actual content.
///
/// # Example
///
/// ```rust
/// use png_prompt::metadata::ContainerFormat;
///
/// let bytes = [0xFF, 0xD8, 0xFF, 0xE0];
/// assert_eq!(ContainerFormat::classify(&bytes), ContainerFormat::Jpeg);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// PNG — chunked container, metadata is written directly
    Png,
    /// JPEG — must be transcoded to PNG before metadata can be attached
    Jpeg,
    /// Anything else
    Unrecognized,
}

impl ContainerFormat {
    /// Classify a buffer by signature sniffing.
    pub fn classify(bytes: &[u8]) -> Self {
        if bytes.starts_with(&PNG_SIGNATURE) {
            Self::Png
        } else if bytes.starts_with(&JPEG_SOI) {
            Self::Jpeg
        } else {
            Self::Unrecognized
        }
    }
}
