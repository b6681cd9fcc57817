use super::chunk::CHUNK_OVERHEAD;
use crate::error::{MetadataError, Result};

/// The `IEND` chunk in its only valid form: zero length, fixed type and CRC.
pub const IEND_CHUNK: [u8; CHUNK_OVERHEAD] = [
    0x00, 0x00, 0x00, 0x00, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82,
];

/// Splice an encoded chunk into a PNG right before its `IEND` chunk.
///
/// `IEND` carries no data, so in a well-formed PNG it always occupies the last
/// 12 bytes and the splice point is found without walking the chunk list.
/// A new buffer is built from prefix, chunk and suffix; the input is untouched.
pub fn insert_before_terminal(bytes: &[u8], chunk: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < CHUNK_OVERHEAD {
        return Err(MetadataError::TruncatedContainer {
            offset: bytes.len(),
        });
    }

    let insert_pos = bytes.len() - CHUNK_OVERHEAD;
    let (head, tail) = bytes.split_at(insert_pos);
    if tail != IEND_CHUNK {
        return Err(MetadataError::MissingTerminalChunk);
    }

    let mut out = Vec::with_capacity(bytes.len() + chunk.len());
    out.extend_from_slice(head);
    out.extend_from_slice(chunk);
    out.extend_from_slice(tail);
    log::debug!(
        "Inserted {} byte chunk at offset {insert_pos} ({} -> {} bytes)",
        chunk.len(),
        bytes.len(),
        out.len()
    );
    Ok(out)
}
