use serde::Serialize;

use super::chunk::{ChunkType, PROMPT_KEYWORD, TextRecord, parse_chunks};
use crate::error::{MetadataError, Result};

/// Options controlling how strictly a PNG is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Recompute every chunk CRC and fail with
    /// [`MetadataError::CorruptChunk`] on mismatch.
    pub verify_checksums: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            verify_checksums: true,
        }
    }
}

/// Summary of one chunk, as listed by [`list_chunks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    pub chunk_type: String,
    pub offset: usize,
    pub length: usize,
    pub crc: u32,
    pub crc_valid: bool,
}

/// Read the prompt embedded in a PNG, verifying chunk checksums.
///
/// Returns the text of the first `tEXt` chunk whose keyword is `Prompt`,
/// scanning in file order and stopping at `IEND`.
pub fn read_prompt(bytes: &[u8]) -> Result<String> {
    read_prompt_with(bytes, &ReadOptions::default())
}

/// Read the prompt embedded in a PNG with explicit [`ReadOptions`].
pub fn read_prompt_with(bytes: &[u8], options: &ReadOptions) -> Result<String> {
    let chunks = parse_chunks(bytes)?.verify_checksums(options.verify_checksums);

    for chunk in chunks {
        let chunk = chunk?;
        if chunk.chunk_type == ChunkType::TEXT
            && let Some(record) = TextRecord::parse(chunk.data)
            && record.keyword == PROMPT_KEYWORD
        {
            return Ok(record.text);
        }
        if chunk.is_terminal() {
            break;
        }
    }

    Err(MetadataError::RecordNotFound)
}

/// Collect every `tEXt` record of a PNG in file order.
pub fn text_records(bytes: &[u8], options: &ReadOptions) -> Result<Vec<TextRecord>> {
    let mut records = Vec::new();
    for chunk in parse_chunks(bytes)?.verify_checksums(options.verify_checksums) {
        let chunk = chunk?;
        if chunk.chunk_type != ChunkType::TEXT {
            continue;
        }
        match TextRecord::parse(chunk.data) {
            Some(record) => records.push(record),
            None => log::warn!("Skipping malformed tEXt chunk ({} bytes)", chunk.data.len()),
        }
    }
    Ok(records)
}

/// List all chunks of a PNG without verifying checksums.
///
/// Corrupt chunks are reported through [`ChunkSummary::crc_valid`] instead of
/// failing the listing.
pub fn list_chunks(bytes: &[u8]) -> Result<Vec<ChunkSummary>> {
    let mut summaries = Vec::new();
    let mut offset = super::format::PNG_SIGNATURE.len();

    for chunk in parse_chunks(bytes)?.verify_checksums(false) {
        let chunk = chunk?;
        summaries.push(ChunkSummary {
            chunk_type: chunk.chunk_type.to_string(),
            offset,
            length: chunk.data.len(),
            crc: chunk.crc,
            crc_valid: chunk.crc_valid(),
        });
        offset += chunk.encoded_len();
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::chunk::encode_chunk;
    use crate::metadata::embed_prompt;
    use crate::metadata::format::PNG_SIGNATURE;
    use crate::metadata::rewrite::IEND_CHUNK;

    fn minimal_png() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&IEND_CHUNK);
        bytes
    }

    fn png_with(chunks: &[Vec<u8>]) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        for chunk in chunks {
            bytes.extend_from_slice(chunk);
        }
        bytes.extend_from_slice(&IEND_CHUNK);
        bytes
    }

    // ── read_prompt ──────────────────────────────────────────────────

    #[test]
    fn read_round_trip() {
        let embedded = embed_prompt(&minimal_png(), "a sunset").unwrap();
        assert_eq!(read_prompt(&embedded.bytes).unwrap(), "a sunset");
    }

    #[test]
    fn read_unicode_round_trip() {
        let prompt = "夕焼け over the sea 🌅, style: watercolor";
        let embedded = embed_prompt(&minimal_png(), prompt).unwrap();
        assert_eq!(read_prompt(&embedded.bytes).unwrap(), prompt);
    }

    #[test]
    fn read_first_match_wins() {
        let once = embed_prompt(&minimal_png(), "first").unwrap();
        let twice = embed_prompt(&once.bytes, "second").unwrap();
        assert_eq!(read_prompt(&twice.bytes).unwrap(), "first");
    }

    #[test]
    fn read_skips_other_keywords() {
        let png = png_with(&[
            encode_chunk(ChunkType::TEXT, b"Author\0someone").unwrap(),
            encode_chunk(ChunkType::TEXT, b"prompt\0lowercase").unwrap(),
            encode_chunk(ChunkType::TEXT, b"Prompt\0wanted").unwrap(),
        ]);
        assert_eq!(read_prompt(&png).unwrap(), "wanted");
    }

    #[test]
    fn read_ignores_prompt_in_other_chunk_types() {
        let png = png_with(&[encode_chunk(ChunkType(*b"zTXt"), b"Prompt\0x").unwrap()]);
        assert!(matches!(
            read_prompt(&png).unwrap_err(),
            MetadataError::RecordNotFound
        ));
    }

    #[test]
    fn read_not_found_on_empty_png() {
        let err = read_prompt(&minimal_png()).unwrap_err();
        assert!(matches!(err, MetadataError::RecordNotFound));
    }

    #[test]
    fn read_ignores_chunks_after_iend() {
        let mut bytes = minimal_png();
        bytes.extend(encode_chunk(ChunkType::TEXT, b"Prompt\0late").unwrap());
        let err = read_prompt(&bytes).unwrap_err();
        assert!(matches!(err, MetadataError::RecordNotFound));
    }

    #[test]
    fn read_truncated_header() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&IEND_CHUNK[..5]);
        let err = read_prompt(&bytes).unwrap_err();
        assert!(matches!(err, MetadataError::TruncatedContainer { .. }));
    }

    #[test]
    fn read_missing_iend_is_truncated() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend(encode_chunk(ChunkType::TEXT, b"Author\0x").unwrap());
        let err = read_prompt(&bytes).unwrap_err();
        assert!(matches!(err, MetadataError::TruncatedContainer { .. }));
    }

    #[test]
    fn read_match_before_truncation_succeeds() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend(encode_chunk(ChunkType::TEXT, b"Prompt\0early").unwrap());
        bytes.extend_from_slice(&[0, 0, 0]);
        assert_eq!(read_prompt(&bytes).unwrap(), "early");
    }

    #[test]
    fn read_rejects_non_png() {
        let err = read_prompt(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedFormat));
    }

    #[test]
    fn read_corrupt_chunk_strict_and_lenient() {
        let mut chunk = encode_chunk(ChunkType::TEXT, b"Prompt\0tampered").unwrap();
        let crc_pos = chunk.len() - 1;
        chunk[crc_pos] ^= 0x01;
        let png = png_with(&[chunk]);

        let err = read_prompt(&png).unwrap_err();
        assert!(matches!(err, MetadataError::CorruptChunk { .. }));

        let lenient = ReadOptions {
            verify_checksums: false,
        };
        assert_eq!(read_prompt_with(&png, &lenient).unwrap(), "tampered");
    }

    // ── text_records ─────────────────────────────────────────────────

    #[test]
    fn text_records_in_file_order() {
        let png = png_with(&[
            encode_chunk(ChunkType::TEXT, b"Prompt\0one").unwrap(),
            encode_chunk(ChunkType::IDAT, &[1, 2, 3]).unwrap(),
            encode_chunk(ChunkType::TEXT, b"\0malformed").unwrap(),
            encode_chunk(ChunkType::TEXT, b"Prompt\0two").unwrap(),
        ]);
        let records = text_records(&png, &ReadOptions::default()).unwrap();
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["one", "two"]);
    }

    // ── list_chunks ──────────────────────────────────────────────────

    #[test]
    fn list_chunks_offsets_and_crc() {
        let mut corrupt = encode_chunk(ChunkType::TEXT, b"k\0v").unwrap();
        corrupt[8] = b'x';
        let png = png_with(&[encode_chunk(ChunkType::IHDR, &[0; 13]).unwrap(), corrupt]);

        let list = list_chunks(&png).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].chunk_type, "IHDR");
        assert_eq!(list[0].offset, 8);
        assert_eq!(list[0].length, 13);
        assert!(list[0].crc_valid);
        assert_eq!(list[1].offset, 8 + 25);
        assert!(!list[1].crc_valid);
        assert_eq!(list[2].chunk_type, "IEND");
        assert_eq!(list[2].crc, 0xAE42_6082);
    }
}
