use std::fmt;

use super::format::PNG_SIGNATURE;
use crate::error::{MetadataError, Result};

/// Bytes a chunk occupies besides its data: length (4) + type (4) + CRC (4).
pub const CHUNK_OVERHEAD: usize = 12;

/// Keyword tagging the generation prompt in a tEXt chunk.
pub const PROMPT_KEYWORD: &str = "Prompt";

// PNG caps chunk lengths at 2^31 - 1 and keywords at 79 bytes
const MAX_CHUNK_LEN: usize = i32::MAX as usize;
const MAX_KEYWORD_LEN: usize = 79;

/// Four-byte ASCII chunk type tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const TEXT: Self = Self(*b"tEXt");
    pub const IEND: Self = Self(*b"IEND");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

/// A single chunk borrowed from a PNG buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub chunk_type: ChunkType,
    pub data: &'a [u8],
    /// CRC as stored in the file (not necessarily valid).
    pub crc: u32,
}

impl Chunk<'_> {
    /// CRC-32 over type and data, as a writer would compute it.
    pub fn computed_crc(&self) -> u32 {
        chunk_crc(self.chunk_type, self.data)
    }

    pub fn crc_valid(&self) -> bool {
        self.crc == self.computed_crc()
    }

    pub fn is_terminal(&self) -> bool {
        self.chunk_type == ChunkType::IEND
    }

    /// Size of the chunk on the wire.
    pub fn encoded_len(&self) -> usize {
        CHUNK_OVERHEAD + self.data.len()
    }
}

fn chunk_crc(chunk_type: ChunkType, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type.as_bytes());
    hasher.update(data);
    hasher.finalize()
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Serialize one chunk: big-endian length, type, data, big-endian CRC-32 over type + data.
pub fn encode_chunk(chunk_type: ChunkType, data: &[u8]) -> Result<Vec<u8>> {
    if data.len() > MAX_CHUNK_LEN {
        return Err(MetadataError::ChunkTooLarge(data.len()));
    }
    let length = data.len() as u32;

    let mut buf = Vec::with_capacity(CHUNK_OVERHEAD + data.len());
    buf.extend_from_slice(&length.to_be_bytes());
    buf.extend_from_slice(chunk_type.as_bytes());
    buf.extend_from_slice(data);
    buf.extend_from_slice(&chunk_crc(chunk_type, data).to_be_bytes());
    Ok(buf)
}

/// Start iterating the chunks of a PNG buffer.
///
/// Fails with [`MetadataError::UnsupportedFormat`] if the buffer does not start
/// with the PNG signature. Each call parses from the signature again; the
/// returned iterator is independent of any other.
///
/// Checksums are verified by default, see [`Chunks::verify_checksums`].
pub fn parse_chunks(bytes: &[u8]) -> Result<Chunks<'_>> {
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(MetadataError::UnsupportedFormat);
    }
    Ok(Chunks {
        buf: bytes,
        pos: PNG_SIGNATURE.len(),
        verify: true,
        done: false,
    })
}

/// Lazy iterator over the chunks of a PNG buffer, in file order.
///
/// Yields the `IEND` chunk last and then stops. The first error ends the
/// iteration; running out of bytes before `IEND` is reported as
/// [`MetadataError::TruncatedContainer`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    buf: &'a [u8],
    pos: usize,
    verify: bool,
    done: bool,
}

impl<'a> Chunks<'a> {
    /// Toggle CRC verification. When off, corrupted chunks are yielded as-is.
    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    fn read_chunk(&mut self) -> Result<Chunk<'a>> {
        let buf = self.buf;
        let start = self.pos;
        let truncated = MetadataError::TruncatedContainer { offset: start };

        if buf.len() - start < CHUNK_OVERHEAD {
            return Err(truncated);
        }

        let length = be_u32(&buf[start..start + 4]) as usize;
        let data_start = start + 8;
        let end = match data_start.checked_add(length).and_then(|e| e.checked_add(4)) {
            Some(end) if end <= buf.len() => end,
            _ => return Err(truncated),
        };

        let mut tag = [0u8; 4];
        tag.copy_from_slice(&buf[start + 4..data_start]);
        let chunk = Chunk {
            chunk_type: ChunkType(tag),
            data: &buf[data_start..end - 4],
            crc: be_u32(&buf[end - 4..end]),
        };

        if self.verify {
            let actual = chunk.computed_crc();
            if actual != chunk.crc {
                return Err(MetadataError::CorruptChunk {
                    chunk_type: chunk.chunk_type,
                    expected: chunk.crc,
                    actual,
                });
            }
        }

        self.pos = end;
        Ok(chunk)
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.read_chunk();
        if !matches!(result, Ok(ref chunk) if !chunk.is_terminal()) {
            self.done = true;
        }
        Some(result)
    }
}

/// A keyword/text pair stored in a tEXt chunk (`keyword ‖ 0x00 ‖ text`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub keyword: String,
    pub text: String,
}

impl TextRecord {
    /// Build a record, rejecting input that would produce an ambiguous chunk.
    ///
    /// The keyword must be 1–79 bytes without NUL; the text must not contain NUL.
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let keyword = keyword.into();
        let text = text.into();

        if keyword.is_empty() || keyword.len() > MAX_KEYWORD_LEN {
            return Err(MetadataError::InvalidText(format!(
                "keyword must be 1-{MAX_KEYWORD_LEN} bytes, got {}",
                keyword.len()
            )));
        }
        if keyword.contains('\0') {
            return Err(MetadataError::InvalidText("keyword contains a null byte".to_string()));
        }
        if let Some(pos) = text.find('\0') {
            return Err(MetadataError::InvalidText(format!(
                "text contains a null byte at position {pos}"
            )));
        }

        Ok(Self { keyword, text })
    }

    /// A record under the [`PROMPT_KEYWORD`].
    pub fn prompt(text: impl Into<String>) -> Result<Self> {
        Self::new(PROMPT_KEYWORD, text)
    }

    /// Raw tEXt chunk data.
    pub fn data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.keyword.len() + 1 + self.text.len());
        data.extend_from_slice(self.keyword.as_bytes());
        data.push(0);
        data.extend_from_slice(self.text.as_bytes());
        data
    }

    /// Encode as a complete tEXt chunk.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_chunk(ChunkType::TEXT, &self.data())
    }

    /// Split tEXt chunk data at the first null byte.
    ///
    /// Returns `None` when there is no separator or the keyword is empty.
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let nul = data.iter().position(|&b| b == 0)?;
        if nul == 0 {
            return None;
        }
        Some(Self {
            keyword: String::from_utf8_lossy(&data[..nul]).into_owned(),
            text: String::from_utf8_lossy(&data[nul + 1..]).into_owned(),
        })
    }
}
