//! Error types for prompt embedding and recovery.

use std::path::PathBuf;
use thiserror::Error;

use crate::metadata::ChunkType;

/// Errors that can occur when embedding or reading prompt metadata.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("file is neither PNG nor JPEG format")]
    UnsupportedFormat,

    #[error("PNG container truncated at byte {offset}")]
    TruncatedContainer { offset: usize },

    #[error("failed to convert JPEG to PNG: {0}")]
    TranscodeFailure(#[source] image::ImageError),

    #[error("no Prompt metadata found in PNG")]
    RecordNotFound,

    #[error("{chunk_type} chunk checksum mismatch: stored {expected:#010x}, computed {actual:#010x}")]
    CorruptChunk {
        chunk_type: ChunkType,
        expected: u32,
        actual: u32,
    },

    #[error("invalid text record: {0}")]
    InvalidText(String),

    #[error("PNG container does not end with an IEND chunk")]
    MissingTerminalChunk,

    #[error("chunk data too large: {0} bytes")]
    ChunkTooLarge(usize),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MetadataError>;
