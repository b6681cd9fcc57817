//! PNG prompt metadata embedding and recovery.
//!
//! This module provides two main functions:
//!
//! - [`embed_prompt`] — Insert a `Prompt` tEXt chunk into a PNG (or a JPEG, which is converted first)
//! - [`read_prompt`] — Recover the first `Prompt` record from a PNG
//!
//! Both operate purely on in-memory buffers; reading and writing files is left
//! to [`pipeline`](crate::pipeline). The building blocks are public for
//! callers that need lower-level access:
//!
//! - [`ContainerFormat`] — signature sniffing
//! - [`parse_chunks`] / [`encode_chunk`] — the chunk codec
//! - [`jpeg_to_png`] — JPEG → PNG transcoding
//! - [`insert_before_terminal`] — splicing a chunk in front of `IEND`

mod chunk;
mod format;
mod reader;
mod rewrite;
mod transcode;
mod writer;

pub use chunk::{
    CHUNK_OVERHEAD, Chunk, ChunkType, Chunks, PROMPT_KEYWORD, TextRecord, encode_chunk,
    parse_chunks,
};
pub use format::{ContainerFormat, JPEG_SOI, PNG_SIGNATURE};
pub use reader::{
    ChunkSummary, ReadOptions, list_chunks, read_prompt, read_prompt_with, text_records,
};
pub use rewrite::{IEND_CHUNK, insert_before_terminal};
pub use transcode::jpeg_to_png;
pub use writer::{Embedded, embed_prompt, embed_record};
