//! # png-prompt
//!
//! Store the prompt an image was generated from inside the image itself, as a PNG
//! `tEXt` chunk with the keyword `Prompt`, and read it back later.
//!
//! ## Quick Start
//!
//! The file-level helpers in [`pipeline`] read the image, embed or recover the
//! prompt, and write the result:
//!
//! ```rust,no_run
//! use png_prompt::config::Config;
//! use png_prompt::pipeline::{embed_prompt_file, read_prompt_file};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     let result = embed_prompt_file(Path::new("sunset.png"), "a sunset over the sea", &config)?;
//!     println!("Wrote {}", result.output_path.display());
//!
//!     let prompt = read_prompt_file(&result.output_path, &config)?;
//!     println!("Prompt: {prompt}");
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The [`metadata`] functions work on in-memory buffers and never touch the
//! filesystem:
//!
//! ```rust,no_run
//! use png_prompt::metadata::{embed_prompt, read_prompt};
//!
//! # fn main() -> Result<(), png_prompt::MetadataError> {
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let embedded = embed_prompt(&bytes, "a red fox in snow")?;
//! if embedded.transcoded {
//!     println!("JPEG was converted to PNG");
//! }
//! assert_eq!(read_prompt(&embedded.bytes)?, "a red fox in snow");
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported Formats
//!
//! | Format | Embed | Read |
//! |--------|-------|------|
//! | PNG | `tEXt` chunk inserted before `IEND` | first `Prompt` record |
//! | JPEG | converted to PNG first (original metadata is dropped) | — |
//!
//! ## Modules
//!
//! - [`metadata`] — PNG chunk codec, JPEG transcoding, prompt embed/read
//! - [`config`] — Configuration types and loading/saving
//! - [`pipeline`] — File-level embed/read, image collection
//! - [`error`] — Typed errors

pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;

pub use error::{MetadataError, Result};
