use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{MetadataError, Result};
use crate::metadata::{self, ContainerFormat};

/// Image kind as suggested by the file extension.
///
/// Used for picking files out of directories; the actual embed and read
/// decisions are made on the file contents via [`ContainerFormat`].
///
/// # Example
///
/// ```rust
/// use png_prompt::pipeline::ImageKind;
/// use std::path::Path;
///
/// assert_eq!(ImageKind::from_path(Path::new("photo.JPG")), Some(ImageKind::Jpeg));
/// assert_eq!(ImageKind::from_path(Path::new("notes.txt")), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Determine the image kind from a file path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// The result of embedding a prompt into one file.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedResult {
    /// The input file.
    pub path: PathBuf,
    /// Where the PNG was (or, in dry-run mode, would be) written.
    pub output_path: PathBuf,
    /// The input was a JPEG and was converted to PNG.
    pub transcoded: bool,
    /// Size of the resulting PNG.
    pub bytes_written: usize,
    /// Backup of the original, if one was made.
    pub backup_path: Option<PathBuf>,
    pub dry_run: bool,
}

/// Collect supported image files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks). Only `.png`, `.jpg` and `.jpeg` files
/// are included.
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_supported_image(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    ImageKind::from_path(path).is_some()
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Create a backup of the original file.
fn backup_file(path: &Path) -> Result<PathBuf> {
    let backup_path = path.with_extension(format!(
        "{}.bak",
        path.extension().unwrap_or_default().to_string_lossy()
    ));

    if !backup_path.exists() {
        std::fs::copy(path, &backup_path).map_err(|source| MetadataError::Io {
            path: backup_path.clone(),
            source,
        })?;
        log::debug!("Backup created: {}", backup_path.display());
    }

    Ok(backup_path)
}

/// Where a JPEG converted to PNG ends up.
fn output_path_for(path: &Path, transcoded: bool, config: &Config) -> PathBuf {
    if transcoded && !config.output.overwrite_transcoded {
        path.with_extension("png")
    } else {
        path.to_path_buf()
    }
}

/// Embed a prompt into an image file.
///
/// PNG files are rewritten in place. JPEG files are converted to PNG and, unless
/// [`OutputConfig::overwrite_transcoded`](crate::config::OutputConfig::overwrite_transcoded)
/// is set, written next to the original with a `.png` extension so the JPEG
/// stays untouched.
///
/// # Example
///
/// ```rust,no_run
/// use png_prompt::config::Config;
/// use png_prompt::pipeline::embed_prompt_file;
/// use std::path::Path;
///
/// let config = Config::default();
/// let result = embed_prompt_file(Path::new("out.png"), "a sunset", &config).unwrap();
/// println!("Wrote {}", result.output_path.display());
/// ```
pub fn embed_prompt_file(path: &Path, prompt: &str, config: &Config) -> Result<EmbedResult> {
    let bytes = read_file(path)?;

    if !config.metadata.transcode_jpeg && ContainerFormat::classify(&bytes) == ContainerFormat::Jpeg
    {
        log::warn!("{} is a JPEG and transcoding is disabled", path.display());
        return Err(MetadataError::UnsupportedFormat);
    }

    let embedded = metadata::embed_prompt(&bytes, prompt)?;
    let output_path = output_path_for(path, embedded.transcoded, config);

    let mut result = EmbedResult {
        path: path.to_path_buf(),
        output_path,
        transcoded: embedded.transcoded,
        bytes_written: embedded.bytes.len(),
        backup_path: None,
        dry_run: config.output.dry_run,
    };

    if config.output.dry_run {
        log::debug!(
            "Dry run: would write {} bytes to {}",
            result.bytes_written,
            result.output_path.display()
        );
        return Ok(result);
    }

    if result.output_path == path {
        if config.output.backup_originals {
            match backup_file(path) {
                Ok(backup) => result.backup_path = Some(backup),
                Err(e) => log::warn!("Failed to backup {}: {e}", path.display()),
            }
        }
    } else if result.output_path.exists() {
        log::warn!("Overwriting existing {}", result.output_path.display());
    }

    write_file(&result.output_path, &embedded.bytes)?;
    Ok(result)
}

/// Read the prompt stored in a PNG file.
pub fn read_prompt_file(path: &Path, config: &Config) -> Result<String> {
    let bytes = read_file(path)?;
    metadata::read_prompt_with(&bytes, &config.metadata.read_options())
}
