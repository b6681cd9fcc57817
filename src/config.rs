use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::metadata::ReadOptions;

/// Top-level configuration for png-prompt.
///
/// # Loading
///
/// ```rust,no_run
/// use png_prompt::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.output.backup_originals = false;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How metadata is read and how non-PNG input is handled.
    pub metadata: MetadataConfig,
    /// Output behavior (dry run, backups, transcoded file placement).
    pub output: OutputConfig,
}

/// Metadata handling options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Recompute chunk CRCs on read and reject corrupted files.
    pub verify_checksums: bool,
    /// Convert JPEG input to PNG on embed. If `false`, JPEG input is rejected.
    pub transcode_jpeg: bool,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// If `true`, report what would be written without modifying any files.
    pub dry_run: bool,
    /// If `true`, create a `.bak` backup before modifying an image in place.
    pub backup_originals: bool,
    /// If `true`, a JPEG converted to PNG replaces the original file (keeping its
    /// name). If `false`, the PNG is written next to it with a `.png` extension.
    pub overwrite_transcoded: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            verify_checksums: true,
            transcode_jpeg: true,
        }
    }
}

impl MetadataConfig {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            verify_checksums: self.verify_checksums,
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
