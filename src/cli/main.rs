use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use png_prompt::{MetadataError, config, metadata, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "png-prompt",
    version,
    about = "Store generation prompts in PNG metadata and read them back"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Preview changes without writing to files
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Embed a prompt into a PNG (JPEG input is converted to PNG)
    Embed {
        /// Image file to tag
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Prompt text to store
        #[arg(value_name = "PROMPT")]
        prompt: String,
    },
    /// Print the stored prompt of PNG files or directories
    Read {
        /// Image files or directories
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Accept chunks with bad checksums
        #[arg(long)]
        no_verify: bool,
    },
    /// List the chunks and text records of a PNG
    Inspect {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
    /// Write a default config.json and exit
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Init => {
            let config = config::Config::default();
            let path = cli.config.as_deref();
            let save_path = match path {
                Some(p) => p.to_path_buf(),
                None => config::Config::config_path()?,
            };
            if cli.dry_run {
                println!("Would write default config to {}", save_path.display());
                return Ok(());
            }
            config.save(path)?;
            println!("Default config written to {}", save_path.display());
            Ok(())
        }
        Command::Embed {
            ref image,
            ref prompt,
        } => {
            let mut config = config::Config::load(cli.config.as_deref())?;
            if cli.dry_run {
                config.output.dry_run = true;
            }
            run_embed(image, prompt, &config, cli.json)
        }
        Command::Read {
            ref paths,
            no_verify,
        } => {
            let mut config = config::Config::load(cli.config.as_deref())?;
            if no_verify {
                config.metadata.verify_checksums = false;
            }
            run_read(paths, &config, cli.json)
        }
        Command::Inspect { ref image } => run_inspect(image, cli.json),
    }
}

fn run_embed(image: &Path, prompt: &str, config: &config::Config, json: bool) -> Result<()> {
    let result = pipeline::embed_prompt_file(image, prompt, config)
        .with_context(|| format!("Failed to store prompt in {}", image.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.transcoded {
        log::info!("Converted JPEG to PNG");
    }
    if let Some(ref backup) = result.backup_path {
        log::info!("Backup: {}", backup.display());
    }
    let action = if result.dry_run { "Would write" } else { "Wrote" };
    log::info!(
        "{action} {} ({} bytes, prompt stored in metadata)",
        result.output_path.display(),
        result.bytes_written
    );
    Ok(())
}

fn run_read(paths: &[PathBuf], config: &config::Config, json: bool) -> Result<()> {
    let images = pipeline::collect_images(paths);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    let mut json_results = Vec::new();
    let mut found = 0;

    for image_path in &images {
        let outcome = pipeline::read_prompt_file(image_path, config);

        if json {
            let (prompt, error) = match &outcome {
                Ok(p) => (Some(p.clone()), None),
                Err(e) => (None, Some(e.to_string())),
            };
            json_results.push(serde_json::json!({
                "path": image_path.display().to_string(),
                "prompt": prompt,
                "error": error,
            }));
        } else {
            match &outcome {
                Ok(prompt) => println!("{}: {prompt}", image_path.display()),
                Err(MetadataError::RecordNotFound) => {
                    log::info!("{}: no prompt stored", image_path.display())
                }
                Err(e) => log::warn!("{}: {e}", image_path.display()),
            }
        }

        if outcome.is_ok() {
            found += 1;
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    log::debug!("Found prompts in {found} of {} image(s)", images.len());
    Ok(())
}

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

fn run_inspect(image: &Path, json: bool) -> Result<()> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let chunks = metadata::list_chunks(&bytes)?;
    let records = metadata::text_records(&bytes, &metadata::ReadOptions {
        verify_checksums: false,
    })?;

    if json {
        let records: Vec<serde_json::Value> = records
            .iter()
            .map(|r| serde_json::json!({ "keyword": r.keyword, "text": r.text }))
            .collect();
        let out = serde_json::json!({
            "path": image.display().to_string(),
            "chunks": chunks,
            "text": records,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{BOLD}File:{RESET} {}", image.display());
    println!("{DIM}{}{RESET}", "═".repeat(60));
    println!("  {BOLD}{:<6} {:>10} {:>10} {:>12}{RESET}", "Type", "Offset", "Length", "CRC");
    println!("  {DIM}{}{RESET}", "─".repeat(58));
    for chunk in &chunks {
        let (color, mark) = if chunk.crc_valid { (GREEN, "ok") } else { (RED, "BAD") };
        println!(
            "  {:<6} {:>10} {:>10}   {:08x} {color}{mark}{RESET}",
            chunk.chunk_type, chunk.offset, chunk.length, chunk.crc
        );
    }

    if !records.is_empty() {
        println!();
        println!("  {BOLD}Text records{RESET}");
        println!("  {DIM}{}{RESET}", "─".repeat(58));
        for record in &records {
            println!("  {:<22} : {}", record.keyword, record.text);
        }
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── --dry-run ────────────────────────────────────────────────────

    #[test]
    fn dry_run_before_subcommand() {
        let cli = Cli::try_parse_from(["png-prompt", "--dry-run", "embed", "a.png", "p"]).unwrap();
        assert!(cli.dry_run);
        assert!(matches!(cli.command, Command::Embed { .. }));
    }

    #[test]
    fn dry_run_after_subcommand() {
        let cli = Cli::try_parse_from(["png-prompt", "embed", "a.png", "p", "--dry-run"]).unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn dry_run_accepted_by_every_subcommand() {
        for args in [
            vec!["png-prompt", "read", "a.png", "--dry-run"],
            vec!["png-prompt", "inspect", "a.png", "--dry-run"],
            vec!["png-prompt", "--dry-run", "init"],
        ] {
            let cli = Cli::try_parse_from(args.clone()).unwrap();
            assert!(cli.dry_run, "{args:?}");
        }
    }

    #[test]
    fn dry_run_off_by_default() {
        let cli = Cli::try_parse_from(["png-prompt", "embed", "a.png", "sunset"]).unwrap();
        assert!(!cli.dry_run);
    }
}
