//! veil: XOR image obfuscation CLI
//!
//! Commands:
//!   encode [<in_dir>] [<out_dir>] --key <KEY> [--base-url <URL>]
//!   decode <manifest> <enc_dir> <out_dir> --key <KEY>
//!   verify <manifest> <enc_dir> --key <KEY>
//!   manifest show <path>
//!
//! The key must be at least 8 bytes once UTF-8 encoded. XOR is obfuscation
//! only; the manifest records that caveat verbatim.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use veil_codec::{
    decode_manifest, encode_dir, mime_for_ext, verify_manifest, Manifest, XorKey,
};
use veil_core::config::VeilConfig;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "veil",
    version,
    about = "XOR image obfuscation tool",
    long_about = "veil: obfuscate gallery images with a repeating XOR stream and index them in a JSON manifest"
)]
struct Cli {
    /// Path to veil.toml configuration file
    #[arg(long, short = 'c', env = "VEIL_CONFIG", default_value = "veil.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VEIL_LOG", default_value = "info")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "VEIL_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Obfuscate a directory of images and write a manifest
    ///
    /// Every regular file directly inside the input directory whose
    /// extension is jpg/jpeg/png/webp/gif becomes `<stem>.<ext>.bin` in the
    /// output directory; manifest.json lands in the output directory's parent.
    Encode {
        /// Directory with source images (default from config)
        in_dir: Option<PathBuf>,
        /// Directory to write obfuscated .bin blobs (default from config)
        out_dir: Option<PathBuf>,
        /// XOR key string (>= 8 bytes UTF-8). Not secure; obfuscation only.
        #[arg(long, short = 'k', env = "VEIL_KEY")]
        key: String,
        /// Base URL where the blob directory is hosted (manifest URLs)
        #[arg(long, env = "VEIL_BASE_URL")]
        base_url: Option<String>,
    },

    /// Decode blobs listed in a manifest back to image files
    Decode {
        /// Path to manifest.json
        manifest: PathBuf,
        /// Directory containing the .bin blobs
        enc_dir: PathBuf,
        /// Directory to write decoded images
        out_dir: PathBuf,
        /// XOR key used at encode time
        #[arg(long, short = 'k', env = "VEIL_KEY")]
        key: String,
    },

    /// Verify every blob against its recorded digest without writing
    Verify {
        /// Path to manifest.json
        manifest: PathBuf,
        /// Directory containing the .bin blobs
        enc_dir: PathBuf,
        /// XOR key used at encode time
        #[arg(long, short = 'k', env = "VEIL_KEY")]
        key: String,
    },

    /// Manifest inspection
    Manifest {
        #[command(subcommand)]
        action: ManifestAction,
    },
}

#[derive(Subcommand, Debug)]
enum ManifestAction {
    /// Print the items recorded in a manifest
    Show {
        /// Path to manifest.json
        manifest: PathBuf,
    },
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log, &cli.log_format);
    let config = VeilConfig::load(&cli.config)?;

    match cli.command {
        Commands::Encode {
            in_dir,
            out_dir,
            key,
            base_url,
        } => cmd_encode(&config, in_dir, out_dir, &key, base_url),
        Commands::Decode {
            manifest,
            enc_dir,
            out_dir,
            key,
        } => cmd_decode(&manifest, &enc_dir, &out_dir, &key),
        Commands::Verify {
            manifest,
            enc_dir,
            key,
        } => cmd_verify(&manifest, &enc_dir, &key),
        Commands::Manifest {
            action: ManifestAction::Show { manifest },
        } => cmd_manifest_show(&manifest),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_encode(
    config: &VeilConfig,
    in_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    key: &str,
    base_url: Option<String>,
) -> Result<()> {
    // Key guard fires before any filesystem work
    let key = XorKey::new(key)?;

    let in_dir = in_dir.unwrap_or_else(|| config.encode.input_dir.clone());
    let out_dir = out_dir.unwrap_or_else(|| config.encode.output_dir.clone());
    let base_url = base_url.unwrap_or_else(|| config.encode.base_url.clone());

    debug!(
        in_dir = %in_dir.display(),
        out_dir = %out_dir.display(),
        base_url = %base_url,
        "encode starting"
    );

    let pb = make_progress_bar(0, "encode");
    let pb_clone = pb.clone();
    let progress: veil_codec::encode::ProgressFn = Box::new(move |done, total, name| {
        pb_clone.set_length(total);
        pb_clone.set_position(done);
        pb_clone.set_message(name.to_string());
    });

    let report = encode_dir(&in_dir, &out_dir, &key, &base_url, Some(&progress))
        .with_context(|| format!("encoding {}", in_dir.display()))?;
    pb.finish_and_clear();

    println!(
        "Wrote {} encrypted blobs to {} and manifest.json",
        report.items,
        out_dir.display()
    );
    Ok(())
}

fn cmd_decode(manifest: &Path, enc_dir: &Path, out_dir: &Path, key: &str) -> Result<()> {
    let key = XorKey::new(key)?;

    debug!(manifest = %manifest.display(), enc_dir = %enc_dir.display(), "decode starting");
    let report = decode_manifest(manifest, enc_dir, out_dir, &key)
        .with_context(|| format!("decoding {}", manifest.display()))?;

    println!(
        "Decoded {} images to {} (all digests verified)",
        report.items,
        report.out_dir.display()
    );
    Ok(())
}

fn cmd_verify(manifest: &Path, enc_dir: &Path, key: &str) -> Result<()> {
    let key = XorKey::new(key)?;

    debug!(manifest = %manifest.display(), enc_dir = %enc_dir.display(), "verify starting");
    let outcomes = verify_manifest(manifest, enc_dir, &key)
        .with_context(|| format!("verifying {}", manifest.display()))?;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.error {
            None => println!("  ok    {}", outcome.bin),
            Some(e) => {
                println!("  FAIL  {}: {e}", outcome.bin);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} blobs failed verification", outcomes.len());
    }
    println!("Verified {} blobs", outcomes.len());
    Ok(())
}

fn cmd_manifest_show(path: &Path) -> Result<()> {
    let manifest = Manifest::load_from(path)?;

    println!("note: {}", manifest.note);
    println!("{} items:", manifest.items.len());
    for item in &manifest.items {
        println!(
            "  {:<20} {:<12} {:>10} B  {}…  {}",
            item.id,
            mime_for_ext(&item.ext),
            item.bytes,
            digest_prefix(&item.sha256),
            item.url
        );
    }
    Ok(())
}

/// First 16 chars of a digest string. Char-based so a malformed manifest
/// with non-ASCII in the digest field cannot panic the display path.
fn digest_prefix(sha256: &str) -> String {
    sha256.chars().take(16).collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn make_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_prefix_truncates_to_16_chars() {
        let full = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert_eq!(digest_prefix(full), "ba7816bf8f01cfea");
    }

    #[test]
    fn digest_prefix_handles_short_and_non_ascii_input() {
        // A hand-edited manifest may carry anything in the digest field
        assert_eq!(digest_prefix("abc"), "abc");
        assert_eq!(digest_prefix("дайджест-не-из-hex-символов"), "дайджест-не-из-h");
    }
}
