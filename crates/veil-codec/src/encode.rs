//! Batch encoder
//!
//! A single synchronous pass over the input directory: enumerate matching
//! image files in sorted filename order, XOR each against the cyclic key,
//! digest the original bytes, write `<stem>.<ext>.bin` blobs, then write
//! `manifest.json` to the parent of the output directory.
//!
//! There is no retry or partial-failure recovery; the first I/O error
//! aborts the run. Directories and non-image extensions are skipped
//! silently — that is filtering, not an error.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::digest::sha256_hex;
use crate::key::XorKey;
use crate::manifest::{resolve_url, Manifest, ManifestItem};
use crate::xor::xor_bytes;
use crate::{IMAGE_EXTENSIONS, MANIFEST_FILE};

/// Progress callback: (files done, files total, current blob name)
pub type ProgressFn = Box<dyn Fn(u64, u64, &str)>;

/// Summary of a completed encode run
#[derive(Debug)]
pub struct EncodeReport {
    /// Number of blobs written
    pub items: usize,
    /// Where the manifest landed
    pub manifest_path: PathBuf,
}

/// Obfuscate every matching image in `in_dir` into `out_dir`.
///
/// Files are processed strictly in sorted filename order so the manifest
/// is deterministic regardless of filesystem iteration order. The output
/// directory (and parents) is created if absent; the manifest goes to the
/// parent of `out_dir`.
pub fn encode_dir(
    in_dir: &Path,
    out_dir: &Path,
    key: &XorKey,
    base_url: &str,
    progress: Option<&ProgressFn>,
) -> Result<EncodeReport> {
    let sources = list_image_files(in_dir)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let total = sources.len() as u64;
    let mut items = Vec::with_capacity(sources.len());
    for (done, path) in sources.iter().enumerate() {
        let item = encode_file(path, out_dir, key, base_url)?;
        if let Some(cb) = progress {
            cb(done as u64 + 1, total, &item.bin);
        }
        debug!(id = %item.id, bytes = item.bytes, blob = %item.bin, "encoded");
        items.push(item);
    }

    let manifest = Manifest::new(items);
    let manifest_path = out_dir
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(MANIFEST_FILE);
    manifest
        .write_to(&manifest_path)
        .with_context(|| format!("writing manifest {}", manifest_path.display()))?;

    info!(
        items = manifest.items.len(),
        manifest = %manifest_path.display(),
        "encode complete"
    );

    Ok(EncodeReport {
        items: manifest.items.len(),
        manifest_path,
    })
}

/// Regular files directly under `dir` with an allow-listed extension,
/// sorted by filename. Non-recursive.
fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading input directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if image_ext(&path).is_some() {
            files.push(path);
        }
    }
    files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(files)
}

/// The lowercased extension, when it is in the allow-list.
fn image_ext(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn encode_file(path: &Path, out_dir: &Path, key: &XorKey, base_url: &str) -> Result<ManifestItem> {
    let ext = image_ext(path)
        .ok_or_else(|| anyhow::anyhow!("not an image file: {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("non-UTF-8 file stem: {}", path.display()))?
        .to_string();

    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let enc = xor_bytes(&raw, key);
    let sha256 = sha256_hex(&raw);

    let bin = format!("{stem}.{ext}.bin");
    let out_path = out_dir.join(&bin);
    std::fs::write(&out_path, &enc)
        .with_context(|| format!("writing blob {}", out_path.display()))?;

    let url = resolve_url(base_url, &bin);
    Ok(ManifestItem {
        id: stem,
        ext,
        bin,
        sha256,
        bytes: raw.len() as u64,
        url,
    })
}
