//! Decode / verify pipeline
//!
//! The consumer side of the codec: walk a manifest, XOR each blob back
//! with the same key, and check the decoded bytes against the recorded
//! length and SHA-256. A mismatch means a wrong key or a corrupted blob.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::digest::sha256_hex;
use crate::key::XorKey;
use crate::manifest::{Manifest, ManifestItem};
use crate::xor::xor_in_place;
use veil_core::{VeilError, VeilResult};

/// Summary of a completed decode run
#[derive(Debug)]
pub struct DecodeReport {
    /// Number of images restored
    pub items: usize,
    /// Where the decoded images landed
    pub out_dir: PathBuf,
}

/// Per-blob verification result
#[derive(Debug)]
pub struct VerifyOutcome {
    pub id: String,
    pub bin: String,
    /// None when the blob decoded and matched its digest
    pub error: Option<String>,
}

impl VerifyOutcome {
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Decode every blob listed in the manifest into `out_dir` as
/// `<id>.<ext>`, verifying each against its recorded digest. The first
/// failed verification aborts the run.
pub fn decode_manifest(
    manifest_path: &Path,
    enc_dir: &Path,
    out_dir: &Path,
    key: &XorKey,
) -> Result<DecodeReport> {
    let manifest = Manifest::load_from(manifest_path)
        .with_context(|| format!("loading manifest {}", manifest_path.display()))?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    for item in &manifest.items {
        let decoded = decode_item(item, enc_dir, key)?;
        let out_path = out_dir.join(format!("{}.{}", item.id, item.ext));
        std::fs::write(&out_path, &decoded)
            .with_context(|| format!("writing {}", out_path.display()))?;
        debug!(id = %item.id, bytes = decoded.len(), "decoded");
    }

    info!(items = manifest.items.len(), out = %out_dir.display(), "decode complete");
    Ok(DecodeReport {
        items: manifest.items.len(),
        out_dir: out_dir.to_path_buf(),
    })
}

/// Check every blob against its recorded length and digest without
/// writing anything. Failures are collected, not fatal, so the caller can
/// report all bad blobs at once.
pub fn verify_manifest(
    manifest_path: &Path,
    enc_dir: &Path,
    key: &XorKey,
) -> Result<Vec<VerifyOutcome>> {
    let manifest = Manifest::load_from(manifest_path)
        .with_context(|| format!("loading manifest {}", manifest_path.display()))?;

    let mut outcomes = Vec::with_capacity(manifest.items.len());
    for item in &manifest.items {
        let error = match decode_item(item, enc_dir, key) {
            Ok(_) => None,
            Err(e) => {
                warn!(id = %item.id, error = %e, "verification failed");
                Some(e.to_string())
            }
        };
        outcomes.push(VerifyOutcome {
            id: item.id.clone(),
            bin: item.bin.clone(),
            error,
        });
    }
    Ok(outcomes)
}

fn decode_item(item: &ManifestItem, enc_dir: &Path, key: &XorKey) -> VeilResult<Vec<u8>> {
    let blob_path = enc_dir.join(&item.bin);
    let mut data = std::fs::read(&blob_path)
        .with_context(|| format!("reading blob {}", blob_path.display()))?;

    if data.len() as u64 != item.bytes {
        return Err(VeilError::Verify(format!(
            "{}: blob is {} bytes, manifest says {}",
            item.bin,
            data.len(),
            item.bytes
        )));
    }

    xor_in_place(&mut data, key);

    let digest = sha256_hex(&data);
    if digest != item.sha256 {
        return Err(VeilError::Verify(format!(
            "{}: digest mismatch after decode (wrong key or corrupted blob)",
            item.bin
        )));
    }

    Ok(data)
}
