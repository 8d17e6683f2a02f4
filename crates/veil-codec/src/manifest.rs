//! Blob manifest format
//!
//! The manifest indexes every obfuscated blob: identity (file stem),
//! original extension, output filename, SHA-256 of the original bytes,
//! original size, and a resolved access URL. It is written as 2-space
//! indented JSON next to the blob directory so a static viewer can fetch
//! it alongside the blobs.

use serde::{Deserialize, Serialize};
use std::path::Path;
use veil_core::{VeilError, VeilResult};

/// Advisory note stored in every manifest
pub const MANIFEST_NOTE: &str = "Client-side XOR is obfuscation, not access control.";

/// A single blob entry in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestItem {
    /// File stem of the source image
    pub id: String,
    /// Original extension, lowercased
    pub ext: String,
    /// Output blob filename (`<stem>.<ext>.bin`)
    pub bin: String,
    /// SHA-256 of the original bytes (lowercase hex)
    pub sha256: String,
    /// Original size in bytes
    pub bytes: u64,
    /// Access URL (base URL joined with the filename, or the bare filename)
    pub url: String,
}

/// The manifest document: advisory note plus ordered blob entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub note: String,
    pub items: Vec<ManifestItem>,
}

impl Manifest {
    pub fn new(items: Vec<ManifestItem>) -> Self {
        Self {
            note: MANIFEST_NOTE.to_string(),
            items,
        }
    }

    /// Serialize to 2-space indented JSON bytes
    pub fn to_bytes(&self) -> VeilResult<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| VeilError::Manifest(format!("serialization: {e}")))
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(data: &[u8]) -> VeilResult<Self> {
        serde_json::from_slice(data)
            .map_err(|e| VeilError::Manifest(format!("deserialization: {e}")))
    }

    pub fn write_to(&self, path: &Path) -> VeilResult<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load_from(path: &Path) -> VeilResult<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }
}

/// Resolve the access URL for an output filename.
///
/// A non-empty base URL is joined with exactly one `/` regardless of
/// trailing slashes; an empty base URL yields the bare filename.
pub fn resolve_url(base_url: &str, bin: &str) -> String {
    if base_url.is_empty() {
        bin.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> ManifestItem {
        ManifestItem {
            id: "cat".to_string(),
            ext: "png".to_string(),
            bin: "cat.png.bin".to_string(),
            sha256: "0".repeat(64),
            bytes: 1024,
            url: "cat.png.bin".to_string(),
        }
    }

    #[test]
    fn url_with_base() {
        assert_eq!(
            resolve_url("https://cdn.example.com/assets", "cat.png.bin"),
            "https://cdn.example.com/assets/cat.png.bin"
        );
    }

    #[test]
    fn url_base_trailing_slash_collapses() {
        assert_eq!(
            resolve_url("https://cdn.example.com/assets/", "cat.png.bin"),
            "https://cdn.example.com/assets/cat.png.bin"
        );
    }

    #[test]
    fn url_without_base_is_bare_filename() {
        assert_eq!(resolve_url("", "cat.png.bin"), "cat.png.bin");
    }

    #[test]
    fn test_manifest_roundtrip() {
        let manifest = Manifest::new(vec![sample_item()]);
        let bytes = manifest.to_bytes().unwrap();
        let restored = Manifest::from_bytes(&bytes).unwrap();

        assert_eq!(restored.note, MANIFEST_NOTE);
        assert_eq!(restored.items.len(), 1);
        assert_eq!(restored.items[0].id, "cat");
        assert_eq!(restored.items[0].bytes, 1024);
    }

    #[test]
    fn json_is_two_space_indented() {
        let manifest = Manifest::new(vec![sample_item()]);
        let text = String::from_utf8(manifest.to_bytes().unwrap()).unwrap();
        assert!(text.starts_with("{\n  \"note\""));
        assert!(text.contains("\n      \"id\": \"cat\""));
    }

    #[test]
    fn garbage_bytes_are_a_manifest_error() {
        let err = Manifest::from_bytes(b"not json at all").unwrap_err();
        assert!(matches!(err, VeilError::Manifest(_)));
    }

    #[test]
    fn missing_manifest_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load_from(&dir.path().join("manifest.json")).unwrap_err();
        assert!(matches!(err, VeilError::Io(_)));
    }

    #[test]
    fn item_has_exactly_six_fields() {
        let value = serde_json::to_value(sample_item()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        for field in ["id", "ext", "bin", "sha256", "bytes", "url"] {
            assert!(obj.contains_key(field), "missing field {field}");
        }
    }
}
