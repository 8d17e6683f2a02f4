//! veil-codec: XOR stream obfuscation for image galleries
//!
//! Pipeline: source image → XOR with repeating key → `<stem>.<ext>.bin`
//! blob + manifest entry (SHA-256 of the original bytes).
//!
//! The transform is its own inverse and preserves length exactly, so a
//! consumer holding the key recovers the original bytes and can check them
//! against the recorded digest. This is obfuscation, not encryption — the
//! manifest carries an advisory note saying exactly that.

pub mod decode;
pub mod digest;
pub mod encode;
pub mod key;
pub mod manifest;
pub mod mime;
pub mod xor;

pub use decode::{decode_manifest, verify_manifest, DecodeReport, VerifyOutcome};
pub use digest::sha256_hex;
pub use encode::{encode_dir, EncodeReport};
pub use key::XorKey;
pub use manifest::{resolve_url, Manifest, ManifestItem, MANIFEST_NOTE};
pub use mime::mime_for_ext;
pub use xor::{xor_bytes, xor_in_place};

/// Minimum key length in bytes once UTF-8 encoded
pub const MIN_KEY_BYTES: usize = 8;

/// Extensions (lowercased) eligible for obfuscation
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Name of the manifest written next to the blob directory
pub const MANIFEST_FILE: &str = "manifest.json";
