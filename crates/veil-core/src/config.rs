use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level tool configuration (loaded from veil.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VeilConfig {
    pub encode: EncodeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Default directory of source images
    pub input_dir: PathBuf,
    /// Default directory for obfuscated .bin blobs
    pub output_dir: PathBuf,
    /// Base URL prefixed to manifest URLs (empty = bare filenames)
    pub base_url: String,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("enc/blobs"),
            base_url: String::new(),
        }
    }
}

impl VeilConfig {
    /// Load from a TOML file, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
            toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("parsing config {}: {e}", path.display()))
        } else {
            tracing::warn!("config file not found: {}  (using defaults)", path.display());
            Ok(Self::default())
        }
    }
}
